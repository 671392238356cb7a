use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the data backends.
///
/// The pure engine functions never return these - malformed optional data
/// degrades to defaults during normalization instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("record service unavailable: {0}")]
    Unavailable(String),

    #[error("invalid input: {0}")]
    Invalid(String),
}

impl Error {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
