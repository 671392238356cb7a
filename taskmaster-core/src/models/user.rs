use serde::{Deserialize, Serialize};

/// Assignable user. Served from the seeded store in both backend modes;
/// tasks and projects reference users by id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub role: String,
}
