use std::path::Path;

use taskmaster_core::remote::RemoteClient;
use taskmaster_core::store::{Backend, SeedData};

/// Credential triple for the remote record service.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub project_id: String,
    pub public_key: String,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub remote: Option<RemoteConfig>,
}

impl Config {
    /// Remote mode requires all three of `TASKMASTER_API_URL`,
    /// `TASKMASTER_PROJECT_ID`, and `TASKMASTER_PUBLIC_KEY`; anything less
    /// falls back to the in-memory backend for offline development.
    pub fn from_env() -> Self {
        let var = |name: &str| {
            std::env::var(name)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let remote = match (
            var("TASKMASTER_API_URL"),
            var("TASKMASTER_PROJECT_ID"),
            var("TASKMASTER_PUBLIC_KEY"),
        ) {
            (Some(base_url), Some(project_id), Some(public_key)) => Some(RemoteConfig {
                base_url,
                project_id,
                public_key,
            }),
            _ => None,
        };
        Self { remote }
    }

    /// An explicit seed file always selects the in-memory backend, even
    /// when remote credentials are present.
    pub fn build_backend(&self, seed_path: Option<&Path>) -> anyhow::Result<Backend> {
        if let Some(path) = seed_path {
            let seed = SeedData::from_path(path)?;
            return Ok(Backend::memory(seed));
        }
        match &self.remote {
            Some(remote) => Ok(Backend::remote(RemoteClient::new(
                remote.base_url.clone(),
                remote.project_id.clone(),
                remote.public_key.clone(),
            ))),
            None => Ok(Backend::in_memory()),
        }
    }
}
