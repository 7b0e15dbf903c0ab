use super::domain::{Application, ApplicationId};

/// Lookup abstraction over wherever applications are persisted.
///
/// A missing record is `Ok(None)`, never an error.
pub trait ApplicationStore: Send + Sync {
    fn find_by_id(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("application store unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read application seed '{path}': {source}")]
    Seed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed application data: {0}")]
    Malformed(#[from] serde_json::Error),
}
