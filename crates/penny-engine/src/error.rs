use thiserror::Error;

/// Error kinds shared by the engine's services and ports.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Notifier unavailable: {0}")]
    NotifierUnavailable(String),
    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),
    #[error("Serialization error: {0}")]
    Serde(String),
}

impl EngineError {
    /// Whether the caller may retry the failed operation as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngineError::StoreUnavailable(_) | EngineError::DeadlineExceeded(_)
        )
    }
}
