use thiserror::Error;

/// Main error type for papyrus operations
#[derive(Error, Debug)]
pub enum PapyrusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Engine not initialized - call initialize() before serving queries")]
    NotInitialized,

    #[error("Bad input: {0}")]
    BadInput(String),

    #[error("Background indexing failed: {0}")]
    WorkerFailure(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for papyrus operations
pub type Result<T> = std::result::Result<T, PapyrusError>;

impl PapyrusError {
    /// Check whether this error should abort the process at startup
    pub fn is_fatal(&self) -> bool {
        matches!(self, PapyrusError::Config(_))
    }
}
