//! Error types for CommentGuard

/// Result type alias using CommentGuard's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for CommentGuard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller input rejected before scoring
    #[error("validation error: {0}")]
    Validation(String),

    /// Model-path scoring failures (unfitted state, dimension mismatch)
    #[error("prediction error: {0}")]
    Prediction(String),

    /// Training-time failures
    #[error("training error: {0}")]
    Training(String),

    /// Filesystem errors (model persistence)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new prediction error
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::Prediction(msg.into())
    }

    /// Create a new training error
    pub fn training(msg: impl Into<String>) -> Self {
        Self::Training(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
