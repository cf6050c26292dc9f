//! Error types for the scan tool
//!
//! Only configuration and output failures surface here. Network trouble on a
//! single node is captured as [`crate::client::EndpointError`] inside that
//! node's record and never aborts a scan.

use thiserror::Error;

/// Main error type for scan operations
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Expected miners file not found: {path}")]
    ExpectedMinersNotFound { path: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for scan operations
pub type Result<T> = std::result::Result<T, ScanError>;

impl ScanError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(anyhow::anyhow!(message.into()))
    }

    /// Add contextual information to any error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        let context = context.into();
        match self {
            Self::Internal(err) => Self::Internal(anyhow::anyhow!("{}\nContext: {}", err, context)),
            _ => Self::Internal(anyhow::anyhow!("{}\nContext: {}", self, context)),
        }
    }

    /// Whether the error comes from operator input rather than the runtime
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::ExpectedMinersNotFound { .. } | Self::InvalidArgument { .. }
        )
    }
}
