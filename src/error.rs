//! Error taxonomy of the upload pipeline.

use std::path::PathBuf;

/// Boxed error returned by the pipeline's collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while uploading a deployment.
///
/// Every variant names the artifact path or object key involved so a failed
/// transfer can be identified from the message alone.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Packaging configuration is malformed or contradictory
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A caller passed an unusable argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to normalize compiled template: {0}")]
    Normalization(#[source] BoxError),

    #[error("failed to serialize compiled template: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The object store rejected the upload or could not be reached
    #[error("upload of s3 object '{key}' failed: {source}")]
    Remote {
        key: String,
        #[source]
        source: BoxError,
    },
}

impl UploadError {
    pub fn configuration(message: impl Into<String>) -> Self {
        UploadError::Configuration(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        UploadError::InvalidArgument(message.into())
    }
}
