//! gcloud provider error types

use reclaim_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GcloudError {
    #[error("gcloud not found. Please install the Google Cloud SDK")]
    GcloudNotFound,

    #[error("gcloud authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("gcloud command failed: {0}")]
    CommandFailed(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl GcloudError {
    /// Classifies a failed gcloud invocation by its stderr
    pub fn from_stderr(stderr: &str) -> Self {
        let message = stderr.trim().to_string();
        if is_not_found(&message) {
            GcloudError::NotFound(message)
        } else if is_auth_failure(&message) {
            GcloudError::AuthenticationFailed(message)
        } else {
            GcloudError::CommandFailed(message)
        }
    }
}

fn is_not_found(stderr: &str) -> bool {
    stderr.contains("was not found")
        || stderr.contains("notFound")
        || stderr.contains("HTTPError 404")
        || stderr.contains("code=404")
}

fn is_auth_failure(stderr: &str) -> bool {
    stderr.contains("gcloud auth login")
        || stderr.contains("Reauthentication")
        || stderr.contains("credentials")
}

impl From<GcloudError> for CloudError {
    fn from(e: GcloudError) -> Self {
        match e {
            GcloudError::NotFound(msg) => CloudError::NotFound(msg),
            GcloudError::AuthenticationFailed(msg) => CloudError::AuthenticationFailed(msg),
            GcloudError::JsonError(e) => CloudError::Json(e),
            GcloudError::IoError(e) => CloudError::Io(e),
            other => CloudError::Provider(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, GcloudError>;
