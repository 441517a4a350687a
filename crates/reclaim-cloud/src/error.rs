//! Cloud provider error types

use crate::model::ResourceKind;
use crate::selflink::SelfLinkError;
use thiserror::Error;

/// Cloud provider errors
#[derive(Error, Debug)]
pub enum CloudError {
    /// The provider answered that the resource does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Any other provider-side failure, transient or permanent.
    ///
    /// This is never evidence that a resource is gone.
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Malformed {kind} '{name}': {reason}")]
    MalformedResource {
        kind: ResourceKind,
        name: String,
        reason: String,
    },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    pub fn malformed(kind: ResourceKind, name: impl Into<String>, err: SelfLinkError) -> Self {
        CloudError::MalformedResource {
            kind,
            name: name.into(),
            reason: err.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
