//! Engine error types

use reclaim_cloud::{CloudError, ResourceKind};
use thiserror::Error;

/// Errors that stop a pass
///
/// Per-resource failures never surface here; they are recorded in the
/// [`PassReport`](crate::PassReport) instead.
#[derive(Error, Debug)]
pub enum ReclaimError {
    #[error("Failed to list {what}s: {source}")]
    Inventory {
        what: ResourceKind,
        #[source]
        source: CloudError,
    },

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ReclaimError {
    pub fn inventory(what: ResourceKind) -> impl FnOnce(CloudError) -> Self {
        move |source| ReclaimError::Inventory { what, source }
    }
}

pub type Result<T> = std::result::Result<T, ReclaimError>;
