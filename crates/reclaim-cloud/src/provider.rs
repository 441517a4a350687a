//! Provider trait definitions
//!
//! The engine only ever talks to the cloud through these traits. Every call
//! takes the project explicitly; implementations hold no project state.

use crate::error::Result;
use crate::model::{Cluster, Disk, FirewallRule, Instance, OperationStatus, TargetPool};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Network inventory and deletion calls used by the reconciliation pass
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Returns the provider name (e.g., "gcloud")
    fn name(&self) -> &str;

    /// Check if the provider is properly configured and authenticated
    async fn check_auth(&self) -> Result<AuthStatus>;

    async fn list_firewalls(&self, project: &str) -> Result<Vec<FirewallRule>>;

    /// Target pools across all regions
    async fn list_target_pools_aggregated(&self, project: &str) -> Result<Vec<TargetPool>>;

    /// Instances across all zones
    async fn list_instances_aggregated(&self, project: &str) -> Result<Vec<Instance>>;

    /// Fails with [`CloudError::NotFound`](crate::CloudError::NotFound) when
    /// the instance does not exist.
    async fn get_instance(&self, project: &str, zone: &str, name: &str) -> Result<Instance>;

    async fn delete_firewall(&self, project: &str, name: &str) -> Result<OperationStatus>;

    async fn delete_forwarding_rule(
        &self,
        project: &str,
        region: &str,
        name: &str,
    ) -> Result<OperationStatus>;

    async fn delete_address(
        &self,
        project: &str,
        region: &str,
        name: &str,
    ) -> Result<OperationStatus>;

    async fn delete_target_pool(
        &self,
        project: &str,
        region: &str,
        name: &str,
    ) -> Result<OperationStatus>;
}

/// Managed cluster calls used by the age sweep
#[async_trait]
pub trait ClusterProvider: Send + Sync {
    /// Clusters in every location of the project
    async fn list_clusters(&self, project: &str) -> Result<Vec<Cluster>>;

    async fn delete_cluster(
        &self,
        project: &str,
        location: &str,
        name: &str,
    ) -> Result<OperationStatus>;
}

/// Persistent disk calls used by the unattached disk sweep
#[async_trait]
pub trait DiskProvider: Send + Sync {
    /// Disks across all zones
    async fn list_disks_aggregated(&self, project: &str) -> Result<Vec<Disk>>;

    async fn delete_disk(&self, project: &str, zone: &str, name: &str)
    -> Result<OperationStatus>;
}

/// Authentication status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    /// Whether authentication is valid
    pub authenticated: bool,

    /// Account information if available
    pub account_info: Option<String>,

    /// Error message if not authenticated
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(account_info: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            account_info: Some(account_info.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_info: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_status() {
        let ok = AuthStatus::ok("ci@dev-project.iam.gserviceaccount.com");
        assert!(ok.authenticated);
        assert!(ok.error.is_none());

        let failed = AuthStatus::failed("no active account");
        assert!(!failed.authenticated);
        assert_eq!(failed.error.as_deref(), Some("no active account"));
    }
}
