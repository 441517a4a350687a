//! gcloud-backed provider implementation

use crate::error::GcloudError;
use crate::gcloud::Gcloud;
use async_trait::async_trait;
use reclaim_cloud::{
    AuthStatus, Cluster, ClusterProvider, Disk, DiskProvider, FirewallRule, Instance,
    OperationStatus, ResourceProvider, Result, TargetPool,
};

/// Google Cloud provider
#[derive(Debug, Clone, Default)]
pub struct GcloudProvider {
    gcloud: Gcloud,
}

impl GcloudProvider {
    pub fn new() -> Self {
        Self {
            gcloud: Gcloud::new(),
        }
    }

    pub fn with_gcloud(gcloud: Gcloud) -> Self {
        Self { gcloud }
    }
}

#[async_trait]
impl ResourceProvider for GcloudProvider {
    fn name(&self) -> &str {
        "gcloud"
    }

    async fn check_auth(&self) -> Result<AuthStatus> {
        match self.gcloud.check_auth().await {
            Ok(accounts) => match accounts.into_iter().next() {
                Some(active) => Ok(AuthStatus::ok(active.account)),
                None => Ok(AuthStatus::failed(
                    "No active gcloud account. Run: gcloud auth login",
                )),
            },
            Err(GcloudError::GcloudNotFound) => {
                Ok(AuthStatus::failed("gcloud is not installed"))
            }
            Err(e) => Ok(AuthStatus::failed(e.to_string())),
        }
    }

    async fn list_firewalls(&self, project: &str) -> Result<Vec<FirewallRule>> {
        Ok(self.gcloud.list_firewalls(project).await?)
    }

    async fn list_target_pools_aggregated(&self, project: &str) -> Result<Vec<TargetPool>> {
        Ok(self.gcloud.list_target_pools(project).await?)
    }

    async fn list_instances_aggregated(&self, project: &str) -> Result<Vec<Instance>> {
        Ok(self.gcloud.list_instances(project).await?)
    }

    async fn get_instance(&self, project: &str, zone: &str, name: &str) -> Result<Instance> {
        Ok(self.gcloud.describe_instance(project, zone, name).await?)
    }

    async fn delete_firewall(&self, project: &str, name: &str) -> Result<OperationStatus> {
        Ok(self.gcloud.delete_firewall(project, name).await?)
    }

    async fn delete_forwarding_rule(
        &self,
        project: &str,
        region: &str,
        name: &str,
    ) -> Result<OperationStatus> {
        Ok(self
            .gcloud
            .delete_regional("forwarding-rules", project, region, name)
            .await?)
    }

    async fn delete_address(
        &self,
        project: &str,
        region: &str,
        name: &str,
    ) -> Result<OperationStatus> {
        Ok(self
            .gcloud
            .delete_regional("addresses", project, region, name)
            .await?)
    }

    async fn delete_target_pool(
        &self,
        project: &str,
        region: &str,
        name: &str,
    ) -> Result<OperationStatus> {
        Ok(self
            .gcloud
            .delete_regional("target-pools", project, region, name)
            .await?)
    }
}

#[async_trait]
impl ClusterProvider for GcloudProvider {
    async fn list_clusters(&self, project: &str) -> Result<Vec<Cluster>> {
        Ok(self.gcloud.list_clusters(project).await?)
    }

    async fn delete_cluster(
        &self,
        project: &str,
        location: &str,
        name: &str,
    ) -> Result<OperationStatus> {
        Ok(self.gcloud.delete_cluster(project, location, name).await?)
    }
}

#[async_trait]
impl DiskProvider for GcloudProvider {
    async fn list_disks_aggregated(&self, project: &str) -> Result<Vec<Disk>> {
        Ok(self.gcloud.list_disks(project).await?)
    }

    async fn delete_disk(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<OperationStatus> {
        Ok(self.gcloud.delete_disk(project, zone, name).await?)
    }
}
