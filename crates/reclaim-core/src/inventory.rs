//! Point-in-time inventory snapshot

use crate::error::{ReclaimError, Result};
use reclaim_cloud::{FirewallRule, Instance, ResourceKind, ResourceProvider, TargetPool};
use std::collections::BTreeMap;

/// Firewalls, target pools and instances fetched once per pass
///
/// A failure to fetch any of the three aborts the pass: without the full
/// picture no classification can be trusted.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    firewalls: BTreeMap<String, FirewallRule>,
    target_pools: Vec<TargetPool>,
    instances: Vec<Instance>,
}

impl Snapshot {
    pub async fn collect(provider: &dyn ResourceProvider, project: &str) -> Result<Self> {
        let firewalls = provider
            .list_firewalls(project)
            .await
            .map_err(ReclaimError::inventory(ResourceKind::Firewall))?;
        let target_pools = provider
            .list_target_pools_aggregated(project)
            .await
            .map_err(ReclaimError::inventory(ResourceKind::TargetPool))?;
        let instances = provider
            .list_instances_aggregated(project)
            .await
            .map_err(ReclaimError::inventory(ResourceKind::Instance))?;

        tracing::info!(
            "Inventory: {} firewalls, {} target pools, {} instances",
            firewalls.len(),
            target_pools.len(),
            instances.len()
        );

        Ok(Self::from_parts(firewalls, target_pools, instances))
    }

    pub fn from_parts(
        firewalls: Vec<FirewallRule>,
        target_pools: Vec<TargetPool>,
        instances: Vec<Instance>,
    ) -> Self {
        Self {
            firewalls: firewalls
                .into_iter()
                .map(|fw| (fw.name.clone(), fw))
                .collect(),
            target_pools,
            instances,
        }
    }

    /// Firewalls in name order
    pub fn firewalls(&self) -> impl Iterator<Item = &FirewallRule> {
        self.firewalls.values()
    }

    pub fn firewall(&self, name: &str) -> Option<&FirewallRule> {
        self.firewalls.get(name)
    }

    pub fn target_pools(&self) -> &[TargetPool] {
        &self.target_pools
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }
}
