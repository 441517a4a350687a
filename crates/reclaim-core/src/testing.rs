//! In-memory provider for tests
//!
//! Holds an inventory, applies deletes to it, and records every call so
//! tests can assert on what the engine asked for.

use crate::deadline::CancelHandle;
use crate::inventory::Snapshot;
use async_trait::async_trait;
use reclaim_cloud::selflink::{region_name, zone_name};
use reclaim_cloud::{
    AuthStatus, CloudError, Cluster, ClusterProvider, Disk, DiskProvider, FirewallRule, Instance,
    OperationStatus, ResourceKind, ResourceProvider, Result, SelfLinkError, TargetPool,
};
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

const BASE: &str = "https://www.googleapis.com/compute/v1/projects/dev-project";

/// Region self-link in the test project
pub fn region_link(region: &str) -> String {
    format!("{}/regions/{}", BASE, region)
}

/// Instance self-link in the test project
pub fn instance_link(zone: &str, name: &str) -> String {
    format!("{}/zones/{}/instances/{}", BASE, zone, name)
}

#[derive(Debug, Default)]
struct State {
    firewalls: Vec<FirewallRule>,
    target_pools: Vec<TargetPool>,
    instances: Vec<Instance>,
    forwarding_rules: BTreeSet<(String, String)>,
    addresses: BTreeSet<(String, String)>,
    clusters: Vec<Cluster>,
    disks: Vec<Disk>,
    deleted: Vec<(ResourceKind, String)>,
    delete_calls: Vec<String>,
    probed: Vec<String>,
}

#[derive(Debug, Default)]
pub struct FakeProvider {
    state: Mutex<State>,
    failing_gets: BTreeSet<String>,
    failing_deletes: BTreeSet<(ResourceKind, String)>,
    failing_lists: BTreeSet<ResourceKind>,
    cancel_after: Option<(ResourceKind, String, CancelHandle)>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn state_mut(&mut self) -> &mut State {
        self.state.get_mut().unwrap_or_else(|e| e.into_inner())
    }

    pub fn with_firewall(mut self, rule: FirewallRule) -> Self {
        self.state_mut().firewalls.push(rule);
        self
    }

    pub fn with_target_pool(mut self, pool: TargetPool) -> Self {
        self.state_mut().target_pools.push(pool);
        self
    }

    pub fn with_instance(mut self, instance: Instance) -> Self {
        self.state_mut().instances.push(instance);
        self
    }

    pub fn with_forwarding_rule(mut self, region: &str, name: &str) -> Self {
        self.state_mut()
            .forwarding_rules
            .insert((region.to_string(), name.to_string()));
        self
    }

    pub fn with_address(mut self, region: &str, name: &str) -> Self {
        self.state_mut()
            .addresses
            .insert((region.to_string(), name.to_string()));
        self
    }

    pub fn with_cluster(mut self, cluster: Cluster) -> Self {
        self.state_mut().clusters.push(cluster);
        self
    }

    pub fn with_disk(mut self, disk: Disk) -> Self {
        self.state_mut().disks.push(disk);
        self
    }

    /// `get_instance` for this name fails with a provider error
    pub fn fail_get_instance(mut self, name: &str) -> Self {
        self.failing_gets.insert(name.to_string());
        self
    }

    pub fn fail_delete(mut self, kind: ResourceKind, name: &str) -> Self {
        self.failing_deletes.insert((kind, name.to_string()));
        self
    }

    pub fn fail_list(mut self, kind: ResourceKind) -> Self {
        self.failing_lists.insert(kind);
        self
    }

    /// Cancels `handle` once this resource has been deleted
    pub fn cancel_after_delete(
        mut self,
        kind: ResourceKind,
        name: &str,
        handle: CancelHandle,
    ) -> Self {
        self.cancel_after = Some((kind, name.to_string(), handle));
        self
    }

    /// Snapshot of the current inventory, as the engine would collect it
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state();
        Snapshot::from_parts(
            state.firewalls.clone(),
            state.target_pools.clone(),
            state.instances.clone(),
        )
    }

    /// Names successfully deleted, in call order
    pub fn deleted(&self, kind: ResourceKind) -> Vec<String> {
        self.state()
            .deleted
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Every delete call, successful or not, as "kind [location/]name"
    pub fn delete_calls(&self) -> Vec<String> {
        self.state().delete_calls.clone()
    }

    /// Every `get_instance` call as "zone/name"
    pub fn probed(&self) -> Vec<String> {
        self.state().probed.clone()
    }

    fn list<T: Clone>(
        &self,
        kind: ResourceKind,
        items: impl FnOnce(&State) -> &Vec<T>,
    ) -> Result<Vec<T>> {
        if self.failing_lists.contains(&kind) {
            return Err(CloudError::Provider(format!("listing {}s failed", kind)));
        }
        Ok(items(&self.state()).clone())
    }

    /// Runs the shared bookkeeping of a delete; `remove` reports whether the
    /// resource existed
    fn delete(
        &self,
        kind: ResourceKind,
        location: Option<&str>,
        name: &str,
        remove: impl FnOnce(&mut State) -> bool,
    ) -> Result<OperationStatus> {
        let mut state = self.state();
        let call = match location {
            Some(location) => format!("{} {}/{}", kind, location, name),
            None => format!("{} {}", kind, name),
        };
        state.delete_calls.push(call);

        if self.failing_deletes.contains(&(kind, name.to_string())) {
            return Err(CloudError::Provider(format!(
                "HTTP 503 deleting {} {}",
                kind, name
            )));
        }
        if !remove(&mut state) {
            return Err(CloudError::NotFound(format!("{} {}", kind, name)));
        }
        state.deleted.push((kind, name.to_string()));
        if let Some((k, n, handle)) = &self.cancel_after
            && *k == kind
            && n == name
        {
            handle.cancel();
        }
        Ok(OperationStatus::new("PENDING"))
    }
}

fn remove_where<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !pred(item));
    items.len() != before
}

type LocationParser = fn(&str) -> std::result::Result<String, SelfLinkError>;

fn same_location(link: &str, location: &str, parse: LocationParser) -> bool {
    parse(link).is_ok_and(|l| l == location)
}

#[async_trait]
impl ResourceProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn check_auth(&self) -> Result<AuthStatus> {
        Ok(AuthStatus::ok("tester@dev-project"))
    }

    async fn list_firewalls(&self, _project: &str) -> Result<Vec<FirewallRule>> {
        self.list(ResourceKind::Firewall, |s| &s.firewalls)
    }

    async fn list_target_pools_aggregated(&self, _project: &str) -> Result<Vec<TargetPool>> {
        self.list(ResourceKind::TargetPool, |s| &s.target_pools)
    }

    async fn list_instances_aggregated(&self, _project: &str) -> Result<Vec<Instance>> {
        self.list(ResourceKind::Instance, |s| &s.instances)
    }

    async fn get_instance(&self, _project: &str, zone: &str, name: &str) -> Result<Instance> {
        let mut state = self.state();
        state.probed.push(format!("{}/{}", zone, name));

        if self.failing_gets.contains(name) {
            return Err(CloudError::Provider(format!(
                "HTTP 500 fetching instance {}",
                name
            )));
        }
        state
            .instances
            .iter()
            .find(|i| i.name == name && same_location(&i.zone, zone, zone_name))
            .cloned()
            .ok_or_else(|| CloudError::NotFound(format!("instance {}/{}", zone, name)))
    }

    async fn delete_firewall(&self, _project: &str, name: &str) -> Result<OperationStatus> {
        self.delete(ResourceKind::Firewall, None, name, |s| {
            remove_where(&mut s.firewalls, |fw| fw.name == name)
        })
    }

    async fn delete_forwarding_rule(
        &self,
        _project: &str,
        region: &str,
        name: &str,
    ) -> Result<OperationStatus> {
        self.delete(ResourceKind::ForwardingRule, Some(region), name, |s| {
            s.forwarding_rules
                .remove(&(region.to_string(), name.to_string()))
        })
    }

    async fn delete_address(
        &self,
        _project: &str,
        region: &str,
        name: &str,
    ) -> Result<OperationStatus> {
        self.delete(ResourceKind::Address, Some(region), name, |s| {
            s.addresses.remove(&(region.to_string(), name.to_string()))
        })
    }

    async fn delete_target_pool(
        &self,
        _project: &str,
        region: &str,
        name: &str,
    ) -> Result<OperationStatus> {
        self.delete(ResourceKind::TargetPool, Some(region), name, |s| {
            remove_where(&mut s.target_pools, |tp| {
                tp.name == name && same_location(&tp.region, region, region_name)
            })
        })
    }
}

#[async_trait]
impl ClusterProvider for FakeProvider {
    async fn list_clusters(&self, _project: &str) -> Result<Vec<Cluster>> {
        self.list(ResourceKind::Cluster, |s| &s.clusters)
    }

    async fn delete_cluster(
        &self,
        _project: &str,
        location: &str,
        name: &str,
    ) -> Result<OperationStatus> {
        self.delete(ResourceKind::Cluster, Some(location), name, |s| {
            remove_where(&mut s.clusters, |c| c.name == name && c.location == location)
        })
    }
}

#[async_trait]
impl DiskProvider for FakeProvider {
    async fn list_disks_aggregated(&self, _project: &str) -> Result<Vec<Disk>> {
        self.list(ResourceKind::Disk, |s| &s.disks)
    }

    async fn delete_disk(&self, _project: &str, zone: &str, name: &str) -> Result<OperationStatus> {
        self.delete(ResourceKind::Disk, Some(zone), name, |s| {
            remove_where(&mut s.disks, |d| {
                d.name == name && same_location(&d.zone, zone, zone_name)
            })
        })
    }
}
