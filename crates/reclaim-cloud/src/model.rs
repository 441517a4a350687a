//! Inventory model
//!
//! Field names follow the Compute Engine JSON representation so that
//! provider output can be deserialized directly.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Kind of a cloud resource, used in logs, reports and errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Firewall,
    Instance,
    TargetPool,
    ForwardingRule,
    Address,
    Cluster,
    Disk,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Firewall => write!(f, "firewall"),
            ResourceKind::Instance => write!(f, "instance"),
            ResourceKind::TargetPool => write!(f, "target-pool"),
            ResourceKind::ForwardingRule => write!(f, "forwarding-rule"),
            ResourceKind::Address => write!(f, "address"),
            ResourceKind::Cluster => write!(f, "cluster"),
            ResourceKind::Disk => write!(f, "disk"),
        }
    }
}

/// A VPC firewall rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRule {
    pub name: String,

    /// Instance tags the rule applies to. Empty means the whole network.
    #[serde(default)]
    pub target_tags: Vec<String>,
}

impl FirewallRule {
    pub fn new<I, S>(name: impl Into<String>, target_tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            target_tags: target_tags.into_iter().map(Into::into).collect(),
        }
    }
}

/// Network tags block of an instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags {
    #[serde(default)]
    pub items: BTreeSet<String>,
}

/// A compute instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    #[serde(default)]
    pub name: String,

    /// Zone self-link or bare zone name
    #[serde(default)]
    pub zone: String,

    #[serde(default)]
    pub tags: Tags,

    /// RUNNING, TERMINATED, ...
    #[serde(default)]
    pub status: Option<String>,
}

impl Instance {
    pub fn new<I, S>(name: impl Into<String>, zone: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            zone: zone.into(),
            tags: Tags {
                items: tags.into_iter().map(Into::into).collect(),
            },
            status: None,
        }
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags.items
    }
}

/// A regional load-balancer target pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetPool {
    pub name: String,

    /// Region self-link
    #[serde(default)]
    pub region: String,

    /// Self-links of the bound instances
    #[serde(default)]
    pub instances: Vec<String>,
}

impl TargetPool {
    pub fn new<I, S>(name: impl Into<String>, region: impl Into<String>, instances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            region: region.into(),
            instances: instances.into_iter().map(Into::into).collect(),
        }
    }
}

/// A managed Kubernetes cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub name: String,

    /// Zone or region the cluster lives in
    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub resource_labels: HashMap<String, String>,
}

impl Cluster {
    pub fn label(&self, key: &str) -> Option<&str> {
        self.resource_labels.get(key).map(String::as_str)
    }
}

/// A persistent disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disk {
    pub name: String,

    /// Zone self-link or bare zone name
    #[serde(default)]
    pub zone: String,

    /// Self-links of the instances the disk is attached to
    #[serde(default)]
    pub users: Vec<String>,
}

impl Disk {
    pub fn is_attached(&self) -> bool {
        !self.users.is_empty()
    }
}

/// Status of a delete operation as acknowledged by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationStatus {
    #[serde(default)]
    pub name: Option<String>,

    /// PENDING, RUNNING or DONE
    pub status: String,
}

impl OperationStatus {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            name: None,
            status: status.into(),
        }
    }

    pub fn done() -> Self {
        Self::new("DONE")
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", self.status, name),
            None => write!(f, "{}", self.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firewall_from_json_without_tags() {
        let fw: FirewallRule =
            serde_json::from_str(r#"{"name": "default-allow-ssh", "network": "default"}"#)
                .unwrap();
        assert_eq!(fw.name, "default-allow-ssh");
        assert!(fw.target_tags.is_empty());
    }

    #[test]
    fn test_instance_from_json() {
        let json = r#"{
            "name": "vm-1",
            "zone": "https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-a",
            "status": "RUNNING",
            "tags": {"items": ["gke-node", "http-server"], "fingerprint": "abc"}
        }"#;
        let instance: Instance = serde_json::from_str(json).unwrap();
        assert_eq!(instance.name, "vm-1");
        assert!(instance.tags().contains("gke-node"));
        assert_eq!(instance.status.as_deref(), Some("RUNNING"));
    }

    #[test]
    fn test_target_pool_from_json() {
        let json = r#"{
            "name": "tp-a",
            "region": "https://www.googleapis.com/compute/v1/projects/p/regions/us-central1",
            "instances": ["https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-a/instances/vm-1"]
        }"#;
        let pool: TargetPool = serde_json::from_str(json).unwrap();
        assert_eq!(pool.instances.len(), 1);
    }

    #[test]
    fn test_cluster_label() {
        let json = r#"{"name": "c1", "location": "us-central1-a",
                       "resourceLabels": {"creation-time": "1700000000"}}"#;
        let cluster: Cluster = serde_json::from_str(json).unwrap();
        assert_eq!(cluster.label("creation-time"), Some("1700000000"));
        assert_eq!(cluster.label("owner"), None);
    }

    #[test]
    fn test_disk_attachment() {
        let disk: Disk = serde_json::from_str(r#"{"name": "d1", "zone": "z"}"#).unwrap();
        assert!(!disk.is_attached());
    }

    #[test]
    fn test_resource_kind_display() {
        assert_eq!(ResourceKind::ForwardingRule.to_string(), "forwarding-rule");
        assert_eq!(
            serde_json::to_string(&ResourceKind::TargetPool).unwrap(),
            "\"target-pool\""
        );
    }
}
