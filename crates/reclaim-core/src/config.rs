//! Pass configuration

use crate::classifier::SamplingPolicy;
use crate::error::{ReclaimError, Result};
use std::time::Duration;

/// Firewall name fragments left behind by the provisioning pipelines:
/// GKE, Percona XtraDB / Server for MongoDB / Server / PostgreSQL operator
/// clusters, Jenkins agents and in-cluster Kubernetes load balancers.
pub const DEFAULT_FIREWALL_PATTERNS: &[&str] =
    &["gke-", "-pxc-", "-psmdb-", "-ps-", "-pg-", "-jen-", "k8s-"];

/// Everything one reconciliation pass needs besides the provider
#[derive(Debug, Clone)]
pub struct PassConfig {
    pub project: String,

    /// Substrings that make a firewall name or target tag relevant
    pub name_patterns: Vec<String>,

    /// Wall-clock budget for the whole pass
    pub deadline: Option<Duration>,

    /// Classify and report, but never call a delete
    pub dry_run: bool,

    pub sampling: SamplingPolicy,
}

impl PassConfig {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            name_patterns: DEFAULT_FIREWALL_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            deadline: None,
            dry_run: false,
            sampling: SamplingPolicy::default(),
        }
    }

    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.project.trim().is_empty() {
            return Err(ReclaimError::InvalidConfig("project is not set".to_string()));
        }
        // An empty pattern is a substring of every name
        if self.name_patterns.iter().any(|p| p.is_empty()) {
            return Err(ReclaimError::InvalidConfig(
                "firewall patterns must not be empty strings".to_string(),
            ));
        }
        Ok(())
    }
}
