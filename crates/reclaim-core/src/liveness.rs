//! Instance liveness probe

use reclaim_cloud::ResourceProvider;
use serde::Serialize;

/// Result of asking the provider whether an instance exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Liveness {
    Present,
    /// The provider answered "not found"
    Absent,
    /// Any other failure. Never to be read as `Absent`.
    Unknown { error: String },
}

/// Probes instance existence through `get_instance`
pub struct LivenessProber<'a> {
    provider: &'a dyn ResourceProvider,
    project: &'a str,
}

impl<'a> LivenessProber<'a> {
    pub fn new(provider: &'a dyn ResourceProvider, project: &'a str) -> Self {
        Self { provider, project }
    }

    pub async fn probe(&self, zone: &str, name: &str) -> Liveness {
        match self.provider.get_instance(self.project, zone, name).await {
            Ok(_) => Liveness::Present,
            Err(e) if e.is_not_found() => {
                tracing::debug!("Instance {}/{} not found", zone, name);
                Liveness::Absent
            }
            Err(e) => {
                tracing::warn!("Could not check instance {}/{}: {}", zone, name, e);
                Liveness::Unknown {
                    error: e.to_string(),
                }
            }
        }
    }
}
