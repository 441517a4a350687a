//! Aged cluster sweep
//!
//! CI pipelines label every cluster they create with its creation time in
//! unix seconds. Clusters older than the configured age are deleted;
//! clusters without a readable label are never touched.

use crate::deadline::Deadline;
use crate::error::{ReclaimError, Result};
use crate::report::{Outcome, PassKind, PassReport};
use chrono::{DateTime, Utc};
use reclaim_cloud::{Cluster, ClusterProvider, ResourceKind};

pub const DEFAULT_CREATION_LABEL: &str = "creation-time";
pub const DEFAULT_MAX_AGE_HOURS: u64 = 6;

#[derive(Debug, Clone)]
pub struct ClusterSweepConfig {
    pub project: String,

    /// Label holding the creation time in unix seconds
    pub label: String,

    /// Clusters strictly older than this many whole hours are deleted
    pub max_age_hours: u64,

    pub dry_run: bool,
}

impl ClusterSweepConfig {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            label: DEFAULT_CREATION_LABEL.to_string(),
            max_age_hours: DEFAULT_MAX_AGE_HOURS,
            dry_run: false,
        }
    }
}

/// Age of the cluster in whole hours, if its label is readable
fn age_hours(cluster: &Cluster, label: &str, now: DateTime<Utc>) -> Option<i64> {
    let created: i64 = cluster.label(label)?.trim().parse().ok()?;
    Some((now.timestamp() - created) / 3600)
}

pub async fn run_cluster_sweep(
    provider: &dyn ClusterProvider,
    config: &ClusterSweepConfig,
    deadline: &Deadline,
    now: DateTime<Utc>,
) -> Result<PassReport> {
    let start = std::time::Instant::now();
    let clusters = provider
        .list_clusters(&config.project)
        .await
        .map_err(ReclaimError::inventory(ResourceKind::Cluster))?;
    tracing::info!("Checking {} clusters in {}", clusters.len(), config.project);

    let mut report = PassReport::new(PassKind::Clusters, &config.project, config.dry_run);
    for cluster in &clusters {
        if deadline.is_tripped() {
            tracing::warn!("Deadline reached, no further cluster deletions");
            report.deadline_exceeded = true;
            break;
        }

        let Some(age) = age_hours(cluster, &config.label, now) else {
            tracing::debug!("Cluster {} has no usable {} label", cluster.name, config.label);
            report.record(
                ResourceKind::Cluster,
                &cluster.name,
                Some(&cluster.location),
                Outcome::Retained {
                    reason: format!("no usable {} label", config.label),
                },
            );
            continue;
        };
        if age <= config.max_age_hours as i64 {
            continue;
        }

        let location = Some(cluster.location.as_str());
        if config.dry_run {
            tracing::info!(
                "[dry-run] Would delete cluster {} in {} ({}h old)",
                cluster.name,
                cluster.location,
                age
            );
            report.record(ResourceKind::Cluster, &cluster.name, location, Outcome::Planned);
            continue;
        }

        let outcome = match provider
            .delete_cluster(&config.project, &cluster.location, &cluster.name)
            .await
        {
            Ok(status) => {
                tracing::info!(
                    "Cluster {} in {} was deleted ({}h old), status {}",
                    cluster.name,
                    cluster.location,
                    age,
                    status
                );
                Outcome::Deleted {
                    status: status.status,
                }
            }
            Err(e) if e.is_not_found() => Outcome::Absent,
            Err(e) => {
                tracing::warn!("Can't delete cluster {}: {}", cluster.name, e);
                Outcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        report.record(ResourceKind::Cluster, &cluster.name, location, outcome);
    }

    report.duration_ms = start.elapsed().as_millis() as u64;
    tracing::info!("Cluster sweep finished: {}", report.summary());
    Ok(report)
}
