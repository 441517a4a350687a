//! Pass driver

use crate::classifier::{Classification, OrphanClassifier};
use crate::config::PassConfig;
use crate::coordinator::{DeletionCoordinator, OrphanGroup};
use crate::deadline::Deadline;
use crate::error::{ReclaimError, Result};
use crate::inventory::Snapshot;
use crate::liveness::LivenessProber;
use crate::matcher::{FirewallMatcher, PatternPolicy, RelevancePolicy};
use crate::report::{PassKind, PassReport, PoolRecord};
use crate::tags::TagUsageIndex;
use reclaim_cloud::selflink::region_name;
use reclaim_cloud::{CloudError, ResourceKind, ResourceProvider};

/// Runs one full reconciliation pass over the project's network inventory
///
/// Fails only when the configuration is invalid or the initial inventory
/// cannot be listed. Everything else, including a tripped deadline, ends up
/// in the returned report.
pub async fn run_reconciliation_pass(
    provider: &dyn ResourceProvider,
    config: &PassConfig,
    deadline: &Deadline,
) -> Result<PassReport> {
    let policy = PatternPolicy::new(config.name_patterns.iter().cloned());
    run_with_policy(provider, config, &policy, deadline).await
}

/// Same as [`run_reconciliation_pass`] with a caller supplied relevance policy
pub async fn run_with_policy(
    provider: &dyn ResourceProvider,
    config: &PassConfig,
    policy: &dyn RelevancePolicy,
    deadline: &Deadline,
) -> Result<PassReport> {
    config.validate()?;
    let start = std::time::Instant::now();
    let deadline = &deadline.tightened(config.deadline);
    tracing::info!(
        "Starting reconciliation pass for {} via {}{}",
        config.project,
        provider.name(),
        if config.dry_run { " (dry run)" } else { "" }
    );

    let snapshot = Snapshot::collect(provider, &config.project).await?;
    let index = TagUsageIndex::build(snapshot.instances());

    let mut report = PassReport::new(PassKind::Network, &config.project, config.dry_run);
    report.malformed += index.malformed();

    match reconcile(provider, config, policy, deadline, &snapshot, &index, &mut report).await {
        Ok(()) => {}
        Err(ReclaimError::DeadlineExceeded) => {
            tracing::warn!("Deadline reached, no further deletions in this pass");
            report.deadline_exceeded = true;
        }
        Err(e) => return Err(e),
    }

    report.duration_ms = start.elapsed().as_millis() as u64;
    tracing::info!("Reconciliation pass finished: {}", report.summary());
    Ok(report)
}

async fn reconcile(
    provider: &dyn ResourceProvider,
    config: &PassConfig,
    policy: &dyn RelevancePolicy,
    deadline: &Deadline,
    snapshot: &Snapshot,
    index: &TagUsageIndex,
    report: &mut PassReport,
) -> Result<()> {
    let classifier = OrphanClassifier::new(
        LivenessProber::new(provider, &config.project),
        config.sampling,
    );
    let matcher = FirewallMatcher::new(policy);
    let mut coordinator =
        DeletionCoordinator::new(provider, &config.project, config.dry_run, deadline);

    for pool in snapshot.target_pools() {
        deadline.check()?;

        let region = match region_name(&pool.region) {
            Ok(region) => region,
            Err(e) => {
                let err = CloudError::malformed(ResourceKind::TargetPool, &pool.name, e);
                tracing::warn!("Skipping target pool: {}", err);
                report.malformed += 1;
                continue;
            }
        };

        let classification = match classifier.classify(pool).await {
            Ok(classification) => classification,
            Err(e) => {
                tracing::warn!("Skipping target pool: {}", e);
                report.malformed += 1;
                continue;
            }
        };

        report.pools.push(PoolRecord {
            name: pool.name.clone(),
            region: region.clone(),
            classification: classification.clone(),
        });

        match classification {
            Classification::Live => {
                tracing::debug!("Target pool {} is live", pool.name);
            }
            Classification::Indeterminate { reason } => {
                tracing::warn!(
                    "Skipping target pool {} for this pass, liveness unknown: {}",
                    pool.name,
                    reason
                );
                report.skipped_indeterminate += 1;
            }
            Classification::Orphaned { reason } => {
                tracing::debug!("Target pool {} is orphaned: {}", pool.name, reason);
                let group = OrphanGroup {
                    pool,
                    candidate_firewalls: matcher.find_candidates(&pool.name, snapshot.firewalls()),
                    region,
                };
                coordinator
                    .delete_orphan_group(&group, snapshot, index, report)
                    .await?;
            }
        }
    }

    coordinator
        .sweep_dangling(snapshot, index, policy, report)
        .await
}
