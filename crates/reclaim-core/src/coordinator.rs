//! Deletion coordinator
//!
//! Order for an orphaned pool: candidate firewalls first, then the pool's
//! forwarding rule, its reserved address, and the pool itself. Firewalls are
//! judged against the tag usage index rather than the pool, because a rule
//! can protect more than one pool's instances.

use crate::deadline::Deadline;
use crate::error::Result;
use crate::inventory::Snapshot;
use crate::ledger::DeletionLedger;
use crate::matcher::RelevancePolicy;
use crate::report::{Outcome, PassReport};
use crate::tags::TagUsageIndex;
use reclaim_cloud::{CloudError, FirewallRule, OperationStatus, ResourceKind, ResourceProvider, TargetPool};
use std::collections::BTreeSet;

/// An orphaned pool and the firewalls matched to it
#[derive(Debug, Clone)]
pub struct OrphanGroup<'p> {
    pub pool: &'p TargetPool,
    pub region: String,
    pub candidate_firewalls: BTreeSet<String>,
}

/// Regional resources named after their target pool
#[derive(Debug, Clone, Copy)]
enum Regional {
    ForwardingRule,
    Address,
    TargetPool,
}

impl Regional {
    fn kind(self) -> ResourceKind {
        match self {
            Regional::ForwardingRule => ResourceKind::ForwardingRule,
            Regional::Address => ResourceKind::Address,
            Regional::TargetPool => ResourceKind::TargetPool,
        }
    }
}

/// Issues deletes for one pass
///
/// Every resource is handled on its own: a failure is recorded and the next
/// resource is attempted. Only a tripped [`Deadline`] stops the coordinator,
/// surfacing as [`ReclaimError::DeadlineExceeded`](crate::ReclaimError).
pub struct DeletionCoordinator<'a> {
    provider: &'a dyn ResourceProvider,
    project: &'a str,
    dry_run: bool,
    deadline: &'a Deadline,
    ledger: DeletionLedger,
    // Firewalls already decided on this pass, whatever the decision was
    evaluated: BTreeSet<String>,
}

impl<'a> DeletionCoordinator<'a> {
    pub fn new(
        provider: &'a dyn ResourceProvider,
        project: &'a str,
        dry_run: bool,
        deadline: &'a Deadline,
    ) -> Self {
        Self {
            provider,
            project,
            dry_run,
            deadline,
            ledger: DeletionLedger::new(),
            evaluated: BTreeSet::new(),
        }
    }

    pub fn ledger(&self) -> &DeletionLedger {
        &self.ledger
    }

    pub async fn delete_orphan_group(
        &mut self,
        group: &OrphanGroup<'_>,
        snapshot: &Snapshot,
        index: &TagUsageIndex,
        report: &mut PassReport,
    ) -> Result<()> {
        tracing::info!(
            "Target pool {} ({}) is orphaned, {} candidate firewalls",
            group.pool.name,
            group.region,
            group.candidate_firewalls.len()
        );

        for name in &group.candidate_firewalls {
            if let Some(rule) = snapshot.firewall(name) {
                self.evaluate_firewall(rule, index, report).await?;
            }
        }

        for regional in [Regional::ForwardingRule, Regional::Address, Regional::TargetPool] {
            self.delete_regional(regional, &group.region, &group.pool.name, report)
                .await?;
        }

        Ok(())
    }

    /// Deletes relevant firewalls whose target tags are empty or all unused,
    /// whether or not a pool was matched to them. Catches rules whose pool
    /// was removed by an earlier pass.
    pub async fn sweep_dangling(
        &mut self,
        snapshot: &Snapshot,
        index: &TagUsageIndex,
        policy: &dyn RelevancePolicy,
        report: &mut PassReport,
    ) -> Result<()> {
        for rule in snapshot.firewalls() {
            if self.ledger.contains(&rule.name) || !policy.is_relevant(&rule.name) {
                continue;
            }
            self.evaluate_firewall(rule, index, report).await?;
        }
        Ok(())
    }

    async fn evaluate_firewall(
        &mut self,
        rule: &FirewallRule,
        index: &TagUsageIndex,
        report: &mut PassReport,
    ) -> Result<()> {
        if self.ledger.contains(&rule.name) {
            tracing::debug!("Firewall {} already deleted in this pass", rule.name);
            return Ok(());
        }
        if !self.evaluated.insert(rule.name.clone()) {
            return Ok(());
        }

        let used = index.used(&rule.target_tags);
        if !used.is_empty() {
            tracing::info!(
                "Skipping firewall {}: target tags are in use ({})",
                rule.name,
                used.join(", ")
            );
            report.record(
                ResourceKind::Firewall,
                &rule.name,
                None,
                Outcome::Retained {
                    reason: format!("target tags in use: {}", used.join(", ")),
                },
            );
            return Ok(());
        }

        self.deadline.check()?;

        if self.dry_run {
            tracing::info!("[dry-run] Would delete firewall {}", rule.name);
            self.ledger.record(&rule.name);
            report.record(ResourceKind::Firewall, &rule.name, None, Outcome::Planned);
            return Ok(());
        }

        let result = self.provider.delete_firewall(self.project, &rule.name).await;
        let outcome = self.outcome(ResourceKind::Firewall, &rule.name, None, result);
        if matches!(outcome, Outcome::Deleted { .. } | Outcome::Absent) {
            self.ledger.record(&rule.name);
        }
        report.record(ResourceKind::Firewall, &rule.name, None, outcome);
        Ok(())
    }

    async fn delete_regional(
        &mut self,
        regional: Regional,
        region: &str,
        name: &str,
        report: &mut PassReport,
    ) -> Result<()> {
        let kind = regional.kind();
        self.deadline.check()?;

        if self.dry_run {
            tracing::info!("[dry-run] Would delete {} {} in {}", kind, name, region);
            report.record(kind, name, Some(region), Outcome::Planned);
            return Ok(());
        }

        let result = match regional {
            Regional::ForwardingRule => {
                self.provider
                    .delete_forwarding_rule(self.project, region, name)
                    .await
            }
            Regional::Address => self.provider.delete_address(self.project, region, name).await,
            Regional::TargetPool => {
                self.provider
                    .delete_target_pool(self.project, region, name)
                    .await
            }
        };
        let outcome = self.outcome(kind, name, Some(region), result);
        report.record(kind, name, Some(region), outcome);
        Ok(())
    }

    fn outcome(
        &self,
        kind: ResourceKind,
        name: &str,
        location: Option<&str>,
        result: std::result::Result<OperationStatus, CloudError>,
    ) -> Outcome {
        let at = location.map(|l| format!(" in {}", l)).unwrap_or_default();
        match result {
            Ok(status) => {
                tracing::info!("{} {}{} deleted, status {}", kind, name, at, status);
                Outcome::Deleted {
                    status: status.status,
                }
            }
            Err(e) if e.is_not_found() => {
                tracing::info!("{} {}{} does not exist", kind, name, at);
                Outcome::Absent
            }
            Err(e) => {
                tracing::warn!("Can't delete {} {}{}: {}", kind, name, at, e);
                Outcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::PatternPolicy;
    use crate::report::PassKind;
    use crate::testing::{FakeProvider, region_link};

    fn pool() -> TargetPool {
        TargetPool::new("tp-a", region_link("us-central1"), Vec::<String>::new())
    }

    fn group<'p>(pool: &'p TargetPool, candidates: &[&str]) -> OrphanGroup<'p> {
        OrphanGroup {
            pool,
            region: "us-central1".to_string(),
            candidate_firewalls: candidates.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_orphan_group_order() {
        let provider = FakeProvider::new()
            .with_firewall(FirewallRule::new("k8s-fw-tp-a", ["tp-a-node"]))
            .with_forwarding_rule("us-central1", "tp-a")
            .with_address("us-central1", "tp-a");
        let snapshot = provider.snapshot();
        let deadline = Deadline::none();
        let mut coordinator = DeletionCoordinator::new(&provider, "p", false, &deadline);
        let mut report = PassReport::new(PassKind::Network, "p", false);
        let pool = pool();

        coordinator
            .delete_orphan_group(
                &group(&pool, &["k8s-fw-tp-a"]),
                &snapshot,
                &TagUsageIndex::default(),
                &mut report,
            )
            .await
            .unwrap();

        assert_eq!(
            provider.delete_calls(),
            vec![
                "firewall k8s-fw-tp-a",
                "forwarding-rule us-central1/tp-a",
                "address us-central1/tp-a",
                "target-pool us-central1/tp-a",
            ]
        );
        assert!(coordinator.ledger().contains("k8s-fw-tp-a"));
        assert_eq!(report.summary().deleted, 3);
        // Target pool was never registered with the fake, so it reads as gone
        assert_eq!(report.summary().absent, 1);
    }

    #[tokio::test]
    async fn test_missing_forwarding_rule_is_not_an_error() {
        let provider = FakeProvider::new().with_target_pool(pool());
        let snapshot = provider.snapshot();
        let deadline = Deadline::none();
        let mut coordinator = DeletionCoordinator::new(&provider, "p", false, &deadline);
        let mut report = PassReport::new(PassKind::Network, "p", false);
        let pool = pool();

        coordinator
            .delete_orphan_group(&group(&pool, &[]), &snapshot, &TagUsageIndex::default(), &mut report)
            .await
            .unwrap();

        let summary = report.summary();
        assert_eq!(summary.absent, 2);
        assert_eq!(summary.errors, 0);
        assert_eq!(summary.deleted, 1);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_block_others() {
        let provider = FakeProvider::new()
            .with_firewall(FirewallRule::new("k8s-fw-1", Vec::<String>::new()))
            .with_firewall(FirewallRule::new("k8s-fw-2", Vec::<String>::new()))
            .with_forwarding_rule("us-central1", "tp-a")
            .with_target_pool(pool())
            .fail_delete(ResourceKind::Firewall, "k8s-fw-1")
            .fail_delete(ResourceKind::ForwardingRule, "tp-a");
        let snapshot = provider.snapshot();
        let deadline = Deadline::none();
        let mut coordinator = DeletionCoordinator::new(&provider, "p", false, &deadline);
        let mut report = PassReport::new(PassKind::Network, "p", false);
        let pool = pool();

        coordinator
            .delete_orphan_group(
                &group(&pool, &["k8s-fw-1", "k8s-fw-2"]),
                &snapshot,
                &TagUsageIndex::default(),
                &mut report,
            )
            .await
            .unwrap();

        assert_eq!(provider.deleted(ResourceKind::Firewall), vec!["k8s-fw-2"]);
        assert_eq!(provider.deleted(ResourceKind::TargetPool), vec!["tp-a"]);
        assert!(!coordinator.ledger().contains("k8s-fw-1"));
        assert_eq!(report.summary().errors, 2);
    }

    #[tokio::test]
    async fn test_sweep_skips_ledgered_and_evaluated() {
        let provider = FakeProvider::new()
            .with_firewall(FirewallRule::new("k8s-fw-tp-a", ["tp-a-node"]))
            .with_firewall(FirewallRule::new("gke-old-all", ["gke-old-node"]))
            .with_firewall(FirewallRule::new("gke-live-all", ["gke-live-node"]))
            .with_firewall(FirewallRule::new("default-allow-ssh", Vec::<String>::new()));
        let snapshot = provider.snapshot();
        let index: TagUsageIndex = ["gke-live-node"].into_iter().collect();
        let policy = PatternPolicy::new(["gke-", "k8s-"]);
        let deadline = Deadline::none();
        let mut coordinator = DeletionCoordinator::new(&provider, "p", false, &deadline);
        let mut report = PassReport::new(PassKind::Network, "p", false);
        let pool = pool();

        coordinator
            .delete_orphan_group(&group(&pool, &["k8s-fw-tp-a"]), &snapshot, &index, &mut report)
            .await
            .unwrap();
        coordinator
            .sweep_dangling(&snapshot, &index, &policy, &mut report)
            .await
            .unwrap();

        assert_eq!(
            provider.deleted(ResourceKind::Firewall),
            vec!["k8s-fw-tp-a", "gke-old-all"]
        );
        assert_eq!(report.records_of(ResourceKind::Firewall).len(), 3);
    }

    #[tokio::test]
    async fn test_dry_run_never_deletes() {
        let provider = FakeProvider::new()
            .with_firewall(FirewallRule::new("k8s-fw-tp-a", Vec::<String>::new()))
            .with_target_pool(pool());
        let snapshot = provider.snapshot();
        let deadline = Deadline::none();
        let mut coordinator = DeletionCoordinator::new(&provider, "p", true, &deadline);
        let mut report = PassReport::new(PassKind::Network, "p", true);
        let pool = pool();

        coordinator
            .delete_orphan_group(
                &group(&pool, &["k8s-fw-tp-a"]),
                &snapshot,
                &TagUsageIndex::default(),
                &mut report,
            )
            .await
            .unwrap();

        assert!(provider.delete_calls().is_empty());
        assert_eq!(report.summary().deleted, 4);
        assert!(coordinator.ledger().contains("k8s-fw-tp-a"));
    }

    #[tokio::test]
    async fn test_tripped_deadline_stops_before_delete() {
        let provider = FakeProvider::new().with_target_pool(pool());
        let snapshot = provider.snapshot();
        let deadline = Deadline::none();
        deadline.cancel_handle().cancel();
        let mut coordinator = DeletionCoordinator::new(&provider, "p", false, &deadline);
        let mut report = PassReport::new(PassKind::Network, "p", false);
        let pool = pool();

        let result = coordinator
            .delete_orphan_group(&group(&pool, &[]), &snapshot, &TagUsageIndex::default(), &mut report)
            .await;

        assert!(matches!(result, Err(crate::ReclaimError::DeadlineExceeded)));
        assert!(provider.delete_calls().is_empty());
    }
}
