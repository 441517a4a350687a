//! Pass reports

use crate::classifier::Classification;
use reclaim_cloud::ResourceKind;
use serde::Serialize;

/// Which pass produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    /// Target pools, forwarding rules, addresses and firewalls
    Network,
    Clusters,
    Disks,
}

impl std::fmt::Display for PassKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PassKind::Network => write!(f, "network"),
            PassKind::Clusters => write!(f, "clusters"),
            PassKind::Disks => write!(f, "disks"),
        }
    }
}

/// What happened to one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Delete accepted by the provider
    Deleted { status: String },
    /// Would have been deleted (dry run)
    Planned,
    /// Provider reported the resource as not found; normal for forwarding
    /// rules and addresses a pool never had
    Absent,
    /// Evaluated and deliberately kept
    Retained { reason: String },
    Failed { error: String },
}

/// Outcome for a single resource
#[derive(Debug, Clone, Serialize)]
pub struct DeletionRecord {
    pub kind: ResourceKind,
    pub name: String,

    /// Region or zone, for located resources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Classification of one target pool
#[derive(Debug, Clone, Serialize)]
pub struct PoolRecord {
    pub name: String,
    pub region: String,
    #[serde(flatten)]
    pub classification: Classification,
}

/// Result of one pass
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub kind: PassKind,
    pub project: String,
    pub dry_run: bool,

    pub pools: Vec<PoolRecord>,
    pub records: Vec<DeletionRecord>,

    /// Pools skipped because liveness could not be established
    pub skipped_indeterminate: usize,

    /// Listed resources that failed validation and were skipped
    pub malformed: usize,

    /// The deadline or cancel flag stopped the pass early
    pub deadline_exceeded: bool,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl PassReport {
    pub fn new(kind: PassKind, project: impl Into<String>, dry_run: bool) -> Self {
        Self {
            kind,
            project: project.into(),
            dry_run,
            pools: Vec::new(),
            records: Vec::new(),
            skipped_indeterminate: 0,
            malformed: 0,
            deadline_exceeded: false,
            duration_ms: 0,
        }
    }

    pub fn record(
        &mut self,
        kind: ResourceKind,
        name: impl Into<String>,
        location: Option<&str>,
        outcome: Outcome,
    ) {
        self.records.push(DeletionRecord {
            kind,
            name: name.into(),
            location: location.map(str::to_string),
            outcome,
        });
    }

    /// Records of one resource kind
    pub fn records_of(&self, kind: ResourceKind) -> Vec<&DeletionRecord> {
        self.records.iter().filter(|r| r.kind == kind).collect()
    }

    pub fn orphaned_pools(&self) -> usize {
        self.pools
            .iter()
            .filter(|p| matches!(p.classification, Classification::Orphaned { .. }))
            .count()
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn summary(&self) -> PassSummary {
        PassSummary {
            deleted: self.count(|o| matches!(o, Outcome::Deleted { .. } | Outcome::Planned)),
            skipped_indeterminate: self.skipped_indeterminate,
            errors: self.count(|o| matches!(o, Outcome::Failed { .. })),
            absent: self.count(|o| matches!(o, Outcome::Absent)),
            retained: self.count(|o| matches!(o, Outcome::Retained { .. })),
            malformed: self.malformed,
            deadline_exceeded: self.deadline_exceeded,
        }
    }
}

/// Counters callers alert on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    /// Deleted, or planned for deletion in a dry run
    pub deleted: usize,
    pub skipped_indeterminate: usize,
    /// Delete calls that failed
    pub errors: usize,
    pub absent: usize,
    pub retained: usize,
    pub malformed: usize,
    pub deadline_exceeded: bool,
}

impl std::fmt::Display for PassSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} deleted, {} skipped (indeterminate), {} errors, {} absent, {} retained, {} malformed",
            self.deleted,
            self.skipped_indeterminate,
            self.errors,
            self.absent,
            self.retained,
            self.malformed
        )?;
        if self.deadline_exceeded {
            write!(f, " (stopped at deadline)")?;
        }
        Ok(())
    }
}
