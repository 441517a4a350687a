//! reclaim core
//!
//! The orphan-resource reconciliation engine. One pass takes a fresh
//! inventory snapshot, decides which target pools are orphaned, finds the
//! firewall rules related to each of them, and deletes what is provably
//! unused in a fixed order:
//!
//! ```text
//! Snapshot ──► TagUsageIndex ─────────────────────────┐
//!    │                                                 ▼
//!    └──► OrphanClassifier ──► FirewallMatcher ──► DeletionCoordinator ──► PassReport
//!              (LivenessProber)     (RelevancePolicy)    (DeletionLedger)
//! ```
//!
//! Nothing here is persisted. The index and ledger live for one pass only,
//! so the "tag is unused" decision is always taken on fresh data.
//!
//! Two simpler sweeps share the same reporting and deadline handling:
//! aged clusters ([`clusters`]) and unattached disks ([`disks`]).

pub mod classifier;
pub mod clusters;
pub mod config;
pub mod coordinator;
pub mod deadline;
pub mod disks;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod liveness;
pub mod matcher;
pub mod pass;
pub mod report;
pub mod tags;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-exports
pub use classifier::{Classification, OrphanClassifier, OrphanReason, SamplingPolicy};
pub use clusters::{ClusterSweepConfig, run_cluster_sweep};
pub use config::{DEFAULT_FIREWALL_PATTERNS, PassConfig};
pub use coordinator::{DeletionCoordinator, OrphanGroup};
pub use deadline::{CancelHandle, Deadline};
pub use disks::run_disk_sweep;
pub use error::{ReclaimError, Result};
pub use inventory::Snapshot;
pub use ledger::DeletionLedger;
pub use liveness::{Liveness, LivenessProber};
pub use matcher::{FirewallMatcher, PatternPolicy, RelevancePolicy};
pub use pass::{run_reconciliation_pass, run_with_policy};
pub use report::{DeletionRecord, Outcome, PassKind, PassReport, PassSummary, PoolRecord};
pub use tags::TagUsageIndex;
