//! reclaim cloud abstraction
//!
//! This crate holds the inventory model shared by the reconciliation engine
//! and the concrete providers, plus the provider traits the engine consumes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  reclaim CLI                     │
//! │           (reclaim run / clusters / disks)       │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                reclaim-core                      │
//! │   snapshot → classify → match → delete → report  │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                reclaim-cloud                     │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  trait ResourceProvider / ClusterProvider │   │
//! │  │        / DiskProvider                     │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │    Model     │  │  Self-links  │            │
//! │  └──────────────┘  └──────────────┘            │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼───────┐
//!           │   gcloud CLI  │
//!           │   provider    │
//!           └───────────────┘
//! ```

pub mod error;
pub mod model;
pub mod provider;
pub mod selflink;

// Re-exports
pub use error::{CloudError, Result};
pub use model::{
    Cluster, Disk, FirewallRule, Instance, OperationStatus, ResourceKind, TargetPool,
};
pub use provider::{AuthStatus, ClusterProvider, DiskProvider, ResourceProvider};
pub use selflink::{InstanceRef, ResourcePath, SelfLinkError};
