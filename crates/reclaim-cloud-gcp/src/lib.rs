//! Google Cloud provider for reclaim
//!
//! Implements [`ResourceProvider`](reclaim_cloud::ResourceProvider),
//! [`ClusterProvider`](reclaim_cloud::ClusterProvider) and
//! [`DiskProvider`](reclaim_cloud::DiskProvider) by driving the `gcloud` CLI.
//!
//! # Requirements
//!
//! - `gcloud` must be installed and on `PATH`
//! - Credentials come from the gcloud configuration (`gcloud auth login` or
//!   an activated service account)
//!
//! # Example
//!
//! ```ignore
//! use reclaim_cloud::ResourceProvider;
//! use reclaim_cloud_gcp::GcloudProvider;
//!
//! let provider = GcloudProvider::new();
//!
//! let auth = provider.check_auth().await?;
//! if !auth.authenticated {
//!     panic!("Not authenticated: {:?}", auth.error);
//! }
//!
//! let pools = provider.list_target_pools_aggregated("dev-project").await?;
//! ```

pub mod error;
pub mod gcloud;
pub mod provider;

pub use error::{GcloudError, Result};
pub use gcloud::{Gcloud, GcloudAccount};
pub use provider::GcloudProvider;
