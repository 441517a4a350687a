//! Cooperative pass deadline
//!
//! The deadline is checked before every delete call. Once tripped no further
//! deletes are issued; calls already sent to the provider are left alone.

use crate::error::{ReclaimError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Wall-clock limit plus an external cancel flag
#[derive(Debug, Clone)]
pub struct Deadline {
    expires_at: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl Deadline {
    /// No time limit; only the cancel flag can trip it
    pub fn none() -> Self {
        Self {
            expires_at: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn after(budget: Duration) -> Self {
        Self {
            expires_at: Some(Instant::now() + budget),
            ..Self::none()
        }
    }

    pub fn from_budget(budget: Option<Duration>) -> Self {
        budget.map(Self::after).unwrap_or_else(Self::none)
    }

    /// Same cancel flag, expiring at whichever comes first: the current
    /// expiry or `budget` from now
    pub fn tightened(&self, budget: Option<Duration>) -> Self {
        let candidate = budget.map(|b| Instant::now() + b);
        let expires_at = match (self.expires_at, candidate) {
            (Some(current), Some(candidate)) => Some(current.min(candidate)),
            (current, candidate) => current.or(candidate),
        };
        Self {
            expires_at,
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Handle that trips this deadline from elsewhere (e.g. a Ctrl-C task)
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    pub fn is_tripped(&self) -> bool {
        if self.cancelled.load(Ordering::SeqCst) {
            return true;
        }
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_tripped() {
            Err(ReclaimError::DeadlineExceeded)
        } else {
            Ok(())
        }
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}

/// Trips the [`Deadline`] it was taken from
#[derive(Debug, Clone)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}
