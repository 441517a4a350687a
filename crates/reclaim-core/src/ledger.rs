//! Pass-scoped deletion ledger

use std::collections::BTreeSet;

/// Firewalls already removed during the current pass
///
/// A fresh ledger is created for every pass; one that is found here is never
/// sent a second delete, whichever path removed it first.
#[derive(Debug, Clone, Default)]
pub struct DeletionLedger {
    deleted_firewalls: BTreeSet<String>,
}

impl DeletionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the name was already recorded
    pub fn record(&mut self, name: impl Into<String>) -> bool {
        self.deleted_firewalls.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.deleted_firewalls.contains(name)
    }

    pub fn len(&self) -> usize {
        self.deleted_firewalls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deleted_firewalls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.deleted_firewalls.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_once() {
        let mut ledger = DeletionLedger::new();
        assert!(ledger.is_empty());
        assert!(ledger.record("k8s-fw-tp-a"));
        assert!(!ledger.record("k8s-fw-tp-a"));
        assert!(ledger.contains("k8s-fw-tp-a"));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.iter().collect::<Vec<_>>(), vec!["k8s-fw-tp-a"]);
    }
}
