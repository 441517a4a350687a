//! Firewall relevance matching
//!
//! Firewalls are tied to target pools only by naming conventions, so the
//! match is a heuristic in two stages:
//!
//! 1. the firewall name contains the pool name, or the policy accepts it;
//! 2. the firewall has no target tags, or one of its target tags contains
//!    the pool name or is accepted by the policy.
//!
//! The second stage keeps unrelated rules that merely share a substring with
//! the pool name out of the candidate set.

use reclaim_cloud::FirewallRule;
use std::collections::BTreeSet;

/// Decides whether a firewall name or target tag follows a naming
/// convention of infrastructure that reclaim is allowed to clean up
pub trait RelevancePolicy: Send + Sync {
    fn is_relevant(&self, name: &str) -> bool;
}

/// Substring match against a configurable pattern list
#[derive(Debug, Clone, Default)]
pub struct PatternPolicy {
    patterns: Vec<String>,
}

impl PatternPolicy {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl RelevancePolicy for PatternPolicy {
    fn is_relevant(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| name.contains(p.as_str()))
    }
}

impl<F> RelevancePolicy for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_relevant(&self, name: &str) -> bool {
        self(name)
    }
}

pub struct FirewallMatcher<'a> {
    policy: &'a dyn RelevancePolicy,
}

impl<'a> FirewallMatcher<'a> {
    pub fn new(policy: &'a dyn RelevancePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &dyn RelevancePolicy {
        self.policy
    }

    /// Names of the firewalls plausibly created for `pool_name`
    pub fn find_candidates<'f>(
        &self,
        pool_name: &str,
        firewalls: impl IntoIterator<Item = &'f FirewallRule>,
    ) -> BTreeSet<String> {
        firewalls
            .into_iter()
            .filter(|fw| self.name_matches(pool_name, fw) && self.tags_match(pool_name, fw))
            .map(|fw| fw.name.clone())
            .collect()
    }

    fn name_matches(&self, pool_name: &str, fw: &FirewallRule) -> bool {
        fw.name.contains(pool_name) || self.policy.is_relevant(&fw.name)
    }

    fn tags_match(&self, pool_name: &str, fw: &FirewallRule) -> bool {
        fw.target_tags.is_empty()
            || fw
                .target_tags
                .iter()
                .any(|tag| tag.contains(pool_name) || self.policy.is_relevant(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_FIREWALL_PATTERNS;

    fn default_policy() -> PatternPolicy {
        PatternPolicy::new(DEFAULT_FIREWALL_PATTERNS.iter().copied())
    }

    #[test]
    fn test_pattern_policy() {
        let policy = default_policy();
        assert!(policy.is_relevant("gke-cluster-1-abcd-all"));
        assert!(policy.is_relevant("k8s-fw-a1b2c3"));
        assert!(policy.is_relevant("ci-jen-agent-7"));
        assert!(!policy.is_relevant("default-allow-ssh"));
    }

    #[test]
    fn test_empty_patterns_are_dropped() {
        let policy = PatternPolicy::new(["", "gke-"]);
        assert_eq!(policy.patterns(), &["gke-".to_string()]);
        assert!(!policy.is_relevant("anything"));
    }

    #[test]
    fn test_pattern_name_and_pool_tag() {
        let policy = default_policy();
        let matcher = FirewallMatcher::new(&policy);
        let firewalls = [
            FirewallRule::new("k8s-fw-tp-a", ["tp-a-node"]),
            FirewallRule::new("unrelated", ["tp-a-node"]),
        ];

        let candidates = matcher.find_candidates("tp-a", &firewalls);
        assert_eq!(candidates.into_iter().collect::<Vec<_>>(), vec!["k8s-fw-tp-a"]);
    }

    #[test]
    fn test_pool_name_in_firewall_name() {
        let policy = default_policy();
        let matcher = FirewallMatcher::new(&policy);
        let firewalls = [FirewallRule::new("allow-tp-a-health", ["tp-a-node"])];

        assert!(matcher.find_candidates("tp-a", &firewalls).contains("allow-tp-a-health"));
    }

    #[test]
    fn test_untagged_firewall_is_candidate() {
        let policy = default_policy();
        let matcher = FirewallMatcher::new(&policy);
        let firewalls = [FirewallRule::new("k8s-fw-tp-a", Vec::<String>::new())];

        assert!(matcher.find_candidates("tp-a", &firewalls).contains("k8s-fw-tp-a"));
    }

    #[test]
    fn test_unrelated_tags_exclude_matching_name() {
        let policy = default_policy();
        let matcher = FirewallMatcher::new(&policy);
        // Name matches a pattern but the rule protects something else
        let firewalls = [FirewallRule::new("k8s-fw-tp-a", ["web-frontend"])];

        assert!(matcher.find_candidates("tp-a", &firewalls).is_empty());
    }

    #[test]
    fn test_tag_matching_pattern_only() {
        let policy = default_policy();
        let matcher = FirewallMatcher::new(&policy);
        let firewalls = [FirewallRule::new("gke-c1-all", ["gke-c1-node"])];

        assert!(matcher.find_candidates("tp-b", &firewalls).contains("gke-c1-all"));
    }

    #[test]
    fn test_closure_policy() {
        let policy = |name: &str| name.starts_with("ci-");
        let matcher = FirewallMatcher::new(&policy);
        let firewalls = [
            FirewallRule::new("ci-123", ["ci-123-node"]),
            FirewallRule::new("gke-c1-all", ["gke-c1-node"]),
        ];

        let candidates = matcher.find_candidates("tp-z", &firewalls);
        assert_eq!(candidates.len(), 1);
        assert!(candidates.contains("ci-123"));
        assert!(matcher.policy().is_relevant("ci-9"));
    }
}
