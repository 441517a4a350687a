//! Tag usage index

use reclaim_cloud::Instance;
use std::collections::BTreeSet;

/// Every network tag carried by an instance at snapshot time
///
/// Presence proves a tag was in use when the inventory was listed. Absence
/// proves nothing about instances created afterwards, so the index is
/// rebuilt for every pass and never cached.
#[derive(Debug, Clone, Default)]
pub struct TagUsageIndex {
    tags: BTreeSet<String>,
    malformed: usize,
}

impl TagUsageIndex {
    /// Instances without a name are skipped and counted
    pub fn build(instances: &[Instance]) -> Self {
        let mut index = Self::default();
        for instance in instances {
            if instance.name.trim().is_empty() {
                tracing::warn!("Skipping instance record without a name (zone: {:?})", instance.zone);
                index.malformed += 1;
                continue;
            }
            index.tags.extend(
                instance
                    .tags()
                    .iter()
                    .filter(|t| !t.is_empty())
                    .cloned(),
            );
        }
        tracing::debug!(
            "Tag usage index: {} tags, {} malformed instances",
            index.tags.len(),
            index.malformed
        );
        index
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Tags of `target_tags` that are in use
    pub fn used<'a>(&self, target_tags: &'a [String]) -> Vec<&'a str> {
        target_tags
            .iter()
            .filter(|t| self.contains(t))
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn malformed(&self) -> usize {
        self.malformed
    }
}

impl<S: Into<String>> FromIterator<S> for TagUsageIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().map(Into::into).collect(),
            malformed: 0,
        }
    }
}
