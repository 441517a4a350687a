//! Self-link parsing
//!
//! Compute resources reference each other through self-links such as
//! `https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-a/instances/vm-1`.
//! Everything from the `projects` segment onwards is read as
//! `collection/value` pairs, so a link that is truncated or shaped
//! differently fails with a [`SelfLinkError`] instead of yielding a
//! neighbouring segment.

use thiserror::Error;

/// Why a self-link could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelfLinkError {
    #[error("empty self-link")]
    Empty,

    #[error("path has no 'projects' segment")]
    MissingProject,

    #[error("path has an unpaired segment '{0}'")]
    Unpaired(String),

    #[error("path has no '{0}' segment")]
    MissingCollection(String),

    #[error("empty value for '{0}'")]
    EmptyValue(String),
}

/// A parsed resource path: `projects/{p}/{collection}/{value}/...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    pairs: Vec<(String, String)>,
}

impl ResourcePath {
    pub fn parse(link: &str) -> Result<Self, SelfLinkError> {
        let link = link.trim();
        if link.is_empty() {
            return Err(SelfLinkError::Empty);
        }

        // Drop scheme and host
        let path = match link.split_once("://") {
            Some((_, rest)) => rest.split_once('/').map(|(_, p)| p).unwrap_or(""),
            None => link,
        };

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let start = segments
            .iter()
            .position(|s| *s == "projects")
            .ok_or(SelfLinkError::MissingProject)?;
        let rest = &segments[start..];

        if rest.len() % 2 != 0 {
            let last = rest.last().copied().unwrap_or_default();
            return Err(SelfLinkError::Unpaired(last.to_string()));
        }

        let mut pairs = Vec::with_capacity(rest.len() / 2);
        for pair in rest.chunks(2) {
            let (key, value) = (pair[0], pair[1]);
            if value.is_empty() {
                return Err(SelfLinkError::EmptyValue(key.to_string()));
            }
            pairs.push((key.to_string(), value.to_string()));
        }

        Ok(Self { pairs })
    }

    /// Value following `collection`, if present
    pub fn get(&self, collection: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == collection)
            .map(|(_, v)| v.as_str())
    }

    pub fn require(&self, collection: &str) -> Result<&str, SelfLinkError> {
        self.get(collection)
            .ok_or_else(|| SelfLinkError::MissingCollection(collection.to_string()))
    }

    pub fn project(&self) -> Option<&str> {
        self.get("projects")
    }
}

/// Region name from a region self-link, or from a bare region name
pub fn region_name(link: &str) -> Result<String, SelfLinkError> {
    collection_value(link, "regions")
}

/// Zone name from a zone self-link, or from a bare zone name
pub fn zone_name(link: &str) -> Result<String, SelfLinkError> {
    collection_value(link, "zones")
}

fn collection_value(link: &str, collection: &str) -> Result<String, SelfLinkError> {
    let link = link.trim();
    if link.is_empty() {
        return Err(SelfLinkError::Empty);
    }
    if !link.contains('/') {
        return Ok(link.to_string());
    }
    let path = ResourcePath::parse(link)?;
    Ok(path.require(collection)?.to_string())
}

/// Reference to an instance bound to a target pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRef {
    pub zone: String,
    pub name: String,
}

impl InstanceRef {
    pub fn parse(link: &str) -> Result<Self, SelfLinkError> {
        let path = ResourcePath::parse(link)?;
        Ok(Self {
            zone: path.require("zones")?.to_string(),
            name: path.require("instances")?.to_string(),
        })
    }
}

impl std::fmt::Display for InstanceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.zone, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.googleapis.com/compute/v1";

    #[test]
    fn test_region_from_full_link() {
        let link = format!("{BASE}/projects/dev-project/regions/us-central1");
        assert_eq!(region_name(&link).unwrap(), "us-central1");
    }

    #[test]
    fn test_region_from_bare_name() {
        assert_eq!(region_name("europe-west1").unwrap(), "europe-west1");
    }

    #[test]
    fn test_region_link_too_short() {
        let link = format!("{BASE}/projects/dev-project");
        assert_eq!(
            region_name(&link),
            Err(SelfLinkError::MissingCollection("regions".into()))
        );
    }

    #[test]
    fn test_unpaired_segment() {
        let link = format!("{BASE}/projects/dev-project/regions");
        assert_eq!(
            region_name(&link),
            Err(SelfLinkError::Unpaired("regions".into()))
        );
    }

    #[test]
    fn test_missing_project() {
        assert_eq!(
            ResourcePath::parse("https://example.com/zones/a/instances/b"),
            Err(SelfLinkError::MissingProject)
        );
    }

    #[test]
    fn test_empty_link() {
        assert_eq!(region_name("  "), Err(SelfLinkError::Empty));
        assert_eq!(InstanceRef::parse(""), Err(SelfLinkError::Empty));
    }

    #[test]
    fn test_empty_value_from_double_slash() {
        assert_eq!(
            ResourcePath::parse("projects/p/zones//instances/vm"),
            Err(SelfLinkError::EmptyValue("zones".into()))
        );
        assert_eq!(
            ResourcePath::parse("projects/p/zones/"),
            Err(SelfLinkError::Unpaired("zones".into()))
        );
    }

    #[test]
    fn test_instance_ref() {
        let link = format!("{BASE}/projects/dev-project/zones/us-central1-a/instances/vm-1");
        let r = InstanceRef::parse(&link).unwrap();
        assert_eq!(r.zone, "us-central1-a");
        assert_eq!(r.name, "vm-1");
        assert_eq!(r.to_string(), "us-central1-a/vm-1");
    }

    #[test]
    fn test_instance_ref_without_zone() {
        let link = format!("{BASE}/projects/dev-project/instances/vm-1");
        assert_eq!(
            InstanceRef::parse(&link),
            Err(SelfLinkError::MissingCollection("zones".into()))
        );
    }

    #[test]
    fn test_relative_path() {
        let path = ResourcePath::parse("projects/p/zones/z/instances/n").unwrap();
        assert_eq!(path.project(), Some("p"));
        assert_eq!(path.get("zones"), Some("z"));
        assert_eq!(path.get("regions"), None);
    }
}
