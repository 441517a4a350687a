//! reclaim.kdl のパース

use crate::error::{ConfigError, Result};
use crate::settings::Settings;
use kdl::{KdlDocument, KdlNode, KdlValue};
use reclaim_core::SamplingPolicy;
use std::time::Duration;

/// KDL文字列を設定としてパース
///
/// ```kdl
/// project "dev-project"
/// dry-run #true
/// deadline "9m"
/// firewall-patterns "gke-" "k8s-"
/// sampling "all-instances"
/// clusters {
///     max-age-hours 6
///     label "creation-time"
/// }
/// disks {
///     enabled #false
/// }
/// ```
pub fn parse_settings(content: &str) -> Result<Settings> {
    let doc: KdlDocument = content.parse()?;
    let mut settings = Settings::default();

    for node in doc.nodes() {
        let name = node.name().value();
        match name {
            "project" => settings.project = Some(string_arg(node)?.to_string()),
            "dry-run" => settings.dry_run = bool_arg(node)?,
            "deadline" => settings.deadline = Some(parse_deadline(node)?),
            "firewall-patterns" => settings.firewall_patterns = parse_patterns(node)?,
            "sampling" => settings.sampling = parse_sampling(node)?,
            "clusters" => {
                for child in children(node) {
                    match child.name().value() {
                        "max-age-hours" => {
                            settings.clusters.max_age_hours = u64::try_from(integer_arg(child)?)
                                .map_err(|_| {
                                    ConfigError::invalid("max-age-hours", "must not be negative")
                                })?;
                        }
                        "label" => settings.clusters.label = string_arg(child)?.to_string(),
                        other => return Err(ConfigError::UnknownNode(format!("clusters.{}", other))),
                    }
                }
            }
            "disks" => {
                for child in children(node) {
                    match child.name().value() {
                        "enabled" => settings.disks.enabled = bool_arg(child)?,
                        other => return Err(ConfigError::UnknownNode(format!("disks.{}", other))),
                    }
                }
            }
            other => return Err(ConfigError::UnknownNode(other.to_string())),
        }
    }

    Ok(settings)
}

fn children(node: &KdlNode) -> &[KdlNode] {
    node.children().map(|doc| doc.nodes()).unwrap_or_default()
}

fn first_value<'n>(node: &'n KdlNode) -> Result<&'n KdlValue> {
    node.entries()
        .first()
        .map(|e| e.value())
        .ok_or_else(|| ConfigError::invalid(node.name().value(), "missing value"))
}

fn string_arg(node: &KdlNode) -> Result<&str> {
    first_value(node)?
        .as_string()
        .ok_or_else(|| ConfigError::invalid(node.name().value(), "expected a string"))
}

fn bool_arg(node: &KdlNode) -> Result<bool> {
    first_value(node)?
        .as_bool()
        .ok_or_else(|| ConfigError::invalid(node.name().value(), "expected #true or #false"))
}

fn integer_arg(node: &KdlNode) -> Result<i128> {
    first_value(node)?
        .as_integer()
        .ok_or_else(|| ConfigError::invalid(node.name().value(), "expected an integer"))
}

/// "9m" のような文字列、または秒数の整数
fn parse_deadline(node: &KdlNode) -> Result<Duration> {
    let value = first_value(node)?;
    let deadline = if let Some(text) = value.as_string() {
        humantime::parse_duration(text)
            .map_err(|e| ConfigError::invalid("deadline", e.to_string()))?
    } else if let Some(secs) = value.as_integer() {
        let secs = u64::try_from(secs)
            .map_err(|_| ConfigError::invalid("deadline", "must not be negative"))?;
        Duration::from_secs(secs)
    } else {
        return Err(ConfigError::invalid(
            "deadline",
            "expected a duration string or seconds",
        ));
    };

    if deadline.is_zero() {
        return Err(ConfigError::invalid("deadline", "must be greater than zero"));
    }
    Ok(deadline)
}

fn parse_patterns(node: &KdlNode) -> Result<Vec<String>> {
    let mut patterns = Vec::new();
    for entry in node.entries() {
        let pattern = entry
            .value()
            .as_string()
            .ok_or_else(|| ConfigError::invalid("firewall-patterns", "expected strings"))?;
        // 空文字列はすべての名前にマッチしてしまう
        if pattern.is_empty() {
            return Err(ConfigError::invalid(
                "firewall-patterns",
                "patterns must not be empty",
            ));
        }
        patterns.push(pattern.to_string());
    }

    if patterns.is_empty() {
        return Err(ConfigError::invalid(
            "firewall-patterns",
            "at least one pattern is required",
        ));
    }
    Ok(patterns)
}

fn parse_sampling(node: &KdlNode) -> Result<SamplingPolicy> {
    match string_arg(node)? {
        "first-instance" => Ok(SamplingPolicy::FirstInstance),
        "all-instances" => Ok(SamplingPolicy::AllInstances),
        other => Err(ConfigError::invalid(
            "sampling",
            format!("expected \"first-instance\" or \"all-instances\", got \"{}\"", other),
        )),
    }
}
