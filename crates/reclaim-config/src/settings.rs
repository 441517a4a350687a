//! 解決済みの設定値
//!
//! 優先順位: CLI フラグ > 環境変数 > 設定ファイル > デフォルト

use crate::error::{ConfigError, Result};
use reclaim_core::clusters::{DEFAULT_CREATION_LABEL, DEFAULT_MAX_AGE_HOURS};
use reclaim_core::{ClusterSweepConfig, DEFAULT_FIREWALL_PATTERNS, PassConfig, SamplingPolicy};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

pub const PROJECT_ENV: &str = "GCP_DEV_PROJECT";
pub const DRY_RUN_ENV: &str = "RECLAIM_DRY_RUN";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub project: Option<String>,
    pub dry_run: bool,

    #[serde(with = "deadline_format")]
    pub deadline: Option<Duration>,

    pub firewall_patterns: Vec<String>,
    pub sampling: SamplingPolicy,
    pub clusters: ClusterSettings,
    pub disks: DiskSettings,

    /// 読み込んだ設定ファイル (デフォルトのみの場合は None)
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterSettings {
    pub max_age_hours: u64,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiskSettings {
    pub enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project: None,
            dry_run: false,
            deadline: None,
            firewall_patterns: DEFAULT_FIREWALL_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            sampling: SamplingPolicy::default(),
            clusters: ClusterSettings::default(),
            disks: DiskSettings::default(),
            source: None,
        }
    }
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            max_age_hours: DEFAULT_MAX_AGE_HOURS,
            label: DEFAULT_CREATION_LABEL.to_string(),
        }
    }
}

impl Settings {
    /// 環境変数で上書き
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(project) = lookup(PROJECT_ENV).filter(|p| !p.trim().is_empty()) {
            self.project = Some(project);
        }
        if let Some(value) = lookup(DRY_RUN_ENV) {
            self.dry_run = parse_bool_env(&value)
                .ok_or_else(|| ConfigError::invalid(DRY_RUN_ENV, format!("not a boolean: {}", value)))?;
        }
        Ok(())
    }

    pub fn project(&self) -> Result<&str> {
        self.project
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or(ConfigError::MissingProject)
    }

    pub fn to_pass_config(&self) -> Result<PassConfig> {
        let mut config = PassConfig::new(self.project()?)
            .with_patterns(self.firewall_patterns.iter().cloned())
            .dry_run(self.dry_run);
        config.deadline = self.deadline;
        config.sampling = self.sampling;
        Ok(config)
    }

    pub fn to_cluster_config(&self) -> Result<ClusterSweepConfig> {
        let mut config = ClusterSweepConfig::new(self.project()?);
        config.label = self.clusters.label.clone();
        config.max_age_hours = self.clusters.max_age_hours;
        config.dry_run = self.dry_run;
        Ok(config)
    }
}

fn parse_bool_env(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// `deadline` を "9m" 形式で出力する
mod deadline_format {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_str(&humantime::format_duration(*d).to_string()),
            None => s.serialize_none(),
        }
    }
}
