use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("KDL parse error: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("Invalid value for '{node}': {reason}")]
    InvalidValue { node: String, reason: String },

    #[error("Unknown config node: {0}")]
    UnknownNode(String),

    #[error(
        "No project configured. Pass --project, set GCP_DEV_PROJECT, \
        or add a `project` node to reclaim.kdl"
    )]
    MissingProject,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(node: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            node: node.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
