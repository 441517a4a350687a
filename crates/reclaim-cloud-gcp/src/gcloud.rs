//! gcloud CLI wrapper
//!
//! Every call passes `--project`, `--format=json` and `--quiet`. Compute
//! deletes wait for the operation; only `container clusters delete`, which
//! can take minutes, is issued with `--async`.

use crate::error::{GcloudError, Result};
use reclaim_cloud::{Cluster, Disk, FirewallRule, Instance, OperationStatus, TargetPool};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::process::Command;

const DEFAULT_BINARY: &str = "gcloud";

/// gcloud CLI wrapper
#[derive(Debug, Clone)]
pub struct Gcloud {
    binary: String,
}

impl Default for Gcloud {
    fn default() -> Self {
        Self::new()
    }
}

impl Gcloud {
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_BINARY)
    }

    /// Uses a specific gcloud executable instead of the one on `PATH`
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Active credentialed accounts
    pub async fn check_auth(&self) -> Result<Vec<GcloudAccount>> {
        let output = self
            .run_command(&["auth", "list", "--filter=status:ACTIVE", "--format=json"])
            .await?;
        parse_list(&output)
    }

    /// Run a gcloud command and return stdout
    async fn run_command<S: AsRef<str>>(&self, args: &[S]) -> Result<String> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let mut cmd = Command::new(&self.binary);
        cmd.args(&args);
        cmd.arg("--quiet");
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: {} {} --quiet", self.binary, args.join(" "));

        let output = cmd.output().await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => GcloudError::GcloudNotFound,
            _ => GcloudError::IoError(e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GcloudError::from_stderr(&stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn list<T: DeserializeOwned>(&self, project: &str, command: &[&str]) -> Result<Vec<T>> {
        let output = self.run_command(&list_args(command, project)).await?;
        parse_list(&output)
    }

    async fn delete(
        &self,
        project: &str,
        command: &[&str],
        mode: DeleteMode,
    ) -> Result<OperationStatus> {
        let output = self
            .run_command(&delete_args(command, project, mode))
            .await?;
        Ok(parse_operation(&output, mode))
    }

    pub async fn list_firewalls(&self, project: &str) -> Result<Vec<FirewallRule>> {
        self.list(project, &["compute", "firewall-rules", "list"])
            .await
    }

    /// Lists pools in every region
    pub async fn list_target_pools(&self, project: &str) -> Result<Vec<TargetPool>> {
        self.list(project, &["compute", "target-pools", "list"]).await
    }

    /// Lists instances in every zone
    pub async fn list_instances(&self, project: &str) -> Result<Vec<Instance>> {
        self.list(project, &["compute", "instances", "list"]).await
    }

    pub async fn describe_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<Instance> {
        let project_arg = format!("--project={}", project);
        let zone_arg = format!("--zone={}", zone);
        let output = self
            .run_command(&[
                "compute",
                "instances",
                "describe",
                name,
                zone_arg.as_str(),
                project_arg.as_str(),
                "--format=json",
            ])
            .await?;
        Ok(serde_json::from_str(&output)?)
    }

    pub async fn delete_firewall(&self, project: &str, name: &str) -> Result<OperationStatus> {
        self.delete(
            project,
            &["compute", "firewall-rules", "delete", name],
            DeleteMode::Wait,
        )
        .await
    }

    /// Deletes a regional compute resource: `forwarding-rules`, `addresses`
    /// or `target-pools`
    pub async fn delete_regional(
        &self,
        collection: &str,
        project: &str,
        region: &str,
        name: &str,
    ) -> Result<OperationStatus> {
        let region_arg = format!("--region={}", region);
        self.delete(
            project,
            &["compute", collection, "delete", name, region_arg.as_str()],
            DeleteMode::Wait,
        )
        .await
    }

    pub async fn list_clusters(&self, project: &str) -> Result<Vec<Cluster>> {
        self.list(project, &["container", "clusters", "list"]).await
    }

    pub async fn delete_cluster(
        &self,
        project: &str,
        location: &str,
        name: &str,
    ) -> Result<OperationStatus> {
        let location_arg = format!("--location={}", location);
        self.delete(
            project,
            &["container", "clusters", "delete", name, location_arg.as_str()],
            DeleteMode::Async,
        )
        .await
    }

    /// Lists disks in every zone
    pub async fn list_disks(&self, project: &str) -> Result<Vec<Disk>> {
        self.list(project, &["compute", "disks", "list"]).await
    }

    pub async fn delete_disk(&self, project: &str, zone: &str, name: &str) -> Result<OperationStatus> {
        let zone_arg = format!("--zone={}", zone);
        self.delete(
            project,
            &["compute", "disks", "delete", name, zone_arg.as_str()],
            DeleteMode::Wait,
        )
        .await
    }
}

/// Credentialed account from `gcloud auth list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcloudAccount {
    pub account: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// How a delete command reports back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeleteMode {
    /// gcloud returns once the operation is done
    Wait,
    /// `--async`: gcloud returns as soon as the operation is accepted
    Async,
}

fn list_args(command: &[&str], project: &str) -> Vec<String> {
    let mut args: Vec<String> = command.iter().map(|s| s.to_string()).collect();
    args.push(format!("--project={}", project));
    args.push("--format=json".to_string());
    args
}

fn delete_args(command: &[&str], project: &str, mode: DeleteMode) -> Vec<String> {
    let mut args = list_args(command, project);
    if mode == DeleteMode::Async {
        args.push("--async".to_string());
    }
    args
}

fn parse_list<T: DeserializeOwned>(output: &str) -> Result<Vec<T>> {
    let trimmed = output.trim();
    if trimmed.is_empty() || trimmed == "[]" {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(trimmed)?)
}

/// Reads the operation gcloud printed for a delete
///
/// gcloud prints either a single operation or a list of them, and compute
/// deletes usually print nothing at all. The command succeeded either way,
/// so anything unreadable is reported as DONE for a waited delete and
/// PENDING for an `--async` one.
fn parse_operation(output: &str, mode: DeleteMode) -> OperationStatus {
    let trimmed = output.trim();
    if let Ok(ops) = serde_json::from_str::<Vec<OperationStatus>>(trimmed) {
        if let Some(op) = ops.into_iter().next() {
            return op;
        }
    }
    serde_json::from_str::<OperationStatus>(trimmed).unwrap_or_else(|_| match mode {
        DeleteMode::Wait => OperationStatus::done(),
        DeleteMode::Async => OperationStatus::new("PENDING"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_list() {
        let pools: Vec<TargetPool> = parse_list("").unwrap();
        assert!(pools.is_empty());
        let pools: Vec<TargetPool> = parse_list("[]\n").unwrap();
        assert!(pools.is_empty());
    }

    #[test]
    fn test_parse_target_pools() {
        let json = r#"[
          {
            "kind": "compute#targetPool",
            "name": "a1b2c3",
            "region": "https://www.googleapis.com/compute/v1/projects/dev/regions/us-central1",
            "instances": [
              "https://www.googleapis.com/compute/v1/projects/dev/zones/us-central1-a/instances/gke-node-1"
            ],
            "sessionAffinity": "NONE"
          },
          {
            "name": "empty-pool",
            "region": "https://www.googleapis.com/compute/v1/projects/dev/regions/europe-west1"
          }
        ]"#;
        let pools: Vec<TargetPool> = parse_list(json).unwrap();
        assert_eq!(pools.len(), 2);
        assert_eq!(pools[0].name, "a1b2c3");
        assert_eq!(pools[0].instances.len(), 1);
        assert!(pools[1].instances.is_empty());
    }

    #[test]
    fn test_parse_instances_with_tags() {
        let json = r#"[{
            "name": "gke-node-1",
            "zone": "https://www.googleapis.com/compute/v1/projects/dev/zones/us-central1-a",
            "status": "RUNNING",
            "tags": {"items": ["gke-c1-node"], "fingerprint": "abc="}
        }]"#;
        let instances: Vec<Instance> = parse_list(json).unwrap();
        assert!(instances[0].tags().contains("gke-c1-node"));
        assert_eq!(instances[0].status.as_deref(), Some("RUNNING"));
    }

    #[test]
    fn test_parse_invalid_list() {
        let result: Result<Vec<FirewallRule>> = parse_list("not json");
        assert!(matches!(result, Err(GcloudError::JsonError(_))));
    }

    #[test]
    fn test_parse_operation_list() {
        let op = parse_operation(
            r#"[{"name": "operation-123", "status": "RUNNING", "operationType": "delete"}]"#,
            DeleteMode::Async,
        );
        assert_eq!(op.status, "RUNNING");
        assert_eq!(op.name.as_deref(), Some("operation-123"));
    }

    #[test]
    fn test_parse_operation_single() {
        let op = parse_operation(
            r#"{"name": "operation-456", "status": "PENDING"}"#,
            DeleteMode::Async,
        );
        assert_eq!(op.name.as_deref(), Some("operation-456"));
    }

    #[test]
    fn test_parse_operation_unreadable() {
        assert_eq!(parse_operation("", DeleteMode::Async).status, "PENDING");
        assert_eq!(parse_operation("[]", DeleteMode::Async).status, "PENDING");
        assert_eq!(
            parse_operation("Deleting cluster c1...", DeleteMode::Async).status,
            "PENDING"
        );
        assert_eq!(parse_operation("", DeleteMode::Wait).status, "DONE");
    }

    #[test]
    fn test_list_args() {
        assert_eq!(
            list_args(&["compute", "target-pools", "list"], "dev"),
            vec!["compute", "target-pools", "list", "--project=dev", "--format=json"]
        );
    }

    #[test]
    fn test_compute_delete_args_have_no_async() {
        let args = delete_args(
            &["compute", "forwarding-rules", "delete", "tp-a", "--region=us-central1"],
            "dev",
            DeleteMode::Wait,
        );
        assert_eq!(
            args,
            vec![
                "compute",
                "forwarding-rules",
                "delete",
                "tp-a",
                "--region=us-central1",
                "--project=dev",
                "--format=json",
            ]
        );
        assert!(!args.iter().any(|a| a == "--async"));
    }

    #[test]
    fn test_cluster_delete_args_are_async() {
        let args = delete_args(
            &["container", "clusters", "delete", "c1", "--location=us-central1-a"],
            "dev",
            DeleteMode::Async,
        );
        assert_eq!(args.last().map(String::as_str), Some("--async"));
    }

    #[test]
    fn test_missing_binary() {
        let gcloud = Gcloud::with_binary("/nonexistent/bin/gcloud");
        let result = tokio_test::block_on(gcloud.list_firewalls("dev"));
        assert!(matches!(result, Err(GcloudError::GcloudNotFound)));
    }
}
