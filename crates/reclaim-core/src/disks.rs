//! Unattached disk sweep

use crate::deadline::Deadline;
use crate::error::{ReclaimError, Result};
use crate::report::{Outcome, PassKind, PassReport};
use reclaim_cloud::selflink::zone_name;
use reclaim_cloud::{CloudError, DiskProvider, ResourceKind};

/// Deletes every disk that no instance uses
pub async fn run_disk_sweep(
    provider: &dyn DiskProvider,
    project: &str,
    dry_run: bool,
    deadline: &Deadline,
) -> Result<PassReport> {
    let start = std::time::Instant::now();
    let disks = provider
        .list_disks_aggregated(project)
        .await
        .map_err(ReclaimError::inventory(ResourceKind::Disk))?;
    tracing::info!("Checking {} disks in {}", disks.len(), project);

    let mut report = PassReport::new(PassKind::Disks, project, dry_run);
    for disk in disks.iter().filter(|d| !d.is_attached()) {
        if deadline.is_tripped() {
            tracing::warn!("Deadline reached, no further disk deletions");
            report.deadline_exceeded = true;
            break;
        }

        let zone = match zone_name(&disk.zone) {
            Ok(zone) => zone,
            Err(e) => {
                tracing::warn!(
                    "Skipping disk: {}",
                    CloudError::malformed(ResourceKind::Disk, &disk.name, e)
                );
                report.malformed += 1;
                continue;
            }
        };

        if dry_run {
            tracing::info!("[dry-run] Would delete disk {} in {}", disk.name, zone);
            report.record(ResourceKind::Disk, &disk.name, Some(&zone), Outcome::Planned);
            continue;
        }

        let outcome = match provider.delete_disk(project, &zone, &disk.name).await {
            Ok(status) => {
                tracing::info!("Disk {} in zone {} was deleted, status {}", disk.name, zone, status);
                Outcome::Deleted {
                    status: status.status,
                }
            }
            Err(e) if e.is_not_found() => Outcome::Absent,
            Err(e) => {
                tracing::warn!("Can't delete disk {} in {}: {}", disk.name, zone, e);
                Outcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        report.record(ResourceKind::Disk, &disk.name, Some(&zone), outcome);
    }

    report.duration_ms = start.elapsed().as_millis() as u64;
    tracing::info!("Disk sweep finished: {}", report.summary());
    Ok(report)
}
