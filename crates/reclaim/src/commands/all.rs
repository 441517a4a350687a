use super::{connect, print_mode, start_deadline};
use crate::output;
use colored::Colorize;
use reclaim_config::Settings;
use reclaim_core::PassReport;

/// ネットワーク → クラスタ → ディスクの順に実行
///
/// 実行時間の上限は 3 つのパス全体で共有する
pub async fn handle(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let pass_config = settings.to_pass_config()?;
    let cluster_config = settings.to_cluster_config()?;
    if !json {
        println!(
            "{}",
            format!("すべてのクリーンアップを実行中... ({})", pass_config.project).blue()
        );
        print_mode(settings);
    }

    let provider = connect().await?;
    let deadline = start_deadline(settings);
    let mut reports: Vec<PassReport> = Vec::new();

    reports.push(reclaim_core::run_reconciliation_pass(&provider, &pass_config, &deadline).await?);

    if !deadline.is_tripped() {
        reports.push(
            reclaim_core::run_cluster_sweep(&provider, &cluster_config, &deadline, chrono::Utc::now())
                .await?,
        );
    }

    if settings.disks.enabled && !deadline.is_tripped() {
        reports.push(
            reclaim_core::run_disk_sweep(
                &provider,
                &pass_config.project,
                settings.dry_run,
                &deadline,
            )
            .await?,
        );
    } else if !settings.disks.enabled {
        tracing::debug!("Disk sweep disabled in config");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    for report in &reports {
        output::print_report(report, false)?;
    }
    Ok(())
}
