use super::{connect, print_mode, start_deadline};
use crate::output;
use colored::Colorize;
use reclaim_config::Settings;

/// 明示的に呼ばれた場合は `disks { enabled }` に関係なく実行する
pub async fn handle(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let project = settings.project()?;
    if !json {
        println!(
            "{}",
            format!("未使用のディスクを検索中... ({})", project).blue()
        );
        print_mode(settings);
    }

    let provider = connect().await?;
    let deadline = start_deadline(settings);
    let report =
        reclaim_core::run_disk_sweep(&provider, project, settings.dry_run, &deadline).await?;

    output::print_report(&report, json)
}
