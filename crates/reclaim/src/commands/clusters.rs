use super::{connect, print_mode, start_deadline};
use crate::output;
use colored::Colorize;
use reclaim_config::Settings;

pub async fn handle(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let config = settings.to_cluster_config()?;
    if !json {
        println!(
            "{}",
            format!(
                "{} 時間を超えたクラスタを検索中... ({})",
                config.max_age_hours, config.project
            )
            .blue()
        );
        print_mode(settings);
    }

    let provider = connect().await?;
    let deadline = start_deadline(settings);
    let report =
        reclaim_core::run_cluster_sweep(&provider, &config, &deadline, chrono::Utc::now()).await?;

    output::print_report(&report, json)
}
