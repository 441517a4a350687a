use super::{connect, print_mode, start_deadline};
use crate::output;
use colored::Colorize;
use reclaim_config::Settings;

pub async fn handle(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let config = settings.to_pass_config()?;
    if !json {
        println!(
            "{}",
            format!("孤立リソースを検索中... ({})", config.project).blue()
        );
        print_mode(settings);
    }

    let provider = connect().await?;
    let deadline = start_deadline(settings);
    let report = reclaim_core::run_reconciliation_pass(&provider, &config, &deadline).await?;

    output::print_report(&report, json)
}
