//! パスレポートの表示

use colored::Colorize;
use reclaim_core::{Classification, DeletionRecord, Outcome, PassReport};

pub fn print_report(report: &PassReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!();
    println!(
        "{}",
        format!("■ {} ({})", report.kind, report.project)
            .yellow()
            .bold()
    );

    for pool in &report.pools {
        let verdict = match &pool.classification {
            Classification::Orphaned { reason } => format!("孤立 ({})", reason).red(),
            Classification::Live => "使用中".green(),
            Classification::Indeterminate { reason } => format!("不明 ({})", reason).yellow(),
        };
        println!("  target-pool {} [{}]: {}", pool.name, pool.region, verdict);
    }

    if !report.records.is_empty() {
        println!();
    }
    for record in &report.records {
        println!("{}", format_record(record));
    }

    let summary = report.summary();
    println!();
    let line = format!("結果: {} ({} ms)", summary, report.duration_ms);
    if summary.errors > 0 || summary.deadline_exceeded {
        println!("{}", line.yellow().bold());
    } else {
        println!("{}", line.green().bold());
    }

    Ok(())
}

fn format_record(record: &DeletionRecord) -> String {
    let target = match &record.location {
        Some(location) => format!("{} {} ({})", record.kind, record.name, location),
        None => format!("{} {}", record.kind, record.name),
    };
    match &record.outcome {
        Outcome::Deleted { status } => format!("  ✓ {} を削除 [{}]", target, status),
        Outcome::Planned => format!("  ✓ {} を削除予定", target).dimmed().to_string(),
        Outcome::Absent => format!("  ℹ {} は存在しません", target),
        Outcome::Retained { reason } => format!("  ℹ {} を保持: {}", target, reason),
        Outcome::Failed { error } => format!("  ⚠ {} の削除に失敗: {}", target, error)
            .red()
            .to_string(),
    }
}
