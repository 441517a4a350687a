use colored::Colorize;
use reclaim_config::Settings;

pub fn handle(settings: &Settings, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(settings)?);
        return Ok(());
    }

    match &settings.source {
        Some(path) => println!("設定ファイル: {}", path.display().to_string().cyan()),
        None => println!("{}", "設定ファイル: なし (デフォルト設定)".dimmed()),
    }
    println!();

    let project = settings.project.as_deref().unwrap_or("(未設定)");
    let deadline = settings
        .deadline
        .map(|d| humantime::format_duration(d).to_string())
        .unwrap_or_else(|| "なし".to_string());

    println!("  project:           {}", project.cyan());
    println!("  dry-run:           {}", settings.dry_run);
    println!("  deadline:          {}", deadline);
    println!(
        "  firewall-patterns: {}",
        settings.firewall_patterns.join(" ")
    );
    println!("  sampling:          {:?}", settings.sampling);
    println!(
        "  clusters:          max-age-hours={} label={}",
        settings.clusters.max_age_hours, settings.clusters.label
    );
    println!("  disks:             enabled={}", settings.disks.enabled);

    Ok(())
}
