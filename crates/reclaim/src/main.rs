mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reclaim")]
#[command(about = "開発用 GCP プロジェクトに取り残されたリソースを片付ける", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

/// 全サブコマンド共通のオプション
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// 対象の GCP プロジェクト
    #[arg(short, long, global = true, env = "GCP_DEV_PROJECT")]
    pub project: Option<String>,

    /// 削除せずに計画だけを表示
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// 実行時間の上限 (例: 9m, 540s)
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    pub deadline: Option<Duration>,

    /// 設定ファイルのパス (省略時は reclaim.kdl を探索)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// デバッグログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// レポートを JSON で出力
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 孤立した target pool と関連リソースを削除
    Run,
    /// 作成から一定時間が経過した GKE クラスタを削除
    Clusters,
    /// どのインスタンスにもアタッチされていないディスクを削除
    Disks,
    /// run → clusters → disks (有効時) を順に実行
    All,
    /// 解決済みの設定を表示
    Config,
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ログは stderr に出力 (stdout はレポート用)
    let default_level = if cli.global.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // Versionコマンドは設定ファイル不要
    if matches!(cli.command, Commands::Version) {
        println!("reclaim {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let settings = commands::resolve_settings(&cli.global)?;

    match cli.command {
        Commands::Run => commands::run::handle(&settings, cli.global.json).await?,
        Commands::Clusters => commands::clusters::handle(&settings, cli.global.json).await?,
        Commands::Disks => commands::disks::handle(&settings, cli.global.json).await?,
        Commands::All => commands::all::handle(&settings, cli.global.json).await?,
        Commands::Config => commands::config::handle(&settings, cli.global.json)?,
        Commands::Version => unreachable!("Version is handled before config loading"),
    }

    Ok(())
}
