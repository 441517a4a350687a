pub mod all;
pub mod clusters;
pub mod config;
pub mod disks;
pub mod run;

use crate::GlobalArgs;
use anyhow::Context;
use colored::Colorize;
use reclaim_cloud::ResourceProvider;
use reclaim_cloud_gcp::GcloudProvider;
use reclaim_config::Settings;
use reclaim_core::Deadline;

/// 設定ファイル・環境変数・CLI フラグを合成
///
/// 優先順位: CLI フラグ > 環境変数 > 設定ファイル > デフォルト
pub fn resolve_settings(args: &GlobalArgs) -> anyhow::Result<Settings> {
    let mut settings =
        reclaim_config::load(args.config.as_deref()).context("設定の読み込みに失敗しました")?;

    if let Some(project) = &args.project {
        settings.project = Some(project.clone());
    }
    if args.dry_run {
        settings.dry_run = true;
    }
    if let Some(deadline) = args.deadline {
        settings.deadline = Some(deadline);
    }

    Ok(settings)
}

/// gcloud の認証状態を確認してプロバイダーを返す
pub async fn connect() -> anyhow::Result<GcloudProvider> {
    let provider = GcloudProvider::new();
    let auth = provider.check_auth().await?;
    if !auth.authenticated {
        anyhow::bail!(
            "gcloud が認証されていません: {}",
            auth.error.unwrap_or_default()
        );
    }
    tracing::debug!(
        "Authenticated as {}",
        auth.account_info.as_deref().unwrap_or("unknown")
    );
    Ok(provider)
}

/// 実行時間の上限を設定し、Ctrl-C でも中断できるようにする
pub fn start_deadline(settings: &Settings) -> Deadline {
    let deadline = Deadline::from_budget(settings.deadline);
    let cancel = deadline.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!(
                "{}",
                "中断を受け付けました。進行中の削除が終わり次第停止します...".yellow()
            );
            cancel.cancel();
        }
    });
    deadline
}

pub fn print_mode(settings: &Settings) {
    if settings.dry_run {
        println!("{}", "[dry-run] 削除は実行されません".yellow().bold());
    }
}
