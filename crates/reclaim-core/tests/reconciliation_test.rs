//! End-to-end reconciliation scenarios against the in-memory provider

use reclaim_cloud::{FirewallRule, Instance, ResourceKind, TargetPool};
use reclaim_core::testing::{FakeProvider, instance_link, region_link};
use reclaim_core::{
    Classification, Deadline, OrphanReason, Outcome, PassConfig, PassReport,
    run_reconciliation_pass,
};

fn tp_a() -> TargetPool {
    TargetPool::new(
        "tp-a",
        region_link("us-central1"),
        [instance_link("us-central1-a", "vm-1")],
    )
}

/// tp-a bound to the vanished vm-1, plus one matching and one unrelated firewall
fn scenario() -> FakeProvider {
    FakeProvider::new()
        .with_target_pool(tp_a())
        .with_forwarding_rule("us-central1", "tp-a")
        .with_address("us-central1", "tp-a")
        .with_firewall(FirewallRule::new("k8s-fw-tp-a", ["tp-a-node"]))
        .with_firewall(FirewallRule::new("unrelated", ["tp-a-node"]))
}

async fn run(provider: &FakeProvider, dry_run: bool) -> PassReport {
    run_reconciliation_pass(
        provider,
        &PassConfig::new("dev-project").dry_run(dry_run),
        &Deadline::none(),
    )
    .await
    .unwrap()
}

/// 孤立した target pool と関連 firewall が削除されることを確認
#[tokio::test]
async fn test_orphaned_pool_with_unused_firewall() {
    let provider = scenario();
    let report = run(&provider, false).await;

    assert_eq!(
        report.pools[0].classification,
        Classification::Orphaned {
            reason: OrphanReason::InstanceGone {
                instance: "us-central1-a/vm-1".to_string()
            }
        }
    );
    assert_eq!(provider.deleted(ResourceKind::Firewall), vec!["k8s-fw-tp-a"]);
    assert_eq!(
        provider.delete_calls(),
        vec![
            "firewall k8s-fw-tp-a",
            "forwarding-rule us-central1/tp-a",
            "address us-central1/tp-a",
            "target-pool us-central1/tp-a",
        ]
    );

    let summary = report.summary();
    assert_eq!(summary.deleted, 4);
    assert_eq!(summary.errors, 0);
    assert_eq!(summary.skipped_indeterminate, 0);
}

/// タグ使用中の firewall は残し、pool 関連リソースは削除されることを確認
#[tokio::test]
async fn test_firewall_with_tag_in_use_is_kept() {
    let provider = scenario().with_instance(Instance::new("vm-9", "us-central1-b", ["tp-a-node"]));
    let report = run(&provider, false).await;

    assert!(provider.deleted(ResourceKind::Firewall).is_empty());
    assert_eq!(provider.deleted(ResourceKind::ForwardingRule), vec!["tp-a"]);
    assert_eq!(provider.deleted(ResourceKind::Address), vec!["tp-a"]);
    assert_eq!(provider.deleted(ResourceKind::TargetPool), vec!["tp-a"]);
    assert_eq!(report.summary().retained, 1);
}

/// 稼働中のインスタンスを持つ pool には一切触れないことを確認
#[tokio::test]
async fn test_live_pool_is_never_passed_to_coordinator() {
    let provider = scenario().with_instance(Instance::new("vm-1", "us-central1-a", ["web"]));
    let report = run(&provider, false).await;

    assert_eq!(report.pools[0].classification, Classification::Live);
    // k8s-fw-tp-a still goes through the dangling sweep: its tag is unused
    assert_eq!(provider.delete_calls(), vec!["firewall k8s-fw-tp-a"]);
    assert!(provider.deleted(ResourceKind::TargetPool).is_empty());
}

/// インスタンスのない pool はプローブせずに孤立と判定されることを確認
#[tokio::test]
async fn test_empty_pool_is_orphaned_without_probe() {
    let provider = FakeProvider::new().with_target_pool(TargetPool::new(
        "tp-empty",
        region_link("us-east1"),
        Vec::<String>::new(),
    ));
    let report = run(&provider, false).await;

    assert!(provider.probed().is_empty());
    assert_eq!(report.orphaned_pools(), 1);
    assert_eq!(provider.deleted(ResourceKind::TargetPool), vec!["tp-empty"]);
    // No forwarding rule or address was ever created for it
    assert_eq!(report.summary().absent, 2);
    assert_eq!(report.summary().errors, 0);
}

/// プロバイダーエラーは「不明」として扱われ、削除もエラー計上もされないことを確認
#[tokio::test]
async fn test_instance_lookup_error_is_indeterminate() {
    let provider = scenario()
        .with_instance(Instance::new("vm-1", "us-central1-a", ["web"]))
        .fail_get_instance("vm-1");
    let report = run(&provider, false).await;

    let summary = report.summary();
    assert_eq!(summary.skipped_indeterminate, 1);
    assert_eq!(summary.errors, 0);
    assert!(provider.deleted(ResourceKind::TargetPool).is_empty());
    assert!(provider.deleted(ResourceKind::ForwardingRule).is_empty());
    assert!(provider.deleted(ResourceKind::Address).is_empty());
    assert!(!report.records.iter().any(|r| r.name == "tp-a"
        && matches!(r.outcome, Outcome::Planned | Outcome::Deleted { .. })));
}

/// 途中でキャンセルされると、削除済みの pool はそのままに残りの pool には触れないことを確認
#[tokio::test]
async fn test_cancel_mid_pass_keeps_partial_progress() {
    let deadline = Deadline::none();
    let provider = FakeProvider::new()
        .with_target_pool(TargetPool::new("tp-a", region_link("us-central1"), Vec::<String>::new()))
        .with_forwarding_rule("us-central1", "tp-a")
        .with_address("us-central1", "tp-a")
        .with_target_pool(TargetPool::new("tp-b", region_link("us-central1"), Vec::<String>::new()))
        .with_forwarding_rule("us-central1", "tp-b")
        .with_address("us-central1", "tp-b")
        .cancel_after_delete(ResourceKind::TargetPool, "tp-a", deadline.cancel_handle());

    let report = run_reconciliation_pass(&provider, &PassConfig::new("dev-project"), &deadline)
        .await
        .unwrap();

    assert!(report.deadline_exceeded);
    assert_eq!(provider.deleted(ResourceKind::TargetPool), vec!["tp-a"]);
    assert_eq!(
        provider.delete_calls(),
        vec![
            "forwarding-rule us-central1/tp-a",
            "address us-central1/tp-a",
            "target-pool us-central1/tp-a",
        ]
    );
    assert!(!provider.delete_calls().iter().any(|c| c.contains("tp-b")));
    assert_eq!(report.summary().deleted, 3);
}

/// 孤立経路で削除された firewall が掃除パスで再削除されないことを確認
#[tokio::test]
async fn test_ledger_prevents_second_delete() {
    let provider = scenario().with_firewall(FirewallRule::new("gke-old-all", Vec::<String>::new()));
    run(&provider, false).await;

    let firewall_calls: Vec<String> = provider
        .delete_calls()
        .into_iter()
        .filter(|c| c.starts_with("firewall "))
        .collect();
    assert_eq!(
        firewall_calls,
        vec!["firewall gke-old-all", "firewall k8s-fw-tp-a"]
    );
}

/// 共有 firewall が複数の孤立 pool に一致しても一度しか削除されないことを確認
#[tokio::test]
async fn test_shared_firewall_deleted_once() {
    let provider = FakeProvider::new()
        .with_target_pool(TargetPool::new("tp-a", region_link("us-central1"), Vec::<String>::new()))
        .with_target_pool(TargetPool::new("tp-b", region_link("us-central1"), Vec::<String>::new()))
        .with_firewall(FirewallRule::new("k8s-fw-shared", Vec::<String>::new()));
    run(&provider, false).await;

    assert_eq!(provider.deleted(ResourceKind::Firewall), vec!["k8s-fw-shared"]);
    assert_eq!(
        provider
            .delete_calls()
            .iter()
            .filter(|c| c.starts_with("firewall "))
            .count(),
        1
    );
}

/// dry-run では削除 API を呼ばず、通常実行と同じ件数を返すことを確認
#[tokio::test]
async fn test_dry_run_matches_live_counts() {
    let dry = scenario();
    let dry_report = run(&dry, true).await;
    assert!(dry.delete_calls().is_empty());

    let live = scenario();
    let live_report = run(&live, false).await;

    assert_eq!(dry_report.summary(), live_report.summary());
    assert_eq!(dry_report.orphaned_pools(), live_report.orphaned_pools());
}

/// インベントリ取得失敗時はパス全体が中断されることを確認
#[tokio::test]
async fn test_inventory_failure_aborts() {
    let provider = scenario().fail_list(ResourceKind::Firewall);
    let result = run_reconciliation_pass(
        &provider,
        &PassConfig::new("dev-project"),
        &Deadline::none(),
    )
    .await;

    assert!(result.is_err());
    assert!(provider.delete_calls().is_empty());
}

/// パターン設定を差し替えられることを確認
#[tokio::test]
async fn test_custom_patterns() {
    let provider = FakeProvider::new()
        .with_firewall(FirewallRule::new("ci-runner-42", Vec::<String>::new()))
        .with_firewall(FirewallRule::new("gke-c1-all", Vec::<String>::new()));
    let config = PassConfig::new("dev-project").with_patterns(["ci-runner-"]);

    run_reconciliation_pass(&provider, &config, &Deadline::none())
        .await
        .unwrap();

    assert_eq!(provider.deleted(ResourceKind::Firewall), vec!["ci-runner-42"]);
}
