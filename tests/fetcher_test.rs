//! ミラー巡回・リトライの統合テスト
//!
//! モックHTTP層で失敗パターンを作り、呼び出し回数と待機の有無を検証

mod support;

use bridge_geo::cancel::CancelFlag;
use bridge_geo::overpass::{FetchOutcome, Fetcher};
use std::time::Duration;
use support::{mirrors, policy, MockTransport, Reply, SAKURA_BRIDGE};

/// 待機が発生したら確実に超える長さ
const LONG_WAIT: Duration = Duration::from_secs(60);

/// 先頭K件のミラーが失敗し、K+1件目で取得できる場合は待機しない
#[tokio::test]
async fn test_falls_through_to_first_working_mirror_without_waiting() {
    let urls = mirrors(4);
    let transport = MockTransport::new()
        .reply(&urls[0], Reply::NetworkError)
        .reply(&urls[1], Reply::Status(429))
        .reply(&urls[2], Reply::Json(SAKURA_BRIDGE.to_string()))
        .reply(&urls[3], Reply::Json(SAKURA_BRIDGE.to_string()));
    let fetcher = Fetcher::new(&transport, urls.clone(), policy(3, LONG_WAIT));

    let outcome = tokio::time::timeout(Duration::from_secs(5), fetcher.fetch("query"))
        .await
        .expect("待機が発生している");

    assert!(matches!(outcome, FetchOutcome::Data(ref r) if r.has_ways()));

    let called: Vec<String> = transport.calls().into_iter().map(|(url, _)| url).collect();
    assert_eq!(called, vec![urls[0].clone(), urls[1].clone(), urls[2].clone()]);
}

/// 全ミラーが常に失敗 → R×ミラー数 回呼び出して NoData
#[tokio::test]
async fn test_all_mirrors_failing_returns_no_data_after_all_rounds() {
    let urls = mirrors(3);
    let transport = MockTransport::new()
        .reply(&urls[0], Reply::NetworkError)
        .reply(&urls[1], Reply::Status(504))
        .reply(&urls[2], Reply::Json("<html>rate limited</html>".to_string()));
    let fetcher = Fetcher::new(&transport, urls, policy(4, Duration::ZERO));

    let outcome = fetcher.fetch("query").await;

    assert!(matches!(outcome, FetchOutcome::NoData));
    assert_eq!(transport.call_count(), 4 * 3);
}

/// 200でも way が無ければ失敗扱いで次へ
#[tokio::test]
async fn test_empty_elements_is_soft_failure() {
    let urls = mirrors(2);
    let transport = MockTransport::new()
        .reply(&urls[0], Reply::Json(r#"{"elements": [], "remark": "runtime error: Query timed out"}"#.to_string()))
        .reply(&urls[1], Reply::Json(r#"{"elements": [{"type": "node", "id": 1, "lat": 1.0, "lon": 1.0}]}"#.to_string()));
    let fetcher = Fetcher::new(&transport, urls, policy(2, Duration::ZERO));

    let outcome = fetcher.fetch("query").await;

    assert!(matches!(outcome, FetchOutcome::NoData));
    assert_eq!(transport.call_count(), 4);
}

/// 毎ラウンド同じ優先順でミラーを試行する
#[tokio::test]
async fn test_mirrors_tried_in_same_order_each_round() {
    let urls = mirrors(2);
    let transport = MockTransport::new();
    let fetcher = Fetcher::new(&transport, urls.clone(), policy(2, Duration::from_millis(1)));

    let outcome = fetcher.fetch("query").await;

    assert!(matches!(outcome, FetchOutcome::NoData));
    let called: Vec<String> = transport.calls().into_iter().map(|(url, _)| url).collect();
    assert_eq!(
        called,
        vec![urls[0].clone(), urls[1].clone(), urls[0].clone(), urls[1].clone()]
    );
}

/// クエリ本文がそのまま渡る
#[tokio::test]
async fn test_query_is_forwarded() {
    let urls = mirrors(1);
    let transport = MockTransport::new().reply(&urls[0], Reply::Json(SAKURA_BRIDGE.to_string()));
    let fetcher = Fetcher::new(&transport, urls, policy(1, Duration::ZERO));

    fetcher.fetch("[out:json];way(1);out;").await;

    assert_eq!(transport.calls()[0].1, "[out:json];way(1);out;");
}

/// retries=0 でも1ラウンドは試行する
#[tokio::test]
async fn test_zero_retries_runs_one_round() {
    let urls = mirrors(2);
    let transport = MockTransport::new();
    let fetcher = Fetcher::new(&transport, urls, policy(0, Duration::ZERO));

    assert!(matches!(fetcher.fetch("query").await, FetchOutcome::NoData));
    assert_eq!(transport.call_count(), 2);
}

/// 中断済みならリクエストしない
#[tokio::test]
async fn test_cancelled_before_fetch_makes_no_calls() {
    let urls = mirrors(2);
    let transport = MockTransport::new().reply(&urls[0], Reply::Json(SAKURA_BRIDGE.to_string()));
    let cancel = CancelFlag::new();
    cancel.cancel();
    let fetcher = Fetcher::new(&transport, urls, policy(3, Duration::ZERO)).with_cancel(cancel);

    assert!(matches!(fetcher.fetch("query").await, FetchOutcome::Cancelled));
    assert_eq!(transport.call_count(), 0);
}

/// ラウンド間の待機中に中断されたら待ち切らずに返る
#[tokio::test]
async fn test_cancel_during_round_wait_returns_promptly() {
    let urls = mirrors(1);
    let transport = MockTransport::new().reply(&urls[0], Reply::Status(503));
    let cancel = CancelFlag::new();
    let fetcher = Fetcher::new(&transport, urls, policy(2, LONG_WAIT)).with_cancel(cancel.clone());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    let outcome = tokio::time::timeout(Duration::from_secs(5), fetcher.fetch("query"))
        .await
        .expect("待機を打ち切っていない");

    assert!(matches!(outcome, FetchOutcome::Cancelled));
    assert_eq!(transport.call_count(), 1);
}

/// 応答待ちの最中に中断されたら通信を打ち切る
#[tokio::test]
async fn test_cancel_during_request_returns_promptly() {
    let urls = mirrors(2);
    let transport = MockTransport::new()
        .reply(&urls[0], Reply::Hang)
        .reply(&urls[1], Reply::Json(SAKURA_BRIDGE.to_string()));
    let cancel = CancelFlag::new();
    let fetcher = Fetcher::new(&transport, urls.clone(), policy(3, LONG_WAIT)).with_cancel(cancel.clone());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    let outcome = tokio::time::timeout(Duration::from_secs(5), fetcher.fetch("query"))
        .await
        .expect("通信を打ち切っていない");

    assert!(matches!(outcome, FetchOutcome::Cancelled));
    // 次のミラーには進まない
    let called: Vec<String> = transport.calls().into_iter().map(|(url, _)| url).collect();
    assert_eq!(called, vec![urls[0].clone()]);
}
