//! テスト用のモックHTTP層
//!
//! ミラーURLごとに固定の応答を設定し、呼び出しを記録する。

#![allow(dead_code)]

use bridge_geo::error::{BridgeGeoError, Result};
use bridge_geo::overpass::{FetchPolicy, Fetcher, HttpResponse, Transport};
use bridge_geo::resolver::FeatureResolver;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Reply {
    /// 接続失敗・タイムアウト
    NetworkError,
    /// 応答が返らない
    Hang,
    Status(u16),
    Json(String),
}

struct Route {
    url: String,
    /// クエリにこの文字列を含む場合のみ
    query_contains: Option<String>,
    reply: Reply,
}

#[derive(Default)]
pub struct MockTransport {
    routes: Vec<Route>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, url: &str, reply: Reply) -> Self {
        self.routes.push(Route { url: url.to_string(), query_contains: None, reply });
        self
    }

    /// 先に登録したものが優先
    pub fn reply_when(mut self, url: &str, query_contains: &str, reply: Reply) -> Self {
        self.routes.push(Route {
            url: url.to_string(),
            query_contains: Some(query_contains.to_string()),
            reply,
        });
        self
    }

    /// (url, query) の呼び出し履歴
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    async fn get(&self, url: &str, query: &str) -> Result<HttpResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), query.to_string()));

        let route = self.routes.iter().find(|r| {
            r.url == url && r.query_contains.as_deref().map_or(true, |q| query.contains(q))
        });

        match route.map(|r| &r.reply) {
            Some(Reply::Json(body)) => Ok(HttpResponse { status: 200, body: body.clone() }),
            Some(Reply::Hang) => std::future::pending().await,
            Some(Reply::Status(status)) => Ok(HttpResponse { status: *status, body: String::new() }),
            Some(Reply::NetworkError) | None => Err(BridgeGeoError::Http(format!("connection refused: {}", url))),
        }
    }
}

pub fn mirrors(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("http://mirror{}.test/api/interpreter", i)).collect()
}

pub fn policy(retries: u32, wait: Duration) -> FetchPolicy {
    FetchPolicy { retries, wait }
}

/// 1ミラー・1ラウンド・待機なし
pub fn single_mirror_resolver(transport: &MockTransport) -> FeatureResolver<&MockTransport> {
    let fetcher = Fetcher::new(transport, mirrors(1), policy(1, Duration::ZERO));
    FeatureResolver::new(fetcher)
}

/// way 999（桜橋）と両端node
pub const SAKURA_BRIDGE: &str = r#"{
    "version": 0.6,
    "elements": [
        {"type": "way", "id": 999, "nodes": [101, 102, 103], "tags": {"bridge": "yes", "name": "桜橋"}},
        {"type": "node", "id": 101, "lat": 34.70, "lon": 135.50},
        {"type": "node", "id": 102, "lat": 34.705, "lon": 135.51},
        {"type": "node", "id": 103, "lat": 34.71, "lon": 135.52}
    ]
}"#;

/// 名称なしway 2件（2件目は末尾nodeが欠落）
pub const UNNAMED_BRIDGES: &str = r#"{
    "elements": [
        {"type": "way", "id": 501, "nodes": [1, 2], "tags": {"bridge": "yes"}},
        {"type": "way", "id": 502, "nodes": [3, 4], "tags": {"bridge": "yes", "name": ""}},
        {"type": "node", "id": 1, "lat": 34.60, "lon": 135.40},
        {"type": "node", "id": 2, "lat": 34.61, "lon": 135.41},
        {"type": "node", "id": 3, "lat": 34.62, "lon": 135.42}
    ]
}"#;
