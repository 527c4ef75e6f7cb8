//! HTTP層
//!
//! フェッチャはこのトレイト越しにミラーへアクセスする。
//! 本番は reqwest、テストではスクリプト化したモックを差し込む。

use crate::error::{BridgeGeoError, Result};
use reqwest::Client;
use std::time::Duration;

/// ステータスと本文のみ（本文の解析はフェッチャ側）
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[allow(async_fn_in_trait)]
pub trait Transport {
    /// `url?data=<query>` へのGET。接続失敗・タイムアウトは Err
    async fn get(&self, url: &str, query: &str) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    async fn get(&self, url: &str, query: &str) -> Result<HttpResponse> {
        (**self).get(url, query).await
    }
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| BridgeGeoError::Http(format!("HTTPクライアント作成失敗: {}", e)))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, query: &str) -> Result<HttpResponse> {
        let response = self
            .client
            .get(url)
            .query(&[("data", query)])
            .send()
            .await
            .map_err(|e| BridgeGeoError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| BridgeGeoError::Http(format!("本文の受信に失敗: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        let ok = HttpResponse { status: 200, body: String::new() };
        let rate_limited = HttpResponse { status: 429, body: String::new() };
        let gateway = HttpResponse { status: 504, body: String::new() };
        assert!(ok.is_success());
        assert!(!rate_limited.is_success());
        assert!(!gateway.is_success());
    }

    #[test]
    fn test_reqwest_transport_builds() {
        let transport = ReqwestTransport::new(Duration::from_secs(5), "bridge-geo-test/0.1");
        assert!(transport.is_ok());
    }
}
