//! ミラー巡回・リトライ付きのクエリ実行
//!
//! 1ラウンド = 全ミラーを優先順に1回ずつ試行。
//! 2xx かつ way を1件以上含むレスポンスが得られた時点で返す。
//! 通信エラー・非2xx・JSON不正・way無しは次のミラーへ進むだけで、呼び出し側には伝えない。
//! ラウンドが全滅したら待機して次のラウンドへ（最終ラウンド後は待たない）。
//! 通信中・待機中でも中断フラグが立てば直ちに Cancelled を返す。

use super::transport::Transport;
use super::types::OverpassResponse;
use crate::cancel::CancelFlag;
use std::time::Duration;
use tracing::{debug, info, warn};

/// リトライ設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// ラウンド数（0は1として扱う）
    pub retries: u32,
    /// ラウンド間の待機
    pub wait: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            wait: Duration::from_secs(5),
        }
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    Data(OverpassResponse),
    /// 全ラウンドでデータなし（エラーではない）
    NoData,
    Cancelled,
}

pub struct Fetcher<T> {
    transport: T,
    mirrors: Vec<String>,
    policy: FetchPolicy,
    cancel: CancelFlag,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, mirrors: Vec<String>, policy: FetchPolicy) -> Self {
        Self {
            transport,
            mirrors,
            policy,
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    pub fn mirrors(&self) -> &[String] {
        &self.mirrors
    }

    pub async fn fetch(&self, query: &str) -> FetchOutcome {
        let rounds = self.policy.retries.max(1);

        for round in 1..=rounds {
            for mirror in &self.mirrors {
                if self.cancel.is_cancelled() {
                    info!("取得を中断しました（ラウンド {}/{}）", round, rounds);
                    return FetchOutcome::Cancelled;
                }

                let attempt = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        info!("{} への通信中に中断しました", mirror);
                        return FetchOutcome::Cancelled;
                    }
                    response = self.try_mirror(mirror, query) => response,
                };

                if let Some(response) = attempt {
                    debug!("{} から取得（ラウンド {}/{}）", mirror, round, rounds);
                    return FetchOutcome::Data(response);
                }
            }

            if round < rounds {
                debug!(
                    "ラウンド {}/{} は全ミラー失敗、{:?} 待機します",
                    round, rounds, self.policy.wait
                );
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        info!("待機中に中断しました（ラウンド {}/{}）", round, rounds);
                        return FetchOutcome::Cancelled;
                    }
                    _ = tokio::time::sleep(self.policy.wait) => {}
                }
            }
        }

        warn!("{}ラウンド試行しましたがデータを取得できませんでした", rounds);
        FetchOutcome::NoData
    }

    async fn try_mirror(&self, mirror: &str, query: &str) -> Option<OverpassResponse> {
        let response = match self.transport.get(mirror, query).await {
            Ok(r) => r,
            Err(e) => {
                warn!("{} へのリクエスト失敗: {}", mirror, e);
                return None;
            }
        };

        if !response.is_success() {
            warn!("{} がステータス {} を返しました", mirror, response.status);
            return None;
        }

        let parsed: OverpassResponse = match serde_json::from_str(&response.body) {
            Ok(p) => p,
            Err(e) => {
                warn!("{} のレスポンスを解析できません: {}", mirror, e);
                return None;
            }
        };

        if let Some(remark) = &parsed.remark {
            warn!("{} remark: {}", mirror, remark);
        }

        if !parsed.has_ways() {
            debug!("{} の結果に way がありません", mirror);
            return None;
        }

        Some(parsed)
    }
}
