//! 橋リストの一括処理
//!
//! 1行ずつ入力順に処理する:
//! 1. 橋名が `no-name` かつ AreaID あり → 名称なし候補の列挙
//! 2. 橋名が空 または AreaID なし → 未解決（必須項目なし、通信しない）
//! 3. それ以外 → 完全一致検索
//!
//! 各行の処理後に ProgressObserver へ通知する。中断フラグは行の合間に検査する。

use crate::overpass::Transport;
use crate::resolver::FeatureResolver;
use bridge_geo_common::{AreaId, BatchReport, BridgeRecord, FailureReason, ResolutionResult};
use tracing::{debug, info};

/// 進捗通知（UIに依存しない）
pub trait ProgressObserver {
    fn on_start(&mut self, _total: usize) {}

    /// `index` は0始まり
    fn on_row(&mut self, index: usize, total: usize, result: &ResolutionResult);

    fn on_finish(&mut self, _report: &BatchReport) {}
}

/// 何もしない
pub struct NullProgress;

impl ProgressObserver for NullProgress {
    fn on_row(&mut self, _index: usize, _total: usize, _result: &ResolutionResult) {}
}

/// 行の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind<'a> {
    Candidates(AreaId),
    Exact(&'a str, AreaId),
    MissingField,
}

pub fn classify(record: &BridgeRecord) -> RowKind<'_> {
    match record.area_id {
        Some(area) if record.is_unnamed_marker() => RowKind::Candidates(area),
        Some(area) if record.has_name() => RowKind::Exact(record.name.trim(), area),
        _ => RowKind::MissingField,
    }
}

/// 1行を解決
pub async fn resolve_record<T: Transport>(
    record: &BridgeRecord,
    resolver: &FeatureResolver<T>,
) -> ResolutionResult {
    match classify(record) {
        RowKind::MissingField => ResolutionResult::Failure(record.clone(), FailureReason::MissingField),
        RowKind::Exact(name, area) => match resolver.resolve_exact(name, area).await {
            Ok(feature) => ResolutionResult::Success(record.clone(), feature),
            Err(reason) => ResolutionResult::Failure(record.clone(), reason),
        },
        RowKind::Candidates(area) => match resolver.resolve_candidates(area).await {
            Ok(features) if features.is_empty() => {
                ResolutionResult::Failure(record.clone(), FailureReason::NotFound)
            }
            Ok(features) => ResolutionResult::CandidateSet(record.clone(), features),
            Err(reason) => ResolutionResult::Failure(record.clone(), reason),
        },
    }
}

/// 全行を処理して3区分に振り分ける
pub async fn process_batch<T: Transport, O: ProgressObserver>(
    records: &[BridgeRecord],
    resolver: &FeatureResolver<T>,
    observer: &mut O,
) -> BatchReport {
    let cancel = resolver.cancel_flag();
    let total = records.len();
    let mut report = BatchReport::default();
    observer.on_start(total);

    for (index, record) in records.iter().enumerate() {
        if cancel.is_cancelled() {
            info!("{}/{} 行目で中断しました", index, total);
            report.cancelled = true;
            break;
        }

        let result = resolve_record(record, resolver).await;
        debug!("行{} {:?}", record.row, result);
        observer.on_row(index, total, &result);

        let interrupted = matches!(result, ResolutionResult::Failure(_, FailureReason::Cancelled));
        report.push(result);
        if interrupted {
            report.cancelled = true;
            break;
        }
    }

    observer.on_finish(&report);
    report
}
