//! 橋名・エリアから way と端点座標を解決する
//!
//! - resolve_exact: 完全一致検索。レスポンス順で最初の way を採用
//! - resolve_candidates: 名称なし橋の全件列挙。端点を解決できない way は黙って除外
//!
//! node座標表は1回の取得結果ごとに作り、呼び出しをまたいでキャッシュしない。

use crate::cancel::CancelFlag;
use crate::overpass::{exact_name_query, unnamed_query, FetchOutcome, Fetcher, OverpassResponse, Transport};
use bridge_geo_common::{AreaId, FailureReason, FeatureMatch};
use tracing::{debug, warn};

pub struct FeatureResolver<T> {
    fetcher: Fetcher<T>,
}

impl<T: Transport> FeatureResolver<T> {
    pub fn new(fetcher: Fetcher<T>) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &Fetcher<T> {
        &self.fetcher
    }

    pub fn cancel_flag(&self) -> &CancelFlag {
        self.fetcher.cancel_flag()
    }

    pub async fn resolve_exact(&self, name: &str, area: AreaId) -> Result<FeatureMatch, FailureReason> {
        let query = exact_name_query(name, area).map_err(|e| {
            warn!("{}", e);
            FailureReason::InvalidName
        })?;

        match self.fetcher.fetch(&query).await {
            FetchOutcome::Data(response) => select_first_match(&response),
            FetchOutcome::NoData => Err(FailureReason::NotFound),
            FetchOutcome::Cancelled => Err(FailureReason::Cancelled),
        }
    }

    /// 中断時のみ Err
    pub async fn resolve_candidates(&self, area: AreaId) -> Result<Vec<FeatureMatch>, FailureReason> {
        match self.fetcher.fetch(&unnamed_query(area)).await {
            FetchOutcome::Data(response) => Ok(collect_candidates(&response)),
            FetchOutcome::NoData => Ok(Vec::new()),
            FetchOutcome::Cancelled => Err(FailureReason::Cancelled),
        }
    }
}

/// 最初の way を採用（同名が複数あっても先頭のみ）
pub fn select_first_match(response: &OverpassResponse) -> Result<FeatureMatch, FailureReason> {
    let mut ways = response.ways();
    let way = ways.next().ok_or(FailureReason::NotFound)?;

    let others = ways.count();
    if others > 0 {
        debug!("同名の way が他に{}件あります（先頭の {} を採用）", others, way.id);
    }

    let table = response.node_table();
    let (start, end) = way
        .endpoints(&table)
        .ok_or(FailureReason::UnresolvableGeometry)?;

    Ok(FeatureMatch {
        feature_id: way.id,
        start,
        end,
    })
}

/// 端点を解決できる way のみ、レスポンス順で
pub fn collect_candidates(response: &OverpassResponse) -> Vec<FeatureMatch> {
    let table = response.node_table();
    response
        .ways()
        .filter_map(|way| match way.endpoints(&table) {
            Some((start, end)) => Some(FeatureMatch {
                feature_id: way.id,
                start,
                end,
            }),
            None => {
                debug!("way {} は端点を解決できないため候補から除外", way.id);
                None
            }
        })
        .collect()
}
