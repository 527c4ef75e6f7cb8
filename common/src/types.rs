//! 橋リスト処理の型定義
//!
//! CLIとレポート出力で共有される型:
//! - BridgeRecord: 入力行（橋リストの1行）
//! - FeatureMatch: 解決されたway（起点・終点座標）
//! - ResolutionResult: 1行ごとの解決結果
//! - BatchReport: 成功・未解決・候補の3区分に集約した結果

use crate::coord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 名称未登録の橋を示すセンチネル値
pub const UNNAMED_MARKER: &str = "no-name";

/// OSMのway参照URL
const OSM_WAY_URL: &str = "https://www.openstreetmap.org/way/";

/// Overpassのエリア識別子（正の整数のみ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct AreaId(u64);

impl AreaId {
    /// 0は無効
    pub fn new(value: u64) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for AreaId {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("AreaIDは正の整数である必要があります: {}", value))
    }
}

impl TryFrom<i64> for AreaId {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| format!("AreaIDは正の整数である必要があります: {}", value))
    }
}

impl From<AreaId> for u64 {
    fn from(id: AreaId) -> Self {
        id.0
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 橋リストの1行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeRecord {
    /// 元シートの行番号（1始まり）
    #[serde(default)]
    pub row: usize,

    pub name: String,         // 橋名

    #[serde(default)]
    pub prefecture: String,   // 県名

    #[serde(default)]
    pub municipality: String, // 市町村

    #[serde(default)]
    pub area_id: Option<AreaId>,
}

impl BridgeRecord {
    /// 名称なし橋のセンチネルか
    pub fn is_unnamed_marker(&self) -> bool {
        self.name.trim() == UNNAMED_MARKER
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// 十進度の座標
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// 範囲検査前の座標（デシリアライズ用）
#[derive(Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = String;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
            .ok_or_else(|| format!("座標が範囲外です: ({}, {})", raw.latitude, raw.longitude))
    }
}

impl GeoPoint {
    /// 範囲外・非有限値は None
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self { latitude, longitude })
    }

    /// (緯度, 経度) の度分秒表記
    pub fn to_dms(&self) -> (String, String) {
        coord::format_dms(self)
    }
}

/// 解決されたway
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureMatch {
    pub feature_id: i64,
    pub start: GeoPoint,
    pub end: GeoPoint,
}

impl FeatureMatch {
    pub fn osm_url(&self) -> String {
        format!("{}{}", OSM_WAY_URL, self.feature_id)
    }
}

/// 未解決理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    #[serde(rename = "missing required field")]
    MissingField,
    #[serde(rename = "not found")]
    NotFound,
    #[serde(rename = "unresolvable geometry")]
    UnresolvableGeometry,
    #[serde(rename = "invalid name")]
    InvalidName,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl FailureReason {
    /// 機械可読な理由コード
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::MissingField => "missing required field",
            FailureReason::NotFound => "not found",
            FailureReason::UnresolvableGeometry => "unresolvable geometry",
            FailureReason::InvalidName => "invalid name",
            FailureReason::Cancelled => "cancelled",
        }
    }

    /// レポート表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            FailureReason::MissingField => "必須項目（橋名・AreaID）が未入力",
            FailureReason::NotFound => "該当する橋が見つかりません",
            FailureReason::UnresolvableGeometry => "端点の座標を特定できません",
            FailureReason::InvalidName => "橋名に使用できない文字が含まれています",
            FailureReason::Cancelled => "処理が中断されました",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 1行の解決結果（生成後は不変）
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionResult {
    Success(BridgeRecord, FeatureMatch),
    Failure(BridgeRecord, FailureReason),
    CandidateSet(BridgeRecord, Vec<FeatureMatch>),
}

impl ResolutionResult {
    pub fn record(&self) -> &BridgeRecord {
        match self {
            ResolutionResult::Success(record, _)
            | ResolutionResult::Failure(record, _)
            | ResolutionResult::CandidateSet(record, _) => record,
        }
    }
}

/// 成功行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedBridge {
    pub record: BridgeRecord,
    pub feature: FeatureMatch,
}

/// 未解決行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedBridge {
    pub record: BridgeRecord,
    pub reason: FailureReason,
}

/// 名称なし橋の候補（元行のメタデータ付き）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateEntry {
    pub record: BridgeRecord,
    pub feature: FeatureMatch,
}

/// バッチ処理の集約結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub successes: Vec<MatchedBridge>,
    pub failures: Vec<FailedBridge>,
    pub candidates: Vec<CandidateEntry>,
    /// 候補を1件以上出した元行の数
    #[serde(default)]
    pub candidate_rows: usize,
    /// 途中で中断されたか
    #[serde(default)]
    pub cancelled: bool,
}

impl BatchReport {
    /// 結果を該当する区分に追加（入力順を保持）
    pub fn push(&mut self, result: ResolutionResult) {
        match result {
            ResolutionResult::Success(record, feature) => {
                self.successes.push(MatchedBridge { record, feature });
            }
            ResolutionResult::Failure(record, reason) => {
                self.failures.push(FailedBridge { record, reason });
            }
            ResolutionResult::CandidateSet(record, features) => {
                if !features.is_empty() {
                    self.candidate_rows += 1;
                }
                self.candidates.extend(features.into_iter().map(|feature| CandidateEntry {
                    record: record.clone(),
                    feature,
                }));
            }
        }
    }

    /// JSONファイルから読み込み
    pub fn load_json(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// JSONファイルに保存
    pub fn save_json(&self, path: &std::path::Path) -> crate::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// 処理済み行数（候補は元行単位で数える）
    pub fn processed_rows(&self) -> usize {
        self.successes.len() + self.failures.len() + self.candidate_rows
    }
}
