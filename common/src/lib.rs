//! Bridge Geo Common Library
//!
//! CLIとレポート出力で共有される型とユーティリティ

pub mod types;
pub mod coord;
pub mod error;
pub mod export;

pub use types::{
    AreaId, BatchReport, BridgeRecord, CandidateEntry, FailedBridge, FailureReason,
    FeatureMatch, GeoPoint, MatchedBridge, ResolutionResult, UNNAMED_MARKER,
};
pub use coord::{decimal_to_dms, format_dms, parse_dms, Axis};
pub use error::{Error, Result};
