//! bridge-geo
//!
//! 橋リスト（橋名・県名・市町村・AreaID）から、Overpass API で橋のwayを検索し
//! 起点・終点の緯度経度を求める。

pub mod batch;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod overpass;
pub mod progress;
pub mod reader;
pub mod resolver;
