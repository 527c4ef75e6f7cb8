//! Overpass API アクセス
//!
//! - query: Overpass QL の組み立て（通信なし）
//! - types: レスポンス（node/way）の型
//! - transport: HTTP層（reqwest / テスト用差し替え）
//! - fetcher: ミラー巡回・リトライ付き取得

pub mod fetcher;
pub mod query;
pub mod transport;
pub mod types;

pub use fetcher::{FetchOutcome, FetchPolicy, Fetcher};
pub use query::{exact_name_query, unnamed_query};
pub use transport::{HttpResponse, ReqwestTransport, Transport};
pub use types::{Element, Node, NodeTable, OverpassResponse, Way};
