use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeGeoError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("シートが見つかりません: {0}")]
    SheetNotFound(String),

    #[error("必須列がありません: {0}（橋名・県名・市町村・AreaID が必要です）")]
    MissingColumn(String),

    #[error("Excel読み込みエラー: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("橋名が不正です: {0}")]
    InvalidName(String),

    #[error("AreaIDが不正です: {0}")]
    InvalidAreaId(String),

    #[error("HTTP通信エラー: {0}")]
    Http(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("レポート読み書きエラー: {0}")]
    Report(#[from] bridge_geo_common::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("橋リストが空です: {0}")]
    EmptyInput(String),
}

pub type Result<T> = std::result::Result<T, BridgeGeoError>;
