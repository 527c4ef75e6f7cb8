use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bridge-geo")]
#[command(about = "橋リスト → 端点緯度経度変換ツール（Overpass API）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// 接続設定の一時上書き（設定ファイルは変更しない）
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FetchArgs {
    /// OverpassミラーURL（複数指定可、指定時は設定ファイルの一覧を置き換え）
    #[arg(long = "mirror")]
    pub mirrors: Vec<String>,

    /// リトライ回数（ラウンド数）
    #[arg(long)]
    pub retries: Option<u32>,

    /// ラウンド間の待機秒数
    #[arg(long)]
    pub wait: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 橋リスト（xlsx）を一括変換してレポートを出力
    Run {
        /// 橋リストxlsx
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル/ディレクトリ（デフォルト: カレント/bridge_endpoints.xlsx）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (excel/json/both)
        #[arg(short, long, default_value = "excel")]
        format: ExportFormat,

        /// 読み込むシート名（デフォルト: 設定値「橋リスト」）
        #[arg(long)]
        sheet: Option<String>,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// 橋名とAreaIDで1件検索
    Lookup {
        /// 橋名
        #[arg(required = true)]
        name: String,

        /// AreaID
        #[arg(required = true)]
        area_id: u64,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// エリア内の名称なし橋の候補を列挙
    Candidates {
        /// AreaID
        #[arg(required = true)]
        area_id: u64,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// 保存済みJSON結果からExcelレポートを再生成
    Export {
        /// 入力JSONファイル（run --format json の出力）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力xlsx
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// ミラーURLを追加
        #[arg(long)]
        add_mirror: Option<String>,

        /// ミラーURLを全削除
        #[arg(long)]
        clear_mirrors: bool,

        /// リトライ回数を設定
        #[arg(long)]
        retries: Option<u32>,

        /// ラウンド間の待機秒数を設定
        #[arg(long)]
        wait: Option<u64>,

        /// 既定値に戻す
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Excel,
    Json,
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "json" => Ok(ExportFormat::Json),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use excel, json, or both", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}
