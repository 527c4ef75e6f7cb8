//! Excelレポート生成（共通ライブラリ）
//!
//! シート構成:
//! - 結果: 解決できた橋（way URL、起点・終点の十進/度分秒）
//! - 未解決: 解決できなかった行と理由
//! - 名称なし候補: 名称なし橋の候補way
//! - 概要: 件数と生成日時

use crate::types::{BatchReport, BridgeRecord, FeatureMatch};
use rust_xlsxwriter::*;

pub const SHEET_RESULTS: &str = "結果";
pub const SHEET_FAILURES: &str = "未解決";
pub const SHEET_CANDIDATES: &str = "名称なし候補";
pub const SHEET_SUMMARY: &str = "概要";

/// way情報の列（結果・候補シート共通）
const FEATURE_HEADERS: [&str; 10] = [
    "way_id",
    "OSM",
    "起点_緯度(十進)",
    "起点_経度(十進)",
    "終点_緯度(十進)",
    "終点_経度(十進)",
    "起点_緯度(度分秒)",
    "起点_経度(度分秒)",
    "終点_緯度(度分秒)",
    "終点_経度(度分秒)",
];

const RESULT_RECORD_HEADERS: [&str; 4] = ["橋名", "県名", "市町村", "AreaID"];
const FAILURE_HEADERS: [&str; 7] = ["行", "橋名", "県名", "市町村", "AreaID", "理由", "理由コード"];
const CANDIDATE_RECORD_HEADERS: [&str; 4] = ["行", "県名", "市町村", "AreaID"];

struct Formats {
    header: Format,
    link: Format,
    decimal: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(0xF5F5F5))
                .set_border(FormatBorder::Thin)
                .set_border_color(Color::RGB(0xAAAAAA)),
            link: Format::new()
                .set_font_color(Color::RGB(0x0563C1))
                .set_underline(FormatUnderline::Single),
            decimal: Format::new().set_num_format("0.0000000"),
        }
    }
}

/// Excelをバッファに生成
///
/// # Arguments
/// * `report` - バッチ処理結果
/// * `generated_at` - 概要シートに記載する生成日時
pub fn generate_report_buffer(report: &BatchReport, generated_at: &str) -> Result<Vec<u8>, String> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    write_results_sheet(workbook.add_worksheet(), report, &formats)?;
    write_failures_sheet(workbook.add_worksheet(), report, &formats)?;
    write_candidates_sheet(workbook.add_worksheet(), report, &formats)?;
    write_summary_sheet(workbook.add_worksheet(), report, generated_at, &formats)?;

    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

fn write_headers(worksheet: &mut Worksheet, headers: &[&str], first_col: u16, format: &Format) -> Result<(), String> {
    for (i, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, first_col + i as u16, *header, format)
            .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
    }
    Ok(())
}

fn write_area_id(worksheet: &mut Worksheet, row: u32, col: u16, record: &BridgeRecord) -> Result<(), String> {
    if let Some(area_id) = record.area_id {
        worksheet.write_number(row, col, area_id.get() as f64)
            .map_err(|e| format!("AreaID書き込みエラー: {}", e))?;
    }
    Ok(())
}

/// way_id から終点経度(度分秒)までの10列を書き込む
fn write_feature_columns(
    worksheet: &mut Worksheet,
    row: u32,
    first_col: u16,
    feature: &FeatureMatch,
    formats: &Formats,
) -> Result<(), String> {
    let err = |e: XlsxError| format!("way書き込みエラー: {}", e);

    worksheet.write_number(row, first_col, feature.feature_id as f64).map_err(err)?;

    let url = Url::new(feature.osm_url()).set_text("OSM");
    worksheet.write_url_with_format(row, first_col + 1, url, &formats.link).map_err(err)?;

    let decimals = [
        feature.start.latitude,
        feature.start.longitude,
        feature.end.latitude,
        feature.end.longitude,
    ];
    for (i, value) in decimals.iter().enumerate() {
        worksheet.write_number_with_format(row, first_col + 2 + i as u16, *value, &formats.decimal)
            .map_err(err)?;
    }

    let (start_lat, start_lon) = feature.start.to_dms();
    let (end_lat, end_lon) = feature.end.to_dms();
    for (i, text) in [start_lat, start_lon, end_lat, end_lon].iter().enumerate() {
        worksheet.write_string(row, first_col + 6 + i as u16, text).map_err(err)?;
    }

    Ok(())
}

fn write_results_sheet(worksheet: &mut Worksheet, report: &BatchReport, formats: &Formats) -> Result<(), String> {
    worksheet.set_name(SHEET_RESULTS)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    write_headers(worksheet, &RESULT_RECORD_HEADERS, 0, &formats.header)?;
    write_headers(worksheet, &FEATURE_HEADERS, RESULT_RECORD_HEADERS.len() as u16, &formats.header)?;

    for (i, matched) in report.successes.iter().enumerate() {
        let row = i as u32 + 1;
        let record = &matched.record;
        worksheet.write_string(row, 0, &record.name)
            .and_then(|ws| ws.write_string(row, 1, &record.prefecture))
            .and_then(|ws| ws.write_string(row, 2, &record.municipality))
            .map_err(|e| format!("橋情報書き込みエラー: {}", e))?;
        write_area_id(worksheet, row, 3, record)?;
        write_feature_columns(worksheet, row, RESULT_RECORD_HEADERS.len() as u16, &matched.feature, formats)?;
    }

    worksheet.set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;
    Ok(())
}

fn write_failures_sheet(worksheet: &mut Worksheet, report: &BatchReport, formats: &Formats) -> Result<(), String> {
    worksheet.set_name(SHEET_FAILURES)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    write_headers(worksheet, &FAILURE_HEADERS, 0, &formats.header)?;

    for (i, failed) in report.failures.iter().enumerate() {
        let row = i as u32 + 1;
        let record = &failed.record;
        worksheet.write_number(row, 0, record.row as f64)
            .and_then(|ws| ws.write_string(row, 1, &record.name))
            .and_then(|ws| ws.write_string(row, 2, &record.prefecture))
            .and_then(|ws| ws.write_string(row, 3, &record.municipality))
            .map_err(|e| format!("未解決行書き込みエラー: {}", e))?;
        write_area_id(worksheet, row, 4, record)?;
        worksheet.write_string(row, 5, failed.reason.label())
            .and_then(|ws| ws.write_string(row, 6, failed.reason.code()))
            .map_err(|e| format!("理由書き込みエラー: {}", e))?;
    }

    worksheet.set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;
    Ok(())
}

fn write_candidates_sheet(worksheet: &mut Worksheet, report: &BatchReport, formats: &Formats) -> Result<(), String> {
    worksheet.set_name(SHEET_CANDIDATES)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    write_headers(worksheet, &CANDIDATE_RECORD_HEADERS, 0, &formats.header)?;
    write_headers(worksheet, &FEATURE_HEADERS, CANDIDATE_RECORD_HEADERS.len() as u16, &formats.header)?;

    for (i, candidate) in report.candidates.iter().enumerate() {
        let row = i as u32 + 1;
        let record = &candidate.record;
        worksheet.write_number(row, 0, record.row as f64)
            .and_then(|ws| ws.write_string(row, 1, &record.prefecture))
            .and_then(|ws| ws.write_string(row, 2, &record.municipality))
            .map_err(|e| format!("候補書き込みエラー: {}", e))?;
        write_area_id(worksheet, row, 3, record)?;
        write_feature_columns(worksheet, row, CANDIDATE_RECORD_HEADERS.len() as u16, &candidate.feature, formats)?;
    }

    worksheet.set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;
    Ok(())
}

fn write_summary_sheet(
    worksheet: &mut Worksheet,
    report: &BatchReport,
    generated_at: &str,
    formats: &Formats,
) -> Result<(), String> {
    worksheet.set_name(SHEET_SUMMARY)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    let rows: [(&str, String); 6] = [
        ("生成日時", generated_at.to_string()),
        ("処理行数", report.processed_rows().to_string()),
        ("成功", report.successes.len().to_string()),
        ("未解決", report.failures.len().to_string()),
        ("名称なし候補", report.candidates.len().to_string()),
        ("中断", if report.cancelled { "あり".to_string() } else { "なし".to_string() }),
    ];

    for (i, (label, value)) in rows.iter().enumerate() {
        let row = i as u32;
        worksheet.write_string_with_format(row, 0, *label, &formats.header)
            .and_then(|ws| ws.write_string(row, 1, value))
            .map_err(|e| format!("概要書き込みエラー: {}", e))?;
    }

    worksheet.set_column_width(0, 16)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;
    worksheet.set_column_width(1, 24)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;
    Ok(())
}
