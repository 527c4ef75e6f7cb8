//! 橋リスト（xlsx）の読み込み
//!
//! 先頭行を見出しとして列位置を決める（列順は自由）。
//! AreaIDはここで検証し、正の整数にならない値は未入力として扱う。

use crate::error::{BridgeGeoError, Result};
use bridge_geo_common::{AreaId, BridgeRecord};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use tracing::{debug, warn};

const NAME_HEADERS: &[&str] = &["橋名", "name"];
const PREFECTURE_HEADERS: &[&str] = &["県名", "prefecture"];
const MUNICIPALITY_HEADERS: &[&str] = &["市町村", "municipality"];
const AREA_ID_HEADERS: &[&str] = &["AreaID", "area_id", "areaid"];

static EMPTY_CELL: Data = Data::Empty;

/// 見出しから求めた列位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    name: usize,
    prefecture: usize,
    municipality: usize,
    area_id: usize,
}

impl ColumnMap {
    fn from_header(header: &[Data]) -> Result<Self> {
        let labels: Vec<String> = header.iter().map(cell_text).collect();
        let find = |candidates: &[&str]| -> Result<usize> {
            labels
                .iter()
                .position(|label| {
                    candidates
                        .iter()
                        .any(|c| label.eq_ignore_ascii_case(c))
                })
                .ok_or_else(|| BridgeGeoError::MissingColumn(candidates[0].to_string()))
        };

        Ok(Self {
            name: find(NAME_HEADERS)?,
            prefecture: find(PREFECTURE_HEADERS)?,
            municipality: find(MUNICIPALITY_HEADERS)?,
            area_id: find(AREA_ID_HEADERS)?,
        })
    }
}

/// xlsx の指定シートから橋リストを読み込む
pub fn read_bridge_list(path: &Path, sheet: &str) -> Result<Vec<BridgeRecord>> {
    if !path.exists() {
        return Err(BridgeGeoError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)?;
    if !workbook.sheet_names().iter().any(|s| s == sheet) {
        return Err(BridgeGeoError::SheetNotFound(format!(
            "{}（存在するシート: {}）",
            sheet,
            workbook.sheet_names().join(", ")
        )));
    }

    let range = workbook.worksheet_range(sheet)?;
    records_from_range(&range)
}

/// 見出し行 + データ行のRangeからレコードを作る
pub fn records_from_range(range: &Range<Data>) -> Result<Vec<BridgeRecord>> {
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| BridgeGeoError::EmptyInput("見出し行がありません".into()))?;
    let columns = ColumnMap::from_header(header)?;
    debug!("列位置: {:?}", columns);

    // シート上の行番号（1始まり）
    let first_row = range.start().map(|(r, _)| r as usize + 1).unwrap_or(1);

    let mut records = Vec::new();
    for (offset, cells) in rows.enumerate() {
        let row = first_row + offset + 1;
        let get = |col: usize| cells.get(col).unwrap_or(&EMPTY_CELL);

        let name = cell_text(get(columns.name));
        let prefecture = cell_text(get(columns.prefecture));
        let municipality = cell_text(get(columns.municipality));
        let area_cell = get(columns.area_id);

        if name.is_empty() && prefecture.is_empty() && municipality.is_empty() && is_blank(area_cell) {
            continue;
        }

        let area_id = parse_area_id(area_cell);
        if area_id.is_none() && !is_blank(area_cell) {
            warn!("行{}: AreaID {:?} は正の整数ではないため未入力として扱います", row, area_cell);
        }

        records.push(BridgeRecord {
            row,
            name,
            prefecture,
            municipality,
            area_id,
        });
    }

    Ok(records)
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// セルを前後空白なしの文字列に
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// AreaIDセルを検証（全角数字・`12345.0` も受け付ける）
pub fn parse_area_id(cell: &Data) -> Option<AreaId> {
    match cell {
        Data::Int(i) => AreaId::try_from(*i).ok(),
        Data::Float(f) if f.fract() == 0.0 && *f > 0.0 && *f < u64::MAX as f64 => AreaId::new(*f as u64),
        Data::String(s) => {
            let normalized = to_halfwidth_digits(s.trim());
            let digits = normalized.strip_suffix(".0").unwrap_or(&normalized);
            digits.parse::<u64>().ok().and_then(AreaId::new)
        }
        _ => None,
    }
}

/// 全角数字・全角ピリオドを半角に
fn to_halfwidth_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            '．' => '.',
            _ => c,
        })
        .collect()
}
