//! Overpass QL の組み立て
//!
//! 橋名はタグ値としてダブルクォート内に埋め込むため、
//! 制御文字を拒否し `\` と `"` をエスケープする。

use crate::error::{BridgeGeoError, Result};
use bridge_geo_common::AreaId;
use regex::Regex;

/// サーバ側のクエリタイムアウト（秒）
const QUERY_TIMEOUT_SECS: u32 = 60;

/// 橋名をタグ値用にエスケープ
pub fn escape_tag_value(name: &str) -> Result<String> {
    lazy_static::lazy_static! {
        static ref CONTROL_RE: Regex = Regex::new(r"\p{Cc}").unwrap();
        static ref QUOTE_RE: Regex = Regex::new(r#"["\\]"#).unwrap();
    }

    let name = name.trim();
    if name.is_empty() {
        return Err(BridgeGeoError::InvalidName("橋名が空です".into()));
    }
    if CONTROL_RE.is_match(name) {
        return Err(BridgeGeoError::InvalidName(format!(
            "制御文字を含む橋名は検索できません: {:?}",
            name
        )));
    }

    Ok(QUOTE_RE.replace_all(name, r"\$0").into_owned())
}

fn header(area: AreaId) -> String {
    format!(
        "[out:json][timeout:{}];\narea({})->.a;\n",
        QUERY_TIMEOUT_SECS, area
    )
}

/// 構成nodeを後続させる出力指定
const OUTPUT_WITH_NODES: &str = "out body;\n>;\nout skel qt;\n";

/// エリア内で name が完全一致する橋（way）を検索
pub fn exact_name_query(name: &str, area: AreaId) -> Result<String> {
    let escaped = escape_tag_value(name)?;
    Ok(format!(
        "{}way[\"bridge\"=\"yes\"][\"name\"=\"{}\"](area.a);\n{}",
        header(area),
        escaped,
        OUTPUT_WITH_NODES
    ))
}

/// エリア内で name タグが無い・空の橋（way）を全件検索
pub fn unnamed_query(area: AreaId) -> String {
    format!(
        "{}(\n  way[\"bridge\"=\"yes\"][!\"name\"](area.a);\n  way[\"bridge\"=\"yes\"][\"name\"~\"^$\"](area.a);\n);\n{}",
        header(area),
        OUTPUT_WITH_NODES
    )
}
