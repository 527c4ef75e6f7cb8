//! 十進度 ⇔ 度分秒 変換
//!
//! 秒は小数第1位で丸める。丸めで60.0秒になる場合は分・度へ繰り上げる。

use crate::types::GeoPoint;

/// 0.1秒単位の1度あたりの刻み数
const TENTHS_PER_DEGREE: f64 = 36_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn hemisphere(self, negative: bool) -> char {
        match (self, negative) {
            (Axis::Latitude, false) => 'N',
            (Axis::Latitude, true) => 'S',
            (Axis::Longitude, false) => 'E',
            (Axis::Longitude, true) => 'W',
        }
    }
}

/// 十進度を `34°42'0.0"N` 形式に変換
pub fn decimal_to_dms(value: f64, axis: Axis) -> String {
    let tenths = (value.abs() * TENTHS_PER_DEGREE).round() as u64;
    // 丸めて0になる値は N/E
    let hemisphere = axis.hemisphere(value < 0.0 && tenths > 0);

    let degrees = tenths / 36_000;
    let minutes = (tenths % 36_000) / 600;
    let seconds = tenths % 600;

    format!(
        "{}°{}'{}.{}\"{}",
        degrees,
        minutes,
        seconds / 10,
        seconds % 10,
        hemisphere
    )
}

/// (緯度, 経度) の度分秒表記
pub fn format_dms(point: &GeoPoint) -> (String, String) {
    (
        decimal_to_dms(point.latitude, Axis::Latitude),
        decimal_to_dms(point.longitude, Axis::Longitude),
    )
}

/// 度分秒表記を十進度に戻す（S/Wは負）
pub fn parse_dms(text: &str) -> Option<f64> {
    let text = text.trim();
    let (degrees, rest) = text.split_once('°')?;
    let (minutes, rest) = rest.split_once('\'')?;
    let (seconds, hemisphere) = rest.split_once('"')?;

    let degrees: f64 = degrees.trim().parse().ok()?;
    let minutes: f64 = minutes.trim().parse().ok()?;
    let seconds: f64 = seconds.trim().parse().ok()?;
    if !(0.0..60.0).contains(&minutes) || !(0.0..60.0).contains(&seconds) {
        return None;
    }

    let value = degrees + minutes / 60.0 + seconds / 3600.0;
    match hemisphere.trim() {
        "N" | "E" => Some(value),
        "S" | "W" => Some(-value),
        _ => None,
    }
}
