//! Excelレポート出力（CLI版）
//!
//! 生成本体は bridge_geo_common::export::report_core

use crate::error::{BridgeGeoError, Result};
use bridge_geo_common::export::report_core::generate_report_buffer;
use bridge_geo_common::BatchReport;
use std::path::Path;

pub fn generate_excel(report: &BatchReport, output_path: &Path) -> Result<()> {
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let buffer = generate_report_buffer(report, &generated_at)
        .map_err(BridgeGeoError::ExcelGeneration)?;

    std::fs::write(output_path, buffer)
        .map_err(|e| BridgeGeoError::ExcelGeneration(format!("{}: {}", output_path.display(), e)))?;
    Ok(())
}
