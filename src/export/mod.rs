pub mod excel;
pub mod json;

use crate::cli::ExportFormat;
use crate::error::Result;
use bridge_geo_common::BatchReport;
use std::path::{Path, PathBuf};

/// 既定の出力ファイル名（拡張子なし）
pub const DEFAULT_STEM: &str = "bridge_endpoints";

fn output_path_for_format(output: &Path, stem: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", stem, extension))
    } else {
        output.with_extension(extension)
    }
}

fn output_paths_for_both(output: &Path, stem: &str) -> (PathBuf, PathBuf) {
    if output.is_dir() || output.extension().is_none() {
        (
            output.join(format!("{}.xlsx", stem)),
            output.join(format!("{}.json", stem)),
        )
    } else {
        (output.with_extension("xlsx"), output.with_extension("json"))
    }
}

/// 出力したファイルのパスを返す
pub fn export_report(report: &BatchReport, format: &ExportFormat, output: &Path) -> Result<Vec<PathBuf>> {
    if output.extension().is_none() {
        std::fs::create_dir_all(output)?;
    } else if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let written = match format {
        ExportFormat::Excel => {
            let path = output_path_for_format(output, DEFAULT_STEM, "xlsx");
            excel::generate_excel(report, &path)?;
            vec![path]
        }
        ExportFormat::Json => {
            let path = output_path_for_format(output, DEFAULT_STEM, "json");
            json::write_json(report, &path)?;
            vec![path]
        }
        ExportFormat::Both => {
            let (excel_path, json_path) = output_paths_for_both(output, DEFAULT_STEM);
            excel::generate_excel(report, &excel_path)?;
            json::write_json(report, &json_path)?;
            vec![excel_path, json_path]
        }
    };

    Ok(written)
}
