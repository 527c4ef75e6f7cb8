use crate::error::Result;
use bridge_geo_common::BatchReport;
use std::path::Path;

pub fn write_json(report: &BatchReport, output_path: &Path) -> Result<()> {
    report.save_json(output_path)?;
    Ok(())
}
