//! Export core modules shared by the CLI wrappers.

#[cfg(feature = "excel")]
pub mod report_core;
