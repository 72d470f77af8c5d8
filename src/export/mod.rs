//! Export of receipt summaries
//!
//! - CSV: one row per member total (spreadsheet-compatible)
//! - JSON: the full summary with every line and claim
//! - YAML: the same document, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::export_member_totals_csv;
pub use json::{export_summary_json, SummaryExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_summary_yaml;
