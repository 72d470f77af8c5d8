//! JSON export of a receipt summary
//!
//! The document carries a schema version so consumers can detect format
//! changes.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FairshareError, FairshareResult};
use crate::models::ReceiptItem;
use crate::services::receipt::ReceiptSnapshot;
use crate::services::summary::ReceiptSummary;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A receipt summary together with the lines and claims behind it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    /// Application version that created the export
    pub app_version: String,
    pub summary: ReceiptSummary,
    /// Lines with their claims attached
    pub items: Vec<ReceiptItem>,
}

impl SummaryExport {
    pub fn new(snapshot: &ReceiptSnapshot, summary: ReceiptSummary) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            summary,
            items: snapshot.items.clone(),
        }
    }
}

/// Write the export as JSON
pub fn export_summary_json<W: Write>(
    export: &SummaryExport,
    writer: W,
    pretty: bool,
) -> FairshareResult<()> {
    let result = if pretty {
        serde_json::to_writer_pretty(writer, export)
    } else {
        serde_json::to_writer(writer, export)
    };
    result.map_err(|e| FairshareError::Export(e.to_string()))
}
