//! Structured (JSON) export and its reader.

use super::ExportError;
use crate::model::application::ApplicationRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredExport {
    pub export_date: DateTime<Utc>,
    pub total_applications: usize,
    pub applications: Vec<ApplicationRecord>,
}

/// Renders a pretty-printed structured export.
pub fn to_json(records: &[ApplicationRecord], now: DateTime<Utc>) -> Result<String, ExportError> {
    let document = StructuredExport {
        export_date: now,
        total_applications: records.len(),
        applications: records.to_vec(),
    };
    serde_json::to_string_pretty(&document).map_err(ExportError::Serialize)
}

/// Reads a structured export back.
pub fn parse_json_export(content: &str) -> Result<StructuredExport, ExportError> {
    serde_json::from_str(content).map_err(ExportError::Parse)
}
