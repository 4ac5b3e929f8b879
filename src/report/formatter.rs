//! Report formatter implementation
//! Author: kartik4091
//! Created: 2025-06-05

use crate::error::{Error, Result};

use super::Report;

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    PlainText,
    Json,
}

/// Formats a report for the terminal or for machines
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn format(report: &Report, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::PlainText => Ok(Self::to_text(report)),
            ReportFormat::Json => Self::to_json(report),
        }
    }

    fn to_text(report: &Report) -> String {
        let mut output = String::new();
        for status in &report.progress {
            output.push_str(&format!("{}\n", status.message));
        }
        output.push_str(&format!("{}\n", report.status.message));

        if let Some(delivered) = &report.delivered {
            output.push_str(&format!("  Output: {}\n", delivered.path.display()));
            output.push_str(&format!("  Size:   {} bytes\n", delivered.size));
            output.push_str(&format!("  SHA256: {}\n", delivered.sha256));
        }
        if let Some(kind) = &report.failure {
            output.push_str(&format!("  Reason: {}\n", kind));
        }

        output
    }

    fn to_json(report: &Report) -> Result<String> {
        serde_json::to_string_pretty(report)
            .map_err(|e| Error::DeliveryError(format!("Serialization error: {}", e)))
    }
}
