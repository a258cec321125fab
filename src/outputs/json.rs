//! JSON output for reports and sessions.
//!
//! # Output Structure
//!
//! With `--json-output-dir`, every successful analysis is written to its own file:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── 142501_1.json
//!     └── 142519_2.json
//! ```
//!
//! File names are the report's UTC time and its position in the session.

use serde::Serialize;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

use crate::history::SessionHistory;
use crate::models::{AnalysisReport, HistoryEntry};

/// Everything printed by `--format json` at the end of a session.
#[derive(Debug, Serialize)]
pub struct SessionOutput<'a> {
    pub reports: &'a [AnalysisReport],
    /// Newest first.
    pub history: Vec<&'a HistoryEntry>,
}

impl<'a> SessionOutput<'a> {
    pub fn new(reports: &'a [AnalysisReport], history: &'a SessionHistory) -> Self {
        Self {
            reports,
            history: history.newest_first().collect(),
        }
    }
}

pub fn session_to_json(reports: &[AnalysisReport], history: &SessionHistory) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SessionOutput::new(reports, history))
}

/// Write one report to `{json_output_dir}/{date}/{HHMMSS}_{index}.json`.
///
/// Returns the path written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, index = index))]
pub async fn write_report(
    report: &AnalysisReport,
    index: usize,
    json_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    let full_json_dir = format!(
        "{}/{}",
        json_output_dir.trim_end_matches('/'),
        report.analyzed_at.date_naive()
    );
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(%full_json_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let output_json_filename = format!(
        "{}/{}_{}.json",
        full_json_dir,
        report.analyzed_at.format("%H%M%S"),
        index
    );
    fs::write(&output_json_filename, json).await?;
    info!(path = %output_json_filename, "Wrote report JSON");

    Ok(output_json_filename)
}
