// src/core/report/mod.rs

pub mod prompt;
pub mod provider;

use crate::core::models::{ScanReport, Target};
use self::prompt::build_prompt;
use self::provider::{SummaryError, Summarizer};
use tracing::info;

/// Sends the scan results to the summarizer and returns its markdown verbatim.
///
/// Exactly one request is made. Any failure is handed back to the caller
/// untouched; there is no retry.
pub async fn compose_report(summarizer: &dyn Summarizer, report: &ScanReport) -> Result<String, SummaryError> {
    let prompt = build_prompt(report);
    info!(model = summarizer.model_name(), target = %report.target, "Composing report.");
    summarizer.summarize(&prompt).await
}

/// The exact content of the report file.
pub fn render_report_file(target: &Target, body: &str) -> String {
    format!("# Recon Report: {}\n\n{}", target, body)
}
