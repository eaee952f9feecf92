// src/core/scanner/tech_scanner.rs

use tracing::{info, warn};

use crate::core::catalog::{CURL, HTTPX};
use crate::core::models::{Evidence, Target, TechResults};
use crate::core::runner::{CommandRunner, ToolCommand};
use std::time::Duration;

/// Fingerprints the web stack behind `https://<target>`.
///
/// `httpx` is asked for the page title, detected technologies and status
/// code. Without it, the raw response headers from `curl -sI` stand in as
/// the signal.
pub async fn run_tech_scan(
    runner: &dyn CommandRunner,
    target: &Target,
    deadline: Duration,
) -> TechResults {
    let url = format!("https://{}", target);
    info!(url = %url, "Starting technology detection.");

    let primary = ToolCommand::new(HTTPX).args([
        "-u",
        url.as_str(),
        "-title",
        "-tech-detect",
        "-status-code",
        "-silent",
    ]);
    let output = runner.run(&primary, deadline).await;

    let (output, evidence) = if output.signals_unavailable() {
        warn!(tool = HTTPX, fallback = CURL, "Fingerprinting tool unavailable, falling back to response headers.");
        let fallback = ToolCommand::new(CURL).args(["-sI", url.as_str()]);
        let output = runner.run(&fallback, deadline).await;
        let evidence = Evidence::fallback(CURL, HTTPX, &output);
        (output, evidence)
    } else {
        let evidence = Evidence::primary(HTTPX, &output);
        (output, evidence)
    };

    info!(source = %evidence.tool, availability = ?evidence.availability, "Technology detection finished.");
    TechResults { url, output: output.into_text(), evidence }
}
