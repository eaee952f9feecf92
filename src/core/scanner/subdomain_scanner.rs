// src/core/scanner/subdomain_scanner.rs

use tracing::{debug, info, warn};

use crate::core::catalog::{NSLOOKUP, SUBFINDER};
use crate::core::models::{Evidence, SubdomainResults, Target};
use crate::core::runner::{CommandRunner, ToolCommand};
use std::time::Duration;

/// Enumerates subdomains of the target.
///
/// Runs `subfinder` in silent mode first. When it is unavailable the probe
/// falls back to a plain `nslookup` of the target, whose lines end up in the
/// list as-is: they are not subdomains, and the attached `Evidence` is the
/// only thing telling the two cases apart.
///
/// # Arguments
/// * `runner` - Executes the external commands.
/// * `target` - The domain to enumerate.
/// * `deadline` - Per-command timeout.
pub async fn run_subdomain_scan(
    runner: &dyn CommandRunner,
    target: &Target,
    deadline: Duration,
) -> SubdomainResults {
    info!(target = %target, "Starting subdomain enumeration.");

    let primary = ToolCommand::new(SUBFINDER).args(["-d", target.as_str(), "-silent"]);
    let output = runner.run(&primary, deadline).await;

    let (output, evidence) = if output.signals_unavailable() {
        warn!(tool = SUBFINDER, fallback = NSLOOKUP, "Subdomain enumerator unavailable, falling back to DNS lookup.");
        let fallback = ToolCommand::new(NSLOOKUP).arg(target.as_str());
        let output = runner.run(&fallback, deadline).await;
        let evidence = Evidence::fallback(NSLOOKUP, SUBFINDER, &output);
        (output, evidence)
    } else {
        let evidence = Evidence::primary(SUBFINDER, &output);
        (output, evidence)
    };

    let subdomains = parse_subdomain_lines(&output.into_text());
    info!(count = subdomains.len(), source = %evidence.tool, "Subdomain enumeration finished.");

    SubdomainResults { subdomains, evidence }
}

/// Splits raw tool output into non-empty trimmed lines, keeping order and
/// duplicates.
pub fn parse_subdomain_lines(raw: &str) -> Vec<String> {
    let lines: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();
    debug!(lines = lines.len(), "Parsed subdomain output.");
    lines
}
