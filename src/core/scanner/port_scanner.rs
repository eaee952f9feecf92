// src/core/scanner/port_scanner.rs

use tracing::{info, warn};

use crate::core::catalog::NMAP;
use crate::core::models::{Evidence, PortScanResults, Target};
use crate::core::runner::{CommandRunner, ToolCommand};
use std::time::Duration;

/// Ports checked when the caller does not pass `--ports`.
pub const DEFAULT_PORTS: &str = "80,443,8080,8443,22,21,3306";

/// Port scans are slower than the other probes and get this many times the
/// base timeout.
const PORT_SCAN_TIMEOUT_FACTOR: u32 = 2;

/// Joins a port list into nmap's `-p` syntax.
pub fn format_ports(ports: &[u16]) -> String {
    ports.iter().map(u16::to_string).collect::<Vec<_>>().join(",")
}

/// Scans the given ports with `nmap`, reporting open ports only.
///
/// There is no fallback scanner. When nmap is unavailable the result is a
/// placeholder sentence naming the target and the ports that would have
/// been checked.
pub async fn run_port_scan(
    runner: &dyn CommandRunner,
    target: &Target,
    ports: &str,
    base_deadline: Duration,
) -> PortScanResults {
    let deadline = base_deadline.saturating_mul(PORT_SCAN_TIMEOUT_FACTOR);
    info!(target = %target, ports, timeout_secs = deadline.as_secs(), "Starting port scan.");

    let command = ToolCommand::new(NMAP).args(["-Pn", "-p", ports, "--open", target.as_str()]);
    let output = runner.run(&command, deadline).await;

    if output.signals_unavailable() {
        warn!(tool = NMAP, "Port scanner unavailable, reporting placeholder.");
        return PortScanResults {
            ports: ports.to_string(),
            output: format!("nmap not installed. Target: {}, Ports to check: {}", target, ports),
            evidence: Evidence::placeholder(NMAP),
        };
    }

    let evidence = Evidence::primary(NMAP, &output);
    info!(availability = ?evidence.availability, "Port scan finished.");
    PortScanResults { ports: ports.to_string(), output: output.into_text(), evidence }
}
