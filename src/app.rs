// src/app.rs

use crate::config::ScanConfig;
use crate::core::catalog;
use crate::core::models::{Evidence, Provenance, ScanReport};
use crate::core::report::prompt::build_prompt;
use crate::core::report::provider::Summarizer;
use crate::core::report::{compose_report, render_report_file};
use crate::core::runner::CommandRunner;
use crate::core::scanner::{run_port_scan, run_subdomain_scan, run_tech_scan};
use color_eyre::eyre::{Result, WrapErr};
use colored::Colorize;
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::{debug, info};

/// The pipeline stages, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Stage {
    #[strum(to_string = "Enumerating subdomains")]
    Subdomains,
    #[strum(to_string = "Scanning ports")]
    Ports,
    #[strum(to_string = "Detecting technologies")]
    Technologies,
    #[strum(to_string = "Analyzing results with AI")]
    Report,
}

impl Stage {
    /// Progress marker printed when the stage starts.
    pub fn marker(self) -> String {
        let probes = Stage::iter().filter(|s| s.is_probe()).count();
        match self {
            Stage::Report => format!("[*] {}...", self),
            probe => format!("[{}/{}] {}...", probe as usize + 1, probes, probe),
        }
    }

    fn is_probe(self) -> bool {
        !matches!(self, Stage::Report)
    }
}

/// Drives one recon run: probes in sequence, then the report.
pub struct App<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a ScanConfig,
}

impl<'a> App<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a ScanConfig) -> Self {
        Self { runner, config }
    }

    pub fn print_banner(&self) {
        println!("{}", format!("[*] Starting recon on: {}", self.config.target).cyan().bold());
        println!("{}", "[!] Ensure you have authorization to scan this target\n".yellow());
    }

    /// Runs the three probes one after the other. Never fails: a broken
    /// tool shows up as sentinel text in the corresponding result.
    pub async fn collect(&self) -> ScanReport {
        let target = &self.config.target;
        let deadline = self.config.tool_timeout;

        self.enter(Stage::Subdomains);
        let subdomains = run_subdomain_scan(self.runner, target, deadline).await;
        self.note_degraded(&subdomains.evidence);
        println!("      Found {} subdomains", subdomains.subdomains.len());

        self.enter(Stage::Ports);
        let ports = run_port_scan(self.runner, target, &self.config.ports, deadline).await;
        self.note_degraded(&ports.evidence);

        self.enter(Stage::Technologies);
        let technologies = run_tech_scan(self.runner, target, deadline).await;
        self.note_degraded(&technologies.evidence);

        let report = ScanReport { target: target.clone(), subdomains, ports, technologies };
        if let Ok(json) = serde_json::to_string(&report) {
            debug!(report = %json, "Probe stages finished.");
        }
        report
    }

    /// Full run: probes, summarization, then the report file.
    ///
    /// The file is only written once the summary is in hand, so a failed
    /// API call leaves any previous report untouched.
    pub async fn run(&self, summarizer: &dyn Summarizer) -> Result<String> {
        let report = self.collect().await;

        self.enter(Stage::Report);
        let body = compose_report(summarizer, &report)
            .await
            .wrap_err("summarization failed, no report was written")?;

        let content = render_report_file(&self.config.target, &body);
        tokio::fs::write(&self.config.output, &content)
            .await
            .wrap_err_with(|| format!("failed to write report to {}", self.config.output.display()))?;
        info!(path = %self.config.output.display(), bytes = content.len(), "Report written.");

        println!("\n{}", format!("[+] Report saved to: {}", self.config.output.display()).green().bold());
        println!("{}", body);
        Ok(body)
    }

    /// Dry run: probes, then the prompt is printed instead of sent.
    pub async fn preview(&self) -> String {
        let report = self.collect().await;
        let prompt = build_prompt(&report);
        println!("\n{}", "[*] Prompt that would be sent:".cyan());
        println!("{}", prompt);
        prompt
    }

    fn enter(&self, stage: Stage) {
        info!(stage = %stage, "Entering stage.");
        println!("{}", stage.marker());
    }

    fn note_degraded(&self, evidence: &Evidence) {
        let (message, replaced) = match &evidence.provenance {
            Provenance::Primary => return,
            Provenance::Fallback { replaced } => {
                (format!("      {} unavailable, used {} instead", replaced, evidence.tool), replaced)
            }
            Provenance::Placeholder { replaced } => (format!("      {} unavailable, no results", replaced), replaced),
        };
        println!("{}", message.yellow());
        if let Some(detail) = catalog::get_tool_detail(replaced) {
            println!("{}", format!("      install: {}", detail.install_hint).dimmed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{CURL, HTTPX, NMAP, NSLOOKUP, SUBFINDER};
    use crate::core::report::provider::testing::MockSummarizer;
    use crate::core::runner::testing::ScriptedRunner;
    use clap::Parser;
    use std::path::Path;
    use std::time::Duration;

    fn config_in(dir: &Path) -> ScanConfig {
        ScanConfig::new("example.com", &[80, 443], 60, dir.join("recon_report.md")).unwrap()
    }

    fn all_tools() -> ScriptedRunner {
        ScriptedRunner::new()
            .with_output(SUBFINDER, "www.example.com\napi.example.com\n")
            .with_output(NMAP, "80/tcp open http\n443/tcp open https\n")
            .with_output(HTTPX, "https://example.com [200] [Example] [Nginx]\n")
    }

    #[test]
    fn markers_number_probe_stages() {
        assert_eq!(Stage::Subdomains.marker(), "[1/3] Enumerating subdomains...");
        assert_eq!(Stage::Ports.marker(), "[2/3] Scanning ports...");
        assert_eq!(Stage::Technologies.marker(), "[3/3] Detecting technologies...");
        assert_eq!(Stage::Report.marker(), "[*] Analyzing results with AI...");
    }

    #[tokio::test]
    async fn report_file_is_title_plus_summary() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let runner = all_tools();
        let summarizer = MockSummarizer::with_body("## Summary\nTwo hosts, two open ports.\n\nRisk: Low");

        let body = App::new(&runner, &config).run(&summarizer).await.unwrap();

        let written = std::fs::read_to_string(&config.output).unwrap();
        assert_eq!(
            written,
            "# Recon Report: example.com\n\n## Summary\nTwo hosts, two open ports.\n\nRisk: Low"
        );
        assert_eq!(body, "## Summary\nTwo hosts, two open ports.\n\nRisk: Low");
        assert_eq!(summarizer.call_count(), 1);
    }

    #[tokio::test]
    async fn stages_run_in_order_with_their_timeouts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let runner = all_tools();

        App::new(&runner, &config).run(&MockSummarizer::with_body("ok")).await.unwrap();

        let calls = runner.calls();
        let programs: Vec<&str> = calls.iter().map(|(c, _)| c.program.as_str()).collect();
        assert_eq!(programs, vec![SUBFINDER, NMAP, HTTPX]);
        assert_eq!(calls[0].1, Duration::from_secs(60));
        assert_eq!(calls[1].1, Duration::from_secs(120));
        assert_eq!(calls[2].1, Duration::from_secs(60));
        assert_eq!(calls[1].0.args[2], "80,443");
    }

    #[tokio::test]
    async fn existing_file_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.output, "stale report that is much longer than the new one").unwrap();

        App::new(&all_tools(), &config).run(&MockSummarizer::with_body("fresh")).await.unwrap();

        assert_eq!(std::fs::read_to_string(&config.output).unwrap(), "# Recon Report: example.com\n\nfresh");
    }

    #[tokio::test]
    async fn summarizer_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let summarizer = MockSummarizer::failing();

        let result = App::new(&all_tools(), &config).run(&summarizer).await;

        assert!(result.is_err());
        assert_eq!(summarizer.call_count(), 1);
        assert!(!config.output.exists());
    }

    #[tokio::test]
    async fn missing_tools_degrade_without_stopping_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let runner = ScriptedRunner::new();
        let summarizer = MockSummarizer::with_body("degraded");

        App::new(&runner, &config).run(&summarizer).await.unwrap();

        assert_eq!(runner.programs(), vec![SUBFINDER, NSLOOKUP, NMAP, HTTPX, CURL]);
        let prompt = summarizer.last_prompt().unwrap();
        assert!(prompt.contains("Tool not found: nslookup. Install it first."));
        assert!(prompt.contains("nmap not installed. Target: example.com, Ports to check: 80,443"));
        assert!(prompt.contains("Tool not found: curl. Install it first."));
        assert!(prompt.contains("Source: none; nmap is not installed"));
        assert!(config.output.exists());
    }

    #[tokio::test]
    async fn largest_accepted_timeout_completes_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let cli = crate::cli::Cli::try_parse_from([
            "vanguard-recon",
            "--target",
            "example.com",
            "--timeout",
            "18446744073709551615",
            "--output",
            dir.path().join("recon_report.md").to_str().unwrap(),
        ])
        .unwrap();
        let config = cli.scan_config().unwrap();
        let runner = all_tools();

        App::new(&runner, &config).run(&MockSummarizer::with_body("ok")).await.unwrap();

        assert_eq!(runner.calls()[1].1, Duration::MAX);
        assert!(config.output.exists());
    }

    #[tokio::test]
    async fn report_title_repeats_the_target_as_typed() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScanConfig::new("Example.COM:8443", &[8443], 60, dir.path().join("recon_report.md")).unwrap();
        let runner = all_tools();

        App::new(&runner, &config).run(&MockSummarizer::with_body("b")).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&config.output).unwrap(),
            "# Recon Report: Example.COM:8443\n\nb"
        );
        let (nmap, _) = &runner.calls()[1];
        assert_eq!(nmap.args.last().map(String::as_str), Some("Example.COM:8443"));
    }

    #[tokio::test]
    async fn preview_builds_prompt_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let prompt = App::new(&all_tools(), &config).preview().await;

        assert!(prompt.contains("## Subdomains Found (2)"));
        assert!(prompt.contains("443/tcp open https"));
        assert!(!config.output.exists());
    }
}
