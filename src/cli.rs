// src/cli.rs

use crate::config::{ConfigError, DEFAULT_OUTPUT, DEFAULT_TOOL_TIMEOUT_SECS, ProviderOverrides, ScanConfig};
use crate::core::scanner::port_scanner::DEFAULT_PORTS;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// AI-powered recon agent: enumerates subdomains, scans ports, fingerprints
/// the web stack and asks an LLM to write up the findings.
#[derive(Debug, Parser)]
#[command(name = "vanguard-recon", version, about)]
pub struct Cli {
    /// Target domain to scan
    #[arg(short, long)]
    pub target: String,

    /// File the markdown report is written to (overwritten if present)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Comma separated ports for the port scan
    #[arg(short, long, value_delimiter = ',', default_value = DEFAULT_PORTS)]
    pub ports: Vec<u16>,

    /// Per-tool timeout in seconds; the port scan gets twice this
    #[arg(long, default_value_t = DEFAULT_TOOL_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Model name, overrides OPENAI_MODEL
    #[arg(short, long)]
    pub model: Option<String>,

    /// Dotenv file to load before reading OPENAI_* variables
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Timeout in seconds for the summarization request (default: none)
    #[arg(long)]
    pub api_timeout: Option<u64>,

    /// Run the probes and print the prompt instead of calling the API
    #[arg(long)]
    pub print_prompt: bool,
}

impl Cli {
    pub fn scan_config(&self) -> Result<ScanConfig, ConfigError> {
        ScanConfig::new(&self.target, &self.ports, self.timeout, self.output.clone())
    }

    pub fn provider_overrides(&self) -> ProviderOverrides {
        ProviderOverrides {
            model: self.model.clone(),
            request_timeout: self.api_timeout.map(Duration::from_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_classic_invocation() {
        let cli = Cli::try_parse_from(["vanguard-recon", "--target", "example.com"]).unwrap();

        assert_eq!(cli.output, PathBuf::from("recon_report.md"));
        assert_eq!(cli.ports, vec![80, 443, 8080, 8443, 22, 21, 3306]);
        assert_eq!(cli.timeout, 60);
        assert!(!cli.print_prompt);

        let scan = cli.scan_config().unwrap();
        assert_eq!(scan.ports, DEFAULT_PORTS);
    }

    #[test]
    fn target_is_required() {
        assert!(Cli::try_parse_from(["vanguard-recon"]).is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let cli = Cli::try_parse_from([
            "vanguard-recon",
            "-t",
            "example.com",
            "-o",
            "out.md",
            "--ports",
            "22,443",
            "--model",
            "gpt-4o-mini",
            "--api-timeout",
            "90",
        ])
        .unwrap();

        assert_eq!(cli.ports, vec![22, 443]);
        assert_eq!(cli.output, PathBuf::from("out.md"));
        let overrides = cli.provider_overrides();
        assert_eq!(overrides.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(overrides.request_timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(Cli::try_parse_from(["vanguard-recon", "-t", "example.com", "--ports", "80,99999"]).is_err());
    }
}
