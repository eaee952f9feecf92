// src/config.rs

use crate::core::models::Target;
use crate::core::scanner::port_scanner::format_ports;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "OPENAI_MODEL";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Low enough to keep reports stable between runs without making them deterministic.
pub const DEFAULT_TEMPERATURE: f64 = 0.3;
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_OUTPUT: &str = "recon_report.md";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("target must not be empty")]
    EmptyTarget,

    #[error("at least one port is required")]
    NoPorts,

    #[error("OPENAI_API_KEY is not set. Export it or put it in a .env file (see --env-file)")]
    MissingApiKey,

    #[error("failed to load env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Settings for the probe stages and the output file.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub target: Target,
    /// Comma separated, ready for nmap's `-p`.
    pub ports: String,
    /// Base per-tool timeout. The port scan doubles it.
    pub tool_timeout: Duration,
    pub output: PathBuf,
}

impl ScanConfig {
    pub fn new(target: &str, ports: &[u16], tool_timeout_secs: u64, output: PathBuf) -> Result<Self, ConfigError> {
        if ports.is_empty() {
            return Err(ConfigError::NoPorts);
        }
        Ok(Self {
            target: Target::parse(target)?,
            ports: format_ports(ports),
            tool_timeout: Duration::from_secs(tool_timeout_secs),
            output,
        })
    }
}

/// Connection settings for the chat-completion endpoint.
#[derive(Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f64,
    /// `None` means the request may wait indefinitely.
    pub request_timeout: Option<Duration>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Values given on the command line that take precedence over the environment.
#[derive(Debug, Default, Clone)]
pub struct ProviderOverrides {
    pub model: Option<String>,
    pub request_timeout: Option<Duration>,
}

impl ProviderConfig {
    /// Reads the provider settings from the process environment.
    pub fn from_env(overrides: ProviderOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F, overrides: ProviderOverrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get(API_KEY_ENV).ok_or(ConfigError::MissingApiKey)?;
        let model = overrides
            .model
            .or_else(|| get(MODEL_ENV))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = get(BASE_URL_ENV)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let config = Self {
            api_key,
            model,
            base_url,
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: overrides.request_timeout,
        };
        debug!(config = ?config, "Provider configuration resolved.");
        Ok(config)
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Loads dotenv variables into the process environment.
///
/// An explicit file must exist. Without one, a `.env` in the working
/// directory is loaded when present. Variables already set are kept.
pub fn load_env_file(path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|source| ConfigError::EnvFile { path: path.to_path_buf(), source })?;
            info!(path = %path.display(), "Loaded env file.");
        }
        None => match dotenvy::dotenv() {
            Ok(found) => info!(path = %found.display(), "Loaded env file."),
            Err(e) => debug!(error = %e, "No .env file loaded."),
        },
    }
    Ok(())
}
