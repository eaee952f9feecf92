// src/main.rs

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use colored::Colorize;
use tracing::{error, info};

mod app;
mod cli;
mod config;
mod core;
mod logging;

use app::App;
use cli::Cli;
use config::{ConfigError, ProviderConfig};
use crate::core::report::provider::OpenAiSummarizer;
use crate::core::runner::SystemRunner;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Logging is diagnostic only; a read-only data dir must not stop a scan.
    match logging::initialize_logging() {
        Ok(path) => info!(log = %path.display(), "Logging initialized."),
        Err(e) => eprintln!("{}", format!("[!] File logging disabled: {}", e).yellow()),
    }

    config::load_env_file(cli.env_file.as_deref())?;
    let scan_config = cli.scan_config().wrap_err("invalid arguments")?;
    let runner = SystemRunner;
    let app = App::new(&runner, &scan_config);

    if cli.print_prompt {
        app.print_banner();
        app.preview().await;
        return Ok(());
    }

    // Checked before any probe runs so a missing key costs nothing.
    let provider_config = match preflight(ProviderConfig::from_env(cli.provider_overrides()))? {
        Preflight::Ready(config) => config,
        Preflight::Abort { code, message, hint } => {
            error!(code, "API key missing, aborting before any work.");
            eprintln!("{}", format!("[-] {}", message).red().bold());
            eprintln!("    {}", hint);
            std::process::exit(code);
        }
    };
    let summarizer = OpenAiSummarizer::new(provider_config)?;

    app.print_banner();
    app.run(&summarizer).await?;
    Ok(())
}

/// Exit status when the run cannot start for lack of credentials.
const EXIT_MISSING_KEY: i32 = 1;

/// Outcome of the startup credential check.
#[derive(Debug)]
enum Preflight {
    Ready(ProviderConfig),
    Abort { code: i32, message: String, hint: &'static str },
}

/// Turns a missing API key into an abort with a hint instead of an error
/// report. Other config errors pass through.
fn preflight(resolved: Result<ProviderConfig, ConfigError>) -> Result<Preflight, ConfigError> {
    match resolved {
        Ok(config) => Ok(Preflight::Ready(config)),
        Err(ConfigError::MissingApiKey) => Ok(Preflight::Abort {
            code: EXIT_MISSING_KEY,
            message: ConfigError::MissingApiKey.to_string(),
            hint: "export OPENAI_API_KEY=sk-... or pass --env-file path/to/.env",
        }),
        Err(e) => Err(e),
    }
}
