// src/core/models.rs

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Lowercase marker that flags a probe's output as "tool unavailable".
pub const NOT_FOUND_MARKER: &str = "not found";

// --- Target ---

/// The domain every probe runs against.
///
/// Only presence is enforced. The trimmed input is kept as typed for the
/// report title; probes get the authority part when the input was pasted as
/// an http(s) URL (`https://Example.com:8443/login` scans `Example.com:8443`),
/// and the input itself otherwise. Case and port are never touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    input: String,
    host: String,
}

impl Target {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let input = raw.trim();
        if input.is_empty() {
            return Err(ConfigError::EmptyTarget);
        }

        let host = authority_of(input).unwrap_or(input);
        Ok(Self { input: input.to_string(), host: host.to_string() })
    }

    /// What the probes are pointed at.
    pub fn as_str(&self) -> &str {
        &self.host
    }

    /// The target exactly as the caller supplied it, minus surrounding blanks.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Authority slice of an http(s) URL, taken from the input text so that
/// nothing is normalized. `None` for anything else, including `host:port`.
fn authority_of(input: &str) -> Option<&str> {
    let url = Url::parse(input).ok()?;
    if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
        return None;
    }
    let (_, rest) = input.split_once("://")?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    let authority = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    (!authority.is_empty()).then_some(authority)
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.input)
    }
}

// --- Tool Execution Models ---

/// Outcome of a single external tool invocation.
///
/// The `Display` rendering is what ends up in the report: the captured text
/// for a completed run, a sentinel sentence for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolOutput {
    /// The process exited. Holds stdout, or stderr when stdout was empty.
    Completed(String),
    /// The executable could not be located.
    Missing { tool: String },
    /// The process ran past its deadline and was killed.
    TimedOut { secs: u64 },
    /// Spawning failed for any other reason.
    Failed { tool: String, reason: String },
}

impl ToolOutput {
    /// True when a probe should switch to its fallback.
    ///
    /// A missing binary always qualifies. Any other outcome qualifies only
    /// when its text mentions "not found", which also covers wrapper scripts
    /// that print `command not found` and exit normally.
    pub fn signals_unavailable(&self) -> bool {
        match self {
            ToolOutput::Missing { .. } => true,
            other => other.to_string().to_lowercase().contains(NOT_FOUND_MARKER),
        }
    }

    pub fn availability(&self) -> Availability {
        match self {
            ToolOutput::Completed(text) if text.trim().is_empty() => Availability::Empty,
            ToolOutput::Completed(_) => Availability::Collected,
            ToolOutput::Missing { .. } => Availability::ToolMissing,
            ToolOutput::TimedOut { .. } => Availability::TimedOut,
            ToolOutput::Failed { .. } => Availability::Failed,
        }
    }

    /// Consumes the outcome and returns its report text.
    pub fn into_text(self) -> String {
        match self {
            ToolOutput::Completed(text) => text,
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolOutput::Completed(text) => f.write_str(text),
            ToolOutput::Missing { tool } => write!(f, "Tool not found: {}. Install it first.", tool),
            ToolOutput::TimedOut { secs } => write!(f, "Command timed out after {}s", secs),
            ToolOutput::Failed { tool, reason } => write!(f, "Failed to run {}: {}", tool, reason),
        }
    }
}

// --- Provenance Models ---

/// What the final text of a probe actually is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    /// The tool ran and printed something.
    Collected,
    /// The tool ran and printed nothing.
    Empty,
    ToolMissing,
    TimedOut,
    Failed,
}

/// Which command produced a probe's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    Primary,
    /// The primary tool (named) was unavailable and the fallback ran instead.
    Fallback { replaced: String },
    /// Nothing ran successfully; the text is a generated placeholder.
    Placeholder { replaced: String },
}

/// Provenance record attached to every probe result, so that "found
/// nothing" and "could not look" stay distinguishable downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub tool: String,
    pub provenance: Provenance,
    pub availability: Availability,
}

impl Evidence {
    pub fn primary(tool: &str, output: &ToolOutput) -> Self {
        Self {
            tool: tool.to_string(),
            provenance: Provenance::Primary,
            availability: output.availability(),
        }
    }

    pub fn fallback(tool: &str, replaced: &str, output: &ToolOutput) -> Self {
        Self {
            tool: tool.to_string(),
            provenance: Provenance::Fallback { replaced: replaced.to_string() },
            availability: output.availability(),
        }
    }

    pub fn placeholder(replaced: &str) -> Self {
        Self {
            tool: replaced.to_string(),
            provenance: Provenance::Placeholder { replaced: replaced.to_string() },
            availability: Availability::ToolMissing,
        }
    }
}

// --- Probe Result Models ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubdomainResults {
    /// Non-empty trimmed lines, in tool output order, duplicates kept.
    pub subdomains: Vec<String>,
    pub evidence: Evidence,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortScanResults {
    /// The comma separated port list that was requested.
    pub ports: String,
    pub output: String,
    pub evidence: Evidence,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechResults {
    pub url: String,
    pub output: String,
    pub evidence: Evidence,
}

// --- Main Report ---

/// Everything the probes collected for one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub target: Target,
    pub subdomains: SubdomainResults,
    pub ports: PortScanResults,
    pub technologies: TechResults,
}
