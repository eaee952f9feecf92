//! Static catalog of the external tools the probes drive.
//!
//! Every binary the crate may spawn is listed here with the role it plays
//! and how to install it. Keeping this data-driven means the logging, the
//! terminal hints and the report provenance notes all describe a tool the
//! same way.

use std::fmt;

/// The reconnaissance concern a tool covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ToolCategory {
    /// Passive subdomain discovery.
    Subdomains,
    /// Plain DNS resolution, used when subdomain discovery is unavailable.
    Dns,
    /// TCP port scanning.
    Ports,
    /// HTTP technology fingerprinting.
    Fingerprint,
    /// Generic HTTP client, used when fingerprinting is unavailable.
    Http,
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolCategory::Subdomains => write!(f, "subdomain enumeration"),
            ToolCategory::Dns => write!(f, "DNS lookup"),
            ToolCategory::Ports => write!(f, "port scan"),
            ToolCategory::Fingerprint => write!(f, "technology fingerprinting"),
            ToolCategory::Http => write!(f, "HTTP header fetch"),
        }
    }
}

/// Everything the crate knows about one external binary.
pub struct ToolDetail {
    /// Executable name as looked up on `PATH`.
    pub binary: &'static str,
    pub category: ToolCategory,
    /// One-line install instruction shown when the binary is missing.
    pub install_hint: &'static str,
}

pub const SUBFINDER: &str = "subfinder";
pub const NSLOOKUP: &str = "nslookup";
pub const NMAP: &str = "nmap";
pub const HTTPX: &str = "httpx";
pub const CURL: &str = "curl";

static TOOLS: &[ToolDetail] = &[
    ToolDetail {
        binary: SUBFINDER,
        category: ToolCategory::Subdomains,
        install_hint: "go install -v github.com/projectdiscovery/subfinder/v2/cmd/subfinder@latest",
    },
    ToolDetail {
        binary: NSLOOKUP,
        category: ToolCategory::Dns,
        install_hint: "install your distribution's dnsutils / bind-utils package",
    },
    ToolDetail {
        binary: NMAP,
        category: ToolCategory::Ports,
        install_hint: "install nmap from https://nmap.org/download or your package manager",
    },
    ToolDetail {
        binary: HTTPX,
        category: ToolCategory::Fingerprint,
        install_hint: "go install -v github.com/projectdiscovery/httpx/cmd/httpx@latest",
    },
    ToolDetail {
        binary: CURL,
        category: ToolCategory::Http,
        install_hint: "install curl from your package manager",
    },
];

/// Looks up a tool by executable name.
pub fn get_tool_detail(binary: &str) -> Option<&'static ToolDetail> {
    TOOLS.iter().find(|t| t.binary == binary)
}

/// Human description of a tool, e.g. `nmap (port scan)`.
pub fn describe(binary: &str) -> String {
    match get_tool_detail(binary) {
        Some(detail) => format!("{} ({})", detail.binary, detail.category),
        None => binary.to_string(),
    }
}
