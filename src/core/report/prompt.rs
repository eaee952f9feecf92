// src/core/report/prompt.rs

use crate::core::catalog;
use crate::core::models::{Availability, Evidence, Provenance, ScanReport};

/// How many subdomains are listed in the prompt. The count line always
/// states the full number.
pub const MAX_PROMPT_SUBDOMAINS: usize = 20;

/// Marker used in place of the subdomain list when nothing was discovered.
pub const NO_SUBDOMAINS: &str = "None found";

/// What the analyst is asked to produce, in order.
static REPORT_INSTRUCTIONS: &[&str] = &[
    "Summary of findings",
    "Potential attack surface",
    "Recommended next steps for authorized testing",
    "Risk assessment (Low/Medium/High/Critical)",
];

/// Builds the analyst prompt for one scan.
pub fn build_prompt(report: &ScanReport) -> String {
    let subdomains = &report.subdomains.subdomains;
    let subs_text = if subdomains.is_empty() {
        NO_SUBDOMAINS.to_string()
    } else {
        subdomains.iter().take(MAX_PROMPT_SUBDOMAINS).cloned().collect::<Vec<_>>().join("\n")
    };

    let instructions = REPORT_INSTRUCTIONS
        .iter()
        .enumerate()
        .map(|(i, instruction)| format!("{}. {}", i + 1, instruction))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a cybersecurity reconnaissance analyst. Analyze these results for {target}:\n\n\
         ## Subdomains Found ({count})\n\
         _{subdomain_note}_\n\
         {subs_text}\n\n\
         ## Port Scan Results\n\
         _{port_note}_\n\
         {port_output}\n\n\
         ## Technology Detection\n\
         _{tech_note}_\n\
         {tech_output}\n\n\
         Provide:\n\
         {instructions}\n\n\
         Where a source note says a tool was unavailable or produced nothing, \
         treat that area as unknown rather than as evidence of absence.\n\
         Format as a professional recon report in markdown.",
        target = report.target,
        count = subdomains.len(),
        subdomain_note = provenance_note(&report.subdomains.evidence),
        port_note = provenance_note(&report.ports.evidence),
        port_output = report.ports.output,
        tech_note = provenance_note(&report.technologies.evidence),
        tech_output = report.technologies.output,
    )
}

/// One-line statement of where a section's data came from.
pub fn provenance_note(evidence: &Evidence) -> String {
    let state = match evidence.availability {
        Availability::Collected => "output collected",
        Availability::Empty => "the tool ran but produced no output",
        Availability::ToolMissing => "the tool is not installed, results are missing",
        Availability::TimedOut => "the tool timed out, results are missing",
        Availability::Failed => "the tool could not be started, results are missing",
    };

    match &evidence.provenance {
        Provenance::Primary => format!("Source: {}; {}.", catalog::describe(&evidence.tool), state),
        Provenance::Fallback { replaced } => format!(
            "Source: {} as a fallback because {} is unavailable; {}.",
            catalog::describe(&evidence.tool),
            replaced,
            state
        ),
        Provenance::Placeholder { replaced } => {
            format!("Source: none; {} is not installed, so no scan was performed.", replaced)
        }
    }
}
