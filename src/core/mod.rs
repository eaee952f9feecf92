// src/core/mod.rs

/// Data structures shared by every stage: the target, tool outcomes,
/// provenance records and the per-probe results.
pub mod models;

/// Static table of the external binaries and how to install them.
pub mod catalog;

/// Subprocess execution with timeouts.
pub mod runner;

/// The three probes (subdomains, ports, technologies).
pub mod scanner;

/// Prompt construction and the summarization API client.
pub mod report;
