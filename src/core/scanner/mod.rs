// src/core/scanner/mod.rs

// Each probe wraps one external tool plus its fallback. The probes are
// independent of each other; the order they run in is decided by `app`.
pub mod port_scanner;
pub mod subdomain_scanner;
pub mod tech_scanner;

pub use self::port_scanner::run_port_scan;
pub use self::subdomain_scanner::run_subdomain_scan;
pub use self::tech_scanner::run_tech_scan;
