//! Centralized constants for the exporter
//!
//! Environment variable names and defaults shared by the entry point and the
//! configuration loader.

// =============================================================================
// Environment
// =============================================================================

/// Node URLs are read from `STORJ_NODE_1_URL`, `STORJ_NODE_2_URL`, ...
pub const NODE_URL_PREFIX: &str = "STORJ_NODE_";
pub const NODE_URL_SUFFIX: &str = "_URL";

/// Overrides the listening port
pub const PORT_ENV: &str = "EXPORTER_PORT";

// =============================================================================
// Server
// =============================================================================

pub const DEFAULT_PORT: u16 = 8000;

pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Scrape endpoint path
pub const METRICS_PATH: &str = "/metrics";
