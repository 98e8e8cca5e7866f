//! Prometheus exporter for storage node dashboards
//!
//! Polls each configured node's local dashboard API on every scrape and
//! republishes node status, payout estimates and per-satellite statistics as
//! labelled gauges.

pub mod collectors;
pub mod config;
pub mod constants;
mod latest;
pub mod metrics;
pub mod server;

pub use collectors::{Clients, NodeCollector, PayoutCollector, SatelliteCollector};
pub use config::Config;
