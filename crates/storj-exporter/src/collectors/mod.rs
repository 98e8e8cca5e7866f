//! Prometheus collectors, one per dashboard endpoint family
//!
//! Each collector is a plain value registered into an explicit
//! [`prometheus::Registry`]. A scrape calls `collect`, which fetches fresh data
//! from every configured node and returns whatever could be gathered.

mod node;
mod payout;
mod satellite;

use node_api::NodeApiClient;
use std::sync::Arc;

pub use node::{NodeCollector, status_gauges};
pub use payout::PayoutCollector;
pub use satellite::SatelliteCollector;

/// Clients for every configured node, shared read-only by all collectors
pub type Clients = Arc<[NodeApiClient]>;

/// Pulls one gauge value out of a response struct
type Extract<T> = fn(&T) -> f64;

/// Build all three collectors over the same client list
pub fn register_all(registry: &prometheus::Registry, clients: &Clients) -> prometheus::Result<()> {
    registry.register(Box::new(NodeCollector::new(Arc::clone(clients))?))?;
    registry.register(Box::new(SatelliteCollector::new(Arc::clone(clients))?))?;
    registry.register(Box::new(PayoutCollector::new(Arc::clone(clients))?))?;
    Ok(())
}
