//! Response types mirroring the dashboard's JSON documents
//!
//! Every struct decodes leniently: missing or `null` fields fall back to zero values so a
//! dashboard that omits a section still produces a usable snapshot.

mod de;
mod node;
mod payout;
mod satellite;

pub use node::{Bandwidth, DiskSpace, NodeSnapshot, SatelliteStatus, SatelliteSummary};
pub use payout::{PayoutPeriod, PayoutSnapshot};
pub use satellite::{
    AuditHistory, AuditWindow, Audits, BandwidthDaily, Egress, Ingress, PriceModel, SatelliteDetail, StorageDaily,
};
