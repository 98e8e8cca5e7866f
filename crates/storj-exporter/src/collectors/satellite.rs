//! Per-satellite metrics: summaries, scores, latest daily usage, audit
//! windows and the price model.
//!
//! The dashboard reports daily storage, daily bandwidth and audit windows as
//! unordered arrays. Only the most recent entry of each is exported and
//! Prometheus builds the time series from successive scrapes.

use node_api::NodeApiClient;
use node_api::models::{AuditWindow, BandwidthDaily, PriceModel, SatelliteDetail, SatelliteSummary, StorageDaily};
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use std::iter;
use tracing::{debug, warn};

use super::{Clients, Extract};
use crate::latest::{latest, latest_by};
use crate::metrics::{GaugeDef, GaugeTable, Sample, SampleSink};

// =============================================================================
// Metric Table
// =============================================================================

const SATELLITE_LABELS: &[&str] = &["node_id", "satellite_id"];

const INFO: GaugeDef = GaugeDef::new(
    "storj_satellite_info",
    "Storj satellite information",
    &["node_id", "satellite_id", "satellite_url", "satellite_name"],
);

const SUMMARY_FIELDS: &[(GaugeDef, Extract<SatelliteDetail>)] = &[
    (
        GaugeDef::new(
            "storj_satellite_storage_summary_bytes",
            "Total amount of storage used by the node as reported by the satellite",
            SATELLITE_LABELS,
        ),
        |d| d.storage_summary,
    ),
    (
        GaugeDef::new(
            "storj_satellite_average_usage_bytes",
            "Average storage usage in bytes as reported by the satellite",
            SATELLITE_LABELS,
        ),
        |d| d.average_usage_bytes,
    ),
    (
        GaugeDef::new(
            "storj_satellite_bandwidth_summary_bytes",
            "Total bandwidth used by the node as reported by the satellite",
            SATELLITE_LABELS,
        ),
        |d| d.bandwidth_summary as f64,
    ),
    (
        GaugeDef::new(
            "storj_satellite_egress_summary_bytes",
            "Total egress bandwidth used by the node as reported by the satellite",
            SATELLITE_LABELS,
        ),
        |d| d.egress_summary as f64,
    ),
    (
        GaugeDef::new(
            "storj_satellite_ingress_summary_bytes",
            "Total ingress bandwidth used by the node as reported by the satellite",
            SATELLITE_LABELS,
        ),
        |d| d.ingress_summary as f64,
    ),
    (
        GaugeDef::new(
            "storj_satellite_current_storage_used_bytes",
            "Current storage used by the node as reported by the satellite",
            SATELLITE_LABELS,
        ),
        |d| d.current_storage_used as f64,
    ),
    (
        GaugeDef::new(
            "storj_satellite_audit_score",
            "Audit score of the node as reported by the satellite",
            SATELLITE_LABELS,
        ),
        |d| d.audits.audit_score,
    ),
    (
        GaugeDef::new(
            "storj_satellite_suspension_score",
            "Suspension score of the node as reported by the satellite",
            SATELLITE_LABELS,
        ),
        |d| d.audits.suspension_score,
    ),
    (
        GaugeDef::new(
            "storj_satellite_online_score",
            "Online score of the node as reported by the satellite",
            SATELLITE_LABELS,
        ),
        |d| d.audits.online_score,
    ),
    (
        GaugeDef::new(
            "storj_satellite_node_joined_timestamp",
            "Timestamp when the node joined the satellite",
            SATELLITE_LABELS,
        ),
        |d| d.node_joined_at.timestamp() as f64,
    ),
];

const DAILY_STORAGE: GaugeDef = GaugeDef::new(
    "storj_satellite_storage",
    "Storage used by the node as reported by the satellite",
    &["node_id", "satellite_id", "category"],
);

const DAILY_BANDWIDTH: GaugeDef = GaugeDef::new(
    "storj_satellite_bandwidth_bytes",
    "Bandwidth used by the node as reported by the satellite",
    &["node_id", "satellite_id", "type", "category"],
);

const AUDIT_STATUS: GaugeDef = GaugeDef::new(
    "storj_satellite_audit_status",
    "Current total and online audits as reported by the satellite",
    &["node_id", "satellite_id", "audit_type"],
);

const PRICE_MODEL: GaugeDef = GaugeDef::new(
    "storj_satellite_price_model",
    "Price model for the satellite",
    &["node_id", "satellite_id", "type"],
);

const STORAGE_FIELDS: &[(&str, Extract<StorageDaily>)] = &[
    ("at_rest_total", |s| s.at_rest_total),
    ("at_rest_total_bytes", |s| s.at_rest_total_bytes),
];

/// (type, category, value) for the latest bandwidth day
const BANDWIDTH_FIELDS: &[(&str, &str, Extract<BandwidthDaily>)] = &[
    ("egress", "repair", |b| b.egress.repair as f64),
    ("egress", "audit", |b| b.egress.audit as f64),
    ("egress", "usage", |b| b.egress.usage as f64),
    ("ingress", "repair", |b| b.ingress.repair as f64),
    ("ingress", "usage", |b| b.ingress.usage as f64),
    ("delete", "total", |b| b.delete as f64),
];

const AUDIT_FIELDS: &[(&str, Extract<AuditWindow>)] = &[
    ("online", |w| w.online_count as f64),
    ("total", |w| w.total_count as f64),
];

const PRICE_FIELDS: &[(&str, Extract<PriceModel>)] = &[
    ("egress_bandwidth", |p| p.egress_bandwidth as f64),
    ("repair_bandwidth", |p| p.repair_bandwidth as f64),
    ("audit_bandwidth", |p| p.audit_bandwidth as f64),
    ("disk_space", |p| p.disk_space as f64),
];

// =============================================================================
// Collector
// =============================================================================

/// Emits detailed statistics for every satellite of every configured node
pub struct SatelliteCollector {
    clients: Clients,
    table: GaugeTable,
}

impl SatelliteCollector {
    pub fn new(clients: Clients) -> prometheus::Result<Self> {
        let defs: Vec<&GaugeDef> = iter::once(&INFO)
            .chain(SUMMARY_FIELDS.iter().map(|(def, _)| def))
            .chain([&DAILY_STORAGE, &DAILY_BANDWIDTH, &AUDIT_STATUS, &PRICE_MODEL])
            .collect();

        Ok(Self {
            clients,
            table: GaugeTable::new(&defs)?,
        })
    }

    /// Run one collection pass over every node and satellite
    pub fn collect_samples(&self) -> Vec<Sample> {
        let mut sink = SampleSink::new();

        for client in self.clients.iter() {
            self.collect_node(&mut sink, client);
        }

        sink.into_samples()
    }

    fn collect_node(&self, sink: &mut SampleSink, client: &NodeApiClient) {
        let node = match client.node() {
            Ok(node) => node,
            Err(e) => {
                warn!(node_id = client.node_id(), error = %e, "Failed to list satellites");
                return;
            }
        };

        for satellite in &node.satellites {
            match client.satellite(&satellite.id) {
                Ok(detail) => project_satellite(sink, client.node_id(), satellite, &detail),
                Err(e) => warn!(
                    node_id = client.node_id(),
                    satellite_id = %satellite.id,
                    error = %e,
                    "Failed to collect satellite metrics"
                ),
            }
        }
    }
}

impl Collector for SatelliteCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.table.descs()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.table.families(&self.collect_samples())
    }
}

// =============================================================================
// Projection
// =============================================================================

fn project_satellite(sink: &mut SampleSink, node_id: &str, satellite: &SatelliteSummary, detail: &SatelliteDetail) {
    let satellite_id = satellite.id.as_str();

    sink.gauge(
        &INFO,
        &[node_id, satellite_id, &satellite.url, &detail.audits.satellite_name],
        1.0,
    );

    for (def, extract) in SUMMARY_FIELDS {
        sink.gauge(def, &[node_id, satellite_id], extract(detail));
    }

    // Zero-length intervals are placeholders for days still in progress
    match latest_by(&detail.storage_daily, |s| s.interval_start, |s| s.interval_in_hours > 0) {
        Some(day) => {
            for &(category, extract) in STORAGE_FIELDS {
                sink.gauge(&DAILY_STORAGE, &[node_id, satellite_id, category], extract(day));
            }
        }
        None => debug!(node_id, satellite_id, "No valid daily storage sample"),
    }

    match latest(&detail.bandwidth_daily, |b| b.interval_start) {
        Some(day) => {
            for &(kind, category, extract) in BANDWIDTH_FIELDS {
                sink.gauge(&DAILY_BANDWIDTH, &[node_id, satellite_id, kind, category], extract(day));
            }
        }
        None => debug!(node_id, satellite_id, "No daily bandwidth sample"),
    }

    match latest(&detail.audit_history.windows, |w| w.window_start) {
        Some(window) => {
            for &(audit_type, extract) in AUDIT_FIELDS {
                sink.gauge(&AUDIT_STATUS, &[node_id, satellite_id, audit_type], extract(window));
            }
        }
        None => debug!(node_id, satellite_id, "No audit history window"),
    }

    for &(kind, extract) in PRICE_FIELDS {
        sink.gauge(&PRICE_MODEL, &[node_id, satellite_id, kind], extract(&detail.price_model));
    }
}
