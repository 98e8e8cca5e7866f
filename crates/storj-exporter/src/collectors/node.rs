//! Node-level metrics: identity, disk, bandwidth, lifecycle timestamps and
//! per-satellite standing.

use chrono::DateTime;
use node_api::models::{Bandwidth, DiskSpace, NodeSnapshot, SatelliteStatus};
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use tracing::{debug, warn};

use super::{Clients, Extract};
use crate::metrics::{GaugeDef, GaugeTable, Sample, SampleSink};

// =============================================================================
// Metric Table
// =============================================================================

const INFO: GaugeDef = GaugeDef::new(
    "storj_node_info",
    "Storj node info",
    &[
        "node_id",
        "wallet",
        "version",
        "up_to_date",
        "allowed_version",
        "quic_status",
        "configured_port",
    ],
);

const DISK_SPACE: GaugeDef = GaugeDef::new(
    "storj_total_diskspace_bytes",
    "Storj total diskspace metrics",
    &["node_id", "type"],
);

const BANDWIDTH: GaugeDef = GaugeDef::new(
    "storj_total_bandwidth_bytes",
    "Storj total bandwidth metrics",
    &["node_id", "type"],
);

const SATELLITE_STORAGE_USED: GaugeDef = GaugeDef::new(
    "storj_node_satellite_storage_used_bytes",
    "Storage used on behalf of the satellite as reported by the node",
    &["node_id", "satellite_id", "satellite_url"],
);

const SATELLITE_STATUS: GaugeDef = GaugeDef::new(
    "storj_node_satellite_status",
    "Node standing with the satellite, exactly one status is 1",
    &["node_id", "satellite_id", "status"],
);

const LAST_PINGED: GaugeDef = GaugeDef::new(
    "storj_node_last_pinged_timestamp",
    "Unix time the node was last pinged",
    &["node_id"],
);

const STARTED_AT: GaugeDef = GaugeDef::new(
    "storj_node_started_at_timestamp",
    "Unix time the node process started",
    &["node_id"],
);

const LAST_QUIC_PINGED: GaugeDef = GaugeDef::new(
    "storj_node_last_quic_pinged_timestamp",
    "Unix time the node was last pinged over QUIC",
    &["node_id"],
);

const DISK_SPACE_FIELDS: &[(&str, Extract<DiskSpace>)] = &[
    ("used", |d| d.used as f64),
    ("available", |d| d.available as f64),
    ("trash", |d| d.trash as f64),
    ("overused", |d| d.overused as f64),
];

const BANDWIDTH_FIELDS: &[(&str, Extract<Bandwidth>)] = &[
    ("used", |b| b.used as f64),
    ("available", |b| b.available as f64),
];

// =============================================================================
// Collector
// =============================================================================

/// Emits node status for every configured dashboard
pub struct NodeCollector {
    clients: Clients,
    table: GaugeTable,
}

impl NodeCollector {
    pub fn new(clients: Clients) -> prometheus::Result<Self> {
        let table = GaugeTable::new(&[
            &INFO,
            &DISK_SPACE,
            &BANDWIDTH,
            &SATELLITE_STORAGE_USED,
            &SATELLITE_STATUS,
            &LAST_PINGED,
            &STARTED_AT,
            &LAST_QUIC_PINGED,
        ])?;

        Ok(Self { clients, table })
    }

    /// Run one collection pass. Nodes that fail to answer are logged and left out.
    pub fn collect_samples(&self) -> Vec<Sample> {
        let mut sink = SampleSink::new();

        for client in self.clients.iter() {
            match client.node() {
                Ok(node) => project_node(&mut sink, client.node_id(), &node),
                Err(e) => warn!(node_id = client.node_id(), error = %e, "Failed to collect node metrics"),
            }
        }

        sink.into_samples()
    }
}

impl Collector for NodeCollector {
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

/// Map one node snapshot into samples, labelled with the client's node id
fn project_node(sink: &mut SampleSink, node_id: &str, node: &NodeSnapshot) {
    let up_to_date = node.up_to_date.to_string();
    sink.gauge(
        &INFO,
        &[
            node_id,
            &node.wallet,
            &node.version,
            &up_to_date,
            &node.allowed_version,
            &node.quic_status,
            &node.configured_port,
        ],
        1.0,
    );

    for &(kind, extract) in DISK_SPACE_FIELDS {
        sink.gauge(&DISK_SPACE, &[node_id, kind], extract(&node.disk_space));
    }

    for &(kind, extract) in BANDWIDTH_FIELDS {
        sink.gauge(&BANDWIDTH, &[node_id, kind], extract(&node.bandwidth));
    }

    for (def, raw) in [
        (&LAST_PINGED, &node.last_pinged),
        (&STARTED_AT, &node.started_at),
        (&LAST_QUIC_PINGED, &node.last_quic_pinged_at),
    ] {
        sink.gauge(def, &[node_id], unix_seconds(raw));
    }

    for satellite in &node.satellites {
        sink.gauge(
            &SATELLITE_STORAGE_USED,
            &[node_id, &satellite.id, &satellite.url],
            satellite.current_storage_used as f64,
        );

        for (status, value) in status_gauges(satellite.status()) {
            sink.gauge(&SATELLITE_STATUS, &[node_id, &satellite.id, status.as_str()], value);
        }
    }
}

/// One gauge per possible status, 1 for the current one and 0 for the rest
pub fn status_gauges(current: SatelliteStatus) -> [(SatelliteStatus, f64); 3] {
    SatelliteStatus::ALL.map(|status| (status, if status == current { 1.0 } else { 0.0 }))
}

/// Parse an RFC3339 timestamp into Unix seconds, falling back to 0
fn unix_seconds(raw: &str) -> f64 {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.timestamp() as f64,
        Err(e) => {
            debug!(value = raw, error = %e, "Unparsable node timestamp, reporting 0");
            0.0
        }
    }
}
