//! Payout estimate metrics for the current and previous month

use node_api::models::{PayoutPeriod, PayoutSnapshot};
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use std::iter;
use tracing::warn;

use super::{Clients, Extract};
use crate::metrics::{GaugeDef, GaugeTable, Sample, SampleSink};

const PERIOD_LABELS: &[&str] = &["node_id", "period"];

/// One gauge per payout field. Amounts stay in cents as reported; the held rate
/// is converted from a fraction to a percentage.
const PERIOD_FIELDS: &[(GaugeDef, Extract<PayoutPeriod>)] = &[
    (
        GaugeDef::new(
            "storj_payout_egress_bandwidth_bytes",
            "Egress bandwidth used by the node for payout calculation",
            PERIOD_LABELS,
        ),
        |p| p.egress_bandwidth as f64,
    ),
    (
        GaugeDef::new(
            "storj_payout_egress_bandwidth_cents",
            "Payout for the egress bandwidth used in cents",
            PERIOD_LABELS,
        ),
        |p| p.egress_bandwidth_payout,
    ),
    (
        GaugeDef::new(
            "storj_payout_egress_repair_audit_bytes",
            "Egress bandwidth used for repairs and audits in payout calculation",
            PERIOD_LABELS,
        ),
        |p| p.egress_repair_audit as f64,
    ),
    (
        GaugeDef::new(
            "storj_payout_egress_repair_audit_cents",
            "Payout for the egress bandwidth used for repairs and audits in cents",
            PERIOD_LABELS,
        ),
        |p| p.egress_repair_audit_payout,
    ),
    (
        GaugeDef::new(
            "storj_payout_disk_space_bytes",
            "Disk space used by the node for payout calculation",
            PERIOD_LABELS,
        ),
        |p| p.disk_space,
    ),
    (
        GaugeDef::new(
            "storj_payout_disk_space_cents",
            "Payout for the disk space used in cents",
            PERIOD_LABELS,
        ),
        |p| p.disk_space_payout,
    ),
    (
        GaugeDef::new(
            "storj_payout_held_rate",
            "Percentage of payout held back by the network",
            PERIOD_LABELS,
        ),
        |p| p.held_rate * 100.0,
    ),
    (
        GaugeDef::new("storj_payout_total_cents", "Total payout for the node in cents", PERIOD_LABELS),
        |p| p.payout,
    ),
    (
        GaugeDef::new(
            "storj_payout_held_cents",
            "Total amount held back by the network in cents",
            PERIOD_LABELS,
        ),
        |p| p.held,
    ),
];

const CURRENT_MONTH_EXPECTATIONS: GaugeDef = GaugeDef::new(
    "storj_payout_current_month_expectations_cents",
    "Expected payout for the current month in cents",
    &["node_id"],
);

/// Emits payout estimates for every configured dashboard
pub struct PayoutCollector {
    clients: Clients,
    table: GaugeTable,
}

impl PayoutCollector {
    pub fn new(clients: Clients) -> prometheus::Result<Self> {
        let defs: Vec<&GaugeDef> = PERIOD_FIELDS
            .iter()
            .map(|(def, _)| def)
            .chain(iter::once(&CURRENT_MONTH_EXPECTATIONS))
            .collect();

        Ok(Self {
            clients,
            table: GaugeTable::new(&defs)?,
        })
    }

    /// Run one collection pass over all nodes
    pub fn collect_samples(&self) -> Vec<Sample> {
        let mut sink = SampleSink::new();

        for client in self.clients.iter() {
            match client.payout() {
                Ok(payout) => project_payout(&mut sink, client.node_id(), &payout),
                Err(e) => warn!(node_id = client.node_id(), error = %e, "Failed to collect payout metrics"),
            }
        }

        sink.into_samples()
    }
}

impl Collector for PayoutCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.table.descs()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.table.families(&self.collect_samples())
    }
}

fn project_payout(sink: &mut SampleSink, node_id: &str, payout: &PayoutSnapshot) {
    for (period, data) in [("current", &payout.current_month), ("previous", &payout.previous_month)] {
        for (def, extract) in PERIOD_FIELDS {
            sink.gauge(def, &[node_id, period], extract(data));
        }
    }

    sink.gauge(
        &CURRENT_MONTH_EXPECTATIONS,
        &[node_id],
        payout.current_month_expectations,
    );
}
