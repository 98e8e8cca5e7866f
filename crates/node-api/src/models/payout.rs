use serde::Deserialize;

use super::de::null_default;

/// Payout estimate from `GET /api/sno/estimated-payout`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PayoutSnapshot {
    #[serde(deserialize_with = "null_default")]
    pub current_month: PayoutPeriod,
    #[serde(deserialize_with = "null_default")]
    pub previous_month: PayoutPeriod,
    /// Expected payout for the whole current month, in cents
    pub current_month_expectations: f64,
}

/// One month of payout data. Amounts are in cents, usage in bytes.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PayoutPeriod {
    pub egress_bandwidth: i64,
    pub egress_bandwidth_payout: f64,
    pub egress_repair_audit: i64,
    pub egress_repair_audit_payout: f64,
    pub disk_space: f64,
    pub disk_space_payout: f64,
    /// Fraction (0..1) of the payout held back by the network
    pub held_rate: f64,
    pub payout: f64,
    pub held: f64,
}
