use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::de::null_default;

/// Per-satellite statistics from `GET /api/sno/satellite/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SatelliteDetail {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    /// Daily storage samples, unordered
    #[serde(deserialize_with = "null_default")]
    pub storage_daily: Vec<StorageDaily>,
    /// Daily bandwidth samples, unordered
    #[serde(deserialize_with = "null_default")]
    pub bandwidth_daily: Vec<BandwidthDaily>,
    pub storage_summary: f64,
    pub average_usage_bytes: f64,
    pub bandwidth_summary: i64,
    pub egress_summary: i64,
    pub ingress_summary: i64,
    pub current_storage_used: i64,
    #[serde(deserialize_with = "null_default")]
    pub audits: Audits,
    #[serde(deserialize_with = "null_default")]
    pub audit_history: AuditHistory,
    #[serde(deserialize_with = "null_default")]
    pub price_model: PriceModel,
    #[serde(deserialize_with = "null_default")]
    pub node_joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageDaily {
    /// Byte-hours stored during the interval
    pub at_rest_total: f64,
    pub at_rest_total_bytes: f64,
    pub interval_in_hours: i64,
    #[serde(deserialize_with = "null_default")]
    pub interval_start: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BandwidthDaily {
    #[serde(deserialize_with = "null_default")]
    pub egress: Egress,
    #[serde(deserialize_with = "null_default")]
    pub ingress: Ingress,
    pub delete: i64,
    #[serde(deserialize_with = "null_default")]
    pub interval_start: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Egress {
    pub repair: i64,
    pub audit: i64,
    pub usage: i64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Ingress {
    pub repair: i64,
    pub usage: i64,
}

/// Reliability scores, each typically in 0..1
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Audits {
    pub audit_score: f64,
    pub suspension_score: f64,
    pub online_score: f64,
    #[serde(deserialize_with = "null_default")]
    pub satellite_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuditHistory {
    pub score: f64,
    #[serde(deserialize_with = "null_default")]
    pub windows: Vec<AuditWindow>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuditWindow {
    #[serde(deserialize_with = "null_default")]
    pub window_start: DateTime<Utc>,
    pub total_count: i64,
    pub online_count: i64,
}

/// Per-unit rates the satellite pays. The dashboard sends these in PascalCase.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PriceModel {
    pub egress_bandwidth: i64,
    pub repair_bandwidth: i64,
    pub audit_bandwidth: i64,
    pub disk_space: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_satellite_detail() {
        let json = r#"{
            "id": "sat1",
            "storageDaily": [
                {"atRestTotal": 1.5, "atRestTotalBytes": 2.5, "intervalInHours": 24, "intervalStart": "2024-05-01T00:00:00Z"}
            ],
            "bandwidthDaily": [
                {"egress": {"repair": 1, "audit": 2, "usage": 3}, "ingress": {"repair": 4, "usage": 5}, "delete": 6, "intervalStart": "2024-05-01T00:00:00.000000001Z"}
            ],
            "storageSummary": 10.0,
            "averageUsageBytes": 11.0,
            "bandwidthSummary": 12,
            "egressSummary": 13,
            "ingressSummary": 14,
            "currentStorageUsed": 15,
            "audits": {"auditScore": 1, "suspensionScore": 0.99, "onlineScore": 0.98, "satelliteName": "us1"},
            "auditHistory": {"score": 0.9, "windows": [{"windowStart": "2024-05-01T00:00:00Z", "totalCount": 10, "onlineCount": 9}]},
            "priceModel": {"EgressBandwidth": 200, "RepairBandwidth": 100, "AuditBandwidth": 100, "DiskSpace": 150},
            "nodeJoinedAt": "2023-01-02T03:04:05.678Z"
        }"#;

        let detail: SatelliteDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.id, "sat1");
        assert_eq!(detail.storage_daily[0].interval_in_hours, 24);
        assert_eq!(detail.bandwidth_daily[0].ingress.usage, 5);
        assert_eq!(detail.audits.satellite_name, "us1");
        assert_eq!(detail.audit_history.windows[0].online_count, 9);
        assert_eq!(detail.price_model.disk_space, 150);
        assert_eq!(detail.node_joined_at.timestamp(), 1_672_628_645);
    }

    #[test]
    fn test_null_collections_default() {
        let json = r#"{
            "id": "sat1",
            "storageDaily": null,
            "bandwidthDaily": null,
            "storageSummary": 10.0,
            "audits": {"auditScore": 1, "satelliteName": null},
            "auditHistory": {"score": 0.5, "windows": null},
            "priceModel": null,
            "nodeJoinedAt": null
        }"#;

        let detail: SatelliteDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.id, "sat1");
        assert!(detail.storage_daily.is_empty());
        assert!(detail.bandwidth_daily.is_empty());
        assert_eq!(detail.storage_summary, 10.0);
        assert!(detail.audits.satellite_name.is_empty());
        assert_eq!(detail.audit_history.score, 0.5);
        assert!(detail.audit_history.windows.is_empty());
        assert_eq!(detail.price_model.disk_space, 0);
        assert_eq!(detail.node_joined_at.timestamp(), 0);
    }
}
