use serde::Deserialize;

use super::de::null_default;

/// Node status from `GET /api/sno/`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeSnapshot {
    #[serde(rename = "nodeID", deserialize_with = "null_default")]
    pub node_id: String,
    #[serde(deserialize_with = "null_default")]
    pub wallet: String,
    #[serde(deserialize_with = "null_default")]
    pub version: String,
    pub up_to_date: bool,
    #[serde(deserialize_with = "null_default")]
    pub allowed_version: String,
    #[serde(deserialize_with = "null_default")]
    pub quic_status: String,
    #[serde(deserialize_with = "null_default")]
    pub configured_port: String,
    #[serde(deserialize_with = "null_default")]
    pub disk_space: DiskSpace,
    #[serde(deserialize_with = "null_default")]
    pub bandwidth: Bandwidth,
    #[serde(deserialize_with = "null_default")]
    pub satellites: Vec<SatelliteSummary>,
    // Kept as raw strings; consumers parse them best-effort
    #[serde(deserialize_with = "null_default")]
    pub last_pinged: String,
    #[serde(deserialize_with = "null_default")]
    pub started_at: String,
    #[serde(deserialize_with = "null_default")]
    pub last_quic_pinged_at: String,
}

/// Aggregate disk usage in bytes
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct DiskSpace {
    pub used: i64,
    pub available: i64,
    pub trash: i64,
    pub overused: i64,
}

/// Aggregate bandwidth usage in bytes
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Bandwidth {
    pub used: i64,
    pub available: i64,
}

/// A satellite the node is registered with
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SatelliteSummary {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub url: String,
    /// Set when the satellite has disqualified the node
    pub disqualified: Option<String>,
    /// Set when the satellite has suspended the node
    pub suspended: Option<String>,
    pub current_storage_used: i64,
}

/// Standing of a node with one satellite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatelliteStatus {
    Active,
    Disqualified,
    Suspended,
}

impl SatelliteStatus {
    pub const ALL: [SatelliteStatus; 3] = [Self::Active, Self::Disqualified, Self::Suspended];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Disqualified => "disqualified",
            Self::Suspended => "suspended",
        }
    }
}

impl SatelliteSummary {
    /// Derive the node's standing from the optional timestamps.
    ///
    /// Disqualification wins if the dashboard ever reports both.
    pub fn status(&self) -> SatelliteStatus {
        if self.disqualified.is_some() {
            SatelliteStatus::Disqualified
        } else if self.suspended.is_some() {
            SatelliteStatus::Suspended
        } else {
            SatelliteStatus::Active
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_node_snapshot() {
        let json = r#"{
            "nodeID": "12abc",
            "wallet": "0xdead",
            "version": "1.95.1",
            "upToDate": true,
            "allowedVersion": "1.90.0",
            "quicStatus": "OK",
            "configuredPort": "28967",
            "diskSpace": {"used": 100, "available": 1000, "trash": 5, "overused": 0},
            "bandwidth": {"used": 42, "available": 0},
            "satellites": [
                {"id": "sat1", "url": "us1.example:7777", "disqualified": null, "suspended": null, "currentStorageUsed": 77}
            ],
            "lastPinged": "2024-05-01T10:00:00.123456789Z",
            "startedAt": "2024-04-30T08:00:00Z",
            "lastQuicPingedAt": "2024-05-01T09:59:00Z"
        }"#;

        let node: NodeSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(node.node_id, "12abc");
        assert!(node.up_to_date);
        assert_eq!(node.disk_space.trash, 5);
        assert_eq!(node.bandwidth.used, 42);
        assert_eq!(node.satellites.len(), 1);
        assert_eq!(node.satellites[0].current_storage_used, 77);
        assert!(node.satellites[0].disqualified.is_none());
    }

    #[test]
    fn test_missing_fields_default() {
        let node: NodeSnapshot = serde_json::from_str(r#"{"nodeID": "x"}"#).unwrap();
        assert_eq!(node.node_id, "x");
        assert!(node.satellites.is_empty());
        assert_eq!(node.disk_space.used, 0);
        assert!(node.last_pinged.is_empty());
    }

    #[test]
    fn test_null_fields_default() {
        let json = r#"{
            "nodeID": "12abc",
            "wallet": null,
            "diskSpace": null,
            "satellites": null,
            "lastPinged": "2024-05-01T10:00:00Z",
            "startedAt": null,
            "lastQuicPingedAt": null
        }"#;

        let node: NodeSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(node.node_id, "12abc");
        assert!(node.wallet.is_empty());
        assert_eq!(node.disk_space.available, 0);
        assert!(node.satellites.is_empty());
        assert_eq!(node.last_pinged, "2024-05-01T10:00:00Z");
        assert!(node.started_at.is_empty());
        assert!(node.last_quic_pinged_at.is_empty());
    }

    #[test]
    fn test_status_disqualified() {
        let sat = SatelliteSummary {
            disqualified: Some("2024-01-01T00:00:00Z".to_string()),
            ..Default::default()
        };
        assert_eq!(sat.status(), SatelliteStatus::Disqualified);
    }

    #[test]
    fn test_status_suspended() {
        let sat = SatelliteSummary {
            suspended: Some("2024-01-01T00:00:00Z".to_string()),
            ..Default::default()
        };
        assert_eq!(sat.status(), SatelliteStatus::Suspended);
    }

    #[test]
    fn test_status_active_when_neither_set() {
        assert_eq!(SatelliteSummary::default().status(), SatelliteStatus::Active);
    }
}
