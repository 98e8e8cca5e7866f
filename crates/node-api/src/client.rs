//! Blocking client for one node's dashboard API

use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::error::ApiError;
use crate::models::{NodeSnapshot, PayoutSnapshot, SatelliteDetail, SatelliteSummary};

/// Upper bound for a single dashboard request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const NODE_PATH: &str = "/api/sno/";
const PAYOUT_PATH: &str = "/api/sno/estimated-payout";
const SATELLITE_PATH: &str = "/api/sno/satellite/";

/// Which dashboard endpoint a request targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Node,
    Payout,
    Satellite,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Node => "node",
            Self::Payout => "payout",
            Self::Satellite => "satellite",
        };
        f.write_str(name)
    }
}

/// Client bound to a single node dashboard.
///
/// A client only exists once the dashboard has answered the initial node
/// request, so `node_id` is always populated and never changes afterwards.
#[derive(Debug)]
pub struct NodeApiClient {
    base_url: String,
    node_id: String,
    /// Satellites reported when the client was created
    satellites: Vec<SatelliteSummary>,
    http: reqwest::blocking::Client,
}

impl NodeApiClient {
    /// Connect to a dashboard and fetch the node identity
    pub fn connect(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::Client)?;

        let mut client = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            node_id: String::new(),
            satellites: Vec::new(),
            http,
        };

        let node = client.node()?;
        client.node_id = node.node_id;
        client.satellites = node.satellites;

        debug!(
            base_url = %client.base_url,
            node_id = %client.node_id,
            satellites = client.satellites.len(),
            "Connected to node dashboard"
        );

        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn satellites(&self) -> &[SatelliteSummary] {
        &self.satellites
    }

    /// Fetch current node status
    pub fn node(&self) -> Result<NodeSnapshot, ApiError> {
        self.get(Endpoint::Node, NODE_PATH)
    }

    /// Fetch the payout estimate for the current and previous month
    pub fn payout(&self) -> Result<PayoutSnapshot, ApiError> {
        self.get(Endpoint::Payout, PAYOUT_PATH)
    }

    /// Fetch detailed statistics for one satellite
    pub fn satellite(&self, satellite_id: &str) -> Result<SatelliteDetail, ApiError> {
        let path = format!("{}{}", SATELLITE_PATH, satellite_id);
        self.get(Endpoint::Satellite, &path)
    }

    fn get<T: DeserializeOwned>(&self, endpoint: Endpoint, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let response = match self.http.get(&url).header("Accept", "application/json").send() {
            Ok(response) => response,
            Err(source) => return Err(ApiError::Transport { endpoint, url, source }),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { endpoint, url, status });
        }

        let body = match response.text() {
            Ok(body) => body,
            Err(source) => return Err(ApiError::Transport { endpoint, url, source }),
        };

        serde_json::from_str(&body).map_err(|source| ApiError::Decode { endpoint, url, source })
    }
}
