use reqwest::StatusCode;

use crate::client::Endpoint;

/// Failure while talking to a node dashboard.
///
/// Every variant names the endpoint and the full URL that was requested so a
/// log line is enough to tell which node and which call went wrong.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{endpoint} request to {url} failed: {source}")]
    Transport {
        endpoint: Endpoint,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request to {url} returned status {status}")]
    Status {
        endpoint: Endpoint,
        url: String,
        status: StatusCode,
    },

    #[error("{endpoint} response from {url} could not be decoded: {source}")]
    Decode {
        endpoint: Endpoint,
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

