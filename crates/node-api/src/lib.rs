//! Storage node dashboard API
//!
//! Blocking client for the node operator's local dashboard
//! (`/api/sno/...`) and the response types it decodes into.

mod client;
mod error;
pub mod models;

pub use client::{Endpoint, NodeApiClient};
pub use error::ApiError;
