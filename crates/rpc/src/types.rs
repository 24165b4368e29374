//! Request and response payloads exchanged between nodes and clients.

use serde::Deserialize;
use serde::Serialize;

/// Initial hop budget used when a lookup request carries none.
pub const DEFAULT_HOP_BUDGET: u32 = 6;

/// Response of the `status` method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Node build version.
    pub version: String,
    /// Address identifying the node on the overlay.
    pub address: String,
    /// Number of registered neighbors.
    pub connections: usize,
    /// Number of locally stored entries.
    pub storage: usize,
}

/// Query parameters of the `get` method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetQuery {
    /// Key to read from local storage.
    pub key: String,
}

/// Response of the `get` method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResponse {
    /// The key that was read.
    pub key: String,
    /// The locally stored value.
    pub value: String,
}

/// Body of the `store` method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRequest {
    /// Key to store under. Must be non-empty.
    pub key: String,
    /// Opaque value payload.
    pub value: String,
}

/// Response of the `store` method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreResponse {
    /// The key that was stored.
    pub key: String,
}

/// Body of the `connect` method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectRequest {
    /// Neighbor endpoint to register. Must be non-empty.
    pub endpoint: String,
}

/// Response of the `connect` method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectResponse {
    /// The endpoint that was registered.
    pub endpoint: String,
}

/// Query parameters of the `lookup` method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupQuery {
    /// Key to locate on the overlay.
    pub key: String,
    /// Remaining hop budget. Defaults to [DEFAULT_HOP_BUDGET] when absent.
    pub hops: Option<u32>,
}

/// Response of the `lookup` method when the key was located.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
    /// Address of the node whose local storage holds the key. This is the
    /// owner, not an intermediate relay.
    pub node: String,
}

/// Json body carried by error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable failure description.
    pub error: String,
}

/// Turn an overlay address into a base url.
///
/// Addresses are opaque `host:port` strings on the wire; prefix a scheme
/// when none is present so they can be dialed.
pub fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}
