//! floodkv-rpc client

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::method::Method;
use crate::prelude::reqwest;
use crate::prelude::reqwest::Client as HttpClient;
use crate::types::*;

/// Wrap http client send request to one floodkv node.
pub struct Client {
    client: HttpClient,
    endpoint_url: String,
}

/// The errors returned by the client.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The node answered with a non-success status.
    #[error("Server returned {status}: {message}")]
    ServerError {
        /// Http status code of the response.
        status: u16,
        /// Error body, or the canonical status reason when the body was
        /// not decodable.
        message: String,
    },
    /// Failure to parse a successful server response.
    #[error("Failed to parse server response: {0}")]
    ParseError(Box<dyn std::error::Error + Send + Sync>),
    /// Request timed out.
    #[error("Request timed out")]
    Timeout,
    /// A general client error.
    #[error("Client error: {0}")]
    Client(String),
}

/// A wrap `Result` contains RpcError.
type Result<T> = std::result::Result<T, RpcError>;

impl Client {
    /// Creates a new Client instance for the node at `endpoint_url`.
    pub fn new(endpoint_url: &str) -> Self {
        Self::with_http(HttpClient::default(), endpoint_url)
    }

    /// Creates a Client whose requests are bounded by `timeout`.
    pub fn with_timeout(endpoint_url: &str, timeout: Duration) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Client(e.to_string()))?;
        Ok(Self::with_http(client, endpoint_url))
    }

    /// Creates a Client on top of an existing connection pool.
    ///
    /// `reqwest::Client` is cheap to clone, so a node fanning out to many
    /// peers shares one pool across all of them.
    pub fn with_http(client: HttpClient, endpoint_url: &str) -> Self {
        Self {
            client,
            endpoint_url: normalize_endpoint(endpoint_url),
        }
    }

    fn url(&self, method: &Method) -> String {
        format!("{}{}", self.endpoint_url, method.as_str())
    }

    async fn do_request<T>(&self, req: reqwest::RequestBuilder) -> Result<T>
    where T: DeserializeOwned {
        let resp = req.send().await.map_err(map_transport_err)?;

        let status = resp.status();
        if !status.is_success() {
            let message = match resp.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
            };
            return Err(RpcError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| RpcError::ParseError(Box::new(e)))
    }

    /// Query the node for its peer count and storage entry count.
    pub async fn status(&self) -> Result<StatusResponse> {
        self.do_request(self.client.get(self.url(&Method::Status))).await
    }

    /// Read the value stored for `key` on the node itself. Never consults
    /// peers.
    pub async fn get(&self, key: &str) -> Result<GetResponse> {
        let req = self
            .client
            .get(self.url(&Method::Get))
            .query(&[("key", key)]);
        self.do_request(req).await
    }

    /// Store a key/value into the node's local storage.
    pub async fn store(&self, req: &StoreRequest) -> Result<StoreResponse> {
        self.do_request(self.client.post(self.url(&Method::Store)).json(req))
            .await
    }

    /// Register a neighbor endpoint on the node.
    pub async fn connect(&self, req: &ConnectRequest) -> Result<ConnectResponse> {
        self.do_request(self.client.post(self.url(&Method::Connect)).json(req))
            .await
    }

    /// Ask the node which overlay member holds `key`.
    ///
    /// `hops` bounds the flood depth; when `None` the node applies its
    /// default initial budget. A not-found outcome surfaces as
    /// [RpcError::ServerError] with status 404.
    pub async fn lookup(&self, key: &str, hops: Option<u32>) -> Result<LookupResponse> {
        let mut req = self
            .client
            .get(self.url(&Method::Lookup))
            .query(&[("key", key)]);
        if let Some(hops) = hops {
            req = req.query(&[("hops", hops)]);
        }
        self.do_request(req).await
    }
}

fn map_transport_err(e: reqwest::Error) -> RpcError {
    if e.is_timeout() {
        RpcError::Timeout
    } else {
        RpcError::Client(e.to_string())
    }
}
