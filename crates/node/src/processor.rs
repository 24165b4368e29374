#![warn(missing_docs)]

//! Processor of the floodkv node rpc server: answers lookups from local
//! storage or by flooding known neighbors under a bounded hop budget.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use floodkv_rpc::client::Client;
use floodkv_rpc::client::RpcError;
use floodkv_rpc::prelude::reqwest;
use floodkv_rpc::types::LookupResponse;
use floodkv_rpc::types::StatusResponse;
use floodkv_rpc::types::DEFAULT_HOP_BUDGET;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;
use crate::registry::PeerRegistry;
use crate::registry::TraversalOrder;
use crate::storage::Storage;

/// Default bound on a single outbound peer request, in milliseconds.
///
/// The protocol does not dictate a value; it only has to be finite so that
/// one unreachable peer cannot stall a whole traversal.
pub const DEFAULT_PEER_TIMEOUT_MS: u64 = 3000;

/// Outcome of a lookup.
///
/// A lookup resolves *where* a key lives, never its contents; fetching the
/// value is a separate local `get` against the owning node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    /// The key resides in the local storage of the node at this address.
    Found(String),
    /// The hop budget ran out, or every reachable peer missed.
    NotFound,
}

/// Outbound lookup calls issued during fan-out.
///
/// This is the only operation the processor needs from the transport, so it
/// is the seam where tests substitute scripted peers for real http.
#[async_trait]
pub trait PeerClient: Send + Sync {
    /// Ask `peer` whether it, or its neighbors, holds `key`, with `hops`
    /// budget remaining.
    async fn lookup(
        &self,
        peer: &str,
        key: &str,
        hops: u32,
    ) -> std::result::Result<LookupResponse, RpcError>;
}

/// [PeerClient] over http, sharing one connection pool across all peers.
pub struct HttpPeerClient {
    http: reqwest::Client,
}

impl HttpPeerClient {
    /// Build a client whose outbound requests are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::HttpClientError(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl PeerClient for HttpPeerClient {
    async fn lookup(
        &self,
        peer: &str,
        key: &str,
        hops: u32,
    ) -> std::result::Result<LookupResponse, RpcError> {
        Client::with_http(self.http.clone(), peer)
            .lookup(key, Some(hops))
            .await
    }
}

/// ProcessorConfig is usually serialized as yaml, embedded in the node
/// config file. There is a `from_config` method in [ProcessorBuilder] used
/// to initialize the builder with a ProcessorConfig.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Address announced in lookup results as this node's identity.
    address: String,
    /// Initial hop budget used when a lookup request carries none.
    #[serde(default = "default_hop_budget")]
    hop_budget: u32,
    /// Bound on a single outbound peer request, in milliseconds.
    #[serde(default = "default_peer_timeout_ms")]
    peer_timeout_ms: u64,
    /// Order in which a lookup walks the registry snapshot.
    #[serde(default)]
    traversal: TraversalOrder,
}

fn default_hop_budget() -> u32 {
    DEFAULT_HOP_BUDGET
}

fn default_peer_timeout_ms() -> u64 {
    DEFAULT_PEER_TIMEOUT_MS
}

impl ProcessorConfig {
    /// Creates a new `ProcessorConfig` with default budget, timeout and
    /// traversal order.
    pub fn new(address: String) -> Self {
        Self {
            address,
            hop_budget: DEFAULT_HOP_BUDGET,
            peer_timeout_ms: DEFAULT_PEER_TIMEOUT_MS,
            traversal: TraversalOrder::default(),
        }
    }

    /// Replace the initial hop budget.
    pub fn hop_budget(mut self, hops: u32) -> Self {
        self.hop_budget = hops;
        self
    }

    /// Replace the outbound peer request timeout.
    pub fn peer_timeout_ms(mut self, millis: u64) -> Self {
        self.peer_timeout_ms = millis;
        self
    }

    /// Replace the traversal order policy.
    pub fn traversal(mut self, order: TraversalOrder) -> Self {
        self.traversal = order;
        self
    }

    /// Return the configured node address.
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl FromStr for ProcessorConfig {
    type Err = Error;
    /// Reveal config from serialized string.
    fn from_str(ser: &str) -> Result<Self> {
        serde_yaml::from_str::<ProcessorConfig>(ser).map_err(Error::SerdeYamlError)
    }
}

/// ProcessorBuilder is used to initialize a [Processor] instance.
pub struct ProcessorBuilder {
    config: ProcessorConfig,
    client: Option<Arc<dyn PeerClient>>,
}

impl ProcessorBuilder {
    /// initialize a [ProcessorBuilder] with a serialized [ProcessorConfig].
    pub fn from_serialized(config: &str) -> Result<Self> {
        let config = ProcessorConfig::from_str(config)?;
        Ok(Self::from_config(&config))
    }

    /// initialize a [ProcessorBuilder] with a [ProcessorConfig].
    pub fn from_config(config: &ProcessorConfig) -> Self {
        Self {
            config: config.clone(),
            client: None,
        }
    }

    /// Replace the outbound transport. Tests use this to script peers.
    pub fn client(mut self, client: Arc<dyn PeerClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the [Processor].
    pub fn build(self) -> Result<Processor> {
        let client = match self.client {
            Some(client) => client,
            None => Arc::new(HttpPeerClient::new(Duration::from_millis(
                self.config.peer_timeout_ms,
            ))?),
        };

        Ok(Processor {
            address: self.config.address,
            hop_budget: self.config.hop_budget,
            traversal: self.config.traversal,
            storage: Arc::new(Storage::new()),
            registry: Arc::new(PeerRegistry::new()),
            client,
        })
    }
}

/// Processor for the floodkv node rpc server.
#[derive(Clone)]
pub struct Processor {
    address: String,
    hop_budget: u32,
    traversal: TraversalOrder,
    /// local key/value table
    pub storage: Arc<Storage>,
    /// known neighbors
    pub registry: Arc<PeerRegistry>,
    client: Arc<dyn PeerClient>,
}

impl Processor {
    /// Address identifying this node on the overlay. Immutable for the
    /// process lifetime.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Initial hop budget applied to lookups that carry none.
    pub fn hop_budget(&self) -> u32 {
        self.hop_budget
    }

    /// Store a key/value into local storage. Overwrites silently.
    pub fn store(&self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        self.storage.put(key, value);
        tracing::debug!("stored key {key}");
        Ok(())
    }

    /// Read a locally stored value. Never consults peers.
    pub fn get(&self, key: &str) -> Result<String> {
        self.storage
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    /// Register a neighbor endpoint. Idempotent; returns whether it was new.
    pub fn connect(&self, endpoint: &str) -> Result<bool> {
        if endpoint.is_empty() {
            return Err(Error::EmptyEndpoint);
        }
        let added = self.registry.add(endpoint);
        if added {
            tracing::info!("registered neighbor {endpoint}");
        }
        Ok(added)
    }

    /// Resolve which node holds `key`, spending at most `hops` forwarding
    /// steps.
    ///
    /// A local entry wins for any positive budget. Otherwise one registry
    /// snapshot is walked sequentially, each peer receiving the decremented
    /// budget: the first peer reporting an owner short-circuits the walk
    /// and its answer is propagated upward unchanged, while a peer that
    /// misses or cannot be reached is skipped. The hop budget is the sole
    /// loop guard; a query may revisit a node via another path, but each
    /// revisit spends budget, so the flood terminates on cyclic overlays.
    ///
    /// Dropping the returned future aborts the traversal together with any
    /// outbound request still in flight, so an abandoned caller frees peer
    /// resources promptly.
    pub async fn lookup(&self, key: &str, hops: u32) -> Result<LookupResult> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        if hops == 0 {
            return Ok(LookupResult::NotFound);
        }
        if self.storage.contains(key) {
            return Ok(LookupResult::Found(self.address.clone()));
        }

        let remaining = hops - 1;
        if remaining == 0 {
            tracing::debug!("hop budget exhausted before fan-out, key {key}");
            return Ok(LookupResult::NotFound);
        }

        for peer in self.registry.snapshot(self.traversal) {
            match self.client.lookup(&peer, key, remaining).await {
                Ok(resp) => {
                    tracing::debug!("peer {peer} resolved key {key} at {}", resp.node);
                    return Ok(LookupResult::Found(resp.node));
                }
                // A peer that misses and a peer that is down read the same
                // here: move on to the next one.
                Err(e) => tracing::debug!("peer {peer} missed key {key}: {e}"),
            }
        }

        Ok(LookupResult::NotFound)
    }

    /// get node info
    pub fn node_info(&self) -> StatusResponse {
        StatusResponse {
            version: crate::util::build_version(),
            address: self.address.clone(),
            connections: self.registry.len(),
            storage: self.storage.len(),
        }
    }
}
