use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use floodkv_rpc::client::RpcError;
use floodkv_rpc::types::LookupResponse;

use crate::processor::LookupResult;
use crate::processor::PeerClient;
use crate::processor::Processor;
use crate::processor::ProcessorBuilder;
use crate::processor::ProcessorConfig;
use crate::registry::TraversalOrder;

/// Build a processor with deterministic traversal order and a scripted
/// outbound transport.
pub fn prepare_processor(address: &str, client: Arc<dyn PeerClient>) -> Processor {
    let config =
        ProcessorConfig::new(address.to_string()).traversal(TraversalOrder::Registration);
    ProcessorBuilder::from_config(&config)
        .client(client)
        .build()
        .unwrap()
}

/// Scripted peer transport recording every outbound call.
///
/// Peers listed via [ScriptedPeers::owner] answer with that owner address;
/// peers listed via [ScriptedPeers::unreachable] fail at the transport
/// layer; everything else reports a clean miss.
#[derive(Default)]
pub struct ScriptedPeers {
    owners: HashMap<String, String>,
    unreachable: Vec<String>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl ScriptedPeers {
    /// Script `peer` to answer that `node` owns every key.
    pub fn owner(mut self, peer: &str, node: &str) -> Self {
        self.owners.insert(peer.to_string(), node.to_string());
        self
    }

    /// Script `peer` to fail at the transport layer.
    pub fn unreachable(mut self, peer: &str) -> Self {
        self.unreachable.push(peer.to_string());
        self
    }

    /// Outbound calls made so far, as (peer, hops) pairs in order.
    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PeerClient for ScriptedPeers {
    async fn lookup(
        &self,
        peer: &str,
        key: &str,
        hops: u32,
    ) -> Result<LookupResponse, RpcError> {
        self.calls.lock().unwrap().push((peer.to_string(), hops));

        if self.unreachable.iter().any(|p| p == peer) {
            return Err(RpcError::Client(format!("connection refused: {peer}")));
        }
        match self.owners.get(peer) {
            Some(node) => Ok(LookupResponse { node: node.clone() }),
            None => Err(RpcError::ServerError {
                status: 404,
                message: format!("key {key} not found"),
            }),
        }
    }
}

/// In-process overlay wiring real processors together, so floods can be
/// exercised across several nodes without http.
#[derive(Default)]
pub struct Mesh {
    nodes: Mutex<HashMap<String, Processor>>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl Mesh {
    /// Make `processor` routable under its own address.
    pub fn register(&self, processor: &Processor) {
        self.nodes
            .lock()
            .unwrap()
            .insert(processor.address().to_string(), processor.clone());
    }

    /// Outbound calls made so far, as (peer, hops) pairs in order.
    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PeerClient for Mesh {
    async fn lookup(
        &self,
        peer: &str,
        key: &str,
        hops: u32,
    ) -> Result<LookupResponse, RpcError> {
        self.calls.lock().unwrap().push((peer.to_string(), hops));

        let node = self
            .nodes
            .lock()
            .unwrap()
            .get(peer)
            .cloned()
            .ok_or_else(|| RpcError::Client(format!("no route to {peer}")))?;

        match node.lookup(key, hops).await {
            Ok(LookupResult::Found(at)) => Ok(LookupResponse { node: at }),
            Ok(LookupResult::NotFound) => Err(RpcError::ServerError {
                status: 404,
                message: format!("key {key} not found"),
            }),
            Err(e) => Err(RpcError::Client(e.to_string())),
        }
    }
}
