//! Known-neighbor set of one node.
//!
//! Membership is directed: registering a peer here says nothing about the
//! reverse edge. Peers are added only by explicit registration and never
//! removed, so a registered peer may be long unreachable; lookups treat
//! such peers as misses.

use std::sync::PoisonError;
use std::sync::RwLock;

use clap::ValueEnum;
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde::Serialize;

/// Order in which a lookup walks a registry snapshot.
///
/// Registration order keeps traversal reproducible; random order spreads
/// lookup load across neighbors instead of always hammering the first one.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalOrder {
    /// Visit peers in the order they were registered.
    Registration,
    /// Shuffle the snapshot once per lookup.
    #[default]
    Random,
}

/// A mutable set of neighbor endpoints.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: RwLock<Vec<String>>,
}

impl PeerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a neighbor endpoint. Idempotent; returns whether the
    /// endpoint was new.
    pub fn add(&self, endpoint: &str) -> bool {
        let mut peers = self.peers.write().unwrap_or_else(PoisonError::into_inner);
        if peers.iter().any(|p| p == endpoint) {
            return false;
        }
        peers.push(endpoint.to_string());
        true
    }

    /// Point-in-time copy of all known endpoints.
    ///
    /// One snapshot drives one whole traversal, so a lookup never observes
    /// registrations racing in while it walks its peers, and the flood
    /// length stays bounded by the membership at snapshot time.
    pub fn snapshot(&self, order: TraversalOrder) -> Vec<String> {
        let mut peers = self
            .peers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if order == TraversalOrder::Random {
            peers.shuffle(&mut rand::thread_rng());
        }
        peers
    }

    /// Current peer count, used for status reporting.
    pub fn len(&self) -> usize {
        self.peers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no peers are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
