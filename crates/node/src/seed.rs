//! Seed files bootstrap a node's neighbor set at startup.

use serde::Deserialize;
use serde::Serialize;

/// A list contains SeedPeer.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct Seed {
    /// Neighbors registered into the peer registry when the node starts.
    pub peers: Vec<SeedPeer>,
}

/// One bootstrap neighbor.
#[derive(Deserialize, Serialize, Debug)]
pub struct SeedPeer {
    /// remote node endpoint
    pub url: String,
}
