//! Node configuration, usually read from a YAML file.

use std::fs;
use std::io;

use floodkv_rpc::types::DEFAULT_HOP_BUDGET;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;
use crate::processor::ProcessorConfig;
use crate::processor::DEFAULT_PEER_TIMEOUT_MS;
use crate::registry::TraversalOrder;
use crate::util::ensure_parent_dir;
use crate::util::expand_home;

/// Default bind address of the http endpoint.
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:9000";

/// Node config.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Address the http endpoint binds on.
    pub http_addr: String,
    /// Address announced to the overlay as this node's identity. Falls
    /// back to `http_addr` when absent, which is right as long as peers
    /// can reach the node on its bind address.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<String>,
    /// Initial hop budget for lookups that carry none.
    #[serde(default = "default_hop_budget")]
    pub hop_budget: u32,
    /// Bound on one outbound peer request, in milliseconds.
    #[serde(default = "default_peer_timeout_ms")]
    pub peer_timeout_ms: u64,
    /// Order in which lookups walk the registry snapshot.
    #[serde(default)]
    pub traversal: TraversalOrder,
    /// Optional seed source (file path or url) with neighbors to register
    /// at startup.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub seed: Option<String>,
}

fn default_hop_budget() -> u32 {
    DEFAULT_HOP_BUDGET
}

fn default_peer_timeout_ms() -> u64 {
    DEFAULT_PEER_TIMEOUT_MS
}

impl From<Config> for ProcessorConfig {
    fn from(config: Config) -> Self {
        let address = config.address.unwrap_or_else(|| config.http_addr.clone());
        ProcessorConfig::new(address)
            .hop_budget(config.hop_budget)
            .peer_timeout_ms(config.peer_timeout_ms)
            .traversal(config.traversal)
    }
}

impl Config {
    /// Create a config with defaults, binding on `http_addr`.
    pub fn new(http_addr: &str) -> Self {
        Self {
            http_addr: http_addr.to_string(),
            address: None,
            hop_budget: DEFAULT_HOP_BUDGET,
            peer_timeout_ms: DEFAULT_PEER_TIMEOUT_MS,
            traversal: TraversalOrder::default(),
            seed: None,
        }
    }

    /// Write the config as YAML to `path`, creating parent directories.
    /// Returns the expanded path written to.
    pub fn write_fs<P>(&self, path: P) -> Result<String>
    where P: AsRef<std::path::Path> {
        let path = expand_home(path)?;
        ensure_parent_dir(&path)?;
        let f =
            fs::File::create(path.as_path()).map_err(|e| Error::CreateFileError(e.to_string()))?;
        let f_writer = io::BufWriter::new(f);
        serde_yaml::to_writer(f_writer, self).map_err(Error::SerdeYamlError)?;
        Ok(path.to_string_lossy().to_string())
    }

    /// Read a YAML config from `path`.
    pub fn read_fs<P>(path: P) -> Result<Config>
    where P: AsRef<std::path::Path> {
        let path = expand_home(path)?;
        tracing::debug!("Read config from: {:?}", path);
        let f = fs::File::open(path).map_err(|e| Error::OpenFileError(e.to_string()))?;
        let f_rdr = io::BufReader::new(f);
        serde_yaml::from_reader(f_rdr).map_err(Error::SerdeYamlError)
    }
}
