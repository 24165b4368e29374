//! Native-only pieces of the node: the YAML config file and the http
//! endpoint.
pub mod config;
pub mod endpoint;
