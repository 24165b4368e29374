//! Rpc methods.
#![warn(missing_docs)]

use super::error::Error;
use super::error::Result;

/// supported methods.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Method {
    /// Report current peer count and storage entry count
    Status,
    /// Read a locally stored value for a key
    Get,
    /// Store a key/value into local storage
    Store,
    /// Register a neighbor endpoint
    Connect,
    /// Resolve which node holds a key via flood search
    Lookup,
}

impl Method {
    /// Return the route this method is served on as `&str`
    pub fn as_str(&self) -> &str {
        match self {
            Method::Status => "/status",
            Method::Get => "/get",
            Method::Store => "/store",
            Method::Connect => "/connect",
            Method::Lookup => "/lookup",
        }
    }

    /// Return the http verb used for this method.
    pub fn http_method(&self) -> http::Method {
        match self {
            Method::Status | Method::Get | Method::Lookup => http::Method::GET,
            Method::Store | Method::Connect => http::Method::POST,
        }
    }
}

#[allow(clippy::to_string_trait_impl)]
impl ToString for Method {
    fn to_string(&self) -> String {
        self.as_str().to_owned()
    }
}

impl TryFrom<&str> for Method {
    type Error = crate::error::Error;

    fn try_from(value: &str) -> Result<Self> {
        Ok(match value {
            "/status" => Self::Status,
            "/get" => Self::Get,
            "/store" => Self::Store,
            "/connect" => Self::Connect,
            "/lookup" => Self::Lookup,
            _ => return Err(Error::InvalidMethod),
        })
    }
}
