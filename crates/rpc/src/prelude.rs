//! Re-exports for downstream crates that drive the client directly.
pub use reqwest;
