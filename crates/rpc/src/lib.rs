#![doc = include_str!("../README.md")]
pub mod client;
pub mod error;
pub mod method;
pub mod prelude;
pub mod types;
