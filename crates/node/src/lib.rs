#![doc = include_str!("../README.md")]
pub mod error;
pub mod logging;
pub mod native;
pub mod processor;
pub mod registry;
pub mod seed;
pub mod storage;
#[cfg(test)]
mod tests;
pub mod util;
