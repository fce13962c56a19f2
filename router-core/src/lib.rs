// router-core/src/lib.rs
// Exchange access, signing, order execution and the route service

pub mod config;
pub mod exchange;
pub mod execution;
pub mod service;

// Re-export router-common for convenience
pub use router_common::{data, routing, state};
