//! Nexus gateway library entry.
//!
//! This crate runs the metrics jitter feeds and scenario simulation runs on
//! tokio timers, keeps the latest value of each in a registry, and serves them
//! over HTTP and WebSocket. It is consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod feed;
pub mod obs;
pub mod ops;
pub mod router;
pub mod sim;
pub mod transport;
