//! Lightweight in-process metrics.
//!
//! Feed, WebSocket and simulation counters are stored as atomics and rendered
//! by the `/metrics` handler.

pub mod metrics;

pub use metrics::GatewayMetrics;
