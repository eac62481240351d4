//! Transport layer.
//!
//! JSON handlers for feed and simulation lookups, and the WebSocket stream
//! that pushes every feed tick to a subscriber.

pub mod http;
pub mod ws;
