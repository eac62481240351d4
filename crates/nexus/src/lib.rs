//! Top-level facade crate for nexus.
//!
//! Re-exports the core model and the gateway library so users can depend on a single crate.

pub mod core {
    pub use nexus_core::*;
}

pub mod gateway {
    pub use nexus_gateway::*;
}
