//! Nexus core: the metrics snapshot model, jitter math, random sources and
//! simulation progress math.
//!
//! Everything here is pure and runtime-free: a step takes a snapshot and a
//! random source and returns a new snapshot. Timers, cancellation and
//! publishing live in `nexus-gateway`, so this crate can be driven by hand in
//! tests or from any scheduler.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! Fallible paths (config validation, scenario parsing) surface as
//! `NexusError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod jitter;
pub mod progress;
pub mod random;
pub mod snapshot;

/// Shared result type.
pub use error::{NexusError, Result};
pub use jitter::{round1, JitterProfile, RefreshProfile};
pub use progress::{Complexity, Progress, Scenario, ScenarioInfo, ScenarioParam};
pub use random::{FixedSource, RandomSource, ScriptedSource, SeededSource};
pub use snapshot::MetricsSnapshot;
