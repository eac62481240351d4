//! Scenario simulation progress runs.

mod runner;

pub use runner::{RunState, RunStatus, SimulationRuns};
