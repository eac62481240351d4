//! JSON test vector loader shared by the jitter tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::fs;

use serde::Deserialize;

use nexus_core::{JitterProfile, MetricsSnapshot};

#[derive(Debug, Deserialize)]
pub struct TickVector {
    pub description: String,
    pub initial: MetricsSnapshot,
    #[serde(default)]
    pub amplitudes: Option<JitterProfile>,
    pub samples: Vec<f64>,
    pub ticks: usize,
    pub expect: MetricsSnapshot,
}

impl TickVector {
    pub fn profile(&self) -> JitterProfile {
        self.amplitudes.unwrap_or_default()
    }
}

pub fn load(name: &str) -> TickVector {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap_or_else(|e| panic!("bad vector {name}: {e}"))
}
