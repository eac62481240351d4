use serde::{Deserialize, Serialize};

use crate::error::{NexusError, Result};

/// One immutable set of national indicators at a point in time.
///
/// A tick never edits a snapshot; it builds the next one from the previous
/// value. `population`, `education_index` and `health_score` are carried
/// through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MetricsSnapshot {
    pub population: u64,
    pub gdp_growth: f64,
    pub unemployment: f64,
    #[serde(default = "default_education_index")]
    pub education_index: f64,
    #[serde(default = "default_health_score")]
    pub health_score: f64,
    pub security_level: f64,
}

impl Default for MetricsSnapshot {
    /// Figures the dashboard opens with.
    fn default() -> Self {
        Self {
            population: 218_541_065,
            gdp_growth: 3.2,
            unemployment: 33.3,
            education_index: default_education_index(),
            health_score: default_health_score(),
            security_level: 67.5,
        }
    }
}

impl MetricsSnapshot {
    pub fn new(population: u64, gdp_growth: f64, unemployment: f64, security_level: f64) -> Self {
        Self {
            population,
            gdp_growth,
            unemployment,
            security_level,
            ..Self::default()
        }
    }

    /// Check that the snapshot already sits inside the ranges a tick keeps it in.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("gdpGrowth", self.gdp_growth),
            ("unemployment", self.unemployment),
            ("educationIndex", self.education_index),
            ("healthScore", self.health_score),
            ("securityLevel", self.security_level),
        ];
        for (name, v) in fields {
            if !v.is_finite() {
                return Err(NexusError::BadRequest(format!("{name} must be finite")));
            }
        }
        if self.unemployment < 0.0 {
            return Err(NexusError::BadRequest("unemployment must be >= 0".into()));
        }
        if !(0.0..=100.0).contains(&self.security_level) {
            return Err(NexusError::BadRequest(
                "securityLevel must be between 0 and 100".into(),
            ));
        }
        Ok(())
    }
}

fn default_education_index() -> f64 {
    0.394
}
fn default_health_score() -> f64 {
    42.8
}
