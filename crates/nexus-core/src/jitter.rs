//! Bounded random perturbation of a metrics snapshot.
//!
//! One step draws three samples, in field order (GDP growth, unemployment,
//! security level), and for each field computes
//! `round1(prev + (sample - 0.5) * amplitude)`. The rounded values are then
//! clamped: unemployment is floored at 0 and security level is kept within
//! `[0, 100]`.

use serde::{Deserialize, Serialize};

use crate::error::{NexusError, Result};
use crate::random::RandomSource;
use crate::snapshot::MetricsSnapshot;

const SECURITY_MIN: f64 = 0.0;
const SECURITY_MAX: f64 = 100.0;

/// Round to one decimal place, halves away from zero.
pub fn round1(v: f64) -> f64 {
    // `+ 0.0` folds a negative zero into 0.0
    (v * 10.0).round() / 10.0 + 0.0
}

/// Per-field jitter amplitudes. A sample of 0 moves a field by `-amp/2`,
/// a sample of 1 by `+amp/2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JitterProfile {
    #[serde(default = "default_gdp_amp")]
    pub gdp_growth: f64,
    #[serde(default = "default_unemployment_amp")]
    pub unemployment: f64,
    #[serde(default = "default_security_amp")]
    pub security_level: f64,
}

impl Default for JitterProfile {
    fn default() -> Self {
        Self {
            gdp_growth: default_gdp_amp(),
            unemployment: default_unemployment_amp(),
            security_level: default_security_amp(),
        }
    }
}

impl JitterProfile {
    pub fn validate(&self) -> Result<()> {
        let amps = [
            ("gdpGrowth", self.gdp_growth),
            ("unemployment", self.unemployment),
            ("securityLevel", self.security_level),
        ];
        for (name, v) in amps {
            if !v.is_finite() || v < 0.0 {
                return Err(NexusError::BadRequest(format!(
                    "amplitude {name} must be a finite, non-negative number"
                )));
            }
        }
        Ok(())
    }

    /// Derive the next snapshot from `prev`.
    ///
    /// Total over any input: a field whose jittered value is not finite (a
    /// NaN or infinite amplitude, a bad sample) keeps its previous value, and
    /// the range clamps always hold on the result.
    pub fn step<R: RandomSource + ?Sized>(&self, prev: &MetricsSnapshot, rng: &mut R) -> MetricsSnapshot {
        let gdp_growth = jitter(prev.gdp_growth, rng.next_unit(), self.gdp_growth);
        let unemployment = floor_unemployment(jitter(prev.unemployment, rng.next_unit(), self.unemployment));
        let security_level = clamp_security(jitter(prev.security_level, rng.next_unit(), self.security_level));

        MetricsSnapshot {
            gdp_growth,
            unemployment,
            security_level,
            ..*prev
        }
    }
}

/// Relative amplitudes of the one-shot outlook refresh run when a scenario
/// starts: each field is multiplied by `1 + (sample - 0.5) * amplitude`, so
/// the defaults scale GDP growth by up to ±10% and unemployment by up to ±5%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RefreshProfile {
    #[serde(default = "default_gdp_refresh")]
    pub gdp_growth: f64,
    #[serde(default = "default_unemployment_refresh")]
    pub unemployment: f64,
}

impl Default for RefreshProfile {
    fn default() -> Self {
        Self {
            gdp_growth: default_gdp_refresh(),
            unemployment: default_unemployment_refresh(),
        }
    }
}

impl RefreshProfile {
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [("gdpGrowth", self.gdp_growth), ("unemployment", self.unemployment)] {
            if !v.is_finite() || !(0.0..=2.0).contains(&v) {
                return Err(NexusError::BadRequest(format!(
                    "refresh amplitude {name} must be between 0 and 2"
                )));
            }
        }
        Ok(())
    }

    /// Scale GDP growth and unemployment of `base` once. Draws GDP first.
    pub fn apply<R: RandomSource + ?Sized>(&self, base: &MetricsSnapshot, rng: &mut R) -> MetricsSnapshot {
        let gdp_growth = scale(base.gdp_growth, rng.next_unit(), self.gdp_growth);
        let unemployment = floor_unemployment(scale(base.unemployment, rng.next_unit(), self.unemployment));

        MetricsSnapshot {
            gdp_growth,
            unemployment,
            ..*base
        }
    }
}

fn jitter(prev: f64, sample: f64, amplitude: f64) -> f64 {
    finite_or(round1(prev + (sample - 0.5) * amplitude), prev)
}

fn scale(prev: f64, sample: f64, amplitude: f64) -> f64 {
    finite_or(round1(prev * (1.0 + (sample - 0.5) * amplitude)), prev)
}

fn finite_or(next: f64, prev: f64) -> f64 {
    if next.is_finite() {
        next
    } else if prev.is_finite() {
        prev
    } else {
        0.0
    }
}

fn floor_unemployment(raw: f64) -> f64 {
    let v = raw.max(0.0);
    if v != raw {
        tracing::trace!(raw, "unemployment floored at 0");
    }
    v
}

fn clamp_security(raw: f64) -> f64 {
    let v = raw.clamp(SECURITY_MIN, SECURITY_MAX);
    if v != raw {
        tracing::trace!(raw, "security level clamped");
    }
    v
}

fn default_gdp_amp() -> f64 {
    0.1
}
fn default_unemployment_amp() -> f64 {
    0.5
}
fn default_security_amp() -> f64 {
    2.0
}
fn default_gdp_refresh() -> f64 {
    0.2
}
fn default_unemployment_refresh() -> f64 {
    0.1
}
