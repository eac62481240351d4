use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use nexus_core::error::{NexusError, Result};
use nexus_core::{JitterProfile, MetricsSnapshot, RefreshProfile};

use crate::feed::FeedSpec;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NexusConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub feeds: Vec<FeedConfig>,

    #[serde(default)]
    pub simulation: SimulationSection,
}

impl NexusConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(NexusError::UnsupportedVersion);
        }
        if self.feeds.is_empty() {
            return Err(NexusError::BadRequest("feeds must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for f in &self.feeds {
            if !seen.insert(f.id.as_str()) {
                return Err(NexusError::BadRequest(format!("duplicate feed id: {}", f.id)));
            }
            f.validate()?;
        }

        self.gateway.validate()?;
        self.simulation.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            ping_interval_ms: default_ping_interval_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if !(5000..=120000).contains(&self.ping_interval_ms) {
            return Err(NexusError::BadRequest(
                "gateway.ping_interval_ms must be between 5000 and 120000".into(),
            ));
        }
        if !(10000..=600000).contains(&self.idle_timeout_ms) {
            return Err(NexusError::BadRequest(
                "gateway.idle_timeout_ms must be between 10000 and 600000".into(),
            ));
        }
        if self.idle_timeout_ms <= self.ping_interval_ms {
            return Err(NexusError::BadRequest(
                "gateway.idle_timeout_ms must be greater than ping_interval_ms".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_ping_interval_ms() -> u64 {
    20000
}
fn default_idle_timeout_ms() -> u64 {
    60000
}

/// One jitter feed. `seed` pins the sample sequence; without it the feed
/// draws from entropy.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    pub id: String,

    #[serde(default = "default_period_ms")]
    pub period_ms: u64,

    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub amplitudes: JitterProfile,

    #[serde(default)]
    pub initial: MetricsSnapshot,
}

impl FeedConfig {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(NexusError::BadRequest("feeds[].id must not be empty".into()));
        }
        if !(1000..=600000).contains(&self.period_ms) {
            return Err(NexusError::BadRequest(format!(
                "feed {}: period_ms must be between 1000 and 600000",
                self.id
            )));
        }
        self.amplitudes
            .validate()
            .map_err(|e| NexusError::BadRequest(format!("feed {}: {e}", self.id)))?;
        self.initial
            .validate()
            .map_err(|e| NexusError::BadRequest(format!("feed {}: initial: {e}", self.id)))?;
        Ok(())
    }

    pub fn spec(&self) -> FeedSpec {
        FeedSpec {
            initial: self.initial,
            period: Duration::from_millis(self.period_ms),
            profile: self.amplitudes,
        }
    }
}

fn default_period_ms() -> u64 {
    5000
}

/// Scenario runs. `refresh_delay_ms` after a start, the run's outlook is
/// derived once from the current dashboard snapshot using `refresh`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    #[serde(default = "default_step_interval_ms")]
    pub step_interval_ms: u64,

    #[serde(default = "default_max_step")]
    pub max_step: f64,

    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_refresh_delay_ms")]
    pub refresh_delay_ms: u64,

    #[serde(default)]
    pub refresh: RefreshProfile,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            step_interval_ms: default_step_interval_ms(),
            max_step: default_max_step(),
            seed: None,
            refresh_delay_ms: default_refresh_delay_ms(),
            refresh: RefreshProfile::default(),
        }
    }
}

impl SimulationSection {
    pub fn validate(&self) -> Result<()> {
        if !(50..=60000).contains(&self.step_interval_ms) {
            return Err(NexusError::BadRequest(
                "simulation.step_interval_ms must be between 50 and 60000".into(),
            ));
        }
        if !self.max_step.is_finite() || self.max_step <= 0.0 || self.max_step > 100.0 {
            return Err(NexusError::BadRequest(
                "simulation.max_step must be in (0, 100]".into(),
            ));
        }
        if !(100..=60000).contains(&self.refresh_delay_ms) {
            return Err(NexusError::BadRequest(
                "simulation.refresh_delay_ms must be between 100 and 60000".into(),
            ));
        }
        self.refresh
            .validate()
            .map_err(|e| NexusError::BadRequest(format!("simulation: {e}")))?;
        Ok(())
    }

    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }
}

fn default_step_interval_ms() -> u64 {
    500
}
fn default_max_step() -> f64 {
    10.0
}
fn default_refresh_delay_ms() -> u64 {
    2000
}
