//! Shared application state for the nexus gateway.
//!
//! Builds the feed registry and simulation runs from config and starts every
//! configured feed. Startup errors are returned, not panicked.

use std::sync::Arc;

use nexus_core::error::Result;
use nexus_core::Scenario;

use crate::config::NexusConfig;
use crate::feed::FeedRegistry;
use crate::obs::GatewayMetrics;
use crate::sim::{RunState, SimulationRuns};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    feeds: Arc<FeedRegistry>,
    sims: Arc<SimulationRuns>,
    metrics: Arc<GatewayMetrics>,
}

struct AppStateInner {
    cfg: NexusConfig,
}

impl AppState {
    /// Build application state and start the configured feeds.
    /// Must be called inside a tokio runtime.
    pub fn new(cfg: NexusConfig) -> Result<Self> {
        cfg.validate()?;

        let metrics = Arc::new(GatewayMetrics::default());
        let feeds = Arc::new(FeedRegistry::new(Arc::clone(&metrics)));
        let sims = Arc::new(SimulationRuns::new(cfg.simulation, Arc::clone(&metrics)));

        for f in &cfg.feeds {
            feeds.start(f);
        }

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg }),
            feeds,
            sims,
            metrics,
        })
    }

    pub fn cfg(&self) -> &NexusConfig {
        &self.inner.cfg
    }

    pub fn feeds(&self) -> Arc<FeedRegistry> {
        Arc::clone(&self.feeds)
    }

    pub fn sims(&self) -> Arc<SimulationRuns> {
        Arc::clone(&self.sims)
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    /// Start a scenario run whose outlook is based on the first configured
    /// feed's latest snapshot.
    pub fn start_simulation(&self, scenario: Scenario) -> RunState {
        let baseline = self
            .cfg()
            .feeds
            .first()
            .and_then(|f| self.feeds.latest(&f.id).ok())
            .unwrap_or_default();
        self.sims.start(scenario, baseline)
    }

    /// Extra gauge lines for `/metrics`.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![("nexus_feeds_configured", self.cfg().feeds.len() as u64)]
    }

    /// Flip to draining and stop every feed and simulation run.
    pub fn shutdown(&self) {
        self.metrics.set_draining();
        self.feeds.stop_all();
        self.sims.stop_all();
        tracing::info!("feeds and simulations stopped");
    }
}
