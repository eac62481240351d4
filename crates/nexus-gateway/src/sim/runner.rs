use std::ops::ControlFlow;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::watch;

use nexus_core::{MetricsSnapshot, Progress, Scenario, ScenarioInfo, SeededSource};

use crate::config::SimulationSection;
use crate::feed::{spawn_periodic, CancelHandle};
use crate::obs::GatewayMetrics;

// keeps the outlook draws apart from the progress draws under one seed
const REFRESH_SEED_SALT: u64 = 0x5eed_f00d;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Idle,
    Running,
    Completed,
}

/// What an observer sees of one scenario run.
///
/// `outlook` stays empty until the refresh delay has passed after a start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunState {
    pub scenario: Scenario,
    pub status: RunStatus,
    pub progress: f64,
    pub details: ScenarioInfo,
    pub outlook: Option<MetricsSnapshot>,
}

impl RunState {
    fn idle(scenario: Scenario) -> Self {
        Self {
            scenario,
            status: RunStatus::Idle,
            progress: 0.0,
            details: scenario.info(),
            outlook: None,
        }
    }
}

struct RunEntry {
    // dropping the handles cancels the run and its pending refresh
    _progress: CancelHandle,
    _refresh: CancelHandle,
    state: Arc<watch::Sender<RunState>>,
}

/// At most one progress run per scenario.
pub struct SimulationRuns {
    runs: DashMap<Scenario, RunEntry>,
    cfg: SimulationSection,
    metrics: Arc<GatewayMetrics>,
}

impl SimulationRuns {
    pub fn new(cfg: SimulationSection, metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            runs: DashMap::new(),
            cfg,
            metrics,
        }
    }

    /// Start a fresh run from 0%, replacing any run of the same scenario.
    ///
    /// `baseline` is the snapshot the one-shot outlook refresh scales.
    pub fn start(&self, scenario: Scenario, baseline: MetricsSnapshot) -> RunState {
        let initial = RunState {
            status: RunStatus::Running,
            ..RunState::idle(scenario)
        };
        let state = Arc::new(watch::channel(initial).0);

        let progress = self.spawn_progress(scenario, Arc::clone(&state));
        let refresh = self.spawn_refresh(scenario, baseline, Arc::clone(&state));

        self.runs.insert(
            scenario,
            RunEntry {
                _progress: progress,
                _refresh: refresh,
                state,
            },
        );
        self.metrics
            .simulation_runs
            .inc(&[("scenario", scenario.id()), ("outcome", "started")]);
        tracing::info!(%scenario, title = scenario.title(), "simulation started");
        initial
    }

    fn spawn_progress(&self, scenario: Scenario, tx: Arc<watch::Sender<RunState>>) -> CancelHandle {
        let mut rng = match self.cfg.seed {
            Some(seed) => SeededSource::new(seed),
            None => SeededSource::from_entropy(),
        };
        let max_step = self.cfg.max_step;
        let metrics = Arc::clone(&self.metrics);
        let mut progress = Progress::start();

        spawn_periodic(self.cfg.step_interval(), move || {
            progress = progress.advance(&mut rng, max_step);
            tx.send_modify(|st| {
                st.progress = progress.percent;
                if progress.finished {
                    st.status = RunStatus::Completed;
                }
            });

            if progress.finished {
                tracing::info!(%scenario, "simulation completed");
                metrics
                    .simulation_runs
                    .inc(&[("scenario", scenario.id()), ("outcome", "completed")]);
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
    }

    fn spawn_refresh(
        &self,
        scenario: Scenario,
        baseline: MetricsSnapshot,
        tx: Arc<watch::Sender<RunState>>,
    ) -> CancelHandle {
        let mut rng = match self.cfg.seed {
            Some(seed) => SeededSource::new(seed ^ REFRESH_SEED_SALT),
            None => SeededSource::from_entropy(),
        };
        let profile = self.cfg.refresh;

        spawn_periodic(self.cfg.refresh_delay(), move || {
            let outlook = profile.apply(&baseline, &mut rng);
            tracing::debug!(
                %scenario,
                gdp_growth = outlook.gdp_growth,
                unemployment = outlook.unemployment,
                "simulation outlook refreshed"
            );
            tx.send_modify(|st| st.outlook = Some(outlook));
            ControlFlow::Break(())
        })
    }

    /// Cancel a run and reset it to idle at 0%.
    pub fn stop(&self, scenario: Scenario) -> RunState {
        if let Some((_, entry)) = self.runs.remove(&scenario) {
            if entry.state.borrow().status == RunStatus::Running {
                self.metrics
                    .simulation_runs
                    .inc(&[("scenario", scenario.id()), ("outcome", "stopped")]);
                tracing::info!(%scenario, "simulation stopped");
            }
        }
        RunState::idle(scenario)
    }

    pub fn stop_all(&self) {
        for scenario in Scenario::ALL {
            self.stop(scenario);
        }
    }

    pub fn status(&self, scenario: Scenario) -> RunState {
        self.runs
            .get(&scenario)
            .map(|e| *e.state.borrow())
            .unwrap_or_else(|| RunState::idle(scenario))
    }

    pub fn subscribe(&self, scenario: Scenario) -> Option<watch::Receiver<RunState>> {
        self.runs.get(&scenario).map(|e| e.state.subscribe())
    }
}
