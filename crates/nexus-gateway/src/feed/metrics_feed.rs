use std::ops::ControlFlow;

use tokio::time::Duration;

use nexus_core::{JitterProfile, MetricsSnapshot, RandomSource};

use super::ticker::{spawn_periodic, CancelHandle};

/// Tick period of the main dashboard view.
pub const DASHBOARD_PERIOD: Duration = Duration::from_secs(5);
/// Tick period of the stats panel.
pub const STATS_PANEL_PERIOD: Duration = Duration::from_secs(10);

/// Everything a feed needs besides its random source and observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedSpec {
    pub initial: MetricsSnapshot,
    pub period: Duration,
    pub profile: JitterProfile,
}

impl FeedSpec {
    pub fn dashboard() -> Self {
        Self {
            initial: MetricsSnapshot::default(),
            period: DASHBOARD_PERIOD,
            profile: JitterProfile::default(),
        }
    }

    pub fn stats_panel() -> Self {
        Self {
            period: STATS_PANEL_PERIOD,
            ..Self::dashboard()
        }
    }
}

/// Start a metrics jitter feed.
///
/// Every `spec.period` the feed derives a new snapshot from the previous one
/// and hands a copy to `on_tick`. It never fails; it only stops, when the
/// returned handle is cancelled or dropped.
pub fn start<R, F>(spec: FeedSpec, mut rng: R, mut on_tick: F) -> CancelHandle
where
    R: RandomSource + Send + 'static,
    F: FnMut(MetricsSnapshot) + Send + 'static,
{
    let FeedSpec {
        initial,
        period,
        profile,
    } = spec;

    tracing::info!(
        period_ms = period.as_millis() as u64,
        population = initial.population,
        "metrics feed starting"
    );

    let mut current = initial;
    spawn_periodic(period, move || {
        current = profile.step(&current, &mut rng);
        tracing::debug!(
            gdp_growth = current.gdp_growth,
            unemployment = current.unemployment,
            security_level = current.security_level,
            "metrics tick"
        );
        on_tick(current);
        ControlFlow::Continue(())
    })
}
