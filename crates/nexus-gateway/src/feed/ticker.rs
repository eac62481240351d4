use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};

/// Shortest period a ticker runs at; a zero period is raised to this.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Longest period a ticker runs at. Longer periods are lowered to this so
/// the first deadline never overflows the clock.
pub const MAX_PERIOD: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, Default)]
struct TickerState {
    cancelled: AtomicBool,
    ticks: AtomicU64,
}

/// Caller-owned handle to a running ticker.
///
/// Cancelling is synchronous and idempotent. Once `cancel` returns, no new
/// step starts. Dropping the handle cancels the ticker.
#[derive(Debug)]
pub struct CancelHandle {
    state: Arc<TickerState>,
    task: Option<JoinHandle<()>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        if self.state.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(task) = &self.task {
            task.abort();
        }
        tracing::debug!(ticks = self.ticks(), "ticker cancelled");
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }

    /// True once the ticker task has exited, by cancellation or by its step
    /// asking to stop.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Number of steps run so far.
    pub fn ticks(&self) -> u64 {
        self.state.ticks.load(Ordering::Relaxed)
    }

    /// Cancel and wait until the ticker task has exited.
    pub async fn stopped(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            // an aborted task resolves to a cancelled JoinError
            let _ = task.await;
        }
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Run `step` once per `period` on a tokio task until it breaks or the
/// returned handle is cancelled.
///
/// The first step runs one full period after the call. Steps never overlap;
/// a late tick delays the schedule instead of bursting.
pub fn spawn_periodic<F>(period: Duration, mut step: F) -> CancelHandle
where
    F: FnMut() -> ControlFlow<()> + Send + 'static,
{
    let period = period.clamp(MIN_PERIOD, MAX_PERIOD);
    let state = Arc::new(TickerState::default());
    let task_state = Arc::clone(&state);
    let first = Instant::now() + period;

    let task = tokio::spawn(async move {
        let mut tick = tokio::time::interval_at(first, period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tick.tick().await;
            if task_state.cancelled.load(Ordering::Acquire) {
                break;
            }
            let flow = step();
            task_state.ticks.fetch_add(1, Ordering::Relaxed);
            if flow.is_break() {
                break;
            }
        }
    });

    CancelHandle {
        state,
        task: Some(task),
    }
}
