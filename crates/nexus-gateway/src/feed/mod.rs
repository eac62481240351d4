//! Timer-driven feeds.
//!
//! `ticker` owns the periodic task and its cancel handle, `metrics_feed`
//! drives a jitter profile on top of it, and `registry` keeps the running
//! feeds and their latest snapshots for observers.

mod metrics_feed;
mod registry;
mod ticker;

pub use metrics_feed::{start, FeedSpec, DASHBOARD_PERIOD, STATS_PANEL_PERIOD};
pub use registry::FeedRegistry;
pub use ticker::{spawn_periodic, CancelHandle, MAX_PERIOD, MIN_PERIOD};
