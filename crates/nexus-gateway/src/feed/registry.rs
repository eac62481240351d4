use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use nexus_core::error::{NexusError, Result};
use nexus_core::{MetricsSnapshot, SeededSource};

use crate::config::FeedConfig;
use crate::obs::GatewayMetrics;

use super::metrics_feed;
use super::ticker::CancelHandle;

struct FeedEntry {
    handle: CancelHandle,
    latest: Arc<watch::Sender<MetricsSnapshot>>,
}

/// Running feeds by id, each with a watch channel holding its latest snapshot.
///
/// Observers subscribe to the channel; every tick replaces the whole value, so
/// a reader always sees one complete snapshot. The channel belongs to the id,
/// not to one feed run: a restart keeps it open and republishes the initial
/// snapshot, and only `stop` closes it.
pub struct FeedRegistry {
    feeds: DashMap<String, FeedEntry>,
    metrics: Arc<GatewayMetrics>,
}

impl FeedRegistry {
    pub fn new(metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            feeds: DashMap::new(),
            metrics,
        }
    }

    /// Start a feed under `cfg.id`, replacing (and cancelling) any feed that
    /// already runs under that id. Existing subscribers stay attached and
    /// receive the new feed's snapshots. Must be called inside a tokio runtime.
    pub fn start(&self, cfg: &FeedConfig) {
        let reused = self.feeds.get(&cfg.id).map(|old| {
            old.handle.cancel();
            Arc::clone(&old.latest)
        });
        let latest = match reused {
            Some(tx) => {
                tx.send_replace(cfg.initial);
                tx
            }
            None => Arc::new(watch::channel(cfg.initial).0),
        };

        let rng = match cfg.seed {
            Some(seed) => SeededSource::new(seed),
            None => SeededSource::from_entropy(),
        };

        let metrics = Arc::clone(&self.metrics);
        let feed_id = cfg.id.clone();
        let tx = Arc::clone(&latest);
        let handle = metrics_feed::start(cfg.spec(), rng, move |snap| {
            metrics.feed_ticks.inc(&[("feed", feed_id.as_str())]);
            tx.send_replace(snap);
        });

        let entry = FeedEntry { handle, latest };
        match self.feeds.insert(cfg.id.clone(), entry) {
            Some(_old) => {
                tracing::info!(feed = %cfg.id, "feed restarted");
                self.metrics.feed_restarts.inc(&[("feed", cfg.id.as_str())]);
            }
            None => {
                tracing::info!(feed = %cfg.id, period_ms = cfg.period_ms, "feed registered");
                self.metrics.feeds_active.inc(&[]);
            }
        }
    }

    /// Stop and forget a feed. Returns false for unknown ids.
    pub fn stop(&self, id: &str) -> bool {
        let Some((_, entry)) = self.feeds.remove(id) else {
            return false;
        };
        entry.handle.cancel();
        self.metrics.feeds_active.dec(&[]);
        tracing::info!(feed = %id, ticks = entry.handle.ticks(), "feed stopped");
        true
    }

    pub fn stop_all(&self) {
        for id in self.ids() {
            self.stop(&id);
        }
    }

    pub fn latest(&self, id: &str) -> Result<MetricsSnapshot> {
        self.feeds
            .get(id)
            .map(|e| *e.latest.borrow())
            .ok_or_else(|| unknown_feed(id))
    }

    pub fn subscribe(&self, id: &str) -> Result<watch::Receiver<MetricsSnapshot>> {
        self.feeds
            .get(id)
            .map(|e| e.latest.subscribe())
            .ok_or_else(|| unknown_feed(id))
    }

    /// Snapshots delivered so far by one feed.
    pub fn ticks(&self, id: &str) -> Option<u64> {
        self.feeds.get(id).map(|e| e.handle.ticks())
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.feeds.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }
}

fn unknown_feed(id: &str) -> NexusError {
    NexusError::NotFound(format!("feed {id}"))
}
