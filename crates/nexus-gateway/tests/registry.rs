//! Feed registry and app state wiring.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use nexus_gateway::app_state::AppState;
use nexus_gateway::config;
use nexus_gateway::feed::FeedRegistry;
use nexus_gateway::obs::GatewayMetrics;

const CFG: &str = r#"
version: 1
feeds:
  - id: "dashboard"
    period_ms: 5000
    seed: 7
  - id: "stats"
    period_ms: 10000
    seed: 7
"#;

#[tokio::test(start_paused = true)]
async fn configured_feeds_publish_latest() {
    let state = AppState::new(config::load_from_str(CFG).unwrap()).unwrap();
    let feeds = state.feeds();
    assert_eq!(feeds.ids(), vec!["dashboard".to_string(), "stats".to_string()]);

    let initial = feeds.latest("dashboard").unwrap();
    assert_eq!(initial, state.cfg().feeds[0].initial);

    sleep(Duration::from_millis(10_100)).await;
    assert_eq!(feeds.ticks("dashboard"), Some(2));
    assert_eq!(feeds.ticks("stats"), Some(1));

    let mut dashboard_rx = feeds.subscribe("dashboard").unwrap();
    dashboard_rx.borrow_and_update();

    sleep(Duration::from_millis(5_000)).await;
    assert!(dashboard_rx.has_changed().unwrap());

    let metrics = state.metrics();
    assert_eq!(metrics.feed_ticks.get(&[("feed", "dashboard")]), 3);
    assert_eq!(metrics.feeds_active.get(&[]), 2);
}

#[tokio::test(start_paused = true)]
async fn unknown_feed_is_not_found() {
    let registry = FeedRegistry::new(Arc::new(GatewayMetrics::default()));
    let err = registry.latest("nope").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "NOT_FOUND");
    assert!(registry.subscribe("nope").is_err());
    assert!(!registry.stop("nope"));
}

#[tokio::test(start_paused = true)]
async fn stop_closes_subscribers() {
    let cfg = config::load_from_str(CFG).unwrap();
    let metrics = Arc::new(GatewayMetrics::default());
    let registry = FeedRegistry::new(Arc::clone(&metrics));
    registry.start(&cfg.feeds[0]);

    let mut rx = registry.subscribe("dashboard").unwrap();
    assert!(registry.stop("dashboard"));
    assert!(registry.latest("dashboard").is_err());

    // the sender is dropped with the entry and the aborted feed task
    assert!(rx.changed().await.is_err());
    assert_eq!(metrics.feeds_active.get(&[]), 0);
}

#[tokio::test(start_paused = true)]
async fn restart_replaces_running_feed() {
    let cfg = config::load_from_str(CFG).unwrap();
    let metrics = Arc::new(GatewayMetrics::default());
    let registry = FeedRegistry::new(Arc::clone(&metrics));

    registry.start(&cfg.feeds[0]);
    sleep(Duration::from_millis(5_100)).await;
    assert_eq!(registry.ticks("dashboard"), Some(1));

    registry.start(&cfg.feeds[0]);
    assert_eq!(registry.ticks("dashboard"), Some(0));
    assert_eq!(registry.latest("dashboard").unwrap(), cfg.feeds[0].initial);
    assert_eq!(metrics.feeds_active.get(&[]), 1);
    assert_eq!(metrics.feed_restarts.get(&[("feed", "dashboard")]), 1);

    // the replaced feed no longer counts ticks
    sleep(Duration::from_millis(5_100)).await;
    assert_eq!(metrics.feed_ticks.get(&[("feed", "dashboard")]), 2);
}

#[tokio::test(start_paused = true)]
async fn subscribers_follow_a_restarted_feed() {
    let cfg = config::load_from_str(CFG).unwrap();
    let registry = FeedRegistry::new(Arc::new(GatewayMetrics::default()));
    registry.start(&cfg.feeds[0]);

    let mut rx = registry.subscribe("dashboard").unwrap();
    sleep(Duration::from_millis(5_100)).await;
    assert!(rx.has_changed().unwrap());
    rx.borrow_and_update();

    registry.start(&cfg.feeds[0]);
    // the restart republishes the initial snapshot on the same channel
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), cfg.feeds[0].initial);

    sleep(Duration::from_millis(5_100)).await;
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), registry.latest("dashboard").unwrap());
    assert_eq!(registry.ticks("dashboard"), Some(1));

    assert!(registry.stop("dashboard"));
    assert!(rx.changed().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_everything() {
    let state = AppState::new(config::load_from_str(CFG).unwrap()).unwrap();
    state.shutdown();

    assert!(state.is_draining());
    assert!(state.feeds().ids().is_empty());

    let out = state.metrics().render(&state.metrics_extra());
    assert!(out.contains("nexus_draining 1"));
    assert!(out.contains("nexus_feeds_configured 2"));
}
