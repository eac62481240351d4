//! WebSocket feed stream.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS for a known feed id (unknown ids get a 404 before upgrade)
//! - Send the current snapshot, then one `tick` envelope per feed tick
//! - Lifecycle: ping/pong + idle timeout

use axum::{
    extract::{ws::Message, ws::WebSocketUpgrade, Path, State},
    response::Response,
};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde_json::json;
use tokio::sync::watch;
use tokio::time::{Duration, Instant};

use nexus_core::MetricsSnapshot;

use crate::app_state::AppState;
use crate::transport::http::ApiError;

pub(crate) fn feed_json(feed: &str, msg_type: &str, snap: &MetricsSnapshot) -> String {
    json!({
        "v": 1,
        "svc": "feed",
        "type": msg_type,
        "feed": feed,
        "data": snap,
    })
    .to_string()
}

fn sys_error_json(code: &str, msg: &str) -> String {
    json!({
        "v": 1,
        "svc": "sys",
        "type": "error",
        "data": {
            "code": code,
            "msg": msg
        }
    })
    .to_string()
}

// --------------------
// Entry
// --------------------
pub async fn ws_upgrade(
    State(app): State<AppState>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let rx = app.feeds().subscribe(&id)?;
    Ok(ws.on_upgrade(move |socket| {
        let (ws_tx, ws_rx) = socket.split();
        stream_feed(app, id, rx, ws_tx, ws_rx)
    }))
}

// --------------------
// Session loop
// --------------------

/// Serve one subscriber of `feed` until the feed stops, the peer leaves or
/// goes idle. Generic over the socket halves so the loop runs on any
/// message sink/stream pair.
pub async fn stream_feed<S, R, E>(
    app: AppState,
    feed: String,
    mut rx: watch::Receiver<MetricsSnapshot>,
    mut ws_tx: S,
    mut ws_rx: R,
) where
    S: Sink<Message> + Unpin,
    R: Stream<Item = Result<Message, E>> + Unpin,
{
    let metrics = app.metrics();
    metrics.ws_upgrades.inc(&[("feed", feed.as_str())]);
    metrics.ws_subscribers.inc(&[("feed", feed.as_str())]);
    tracing::debug!(%feed, "feed subscriber connected");

    let gw = &app.cfg().gateway;
    let ping_every = Duration::from_millis(gw.ping_interval_ms);
    let idle_timeout = Duration::from_millis(gw.idle_timeout_ms);

    let mut ping_tick = tokio::time::interval_at(Instant::now() + ping_every, ping_every);
    ping_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut last_activity = Instant::now();

    let current = *rx.borrow_and_update();
    if ws_tx
        .send(Message::Text(feed_json(&feed, "snapshot", &current)))
        .await
        .is_ok()
    {
        loop {
            tokio::select! {
                // feed ticks
                changed = rx.changed() => {
                    if changed.is_err() {
                        // feed stopped; a restart keeps the channel open
                        let _ = ws_tx.send(Message::Text(sys_error_json("NOT_FOUND", "feed stopped"))).await;
                        break;
                    }
                    let snap = *rx.borrow_and_update();
                    if ws_tx.send(Message::Text(feed_json(&feed, "tick", &snap))).await.is_err() {
                        break;
                    }
                }

                // inbound reader
                incoming = ws_rx.next() => {
                    let Some(Ok(msg)) = incoming else { break; };
                    last_activity = Instant::now();

                    match msg {
                        Message::Ping(payload) => {
                            let _ = ws_tx.send(Message::Pong(payload)).await;
                        }
                        Message::Close(_) => break,
                        // subscribers have nothing to say; anything else just counts as activity
                        _ => {}
                    }
                }

                // ping
                _ = ping_tick.tick() => {
                    if ws_tx.send(Message::Ping(Vec::new())).await.is_err() {
                        break;
                    }
                }

                // idle timeout
                _ = tokio::time::sleep(Duration::from_millis(250)) => {
                    if last_activity.elapsed() >= idle_timeout {
                        let _ = ws_tx.send(Message::Text(sys_error_json("TIMEOUT", "idle timeout"))).await;
                        break;
                    }
                }
            }
        }
    }

    metrics.ws_subscribers.dec(&[("feed", feed.as_str())]);
    tracing::debug!(%feed, "feed subscriber disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_envelope_uses_dashboard_field_names() {
        let s = feed_json("dashboard", "tick", &MetricsSnapshot::default());
        let v: serde_json::Value = serde_json::from_str(&s).unwrap();
        assert_eq!(v["svc"], "feed");
        assert_eq!(v["type"], "tick");
        assert_eq!(v["feed"], "dashboard");
        assert_eq!(v["data"]["population"], 218_541_065u64);
        assert_eq!(v["data"]["gdpGrowth"], 3.2);
        assert_eq!(v["data"]["securityLevel"], 67.5);
    }
}
