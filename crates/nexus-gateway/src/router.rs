//! Axum router wiring.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .route("/v1/feeds", get(transport::http::list_feeds))
        .route("/v1/scenarios", get(transport::http::list_scenarios))
        .route("/v1/feeds/:id", get(transport::http::latest_snapshot))
        .route("/v1/feeds/:id/ws", get(transport::ws::ws_upgrade))
        .route(
            "/v1/simulations/:scenario",
            get(transport::http::simulation_status)
                .post(transport::http::simulation_start)
                .delete(transport::http::simulation_stop),
        )
        .with_state(state)
}
