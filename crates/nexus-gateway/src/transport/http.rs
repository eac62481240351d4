use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use nexus_core::error::{ClientCode, NexusError};
use nexus_core::{MetricsSnapshot, Scenario, ScenarioInfo};

use crate::app_state::AppState;
use crate::sim::RunState;

/// `NexusError` rendered as a JSON error body.
#[derive(Debug)]
pub struct ApiError(pub NexusError);

impl From<NexusError> for ApiError {
    fn from(e: NexusError) -> Self {
        Self(e)
    }
}

pub(crate) fn status_for(code: ClientCode) -> StatusCode {
    match code {
        ClientCode::BadRequest => StatusCode::BAD_REQUEST,
        ClientCode::NotFound => StatusCode::NOT_FOUND,
        ClientCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
        ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let body = Json(json!({
            "code": code.as_str(),
            "msg": self.0.to_string(),
        }));
        (status_for(code), body).into_response()
    }
}

pub async fn list_feeds(State(app): State<AppState>) -> Json<Vec<String>> {
    Json(app.feeds().ids())
}

pub async fn latest_snapshot(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MetricsSnapshot>, ApiError> {
    Ok(Json(app.feeds().latest(&id)?))
}

/// Catalog entry of one scenario, keyed by its id.
#[derive(Debug, Serialize)]
pub struct ScenarioListing {
    pub id: Scenario,
    #[serde(flatten)]
    pub info: ScenarioInfo,
}

pub async fn list_scenarios() -> Json<Vec<ScenarioListing>> {
    Json(
        Scenario::ALL
            .into_iter()
            .map(|id| ScenarioListing { id, info: id.info() })
            .collect(),
    )
}

// an unknown id is a malformed request, not a missing resource
fn parse_scenario(raw: &str) -> Result<Scenario, ApiError> {
    Ok(raw.parse::<Scenario>()?)
}

pub async fn simulation_status(
    State(app): State<AppState>,
    Path(scenario): Path<String>,
) -> Result<Json<RunState>, ApiError> {
    let scenario = parse_scenario(&scenario)?;
    Ok(Json(app.sims().status(scenario)))
}

pub async fn simulation_start(
    State(app): State<AppState>,
    Path(scenario): Path<String>,
) -> Result<(StatusCode, Json<RunState>), ApiError> {
    if app.is_draining() {
        return Err(ApiError(NexusError::BadRequest("gateway is draining".into())));
    }
    let scenario = parse_scenario(&scenario)?;
    Ok((StatusCode::ACCEPTED, Json(app.start_simulation(scenario))))
}

pub async fn simulation_stop(
    State(app): State<AppState>,
    Path(scenario): Path<String>,
) -> Result<Json<RunState>, ApiError> {
    let scenario = parse_scenario(&scenario)?;
    Ok(Json(app.sims().stop(scenario)))
}
