//! JSON REST handlers that drive the engine directly.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use blindhub_app::alarm_override::AlarmOutcome;
use blindhub_app::ports::ControlSurface;
use blindhub_domain::alarm::AlarmEvent;
use blindhub_domain::rule::RuleTransition;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the tick endpoint.
pub enum TickResponse {
    Ok(Json<Vec<RuleTransition>>),
}

impl IntoResponse for TickResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the alarm endpoint.
pub enum AlarmResponse {
    Ok(Json<AlarmOutcome>),
}

impl IntoResponse for AlarmResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/tick`
///
/// Runs an evaluation pass right away and returns the rules that changed.
pub async fn tick<C>(State(state): State<AppState<C>>) -> Result<TickResponse, ApiError>
where
    C: ControlSurface + Send + Sync + 'static,
{
    let transitions = state.control.tick().await;
    Ok(TickResponse::Ok(Json(transitions)))
}

/// `POST /api/alarm`
pub async fn alarm<C>(
    State(state): State<AppState<C>>,
    Json(event): Json<AlarmEvent>,
) -> Result<AlarmResponse, ApiError>
where
    C: ControlSurface + Send + Sync + 'static,
{
    let outcome = state.control.alarm(event).await;
    Ok(AlarmResponse::Ok(Json(outcome)))
}
