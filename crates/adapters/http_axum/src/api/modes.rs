//! JSON REST handlers for the mode switches.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use blindhub_app::ports::ControlSurface;
use blindhub_domain::error::{BlindHubError, NotFoundError};
use blindhub_domain::mode::{Mode, ModeSwitch, SwitchCommand};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for switching a mode.
#[derive(Deserialize)]
pub struct UpdateModeRequest {
    pub command: SwitchCommand,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ModeSwitch>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and update endpoints.
pub enum SwitchResponse {
    Ok(Json<ModeSwitch>),
}

impl IntoResponse for SwitchResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

fn parse_mode(raw: &str) -> Result<Mode, ApiError> {
    Mode::from_str(raw).map_err(|err| ApiError::from(BlindHubError::from(err)))
}

/// `GET /api/modes`
pub async fn list<C>(State(state): State<AppState<C>>) -> Result<ListResponse, ApiError>
where
    C: ControlSurface + Send + Sync + 'static,
{
    Ok(ListResponse::Ok(Json(state.control.modes().await)))
}

/// `GET /api/modes/:mode`
pub async fn get<C>(
    State(state): State<AppState<C>>,
    Path(raw): Path<String>,
) -> Result<SwitchResponse, ApiError>
where
    C: ControlSurface + Send + Sync + 'static,
{
    let mode = parse_mode(&raw)?;
    let switch = state
        .control
        .modes()
        .await
        .into_iter()
        .find(|switch| switch.mode == mode)
        .ok_or_else(|| {
            BlindHubError::from(NotFoundError {
                entity: "Mode",
                id: mode.to_string(),
            })
        })?;
    Ok(SwitchResponse::Ok(Json(switch)))
}

/// `PUT /api/modes/:mode`
pub async fn update<C>(
    State(state): State<AppState<C>>,
    Path(raw): Path<String>,
    Json(req): Json<UpdateModeRequest>,
) -> Result<SwitchResponse, ApiError>
where
    C: ControlSurface + Send + Sync + 'static,
{
    let mode = parse_mode(&raw)?;
    let switch = state.control.command_mode(mode, req.command).await?;
    tracing::info!(%mode, enabled = switch.enabled, "mode switched over http");
    Ok(SwitchResponse::Ok(Json(switch)))
}
