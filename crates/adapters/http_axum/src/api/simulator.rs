//! JSON REST handlers that play the host: sensor readings, smoke zones and
//! manual cover moves.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use blindhub_app::ports::HostSimulator;
use blindhub_domain::alarm::SmokeState;
use blindhub_domain::device::{DeviceState, Position};
use blindhub_domain::error::BlindHubError;
use blindhub_domain::id::{DeviceRef, SensorRef};

use crate::error::ApiError;
use crate::state::SimulatorState;

/// Request body for a sensor reading; `null` marks the sensor unavailable.
#[derive(Deserialize)]
pub struct ReadingRequest {
    pub value: Option<f64>,
}

#[derive(Serialize)]
pub struct ReadingBody {
    pub sensor: SensorRef,
    pub value: Option<f64>,
}

#[derive(Deserialize)]
pub struct SmokeRequest {
    pub state: SmokeState,
}

#[derive(Serialize)]
pub struct SmokeBody {
    pub sensor: SensorRef,
    pub state: SmokeState,
}

/// Request body for a manual move, on the native `0..=100` scale.
#[derive(Deserialize)]
pub struct MoveRequest {
    pub level: u8,
}

/// Possible responses from the simulator endpoints.
pub enum SimulatorResponse {
    Reading(Json<ReadingBody>),
    Smoke(Json<SmokeBody>),
    Moved(Json<DeviceState>),
}

impl IntoResponse for SimulatorResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Reading(json) => json.into_response(),
            Self::Smoke(json) => json.into_response(),
            Self::Moved(json) => json.into_response(),
        }
    }
}

fn parse_sensor(raw: String) -> Result<SensorRef, ApiError> {
    SensorRef::new(raw).map_err(|err| ApiError::from(BlindHubError::from(err)))
}

/// `PUT /api/sensors/:sensor`
pub async fn set_reading<S>(
    State(state): State<SimulatorState<S>>,
    Path(raw): Path<String>,
    Json(body): Json<ReadingRequest>,
) -> Result<SimulatorResponse, ApiError>
where
    S: HostSimulator + Send + Sync + 'static,
{
    let sensor = parse_sensor(raw)?;
    state
        .simulator
        .set_reading(sensor.clone(), body.value)
        .await?;
    Ok(SimulatorResponse::Reading(Json(ReadingBody {
        sensor,
        value: body.value,
    })))
}

/// `PUT /api/smoke/:sensor`
///
/// Alarm and cancel events reach the engine through the event bus, not
/// through this response.
pub async fn set_smoke_state<S>(
    State(state): State<SimulatorState<S>>,
    Path(raw): Path<String>,
    Json(body): Json<SmokeRequest>,
) -> Result<SimulatorResponse, ApiError>
where
    S: HostSimulator + Send + Sync + 'static,
{
    let sensor = parse_sensor(raw)?;
    state
        .simulator
        .set_smoke_state(sensor.clone(), body.state)
        .await?;
    Ok(SimulatorResponse::Smoke(Json(SmokeBody {
        sensor,
        state: body.state,
    })))
}

/// `PUT /api/blinds/:device`
pub async fn move_blind<S>(
    State(state): State<SimulatorState<S>>,
    Path(raw): Path<String>,
    Json(body): Json<MoveRequest>,
) -> Result<SimulatorResponse, ApiError>
where
    S: HostSimulator + Send + Sync + 'static,
{
    let device = DeviceRef::new(raw).map_err(BlindHubError::from)?;
    let level = Position::new(body.level).map_err(BlindHubError::from)?;
    let moved = state.simulator.move_blind(device, level).await?;
    Ok(SimulatorResponse::Moved(Json(moved)))
}
