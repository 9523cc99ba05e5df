//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod control;
#[allow(clippy::missing_errors_doc)]
pub mod modes;
#[allow(clippy::missing_errors_doc)]
pub mod simulator;

use axum::Router;
use axum::routing::{get, post, put};

use blindhub_app::ports::{ControlSurface, HostSimulator};

use crate::state::{AppState, SimulatorState};

/// Build the `/api` sub-router.
pub fn routes<C>() -> Router<AppState<C>>
where
    C: ControlSurface + Send + Sync + 'static,
{
    Router::new()
        // Mode switches
        .route("/modes", get(modes::list::<C>))
        .route("/modes/{mode}", get(modes::get::<C>).put(modes::update::<C>))
        // Engine control
        .route("/tick", post(control::tick::<C>))
        .route("/alarm", post(control::alarm::<C>))
}

/// Build the simulator routes, mounted next to [`routes`] under `/api`.
pub fn simulator_routes<S>() -> Router<SimulatorState<S>>
where
    S: HostSimulator + Send + Sync + 'static,
{
    Router::new()
        .route("/sensors/{sensor}", put(simulator::set_reading::<S>))
        .route("/smoke/{sensor}", put(simulator::set_smoke_state::<S>))
        .route("/blinds/{device}", put(simulator::move_blind::<S>))
}
