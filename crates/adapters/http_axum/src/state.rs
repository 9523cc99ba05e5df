//! Shared application state for axum handlers.

use std::sync::Arc;

use blindhub_app::ports::{ControlSurface, HostSimulator};

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the control surface itself does not
/// need to be `Clone`; only the `Arc` is cloned.
pub struct AppState<C> {
    pub control: Arc<C>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            control: Arc::clone(&self.control),
        }
    }
}

impl<C: ControlSurface + Send + Sync + 'static> AppState<C> {
    pub fn new(control: Arc<C>) -> Self {
        Self { control }
    }
}

/// State of the simulator routes.
pub struct SimulatorState<S> {
    pub simulator: Arc<S>,
}

impl<S> Clone for SimulatorState<S> {
    fn clone(&self) -> Self {
        Self {
            simulator: Arc::clone(&self.simulator),
        }
    }
}

impl<S: HostSimulator + Send + Sync + 'static> SimulatorState<S> {
    pub fn new(simulator: Arc<S>) -> Self {
        Self { simulator }
    }
}
