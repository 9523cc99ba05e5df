//! Simulator port: lets an outer surface play the host's part by changing
//! sensor readings, smoke zones and cover positions.

use std::future::Future;

use blindhub_domain::alarm::SmokeState;
use blindhub_domain::device::{DeviceState, Position};
use blindhub_domain::error::BlindHubError;
use blindhub_domain::id::{DeviceRef, SensorRef};

/// Driving port implemented by simulated integrations.
pub trait HostSimulator {
    /// Store a numeric reading; `None` marks the sensor unavailable.
    fn set_reading(
        &self,
        sensor: SensorRef,
        value: Option<f64>,
    ) -> impl Future<Output = Result<(), BlindHubError>> + Send;

    /// Change a smoke zone and announce alarm or cancel on the bus when the
    /// zone crosses between idle and alarmed.
    ///
    /// # Errors
    ///
    /// Returns [`BlindHubError::NotFound`] when the zone does not exist.
    fn set_smoke_state(
        &self,
        sensor: SensorRef,
        state: SmokeState,
    ) -> impl Future<Output = Result<(), BlindHubError>> + Send;

    /// Move a cover by hand, as a user at the wall switch would.
    ///
    /// # Errors
    ///
    /// Returns [`BlindHubError::NotFound`] when the cover does not exist.
    fn move_blind(
        &self,
        device: DeviceRef,
        level: Position,
    ) -> impl Future<Output = Result<DeviceState, BlindHubError>> + Send;
}

impl<T: HostSimulator + Send + Sync> HostSimulator for std::sync::Arc<T> {
    fn set_reading(
        &self,
        sensor: SensorRef,
        value: Option<f64>,
    ) -> impl Future<Output = Result<(), BlindHubError>> + Send {
        (**self).set_reading(sensor, value)
    }

    fn set_smoke_state(
        &self,
        sensor: SensorRef,
        state: SmokeState,
    ) -> impl Future<Output = Result<(), BlindHubError>> + Send {
        (**self).set_smoke_state(sensor, state)
    }

    fn move_blind(
        &self,
        device: DeviceRef,
        level: Position,
    ) -> impl Future<Output = Result<DeviceState, BlindHubError>> + Send {
        (**self).move_blind(device, level)
    }
}
