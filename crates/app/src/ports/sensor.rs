//! Sensor port: numeric readings and smoke-zone states.

use std::future::Future;

use blindhub_domain::alarm::SmokeZone;
use blindhub_domain::error::BlindHubError;
use blindhub_domain::id::SensorRef;

/// Read access to the host's sensors.
pub trait SensorReader {
    /// Latest numeric reading of `sensor`.
    ///
    /// `Ok(None)` means the sensor exists but has nothing usable right now
    /// (unknown, unavailable or non-numeric).
    fn read(
        &self,
        sensor: &SensorRef,
    ) -> impl Future<Output = Result<Option<f64>, BlindHubError>> + Send;

    /// Every smoke zone known to the host with its current state.
    fn smoke_zones(&self) -> impl Future<Output = Result<Vec<SmokeZone>, BlindHubError>> + Send;
}

impl<T: SensorReader + Send + Sync> SensorReader for std::sync::Arc<T> {
    fn read(
        &self,
        sensor: &SensorRef,
    ) -> impl Future<Output = Result<Option<f64>, BlindHubError>> + Send {
        (**self).read(sensor)
    }

    fn smoke_zones(&self) -> impl Future<Output = Result<Vec<SmokeZone>, BlindHubError>> + Send {
        (**self).smoke_zones()
    }
}
