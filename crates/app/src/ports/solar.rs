//! Solar port: where the sun is right now.

use std::future::Future;

use blindhub_domain::error::BlindHubError;
use blindhub_domain::solar::SolarPosition;

pub trait SolarPositionProvider {
    /// Current sun altitude and azimuth, in degrees.
    fn position(&self) -> impl Future<Output = Result<SolarPosition, BlindHubError>> + Send;
}

impl<T: SolarPositionProvider + Send + Sync> SolarPositionProvider for std::sync::Arc<T> {
    fn position(&self) -> impl Future<Output = Result<SolarPosition, BlindHubError>> + Send {
        (**self).position()
    }
}
