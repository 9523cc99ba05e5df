//! Hand-driven access to the virtual integration.
//!
//! [`Simulator`] pairs the integration with the publisher that feeds the
//! engine's event bus, so a smoke zone changed from the outside reaches the
//! scheduler the same way a real host event would.

use std::sync::Arc;

use blindhub_app::ports::{EventPublisher, HostSimulator};
use blindhub_domain::alarm::SmokeState;
use blindhub_domain::device::{DeviceState, Position};
use blindhub_domain::error::BlindHubError;
use blindhub_domain::id::{DeviceRef, SensorRef};

use crate::VirtualIntegration;

pub struct Simulator<P> {
    integration: Arc<VirtualIntegration>,
    publisher: P,
}

impl<P> Simulator<P> {
    #[must_use]
    pub fn new(integration: Arc<VirtualIntegration>, publisher: P) -> Self {
        Self {
            integration,
            publisher,
        }
    }
}

impl<P: EventPublisher + Send + Sync> HostSimulator for Simulator<P> {
    async fn set_reading(
        &self,
        sensor: SensorRef,
        value: Option<f64>,
    ) -> Result<(), BlindHubError> {
        self.integration.set_reading(sensor, value);
        Ok(())
    }

    async fn set_smoke_state(
        &self,
        sensor: SensorRef,
        state: SmokeState,
    ) -> Result<(), BlindHubError> {
        self.integration
            .set_smoke_state(&self.publisher, &sensor, state)
            .await
    }

    async fn move_blind(
        &self,
        device: DeviceRef,
        level: Position,
    ) -> Result<DeviceState, BlindHubError> {
        self.integration.user_move(&device, level)
    }
}
