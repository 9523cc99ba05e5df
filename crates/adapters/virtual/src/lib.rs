//! # blindhub-adapter-virtual
//!
//! Virtual integration that simulates the host around the blind engine.
//!
//! ## Provided pieces
//!
//! | Piece | Port | Behaviour |
//! |-------|------|-----------|
//! | [`VirtualIntegration`] | `DeviceRegistry`, `SensorReader` | In-memory blinds, numeric sensors and smoke zones |
//! | [`simulator::Simulator`] | `HostSimulator` | Drives the integration by hand and publishes smoke events |
//! | [`sun::AstronomicalSun`] | `SolarPositionProvider` | Sun position from latitude, longitude and UTC time |
//! | [`store::JsonFileModeStore`] | `ModeStateRepository` | Mode switches in a JSON file |
//! | [`store::InMemoryModeStore`] | `ModeStateRepository` | Mode switches in memory |
//!
//! ## Dependency rule
//!
//! Depends on `blindhub-app` (port traits) and `blindhub-domain` only.

pub mod config;
mod devices;
pub mod error;
pub mod simulator;
pub mod store;
pub mod sun;

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use blindhub_app::ports::{DeviceRegistry, EventPublisher, SensorReader};
use blindhub_domain::alarm::{AlarmEvent, SmokeState, SmokeZone};
use blindhub_domain::device::{DeviceState, DeviceUpdate, Position};
use blindhub_domain::error::{BlindHubError, NotFoundError};
use blindhub_domain::event::HostEvent;
use blindhub_domain::id::{DeviceRef, SensorRef};

use config::VirtualConfig;
use devices::{VirtualBlind, VirtualSensor, VirtualSmokeZone};

/// Simulated device registry and sensor host.
#[derive(Default)]
pub struct VirtualIntegration {
    blinds: HashMap<DeviceRef, VirtualBlind>,
    // grows when a reading arrives for an unseeded sensor
    sensors: RwLock<HashMap<SensorRef, VirtualSensor>>,
    // ordered so zone listings are stable
    zones: Vec<(SensorRef, VirtualSmokeZone)>,
}

impl VirtualIntegration {
    /// Build the integration from its seed configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a seeded blind level is above 100.
    pub fn from_config(config: &VirtualConfig) -> Result<Self, BlindHubError> {
        let mut integration = Self::default();
        for seed in &config.blinds {
            let level = Position::new(seed.level)?;
            integration
                .blinds
                .insert(seed.id.clone(), VirtualBlind::new(level, seed.auto));
        }
        for seed in &config.sensors {
            integration
                .sensors
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(seed.id.clone(), VirtualSensor::new(seed.value));
        }
        for seed in &config.smoke_zones {
            integration
                .zones
                .push((seed.id.clone(), VirtualSmokeZone::new(seed.state)));
        }
        tracing::debug!(
            blinds = integration.blinds.len(),
            sensors = integration.sensor_count(),
            zones = integration.zones.len(),
            "virtual integration ready"
        );
        Ok(integration)
    }

    /// Update a numeric sensor, creating it on first use.
    pub fn set_reading(&self, sensor: SensorRef, value: Option<f64>) {
        if let Some(existing) = self
            .sensors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&sensor)
        {
            existing.set(value);
            return;
        }
        tracing::debug!(sensor = %sensor, "virtual sensor created");
        self.sensors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(sensor)
            .or_default()
            .set(value);
    }

    /// Move a blind by hand.
    ///
    /// # Errors
    ///
    /// Returns [`BlindHubError::NotFound`] if the blind does not exist.
    pub fn user_move(
        &self,
        device: &DeviceRef,
        level: Position,
    ) -> Result<DeviceState, BlindHubError> {
        let blind = self.blind(device)?;
        let state = blind.user_move(level);
        tracing::info!(device = %device, level = %level, "blind moved by user");
        Ok(state)
    }

    /// Change a smoke zone's state and announce alarm or cancel on the bus
    /// when the zone crosses between idle and alarmed.
    ///
    /// # Errors
    ///
    /// Returns [`BlindHubError::NotFound`] if the zone does not exist, or the
    /// publisher's error.
    pub async fn set_smoke_state<P: EventPublisher>(
        &self,
        publisher: &P,
        sensor: &SensorRef,
        state: SmokeState,
    ) -> Result<(), BlindHubError> {
        let zone = self
            .zones
            .iter()
            .find(|(id, _)| id == sensor)
            .map(|(_, zone)| zone)
            .ok_or_else(|| NotFoundError {
                entity: "SmokeZone",
                id: sensor.to_string(),
            })?;
        let Some(kind) = zone.set(state) else {
            return Ok(());
        };
        tracing::info!(sensor = %sensor, ?state, ?kind, "smoke zone changed");
        publisher
            .publish(HostEvent::Alarm(AlarmEvent {
                kind,
                source: Some(sensor.clone()),
            }))
            .await
    }

    fn sensor_count(&self) -> usize {
        self.sensors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn blind(&self, device: &DeviceRef) -> Result<&VirtualBlind, BlindHubError> {
        self.blinds.get(device).ok_or_else(|| {
            NotFoundError {
                entity: "Device",
                id: device.to_string(),
            }
            .into()
        })
    }
}

impl DeviceRegistry for VirtualIntegration {
    async fn state(&self, device: &DeviceRef) -> Result<Option<DeviceState>, BlindHubError> {
        Ok(self.blinds.get(device).map(VirtualBlind::state))
    }

    async fn apply(&self, device: &DeviceRef, update: DeviceUpdate) -> Result<(), BlindHubError> {
        let state = self.blind(device)?.apply(update);
        tracing::debug!(
            device = %device,
            command = ?update.command,
            level = %state.level,
            auto = state.auto,
            "virtual blind updated"
        );
        Ok(())
    }
}

impl SensorReader for VirtualIntegration {
    async fn read(&self, sensor: &SensorRef) -> Result<Option<f64>, BlindHubError> {
        Ok(self
            .sensors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(sensor)
            .and_then(VirtualSensor::value))
    }

    async fn smoke_zones(&self) -> Result<Vec<SmokeZone>, BlindHubError> {
        Ok(self
            .zones
            .iter()
            .map(|(sensor, zone)| SmokeZone {
                sensor: sensor.clone(),
                state: zone.state(),
            })
            .collect())
    }
}
