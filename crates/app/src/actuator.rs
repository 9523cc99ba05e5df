//! Device actuator: moves covers while respecting user overrides.
//!
//! The `auto` flag on each device tells whose position it is. The engine
//! only closes covers nobody holds and only reopens covers it closed
//! itself; see [`DeviceState::plan_move`].

use blindhub_domain::device::{DeviceState, DeviceUpdate, Position};
use blindhub_domain::error::{BlindHubError, NotFoundError};
use blindhub_domain::id::DeviceRef;
use serde::Serialize;

use crate::ports::DeviceRegistry;

/// What happened to a batch of devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    /// Devices that received a movement command.
    pub commanded: usize,
    /// Devices whose `auto` flag changed without moving.
    pub released: usize,
    /// Devices already in place or held by the user.
    pub unchanged: usize,
    /// Devices that are unknown to the registry or rejected the update.
    pub failed: usize,
}

impl MoveReport {
    fn record(&mut self, update: Option<DeviceUpdate>) {
        match update {
            Some(DeviceUpdate {
                command: Some(_), ..
            }) => self.commanded += 1,
            Some(_) => self.released += 1,
            None => self.unchanged += 1,
        }
    }
}

/// Applies positions to the devices of a rule.
pub struct DeviceActuator<D> {
    registry: D,
}

impl<D: DeviceRegistry> DeviceActuator<D> {
    pub fn new(registry: D) -> Self {
        Self { registry }
    }

    /// Move every device towards `target`.
    ///
    /// Devices are handled independently: an unknown or failing device is
    /// logged and skipped, the others still move.
    #[tracing::instrument(skip_all, fields(target = %target, count = devices.len()))]
    pub async fn move_devices(&self, devices: &[DeviceRef], target: Position) -> MoveReport {
        let mut report = MoveReport::default();
        for device in devices {
            match self.move_device(device, target).await {
                Ok(update) => report.record(update),
                Err(err) => {
                    tracing::warn!(device = %device, error = %err, "skipping device");
                    report.failed += 1;
                }
            }
        }
        report
    }

    async fn move_device(
        &self,
        device: &DeviceRef,
        target: Position,
    ) -> Result<Option<DeviceUpdate>, BlindHubError> {
        let state = self.current(device).await?;
        let Some(update) = state.plan_move(target) else {
            tracing::debug!(device = %device, "device left as is");
            return Ok(None);
        };
        self.registry.apply(device, update).await?;
        tracing::debug!(
            device = %device,
            command = ?update.command,
            auto = update.auto,
            "device updated"
        );
        Ok(Some(update))
    }

    /// Apply the same update to every device, ignoring their current state.
    ///
    /// Used by the smoke alarm override, which must win over user holds.
    #[tracing::instrument(skip_all, fields(command = ?update.command, auto = update.auto))]
    pub async fn force(&self, devices: &[DeviceRef], update: DeviceUpdate) -> MoveReport {
        let mut report = MoveReport::default();
        for device in devices {
            match self.registry.apply(device, update).await {
                Ok(()) => report.record(Some(update)),
                Err(err) => {
                    tracing::warn!(device = %device, error = %err, "skipping device");
                    report.failed += 1;
                }
            }
        }
        report
    }

    async fn current(&self, device: &DeviceRef) -> Result<DeviceState, BlindHubError> {
        self.registry.state(device).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Device",
                id: device.to_string(),
            }
            .into()
        })
    }
}
