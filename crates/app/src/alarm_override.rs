//! Smoke alarm override: open every tracked cover while the building is alarmed.
//!
//! Opened covers are marked `auto` so the normal engine may close them again
//! later. Once the alarm clears every tracked cover is handed back to the
//! user, even those the engine had closed before the alarm.

use blindhub_domain::alarm::{self, AlarmEvent, AlarmEventKind};
use blindhub_domain::device::{DeviceCommand, DeviceUpdate};
use blindhub_domain::rule::RuleSet;
use serde::Serialize;

use crate::actuator::{DeviceActuator, MoveReport};
use crate::ports::{DeviceRegistry, SensorReader};

/// Result of handling one alarm event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlarmOutcome {
    /// Whether the smoke zones could be read and the devices were updated.
    pub applied: bool,
    /// Whether the building counted as alarmed.
    pub alarmed: bool,
    pub devices: MoveReport,
}

pub struct AlarmOverride<S> {
    sensors: S,
}

impl<S: SensorReader + Sync> AlarmOverride<S> {
    pub fn new(sensors: S) -> Self {
        Self { sensors }
    }

    /// React to an alarm or cancel event.
    ///
    /// The event kind is only informative: the decision is always taken from
    /// the current state of every smoke zone.
    #[tracing::instrument(skip_all, fields(kind = ?event.kind))]
    pub async fn handle<D: DeviceRegistry + Sync>(
        &self,
        event: &AlarmEvent,
        rules: &RuleSet,
        actuator: &DeviceActuator<D>,
    ) -> AlarmOutcome {
        let zones = match self.sensors.smoke_zones().await {
            Ok(zones) => zones,
            Err(err) => {
                tracing::error!(error = %err, "cannot read smoke zones, devices left as is");
                return AlarmOutcome::default();
            }
        };
        let alarmed = alarm::is_alarmed(&zones);
        if event.kind == AlarmEventKind::Alarm && !alarmed {
            tracing::debug!(zones = zones.len(), "alarm event while some zones are idle");
        }

        let update = if alarmed {
            DeviceUpdate {
                command: Some(DeviceCommand::On),
                auto: true,
            }
        } else {
            DeviceUpdate::release(false)
        };
        let devices = actuator.force(&rules.tracked_devices(), update).await;

        if alarmed {
            tracing::warn!(opened = devices.commanded, "smoke alarm, covers opened");
        } else {
            tracing::info!(released = devices.released, "smoke alarm cleared, covers released");
        }
        AlarmOutcome {
            applied: true,
            alarmed,
            devices,
        }
    }
}
