//! In-memory port implementations shared by the use-case tests.

use std::collections::HashMap;
use std::sync::Mutex;

use blindhub_domain::alarm::{SmokeState, SmokeZone};
use blindhub_domain::device::{DeviceCommand, DeviceState, DeviceUpdate, Position};
use blindhub_domain::error::{BlindHubError, NotFoundError};
use blindhub_domain::id::{DeviceRef, SensorRef};
use blindhub_domain::mode::{Mode, ModeSwitch};
use blindhub_domain::solar::SolarPosition;
use blindhub_domain::time::Timestamp;

use crate::ports::{Clock, DeviceRegistry, ModeStateRepository, SensorReader, SolarPositionProvider};

pub fn device(id: &str) -> DeviceRef {
    DeviceRef::new(id).unwrap()
}

pub fn sensor(id: &str) -> SensorRef {
    SensorRef::new(id).unwrap()
}

pub fn at(hour: u32, minute: u32) -> Timestamp {
    chrono::NaiveDate::from_ymd_opt(2024, 11, 12)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

#[derive(Default)]
pub struct FakeSensors {
    readings: Mutex<HashMap<SensorRef, f64>>,
    zones: Mutex<Vec<SmokeZone>>,
    broken: Mutex<bool>,
}

impl FakeSensors {
    pub fn set(&self, id: &str, value: f64) {
        self.readings.lock().unwrap().insert(sensor(id), value);
    }

    pub fn clear(&self, id: &str) {
        self.readings.lock().unwrap().remove(&sensor(id));
    }

    pub fn set_zone(&self, id: &str, state: SmokeState) {
        let mut zones = self.zones.lock().unwrap();
        let sensor = sensor(id);
        match zones.iter_mut().find(|zone| zone.sensor == sensor) {
            Some(zone) => zone.state = state,
            None => zones.push(SmokeZone { sensor, state }),
        }
    }

    pub fn break_zones(&self) {
        *self.broken.lock().unwrap() = true;
    }
}

impl SensorReader for FakeSensors {
    async fn read(&self, sensor: &SensorRef) -> Result<Option<f64>, BlindHubError> {
        Ok(self.readings.lock().unwrap().get(sensor).copied())
    }

    async fn smoke_zones(&self) -> Result<Vec<SmokeZone>, BlindHubError> {
        if *self.broken.lock().unwrap() {
            return Err(BlindHubError::Storage("zones unreachable".into()));
        }
        Ok(self.zones.lock().unwrap().clone())
    }
}

pub struct FixedSun(Mutex<Option<SolarPosition>>);

impl FixedSun {
    pub fn new(altitude: f64, azimuth: f64) -> Self {
        Self(Mutex::new(Some(SolarPosition { altitude, azimuth })))
    }

    pub fn clear(&self) {
        *self.0.lock().unwrap() = None;
    }

    pub fn set(&self, altitude: f64, azimuth: f64) {
        *self.0.lock().unwrap() = Some(SolarPosition { altitude, azimuth });
    }
}

impl SolarPositionProvider for FixedSun {
    async fn position(&self) -> Result<SolarPosition, BlindHubError> {
        self.0
            .lock()
            .unwrap()
            .ok_or_else(|| BlindHubError::Storage("sun unavailable".into()))
    }
}

pub struct FixedClock(Mutex<Timestamp>);

impl FixedClock {
    pub fn new(now: Timestamp) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: Timestamp) {
        *self.0.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.0.lock().unwrap()
    }
}

/// Registry that records every command and simulates its effect.
#[derive(Default)]
pub struct FakeRegistry {
    devices: Mutex<HashMap<DeviceRef, DeviceState>>,
    commands: Mutex<Vec<(DeviceRef, DeviceCommand)>>,
}

impl FakeRegistry {
    pub fn with_open(ids: &[&str]) -> Self {
        let registry = Self::default();
        for id in ids {
            registry.insert(
                id,
                DeviceState {
                    auto: false,
                    level: Position::from_level(100),
                    target: None,
                },
            );
        }
        registry
    }

    pub fn insert(&self, id: &str, state: DeviceState) {
        self.devices.lock().unwrap().insert(device(id), state);
    }

    pub fn get(&self, id: &str) -> DeviceState {
        *self.devices.lock().unwrap().get(&device(id)).unwrap()
    }

    pub fn commands(&self) -> Vec<(DeviceRef, DeviceCommand)> {
        self.commands.lock().unwrap().clone()
    }

    pub fn reset_commands(&self) {
        self.commands.lock().unwrap().clear();
    }
}

impl DeviceRegistry for FakeRegistry {
    async fn state(&self, device: &DeviceRef) -> Result<Option<DeviceState>, BlindHubError> {
        Ok(self.devices.lock().unwrap().get(device).copied())
    }

    async fn apply(&self, device: &DeviceRef, update: DeviceUpdate) -> Result<(), BlindHubError> {
        let mut devices = self.devices.lock().unwrap();
        let state = devices.get_mut(device).ok_or_else(|| NotFoundError {
            entity: "Device",
            id: device.to_string(),
        })?;
        *state = state.applied(update);
        if let Some(command) = update.command {
            self.commands.lock().unwrap().push((device.clone(), command));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryModeStore {
    switches: Mutex<HashMap<Mode, ModeSwitch>>,
    saves: Mutex<usize>,
}

impl InMemoryModeStore {
    pub fn with(switches: Vec<ModeSwitch>) -> Self {
        let store = Self::default();
        for switch in switches {
            store.switches.lock().unwrap().insert(switch.mode, switch);
        }
        store
    }

    pub fn get(&self, mode: Mode) -> Option<ModeSwitch> {
        self.switches.lock().unwrap().get(&mode).cloned()
    }

    pub fn saves(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl ModeStateRepository for InMemoryModeStore {
    async fn load(&self, mode: Mode) -> Result<Option<ModeSwitch>, BlindHubError> {
        Ok(self.switches.lock().unwrap().get(&mode).cloned())
    }

    async fn save(&self, switch: &ModeSwitch) -> Result<(), BlindHubError> {
        self.switches
            .lock()
            .unwrap()
            .insert(switch.mode, switch.clone());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}
