//! Seed configuration for the simulated devices.

use serde::Deserialize;

use blindhub_domain::alarm::SmokeState;
use blindhub_domain::id::{DeviceRef, SensorRef};

/// Devices, sensors and smoke zones the virtual integration starts with.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    pub blinds: Vec<BlindSeed>,
    pub sensors: Vec<SensorSeed>,
    pub smoke_zones: Vec<SmokeZoneSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlindSeed {
    pub id: DeviceRef,
    /// Native level, `100` when omitted.
    #[serde(default = "BlindSeed::default_level")]
    pub level: u8,
    #[serde(default)]
    pub auto: bool,
}

impl BlindSeed {
    fn default_level() -> u8 {
        100
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SensorSeed {
    pub id: SensorRef,
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmokeZoneSeed {
    pub id: SensorRef,
    #[serde(default = "SmokeZoneSeed::default_state")]
    pub state: SmokeState,
}

impl SmokeZoneSeed {
    fn default_state() -> SmokeState {
        SmokeState::Idle
    }
}
