//! Smoke alarms: zone states and the override decision.

use serde::{Deserialize, Serialize};

use crate::id::SensorRef;

/// State reported by a smoke-zone sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmokeState {
    Alarm,
    Timeout,
    Idle,
}

impl SmokeState {
    /// Whether this zone counts as alarmed.
    #[must_use]
    pub fn is_alarmed(self) -> bool {
        matches!(self, Self::Alarm | Self::Timeout)
    }
}

/// One smoke-zone sensor and its current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmokeZone {
    pub sensor: SensorRef,
    pub state: SmokeState,
}

/// Kind of smoke event received from the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmEventKind {
    Alarm,
    Cancel,
}

/// A smoke alarm or cancel notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmEvent {
    pub kind: AlarmEventKind,
    /// Zone that raised the event, when known.
    #[serde(default)]
    pub source: Option<SensorRef>,
}

/// Whether the building counts as alarmed.
///
/// Every known zone must report `alarm` or `timeout`; a single idle zone
/// clears the condition. With no zones at all the condition holds.
#[must_use]
pub fn is_alarmed(zones: &[SmokeZone]) -> bool {
    zones.iter().all(|zone| zone.state.is_alarmed())
}
