//! Logical sensor bindings shared by all rules.

use serde::{Deserialize, Serialize};

use crate::id::SensorRef;

/// Which registry sensors provide the shared readings.
///
/// Forecast sensors are optional: when absent or silent the current outside
/// temperature stands in for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorBindings {
    pub outside_temperature: SensorRef,
    #[serde(default)]
    pub forecast_high: Option<SensorRef>,
    #[serde(default)]
    pub forecast_low: Option<SensorRef>,
    #[serde(default)]
    pub uv: Option<SensorRef>,
}

impl SensorBindings {
    /// Bindings with only an outside temperature sensor.
    #[must_use]
    pub fn outside_only(outside_temperature: SensorRef) -> Self {
        Self {
            outside_temperature,
            forecast_high: None,
            forecast_low: None,
            uv: None,
        }
    }
}
