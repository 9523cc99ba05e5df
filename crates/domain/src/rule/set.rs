use serde::{Deserialize, Serialize};

use super::{InsulationRule, ShadeRule, Transition};
use crate::error::{BlindHubError, ValidationError};
use crate::id::DeviceRef;
use crate::mode::Mode;
use crate::sensor::SensorBindings;

/// Rule lists for both modes.
///
/// A mode with `None` is not configured for this zone: it cannot be switched
/// on and is never evaluated. An empty list is configured but inert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub insulation: Option<Vec<InsulationRule>>,
    #[serde(default)]
    pub shade: Option<Vec<ShadeRule>>,
}

impl RuleSet {
    #[must_use]
    pub fn is_configured(&self, mode: Mode) -> bool {
        match mode {
            Mode::Insulation => self.insulation.is_some(),
            Mode::Shade => self.shade.is_some(),
        }
    }

    /// Number of rules in `mode`'s list, zero when not configured.
    #[must_use]
    pub fn rule_count(&self, mode: Mode) -> usize {
        match mode {
            Mode::Insulation => self.insulation.as_ref().map_or(0, Vec::len),
            Mode::Shade => self.shade.as_ref().map_or(0, Vec::len),
        }
    }

    /// Devices owned by rule `index` of `mode`.
    #[must_use]
    pub fn devices(&self, mode: Mode, index: usize) -> &[DeviceRef] {
        let devices = match mode {
            Mode::Insulation => self
                .insulation
                .as_ref()
                .and_then(|rules| rules.get(index))
                .map(|rule| rule.devices.as_slice()),
            Mode::Shade => self
                .shade
                .as_ref()
                .and_then(|rules| rules.get(index))
                .map(|rule| rule.devices.as_slice()),
        };
        devices.unwrap_or_default()
    }

    /// Every device referenced by any rule of either mode, in first-seen
    /// order and without repetition.
    #[must_use]
    pub fn tracked_devices(&self) -> Vec<DeviceRef> {
        let insulation = self.insulation.iter().flatten().map(|r| &r.devices);
        let shade = self.shade.iter().flatten().map(|r| &r.devices);
        let mut tracked: Vec<DeviceRef> = Vec::new();
        for device in insulation.chain(shade).flatten() {
            if !tracked.contains(device) {
                tracked.push(device.clone());
            }
        }
        tracked
    }

    /// Validate every rule, and check that rules with a UV threshold have a
    /// UV sensor to read from.
    ///
    /// # Errors
    ///
    /// Returns [`BlindHubError::Validation`] for the first problem found.
    pub fn validate(&self, sensors: &SensorBindings) -> Result<(), BlindHubError> {
        for rule in self.insulation.iter().flatten() {
            rule.validate()?;
        }
        for rule in self.shade.iter().flatten() {
            rule.validate()?;
            if rule.uv.is_some() && sensors.uv.is_none() {
                return Err(ValidationError::MissingUvSensor.into());
            }
        }
        Ok(())
    }
}

/// A rule edge produced during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTransition {
    pub mode: Mode,
    pub rule: usize,
    pub transition: Transition,
}

impl std::fmt::Display for RuleTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}] {}", self.mode, self.rule, self.transition)
    }
}
