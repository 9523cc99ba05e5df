//! Insulation rule: close the covers on cold evenings.

use serde::{Deserialize, Serialize};

use crate::device::Position;
use crate::error::{BlindHubError, ValidationError};
use crate::id::DeviceRef;
use crate::time::{TimeOfDay, TimeWindow, Timestamp};

use super::{Transition, validate_devices, validate_position, validate_threshold};

/// Closes `devices` when it is colder than `temperature_outside` during
/// the first half of the daily window, and reopens them once the window ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsulationRule {
    pub devices: Vec<DeviceRef>,
    pub position: Position,
    /// Outside temperature below which the rule closes the covers.
    pub temperature_outside: f64,
    pub time_from: TimeOfDay,
    pub time_to: TimeOfDay,
}

impl InsulationRule {
    /// Create a builder for constructing an [`InsulationRule`].
    #[must_use]
    pub fn builder() -> InsulationRuleBuilder {
        InsulationRuleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`BlindHubError::Validation`] when the device list is empty or
    /// has duplicates, the position is above 100, or the threshold is not finite.
    pub fn validate(&self) -> Result<(), BlindHubError> {
        validate_devices(&self.devices)?;
        validate_position(self.position)?;
        validate_threshold(self.temperature_outside)?;
        Ok(())
    }

    #[must_use]
    pub fn period(&self) -> TimeWindow {
        TimeWindow::new(self.time_from, self.time_to)
    }

    /// Decide the next edge given the coldest expected temperature.
    ///
    /// Activation only happens in the first half of the window so a user
    /// reopening the covers late in the evening is not overridden.
    #[must_use]
    pub fn evaluate(&self, active: bool, temperature: f64, now: Timestamp) -> Option<Transition> {
        let period = self.period();
        let in_period = period.contains(now);

        if active {
            return (!in_period).then_some(Transition::Deactivate);
        }

        let in_period_start = period.in_first_half(now);
        (temperature < self.temperature_outside && in_period && in_period_start)
            .then_some(Transition::Activate)
    }
}

/// Step-by-step builder for [`InsulationRule`].
#[derive(Debug, Default)]
pub struct InsulationRuleBuilder {
    devices: Vec<DeviceRef>,
    position: Option<Position>,
    temperature_outside: Option<f64>,
    time_from: Option<TimeOfDay>,
    time_to: Option<TimeOfDay>,
}

impl InsulationRuleBuilder {
    #[must_use]
    pub fn device(mut self, device: DeviceRef) -> Self {
        self.devices.push(device);
        self
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn temperature_outside(mut self, threshold: f64) -> Self {
        self.temperature_outside = Some(threshold);
        self
    }

    #[must_use]
    pub fn window(mut self, from: TimeOfDay, to: TimeOfDay) -> Self {
        self.time_from = Some(from);
        self.time_to = Some(to);
        self
    }

    /// Consume the builder, validate, and return an [`InsulationRule`].
    ///
    /// # Errors
    ///
    /// Returns [`BlindHubError::Validation`] if the window is missing or any
    /// invariant fails.
    pub fn build(self) -> Result<InsulationRule, BlindHubError> {
        let (Some(time_from), Some(time_to)) = (self.time_from, self.time_to) else {
            return Err(ValidationError::IncompleteTimeWindow.into());
        };
        let rule = InsulationRule {
            devices: self.devices,
            position: self.position.unwrap_or(Position::CLOSED),
            temperature_outside: self.temperature_outside.unwrap_or(f64::NAN),
            time_from,
            time_to,
        };
        rule.validate()?;
        Ok(rule)
    }
}
