//! Rules: per-zone threshold automations for the insulation and shade modes.
//!
//! A rule owns a list of devices and a closed position. Every tick the
//! engine feeds it fresh readings together with its current active flag,
//! and the rule answers with at most one [`Transition`].

mod insulation;
mod set;
mod shade;

pub use insulation::{InsulationRule, InsulationRuleBuilder};
pub use set::{RuleSet, RuleTransition};
pub use shade::{InsideTemperature, ShadeReadings, ShadeRule, ShadeRuleBuilder};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::device::Position;
use crate::error::ValidationError;
use crate::id::DeviceRef;

/// Edge of a rule's hysteresis state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// The rule starts holding its devices closed.
    Activate,
    /// The rule lets go and reopens its devices.
    Deactivate,
}

impl Transition {
    /// Position the rule's devices must move to on this edge.
    #[must_use]
    pub fn target(self, closed: Position) -> Position {
        match self {
            Self::Activate => closed,
            Self::Deactivate => Position::OPEN,
        }
    }

    /// Rule state after the edge.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Activate)
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Activate => f.write_str("activate"),
            Self::Deactivate => f.write_str("deactivate"),
        }
    }
}

fn validate_devices(devices: &[DeviceRef]) -> Result<(), ValidationError> {
    if devices.is_empty() {
        return Err(ValidationError::NoDevices);
    }
    let mut seen = HashSet::new();
    for device in devices {
        if !seen.insert(device) {
            return Err(ValidationError::DuplicateDevice(device.to_string()));
        }
    }
    Ok(())
}

fn validate_position(position: Position) -> Result<(), ValidationError> {
    let position = Position::new(position.level())?;
    if position.is_open() {
        return Err(ValidationError::OpenRulePosition(position.level()));
    }
    Ok(())
}

fn validate_threshold(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteThreshold(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: &str) -> DeviceRef {
        DeviceRef::new(id).unwrap()
    }

    #[test]
    fn should_target_rule_position_when_activating() {
        let closed = Position::new(20).unwrap();
        assert_eq!(Transition::Activate.target(closed), closed);
    }

    #[test]
    fn should_target_open_sentinel_when_deactivating() {
        assert_eq!(
            Transition::Deactivate.target(Position::CLOSED),
            Position::OPEN
        );
    }

    #[test]
    fn should_reject_empty_device_list() {
        assert_eq!(validate_devices(&[]), Err(ValidationError::NoDevices));
    }

    #[test]
    fn should_reject_duplicate_devices() {
        let result = validate_devices(&[device("a"), device("b"), device("a")]);
        assert_eq!(result, Err(ValidationError::DuplicateDevice("a".into())));
    }

    #[test]
    fn should_reject_rule_positions_that_count_as_open() {
        assert_eq!(
            validate_position(Position::from_level(99)),
            Err(ValidationError::OpenRulePosition(99))
        );
        assert_eq!(
            validate_position(Position::from_level(100)),
            Err(ValidationError::OpenRulePosition(100))
        );
        assert_eq!(
            validate_position(Position::from_level(101)),
            Err(ValidationError::PositionOutOfRange(101))
        );
    }

    #[test]
    fn should_accept_partially_closed_rule_positions() {
        assert!(validate_position(Position::CLOSED).is_ok());
        assert!(validate_position(Position::from_level(98)).is_ok());
    }

    #[test]
    fn should_reject_nan_threshold() {
        assert!(validate_threshold(f64::NAN).is_err());
        assert!(validate_threshold(21.5).is_ok());
    }
}
