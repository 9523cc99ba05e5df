//! Cover devices: position scale, reported state and the move decision table.
//!
//! Positions use the native level scale of multilevel cover devices: any
//! level at or above [`Position::OPEN_THRESHOLD`] counts as open, everything
//! below as closed (fully at `0`, partially in between).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A cover level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(u8);

impl Position {
    /// Fully closed.
    pub const CLOSED: Self = Self(0);
    /// Sentinel asking for the fully open state.
    pub const OPEN: Self = Self(255);
    /// Levels at or above this value are considered open.
    pub const OPEN_THRESHOLD: u8 = 99;

    /// Build a rule target position in `0..=100`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::PositionOutOfRange`] above 100.
    pub fn new(level: u8) -> Result<Self, ValidationError> {
        if level > 100 {
            return Err(ValidationError::PositionOutOfRange(level));
        }
        Ok(Self(level))
    }

    /// Wrap a level reported by a device, without range checks.
    #[must_use]
    pub fn from_level(level: u8) -> Self {
        Self(level)
    }

    #[must_use]
    pub fn level(self) -> u8 {
        self.0
    }

    /// Whether this level counts as open.
    #[must_use]
    pub fn is_open(self) -> bool {
        self.0 >= Self::OPEN_THRESHOLD
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the registry reports about a cover device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    /// Set while the device is held by this engine rather than by a user.
    pub auto: bool,
    /// Last reported level.
    pub level: Position,
    /// Level the device is currently moving to, if any.
    pub target: Option<Position>,
}

/// A move command understood by cover devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "level", rename_all = "snake_case")]
pub enum DeviceCommand {
    /// Drive fully down (level `0`).
    Off,
    /// Drive fully up.
    On,
    /// Drive to an exact level.
    Exact(Position),
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => f.write_str("off"),
            Self::On => f.write_str("on"),
            Self::Exact(level) => write!(f, "exact({level})"),
        }
    }
}

/// One atomic change to a device: an optional command plus the new `auto` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceUpdate {
    pub command: Option<DeviceCommand>,
    pub auto: bool,
}

impl DeviceUpdate {
    /// Change only the `auto` flag.
    #[must_use]
    pub fn release(auto: bool) -> Self {
        Self {
            command: None,
            auto,
        }
    }
}

impl DeviceState {
    /// The level the device is at or heading to.
    #[must_use]
    pub fn effective_position(&self) -> Position {
        self.target.unwrap_or(self.level)
    }

    /// Decide what, if anything, must change to move towards `target`.
    ///
    /// Returns `None` when the device is already in the requested logical
    /// state, or when it is held by the user (open request on a device
    /// the engine does not hold) or by the engine (close request on an
    /// `auto` device). An open request on an already open `auto` device
    /// only clears the flag.
    #[must_use]
    pub fn plan_move(&self, target: Position) -> Option<DeviceUpdate> {
        let current = self.effective_position();

        if target.is_open() {
            if current.is_open() || !self.auto {
                return self.auto.then(|| DeviceUpdate::release(false));
            }
            return Some(DeviceUpdate {
                command: Some(DeviceCommand::On),
                auto: false,
            });
        }

        if !current.is_open() || self.auto {
            return None;
        }

        let command = if target == Position::CLOSED {
            DeviceCommand::Off
        } else {
            DeviceCommand::Exact(target)
        };
        Some(DeviceUpdate {
            command: Some(command),
            auto: true,
        })
    }

    /// Apply an update the way a device would once the command completes.
    #[must_use]
    pub fn applied(self, update: DeviceUpdate) -> Self {
        let level = match update.command {
            Some(DeviceCommand::Off) => Position::CLOSED,
            Some(DeviceCommand::On) => Position::from_level(Position::OPEN_THRESHOLD),
            Some(DeviceCommand::Exact(level)) => level,
            None => self.level,
        };
        Self {
            auto: update.auto,
            level,
            target: if update.command.is_some() {
                None
            } else {
                self.target
            },
        }
    }
}
