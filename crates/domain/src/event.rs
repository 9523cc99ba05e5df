//! Host events: what the outside world asks of the engine between ticks.

use serde::{Deserialize, Serialize};

use crate::alarm::AlarmEvent;
use crate::mode::{Mode, SwitchCommand};

/// A message carried by the in-process event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// A user toggled a mode switch.
    ModeCommand { mode: Mode, command: SwitchCommand },
    /// A smoke zone raised or cancelled an alarm.
    Alarm(AlarmEvent),
}

impl std::fmt::Display for HostEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ModeCommand { mode, command } => write!(f, "mode_command({mode}, {command:?})"),
            Self::Alarm(event) => write!(f, "alarm({:?})", event.kind),
        }
    }
}
