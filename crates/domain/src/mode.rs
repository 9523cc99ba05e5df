//! Modes: the two mutually exclusive top-level behaviours and their switches.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One of the two top-level behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Close covers to keep heat in when it is cold.
    Insulation,
    /// Close covers to keep direct sun out when it is hot.
    Shade,
}

impl Mode {
    /// Evaluation order within a tick.
    pub const ALL: [Self; 2] = [Self::Insulation, Self::Shade];

    /// The mode that must be off while this one is on.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Insulation => Self::Shade,
            Self::Shade => Self::Insulation,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insulation => f.write_str("insulation"),
            Self::Shade => f.write_str("shade"),
        }
    }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "insulation" => Ok(Self::Insulation),
            "shade" => Ok(Self::Shade),
            other => Err(ValidationError::InvalidMode(other.to_string())),
        }
    }
}

/// A user command on a mode switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchCommand {
    On,
    Off,
}

/// Per-rule hysteresis flags, indexed by rule position in its mode's list.
///
/// Indices never written read as inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleState(Vec<bool>);

impl RuleState {
    #[must_use]
    pub fn is_active(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    pub fn set(&mut self, index: usize, active: bool) {
        if index >= self.0.len() {
            if !active {
                return;
            }
            self.0.resize(index + 1, false);
        }
        self.0[index] = active;
    }

    /// Indices of the rules currently holding their covers closed.
    pub fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(index, active)| active.then_some(index))
    }

    #[must_use]
    pub fn any_active(&self) -> bool {
        self.0.iter().any(|active| *active)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Drop flags for rules that no longer exist.
    pub fn truncate(&mut self, rule_count: usize) {
        self.0.truncate(rule_count);
    }
}

/// The persisted switch of one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSwitch {
    pub mode: Mode,
    pub enabled: bool,
    #[serde(default)]
    pub active_rules: RuleState,
}

impl ModeSwitch {
    /// A fresh, disabled switch with no active rules.
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            enabled: false,
            active_rules: RuleState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_pair_each_mode_with_the_other() {
        assert_eq!(Mode::Shade.other(), Mode::Insulation);
        assert_eq!(Mode::Insulation.other(), Mode::Shade);
    }

    #[test]
    fn should_parse_mode_names() {
        assert_eq!("shade".parse::<Mode>().unwrap(), Mode::Shade);
        assert_eq!(
            "sun".parse::<Mode>(),
            Err(ValidationError::InvalidMode("sun".to_string()))
        );
    }

    #[test]
    fn should_read_unknown_rule_index_as_inactive() {
        let state = RuleState::default();
        assert!(!state.is_active(3));
    }

    #[test]
    fn should_grow_when_activating_beyond_current_length() {
        let mut state = RuleState::default();
        state.set(2, true);
        assert!(state.is_active(2));
        assert!(!state.is_active(0));
        assert_eq!(state.active_indices().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn should_clear_all_flags() {
        let mut state = RuleState::default();
        state.set(0, true);
        state.set(1, true);
        state.clear();
        assert!(!state.any_active());
    }

    #[test]
    fn should_drop_flags_of_removed_rules() {
        let mut state = RuleState::default();
        state.set(4, true);
        state.truncate(2);
        assert!(!state.is_active(4));
    }

    #[test]
    fn should_serialize_switch_as_plain_flags() {
        let mut switch = ModeSwitch::new(Mode::Shade);
        switch.enabled = true;
        switch.active_rules.set(1, true);
        let json = serde_json::to_value(&switch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"mode": "shade", "enabled": true, "active_rules": [false, true]})
        );
    }
}
