//! Virtual blind: commands take effect immediately.

use std::sync::{Mutex, MutexGuard, PoisonError};

use blindhub_domain::device::{DeviceState, DeviceUpdate, Position};

pub struct VirtualBlind {
    state: Mutex<DeviceState>,
}

impl VirtualBlind {
    #[must_use]
    pub fn new(level: Position, auto: bool) -> Self {
        Self {
            state: Mutex::new(DeviceState {
                auto,
                level,
                target: None,
            }),
        }
    }

    #[must_use]
    pub fn state(&self) -> DeviceState {
        *self.lock()
    }

    /// Apply command and `auto` flag under a single lock.
    pub fn apply(&self, update: DeviceUpdate) -> DeviceState {
        let mut state = self.lock();
        *state = state.applied(update);
        *state
    }

    /// Move the blind by hand. The `auto` flag is left as is: the engine
    /// learns about the move from the level alone.
    pub fn user_move(&self, level: Position) -> DeviceState {
        let mut state = self.lock();
        state.level = level;
        state.target = None;
        *state
    }

    fn lock(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for VirtualBlind {
    fn default() -> Self {
        Self::new(Position::from_level(100), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blindhub_domain::device::DeviceCommand;

    #[test]
    fn should_default_to_open_and_user_held() {
        let blind = VirtualBlind::default();
        assert!(blind.state().level.is_open());
        assert!(!blind.state().auto);
    }

    #[test]
    fn should_close_and_take_auto_flag_in_one_update() {
        let blind = VirtualBlind::default();
        let state = blind.apply(DeviceUpdate {
            command: Some(DeviceCommand::Off),
            auto: true,
        });
        assert_eq!(state.level, Position::CLOSED);
        assert!(state.auto);
    }

    #[test]
    fn should_keep_auto_flag_on_user_move() {
        let blind = VirtualBlind::new(Position::CLOSED, true);
        let state = blind.user_move(Position::from_level(100));
        assert!(state.auto);
        assert!(state.level.is_open());
    }
}
