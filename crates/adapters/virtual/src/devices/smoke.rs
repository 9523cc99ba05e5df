//! Virtual smoke zone.

use std::sync::{Mutex, PoisonError};

use blindhub_domain::alarm::{AlarmEventKind, SmokeState};

pub struct VirtualSmokeZone {
    state: Mutex<SmokeState>,
}

impl VirtualSmokeZone {
    #[must_use]
    pub fn new(state: SmokeState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    #[must_use]
    pub fn state(&self) -> SmokeState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store the new state and return the event kind to announce, if the
    /// zone crossed between idle and alarmed.
    pub fn set(&self, next: SmokeState) -> Option<AlarmEventKind> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *state, next);
        match (previous.is_alarmed(), next.is_alarmed()) {
            (false, true) => Some(AlarmEventKind::Alarm),
            (true, false) => Some(AlarmEventKind::Cancel),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_announce_alarm_when_leaving_idle() {
        let zone = VirtualSmokeZone::new(SmokeState::Idle);
        assert_eq!(zone.set(SmokeState::Alarm), Some(AlarmEventKind::Alarm));
    }

    #[test]
    fn should_stay_silent_between_alarm_and_timeout() {
        let zone = VirtualSmokeZone::new(SmokeState::Alarm);
        assert_eq!(zone.set(SmokeState::Timeout), None);
        assert_eq!(zone.state(), SmokeState::Timeout);
    }

    #[test]
    fn should_announce_cancel_when_back_to_idle() {
        let zone = VirtualSmokeZone::new(SmokeState::Timeout);
        assert_eq!(zone.set(SmokeState::Idle), Some(AlarmEventKind::Cancel));
    }
}
