//! Control port: what the outer surfaces (HTTP, scheduler) may ask of the engine.

use std::future::Future;

use blindhub_domain::alarm::AlarmEvent;
use blindhub_domain::error::BlindHubError;
use blindhub_domain::mode::{Mode, ModeSwitch, SwitchCommand};
use blindhub_domain::rule::RuleTransition;

use crate::alarm_override::AlarmOutcome;

/// Driving port implemented by [`BlindController`](crate::controller::BlindController).
pub trait ControlSurface {
    /// Switch state of every configured mode.
    fn modes(&self) -> impl Future<Output = Vec<ModeSwitch>> + Send;

    /// Turn a mode on or off.
    ///
    /// # Errors
    ///
    /// Returns [`BlindHubError::NotFound`] when `mode` is not configured.
    fn command_mode(
        &self,
        mode: Mode,
        command: SwitchCommand,
    ) -> impl Future<Output = Result<ModeSwitch, BlindHubError>> + Send;

    /// Evaluate every enabled mode once.
    fn tick(&self) -> impl Future<Output = Vec<RuleTransition>> + Send;

    /// React to a smoke alarm or cancel.
    fn alarm(&self, event: AlarmEvent) -> impl Future<Output = AlarmOutcome> + Send;
}

impl<T: ControlSurface + Send + Sync> ControlSurface for std::sync::Arc<T> {
    fn modes(&self) -> impl Future<Output = Vec<ModeSwitch>> + Send {
        (**self).modes()
    }

    fn command_mode(
        &self,
        mode: Mode,
        command: SwitchCommand,
    ) -> impl Future<Output = Result<ModeSwitch, BlindHubError>> + Send {
        (**self).command_mode(mode, command)
    }

    fn tick(&self) -> impl Future<Output = Vec<RuleTransition>> + Send {
        (**self).tick()
    }

    fn alarm(&self, event: AlarmEvent) -> impl Future<Output = AlarmOutcome> + Send {
        (**self).alarm(event)
    }
}
