//! Blind controller: the single entry point that ties the use-cases together.
//!
//! Ticks, mode commands and alarm events are serialized through one lock so
//! that no two of them ever interleave their device updates.

use tokio::sync::Mutex;

use blindhub_domain::alarm::AlarmEvent;
use blindhub_domain::error::BlindHubError;
use blindhub_domain::mode::{Mode, ModeSwitch, SwitchCommand};
use blindhub_domain::rule::{RuleSet, RuleTransition};
use blindhub_domain::sensor::SensorBindings;

use crate::actuator::DeviceActuator;
use crate::alarm_override::{AlarmOutcome, AlarmOverride};
use crate::mode_controller::ModeController;
use crate::ports::{
    Clock, ControlSurface, DeviceRegistry, ModeStateRepository, SensorReader,
    SolarPositionProvider,
};
use crate::rule_engine::RuleEngine;

pub struct BlindController<S, P, C, D, M> {
    rules: RuleSet,
    engine: RuleEngine<S, P, C>,
    alarm: AlarmOverride<S>,
    actuator: DeviceActuator<D>,
    modes: Mutex<ModeController<M>>,
}

impl<S, P, C, D, M> BlindController<S, P, C, D, M>
where
    S: SensorReader + Clone + Send + Sync,
    P: SolarPositionProvider + Send + Sync,
    C: Clock + Send + Sync,
    D: DeviceRegistry + Send + Sync,
    M: ModeStateRepository + Send + Sync,
{
    /// Wire the use-cases around already validated rules.
    pub fn new(
        rules: RuleSet,
        bindings: SensorBindings,
        sensors: S,
        solar: P,
        clock: C,
        devices: D,
        store: M,
    ) -> Self {
        Self {
            rules,
            engine: RuleEngine::new(sensors.clone(), solar, clock, bindings),
            alarm: AlarmOverride::new(sensors),
            actuator: DeviceActuator::new(devices),
            modes: Mutex::new(ModeController::new(store)),
        }
    }

    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Restore persisted mode switches. Must run before the first tick.
    ///
    /// # Errors
    ///
    /// Returns an error if the mode state repository cannot be read.
    pub async fn start(&self, initially_enabled: Option<Mode>) -> Result<(), BlindHubError> {
        let mut modes = self.modes.lock().await;
        modes
            .restore(&self.rules, initially_enabled, &self.actuator)
            .await
    }

    /// Evaluate every enabled mode, insulation first.
    #[tracing::instrument(skip(self))]
    pub async fn on_tick(&self) -> Vec<RuleTransition> {
        let mut modes = self.modes.lock().await;
        let mut transitions = Vec::new();
        for mode in Mode::ALL {
            let Some(state) = modes.active_rules_mut(mode) else {
                continue;
            };
            let fired = self
                .engine
                .evaluate(mode, &self.rules, state, &self.actuator)
                .await;
            if !fired.is_empty() {
                modes.persist(mode).await;
            }
            transitions.extend(fired);
        }
        tracing::debug!(transitions = transitions.len(), "tick done");
        transitions
    }

    /// Apply a user command to a mode switch.
    ///
    /// # Errors
    ///
    /// Returns [`BlindHubError::NotFound`] if `mode` is not configured.
    pub async fn on_mode_command(
        &self,
        mode: Mode,
        command: SwitchCommand,
    ) -> Result<ModeSwitch, BlindHubError> {
        let mut modes = self.modes.lock().await;
        modes
            .command(mode, command, &self.rules, &self.actuator)
            .await
    }

    pub async fn on_alarm_event(&self, event: &AlarmEvent) -> AlarmOutcome {
        let _guard = self.modes.lock().await;
        self.alarm.handle(event, &self.rules, &self.actuator).await
    }

    pub async fn status(&self) -> Vec<ModeSwitch> {
        self.modes.lock().await.switches()
    }
}

impl<S, P, C, D, M> ControlSurface for BlindController<S, P, C, D, M>
where
    S: SensorReader + Clone + Send + Sync,
    P: SolarPositionProvider + Send + Sync,
    C: Clock + Send + Sync,
    D: DeviceRegistry + Send + Sync,
    M: ModeStateRepository + Send + Sync,
{
    async fn modes(&self) -> Vec<ModeSwitch> {
        self.status().await
    }

    async fn command_mode(
        &self,
        mode: Mode,
        command: SwitchCommand,
    ) -> Result<ModeSwitch, BlindHubError> {
        self.on_mode_command(mode, command).await
    }

    async fn tick(&self) -> Vec<RuleTransition> {
        self.on_tick().await
    }

    async fn alarm(&self, event: AlarmEvent) -> AlarmOutcome {
        self.on_alarm_event(&event).await
    }
}
