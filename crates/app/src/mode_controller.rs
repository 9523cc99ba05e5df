//! Mode controller: the two switches and their mutual exclusion.
//!
//! Switching a mode off reopens the covers of its active rules and forgets
//! their state. Switching a mode on first switches the other one off.

use std::collections::BTreeMap;

use blindhub_domain::device::Position;
use blindhub_domain::error::{BlindHubError, NotFoundError};
use blindhub_domain::mode::{Mode, ModeSwitch, RuleState, SwitchCommand};
use blindhub_domain::rule::RuleSet;

use crate::actuator::DeviceActuator;
use crate::ports::{DeviceRegistry, ModeStateRepository};

/// Holds the live switch of every configured mode.
pub struct ModeController<M> {
    store: M,
    switches: BTreeMap<Mode, ModeSwitch>,
}

impl<M: ModeStateRepository + Sync> ModeController<M> {
    pub fn new(store: M) -> Self {
        Self {
            store,
            switches: BTreeMap::new(),
        }
    }

    /// Load the persisted switch of every configured mode.
    ///
    /// A mode seen for the first time starts enabled only if it is
    /// `initially_enabled`. Flags of rules that no longer exist are dropped.
    /// Should both modes come back enabled, the shade mode is switched off.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be read.
    #[tracing::instrument(skip(self, rules, actuator))]
    pub async fn restore<D: DeviceRegistry + Sync>(
        &mut self,
        rules: &RuleSet,
        initially_enabled: Option<Mode>,
        actuator: &DeviceActuator<D>,
    ) -> Result<(), BlindHubError> {
        self.switches.clear();
        for mode in Mode::ALL {
            if !rules.is_configured(mode) {
                continue;
            }
            let mut switch = match self.store.load(mode).await? {
                Some(switch) => switch,
                None => ModeSwitch {
                    enabled: initially_enabled == Some(mode),
                    ..ModeSwitch::new(mode)
                },
            };
            switch.active_rules.truncate(rules.rule_count(mode));
            tracing::info!(%mode, enabled = switch.enabled, "mode restored");
            self.switches.insert(mode, switch);
        }

        if Mode::ALL.iter().all(|mode| self.is_enabled(*mode)) {
            tracing::warn!("both modes restored as enabled, switching shade off");
            self.switch_off(Mode::Shade, rules, actuator).await;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_enabled(&self, mode: Mode) -> bool {
        self.switches.get(&mode).is_some_and(|switch| switch.enabled)
    }

    #[must_use]
    pub fn switch(&self, mode: Mode) -> Option<&ModeSwitch> {
        self.switches.get(&mode)
    }

    /// Every configured switch, in evaluation order.
    #[must_use]
    pub fn switches(&self) -> Vec<ModeSwitch> {
        self.switches.values().cloned().collect()
    }

    /// Rule flags of an enabled mode, for the engine to update.
    pub fn active_rules_mut(&mut self, mode: Mode) -> Option<&mut RuleState> {
        self.switches
            .get_mut(&mode)
            .filter(|switch| switch.enabled)
            .map(|switch| &mut switch.active_rules)
    }

    /// Handle a user command on `mode`'s switch.
    ///
    /// # Errors
    ///
    /// Returns [`BlindHubError::NotFound`] if `mode` has no rules configured.
    #[tracing::instrument(skip(self, rules, actuator))]
    pub async fn command<D: DeviceRegistry + Sync>(
        &mut self,
        mode: Mode,
        command: SwitchCommand,
        rules: &RuleSet,
        actuator: &DeviceActuator<D>,
    ) -> Result<ModeSwitch, BlindHubError> {
        if !self.switches.contains_key(&mode) {
            return Err(mode_not_found(mode));
        }
        match command {
            SwitchCommand::On => self.switch_on(mode, rules, actuator).await,
            SwitchCommand::Off => self.switch_off(mode, rules, actuator).await,
        }
        self.switches
            .get(&mode)
            .cloned()
            .ok_or_else(|| mode_not_found(mode))
    }

    async fn switch_on<D: DeviceRegistry + Sync>(
        &mut self,
        mode: Mode,
        rules: &RuleSet,
        actuator: &DeviceActuator<D>,
    ) {
        if let Some(switch) = self.switches.get_mut(&mode)
            && !switch.enabled
        {
            switch.enabled = true;
            tracing::info!(%mode, "mode switched on");
        }
        self.persist(mode).await;

        if self.is_enabled(mode.other()) {
            self.switch_off(mode.other(), rules, actuator).await;
        }
    }

    async fn switch_off<D: DeviceRegistry + Sync>(
        &mut self,
        mode: Mode,
        rules: &RuleSet,
        actuator: &DeviceActuator<D>,
    ) {
        let Some(switch) = self.switches.get_mut(&mode) else {
            return;
        };
        let active: Vec<usize> = switch.active_rules.active_indices().collect();
        switch.enabled = false;
        switch.active_rules.clear();

        for index in &active {
            actuator
                .move_devices(rules.devices(mode, *index), Position::OPEN)
                .await;
        }
        tracing::info!(%mode, released_rules = active.len(), "mode switched off");
        self.persist(mode).await;
    }

    /// Save `mode`'s switch. Failures are logged; the in-memory state stays
    /// authoritative until the next successful save.
    pub async fn persist(&self, mode: Mode) {
        let Some(switch) = self.switches.get(&mode) else {
            return;
        };
        if let Err(err) = self.store.save(switch).await {
            tracing::error!(%mode, error = %err, "failed to persist mode state");
        }
    }
}

fn mode_not_found(mode: Mode) -> BlindHubError {
    NotFoundError {
        entity: "Mode",
        id: mode.to_string(),
    }
    .into()
}
