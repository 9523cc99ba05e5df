//! Rule engine: one evaluation pass of a mode's rules.
//!
//! Readings are gathered once per pass, then every rule is asked for its
//! next edge. An edge moves the rule's devices and flips its flag in the
//! mode's [`RuleState`].

use blindhub_domain::device::Position;
use blindhub_domain::error::{BlindHubError, SensorUnavailableError};
use blindhub_domain::id::{DeviceRef, SensorRef};
use blindhub_domain::mode::{Mode, RuleState};
use blindhub_domain::rule::{InsulationRule, RuleSet, RuleTransition, ShadeReadings, ShadeRule};
use blindhub_domain::sensor::SensorBindings;
use blindhub_domain::solar::SolarPosition;

use crate::actuator::DeviceActuator;
use crate::ports::{Clock, DeviceRegistry, SensorReader, SolarPositionProvider};

pub struct RuleEngine<S, P, C> {
    sensors: S,
    solar: P,
    clock: C,
    bindings: SensorBindings,
}

impl<S, P, C> RuleEngine<S, P, C>
where
    S: SensorReader + Sync,
    P: SolarPositionProvider + Sync,
    C: Clock + Sync,
{
    pub fn new(sensors: S, solar: P, clock: C, bindings: SensorBindings) -> Self {
        Self {
            sensors,
            solar,
            clock,
            bindings,
        }
    }

    /// Evaluate every rule of `mode` once.
    ///
    /// A missing outside temperature (or sun position for shade) aborts the
    /// pass and leaves `state` untouched.
    #[tracing::instrument(skip(self, rules, state, actuator))]
    pub async fn evaluate<D: DeviceRegistry + Sync>(
        &self,
        mode: Mode,
        rules: &RuleSet,
        state: &mut RuleState,
        actuator: &DeviceActuator<D>,
    ) -> Vec<RuleTransition> {
        let result = match mode {
            Mode::Insulation => {
                let rules = rules.insulation.as_deref().unwrap_or_default();
                self.evaluate_insulation(rules, state, actuator).await
            }
            Mode::Shade => {
                let rules = rules.shade.as_deref().unwrap_or_default();
                self.evaluate_shade(rules, state, actuator).await
            }
        };
        match result {
            Ok(transitions) => transitions,
            Err(err) => {
                tracing::warn!(error = %err, "evaluation skipped");
                Vec::new()
            }
        }
    }

    async fn evaluate_insulation<D: DeviceRegistry + Sync>(
        &self,
        rules: &[InsulationRule],
        state: &mut RuleState,
        actuator: &DeviceActuator<D>,
    ) -> Result<Vec<RuleTransition>, BlindHubError> {
        let outside = self.required(&self.bindings.outside_temperature).await?;
        let low = self.optional(self.bindings.forecast_low.as_ref()).await;
        let temperature = low.map_or(outside, |low| outside.min(low));
        let now = self.clock.now();
        tracing::debug!(temperature, %now, "insulation readings");

        let mut transitions = Vec::new();
        for (index, rule) in rules.iter().enumerate() {
            let Some(transition) = rule.evaluate(state.is_active(index), temperature, now) else {
                continue;
            };
            let fired = RuleTransition {
                mode: Mode::Insulation,
                rule: index,
                transition,
            };
            fire(actuator, fired, &rule.devices, rule.position).await;
            state.set(index, transition.is_active());
            transitions.push(fired);
        }
        Ok(transitions)
    }

    async fn evaluate_shade<D: DeviceRegistry + Sync>(
        &self,
        rules: &[ShadeRule],
        state: &mut RuleState,
        actuator: &DeviceActuator<D>,
    ) -> Result<Vec<RuleTransition>, BlindHubError> {
        let outside = self.required(&self.bindings.outside_temperature).await?;
        let high = self.optional(self.bindings.forecast_high.as_ref()).await;
        let temperature = high.map_or(outside, |high| outside.max(high));
        let sun = self.solar.position().await?;
        tracing::debug!(
            temperature,
            altitude = sun.altitude,
            azimuth = sun.azimuth,
            "shade readings"
        );

        let mut transitions = Vec::new();
        for (index, rule) in rules.iter().enumerate() {
            let readings = match self.shade_readings(rule, temperature, sun).await {
                Ok(readings) => readings,
                Err(err) => {
                    tracing::error!(rule = index, error = %err, "shade rule skipped");
                    continue;
                }
            };
            let Some(transition) = rule.evaluate(state.is_active(index), &readings) else {
                continue;
            };
            let fired = RuleTransition {
                mode: Mode::Shade,
                rule: index,
                transition,
            };
            fire(actuator, fired, &rule.devices, rule.position).await;
            state.set(index, transition.is_active());
            transitions.push(fired);
        }
        Ok(transitions)
    }

    /// Per-rule readings: the inside sensor and UV are only read when the
    /// rule has a threshold for them, and must then be available.
    async fn shade_readings(
        &self,
        rule: &ShadeRule,
        temperature: f64,
        sun: SolarPosition,
    ) -> Result<ShadeReadings, BlindHubError> {
        let inside_temperature = match &rule.temperature_inside {
            Some(inside) => Some(self.required(&inside.sensor).await?),
            None => None,
        };
        let uv = match (rule.uv, &self.bindings.uv) {
            (Some(_), Some(sensor)) => Some(self.required(sensor).await?),
            (Some(_), None) => {
                return Err(SensorUnavailableError {
                    sensor: "uv".to_string(),
                }
                .into());
            }
            (None, _) => None,
        };
        Ok(ShadeReadings {
            temperature,
            inside_temperature,
            uv,
            sun,
        })
    }

    async fn required(&self, sensor: &SensorRef) -> Result<f64, BlindHubError> {
        self.sensors.read(sensor).await?.ok_or_else(|| {
            SensorUnavailableError {
                sensor: sensor.to_string(),
            }
            .into()
        })
    }

    /// Forecast readings fall back to the current temperature, so a missing
    /// or failing forecast sensor is not an error.
    async fn optional(&self, sensor: Option<&SensorRef>) -> Option<f64> {
        let sensor = sensor?;
        match self.sensors.read(sensor).await {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(sensor = %sensor, error = %err, "forecast unavailable");
                None
            }
        }
    }
}

async fn fire<D: DeviceRegistry + Sync>(
    actuator: &DeviceActuator<D>,
    fired: RuleTransition,
    devices: &[DeviceRef],
    closed: Position,
) {
    let report = actuator
        .move_devices(devices, fired.transition.target(closed))
        .await;
    tracing::info!(
        mode = %fired.mode,
        rule = fired.rule,
        transition = %fired.transition,
        commanded = report.commanded,
        failed = report.failed,
        "rule transition"
    );
}
