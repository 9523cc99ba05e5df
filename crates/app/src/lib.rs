//! # blindhub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `SensorReader`: numeric readings and smoke-zone states
//!   - `SolarPositionProvider`: current sun altitude and azimuth
//!   - `DeviceRegistry`: cover state and atomic command + `auto` updates
//!   - `Clock`: local wall-clock time
//!   - `ModeStateRepository`: persisted mode switches
//!   - `EventPublisher`: host events onto the bus
//! - Define the **driving port** `ControlSurface`, implemented by
//!   [`controller::BlindController`], and `HostSimulator` for integrations
//!   that can be driven by hand
//! - Provide the use-cases: `DeviceActuator`, `RuleEngine`, `ModeController`,
//!   `AlarmOverride`, and the `Scheduler` that drives ticks and bus events
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `blindhub-domain` only (plus `tokio` for sync and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod actuator;
pub mod alarm_override;
pub mod controller;
pub mod event_bus;
pub mod mode_controller;
pub mod ports;
pub mod rule_engine;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;
