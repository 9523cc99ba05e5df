//! # blindhub-domain
//!
//! Pure domain model for the blindhub cover automation system.
//!
//! ## Responsibilities
//! - Foundational types: typed references, error conventions, wall-clock time
//! - Define **Positions** and **Device state** (level, pending target, `auto` flag)
//!   together with the move decision table
//! - Define **Rules** for the insulation and shade modes and their
//!   activation/deactivation decisions
//! - Define **Modes** and their persisted switch state ([`mode::RuleState`])
//! - Define **Sun geometry** (altitude, azimuth arcs) and **Time windows**
//! - Define **Alarms** (smoke-zone states and the override decision)
//! - Define **Host events** carried by the in-process bus
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod alarm;
pub mod device;
pub mod event;
pub mod mode;
pub mod rule;
pub mod sensor;
pub mod solar;
