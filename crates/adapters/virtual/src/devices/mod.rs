//! Simulated devices: blinds, numeric sensors and smoke zones.
//!
//! Each device guards its state with a [`std::sync::Mutex`]; a poisoned lock
//! is recovered since the state is plain data.

mod blind;
mod sensor;
mod smoke;

pub use blind::VirtualBlind;
pub use sensor::VirtualSensor;
pub use smoke::VirtualSmokeZone;
