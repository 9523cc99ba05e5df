//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod clock;
pub mod control;
pub mod device;
pub mod event_bus;
pub mod mode_store;
pub mod sensor;
pub mod simulator;
pub mod solar;

pub use clock::{Clock, SystemClock};
pub use control::ControlSurface;
pub use device::DeviceRegistry;
pub use event_bus::EventPublisher;
pub use mode_store::ModeStateRepository;
pub use sensor::SensorReader;
pub use simulator::HostSimulator;
pub use solar::SolarPositionProvider;
