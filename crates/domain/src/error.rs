//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`BlindHubError`] via `#[from]`.

/// Top-level error shared by every crate in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum BlindHubError {
    /// A domain invariant does not hold.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced device or mode does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A required sensor reading is missing.
    #[error("sensor unavailable")]
    SensorUnavailable(#[from] SensorUnavailableError),

    /// An adapter failed to read or persist state.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Invariant violations detected while building rules or configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("rule has no devices")]
    NoDevices,

    #[error("device {0} is listed twice in the same rule")]
    DuplicateDevice(String),

    #[error("position {0} is out of range (0..=100)")]
    PositionOutOfRange(u8),

    #[error("rule position {0} counts as open, a rule must close its covers below 99")]
    OpenRulePosition(u8),

    #[error("azimuth {0} is out of range (0..=360)")]
    AzimuthOutOfRange(f64),

    #[error("threshold {0} must be a finite number")]
    NonFiniteThreshold(f64),

    #[error("time window is missing its start or end")]
    IncompleteTimeWindow,

    #[error("invalid time of day: {0}")]
    InvalidTimeOfDay(String),

    #[error("invalid mode: {0}")]
    InvalidMode(String),

    #[error("shade and insulation cannot both be enabled")]
    BothModesEnabled,

    #[error("a UV threshold is configured but no UV sensor is set")]
    MissingUvSensor,

    #[error("device reference is empty")]
    EmptyReference,
}

/// A lookup by identifier failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of the missing thing, e.g. `"Device"` or `"Mode"`.
    pub entity: &'static str,
    pub id: String,
}

/// A sensor did not provide a reading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("sensor {sensor} has no reading")]
pub struct SensorUnavailableError {
    pub sensor: String,
}
