//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `blindhub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use blindhub_adapter_virtual::config::VirtualConfig;
use blindhub_adapter_virtual::sun::Location;
use blindhub_domain::error::{BlindHubError, ValidationError};
use blindhub_domain::id::SensorRef;
use blindhub_domain::mode::Mode;
use blindhub_domain::rule::{InsulationRule, RuleSet, ShadeRule};
use blindhub_domain::sensor::SensorBindings;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Evaluation cadence.
    pub schedule: ScheduleConfig,
    /// Mode state persistence.
    pub state: StateConfig,
    /// Observer location for the sun position.
    pub location: Location,
    /// Sensors shared by every rule.
    pub sensors: SensorsConfig,
    pub insulation: ModeConfig<InsulationRule>,
    pub shade: ModeConfig<ShadeRule>,
    /// Simulated devices.
    #[serde(rename = "virtual")]
    pub simulation: VirtualConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between two evaluations of the enabled modes.
    pub tick_interval_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// JSON file holding the mode switches.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SensorsConfig {
    pub outside_temperature: String,
    pub forecast_high: Option<SensorRef>,
    pub forecast_low: Option<SensorRef>,
    pub uv: Option<SensorRef>,
}

/// One mode section: whether it exists, whether it starts enabled, and its
/// rules.
#[derive(Debug, Deserialize)]
#[serde(default, bound(deserialize = "R: Deserialize<'de>"))]
pub struct ModeConfig<R> {
    /// Whether the mode is configured at all.
    pub active: bool,
    /// Initial switch state when nothing was persisted yet.
    pub enabled: bool,
    pub rules: Vec<R>,
}

impl Config {
    /// Load configuration from `blindhub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// rules do not validate.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("blindhub.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("BLINDHUB_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("BLINDHUB_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Ok(val) = std::env::var("BLINDHUB_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("BLINDHUB_STATE_PATH") {
            self.state.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("BLINDHUB_TICK_SECS")
            && let Ok(secs) = val.parse()
        {
            self.schedule.tick_interval_secs = secs;
        }
        if let Ok(val) = std::env::var("BLINDHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.schedule.tick_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "tick interval must be non-zero".to_string(),
            ));
        }
        self.initially_enabled()?;
        self.rule_set().validate(&self.sensor_bindings()?)?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.schedule.tick_interval_secs)
    }

    /// Rules of the configured modes; an inactive mode has no rule list.
    #[must_use]
    pub fn rule_set(&self) -> RuleSet {
        RuleSet {
            insulation: self
                .insulation
                .active
                .then(|| self.insulation.rules.clone()),
            shade: self.shade.active.then(|| self.shade.rules.clone()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the outside temperature sensor name is blank.
    pub fn sensor_bindings(&self) -> Result<SensorBindings, ConfigError> {
        let outside_temperature = SensorRef::new(self.sensors.outside_temperature.as_str())
            .map_err(BlindHubError::from)?;
        Ok(SensorBindings {
            outside_temperature,
            forecast_high: self.sensors.forecast_high.clone(),
            forecast_low: self.sensors.forecast_low.clone(),
            uv: self.sensors.uv.clone(),
        })
    }

    /// Mode to switch on when no state was persisted yet.
    ///
    /// # Errors
    ///
    /// Returns an error when both configured modes are marked enabled.
    pub fn initially_enabled(&self) -> Result<Option<Mode>, ConfigError> {
        let insulation = self.insulation.active && self.insulation.enabled;
        let shade = self.shade.active && self.shade.enabled;
        match (insulation, shade) {
            (true, true) => Err(BlindHubError::from(ValidationError::BothModesEnabled).into()),
            (true, false) => Ok(Some(Mode::Insulation)),
            (false, true) => Ok(Some(Mode::Shade)),
            (false, false) => Ok(None),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "blindhubd=info,blindhub=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 180,
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("blindhub-state.json"),
        }
    }
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            outside_temperature: "outside_temperature".to_string(),
            forecast_high: None,
            forecast_low: None,
            uv: None,
        }
    }
}

impl<R> Default for ModeConfig<R> {
    fn default() -> Self {
        Self {
            active: false,
            enabled: false,
            rules: Vec::new(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
    /// Rules or sensors rejected by the domain.
    #[error("invalid rules")]
    Rules(#[from] BlindHubError),
}
