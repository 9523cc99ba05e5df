//! Shade rule: close the covers while hot sun shines on the facade.

use serde::{Deserialize, Serialize};

use crate::device::Position;
use crate::error::BlindHubError;
use crate::id::{DeviceRef, SensorRef};
use crate::solar::{AzimuthArc, SolarPosition};

use super::{Transition, validate_devices, validate_position, validate_threshold};

/// Optional inside-temperature condition, read from its own sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsideTemperature {
    pub sensor: SensorRef,
    pub threshold: f64,
}

/// Closes `devices` when it is hot enough and the sun stands high inside
/// the facade's azimuth arc. Only the sun leaving that position reopens them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadeRule {
    pub devices: Vec<DeviceRef>,
    pub position: Position,
    /// Outside temperature at or above which shading is wanted.
    pub temperature_outside: f64,
    #[serde(default)]
    pub temperature_inside: Option<InsideTemperature>,
    /// UV index at or above which shading is wanted.
    #[serde(default)]
    pub uv: Option<f64>,
    /// Minimum solar altitude for direct sun on the facade.
    pub altitude: f64,
    pub azimuth_left: f64,
    pub azimuth_right: f64,
}

/// Inputs gathered by the engine for one shade evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeReadings {
    /// Hottest expected outside temperature.
    pub temperature: f64,
    pub inside_temperature: Option<f64>,
    pub uv: Option<f64>,
    pub sun: SolarPosition,
}

impl ShadeRule {
    /// Create a builder for constructing a [`ShadeRule`].
    #[must_use]
    pub fn builder() -> ShadeRuleBuilder {
        ShadeRuleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`BlindHubError::Validation`] for an empty or duplicated
    /// device list, a position above 100, a non-finite threshold or an
    /// azimuth outside the compass.
    pub fn validate(&self) -> Result<(), BlindHubError> {
        validate_devices(&self.devices)?;
        validate_position(self.position)?;
        validate_threshold(self.temperature_outside)?;
        validate_threshold(self.altitude)?;
        if let Some(inside) = &self.temperature_inside {
            validate_threshold(inside.threshold)?;
        }
        if let Some(uv) = self.uv {
            validate_threshold(uv)?;
        }
        self.arc().validate()?;
        Ok(())
    }

    #[must_use]
    pub fn arc(&self) -> AzimuthArc {
        AzimuthArc {
            left: self.azimuth_left,
            right: self.azimuth_right,
        }
    }

    /// Whether every configured climate condition holds.
    ///
    /// A configured condition without a reading never matches.
    #[must_use]
    pub fn matches_climate(&self, readings: &ShadeReadings) -> bool {
        if readings.temperature < self.temperature_outside {
            return false;
        }
        if let Some(inside) = &self.temperature_inside {
            match readings.inside_temperature {
                Some(value) if value >= inside.threshold => {}
                _ => return false,
            }
        }
        if let Some(threshold) = self.uv {
            match readings.uv {
                Some(value) if value >= threshold => {}
                _ => return false,
            }
        }
        true
    }

    /// Whether the sun is high enough and inside the facade's arc.
    #[must_use]
    pub fn matches_position(&self, sun: SolarPosition) -> bool {
        sun.altitude >= self.altitude && self.arc().contains(sun.azimuth)
    }

    /// Decide the next edge.
    ///
    /// Activation needs both climate and sun position; deactivation only
    /// looks at the sun position, so cooling down alone keeps the shade.
    #[must_use]
    pub fn evaluate(&self, active: bool, readings: &ShadeReadings) -> Option<Transition> {
        let match_position = self.matches_position(readings.sun);

        if active {
            return (!match_position).then_some(Transition::Deactivate);
        }

        (match_position && self.matches_climate(readings)).then_some(Transition::Activate)
    }
}

/// Step-by-step builder for [`ShadeRule`].
#[derive(Debug, Default)]
pub struct ShadeRuleBuilder {
    devices: Vec<DeviceRef>,
    position: Option<Position>,
    temperature_outside: Option<f64>,
    temperature_inside: Option<InsideTemperature>,
    uv: Option<f64>,
    altitude: Option<f64>,
    arc: Option<(f64, f64)>,
}

impl ShadeRuleBuilder {
    #[must_use]
    pub fn device(mut self, device: DeviceRef) -> Self {
        self.devices.push(device);
        self
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn temperature_outside(mut self, threshold: f64) -> Self {
        self.temperature_outside = Some(threshold);
        self
    }

    #[must_use]
    pub fn temperature_inside(mut self, sensor: SensorRef, threshold: f64) -> Self {
        self.temperature_inside = Some(InsideTemperature { sensor, threshold });
        self
    }

    #[must_use]
    pub fn uv(mut self, threshold: f64) -> Self {
        self.uv = Some(threshold);
        self
    }

    #[must_use]
    pub fn altitude(mut self, threshold: f64) -> Self {
        self.altitude = Some(threshold);
        self
    }

    #[must_use]
    pub fn azimuth(mut self, left: f64, right: f64) -> Self {
        self.arc = Some((left, right));
        self
    }

    /// Consume the builder, validate, and return a [`ShadeRule`].
    ///
    /// Altitude defaults to `0°` and the arc to the whole compass.
    ///
    /// # Errors
    ///
    /// Returns [`BlindHubError::Validation`] if any invariant fails.
    pub fn build(self) -> Result<ShadeRule, BlindHubError> {
        let (azimuth_left, azimuth_right) = self.arc.unwrap_or((0.0, 360.0));
        let rule = ShadeRule {
            devices: self.devices,
            position: self.position.unwrap_or(Position::CLOSED),
            temperature_outside: self.temperature_outside.unwrap_or(f64::NAN),
            temperature_inside: self.temperature_inside,
            uv: self.uv,
            altitude: self.altitude.unwrap_or(0.0),
            azimuth_left,
            azimuth_right,
        };
        rule.validate()?;
        Ok(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn south_rule() -> ShadeRule {
        ShadeRule::builder()
            .device(DeviceRef::new("blind.office").unwrap())
            .position(Position::new(20).unwrap())
            .temperature_outside(25.0)
            .altitude(20.0)
            .azimuth(90.0, 270.0)
            .build()
            .unwrap()
    }

    fn readings(temperature: f64, altitude: f64, azimuth: f64) -> ShadeReadings {
        ShadeReadings {
            temperature,
            inside_temperature: None,
            uv: None,
            sun: SolarPosition { altitude, azimuth },
        }
    }

    #[test]
    fn should_activate_when_hot_and_sun_on_facade() {
        let rule = south_rule();
        assert_eq!(
            rule.evaluate(false, &readings(28.0, 45.0, 180.0)),
            Some(Transition::Activate)
        );
    }

    #[test]
    fn should_activate_at_exact_temperature_threshold() {
        let rule = south_rule();
        assert_eq!(
            rule.evaluate(false, &readings(25.0, 45.0, 180.0)),
            Some(Transition::Activate)
        );
    }

    #[test]
    fn should_not_activate_when_sun_too_low() {
        let rule = south_rule();
        assert_eq!(rule.evaluate(false, &readings(30.0, 10.0, 180.0)), None);
    }

    #[test]
    fn should_not_activate_when_too_cold() {
        let rule = south_rule();
        assert_eq!(rule.evaluate(false, &readings(20.0, 45.0, 180.0)), None);
    }

    #[test]
    fn should_reopen_when_sun_leaves_arc_regardless_of_temperature() {
        let rule = south_rule();
        assert_eq!(
            rule.evaluate(true, &readings(35.0, 45.0, 45.0)),
            Some(Transition::Deactivate)
        );
    }

    #[test]
    fn should_reopen_when_sun_drops_below_altitude() {
        let rule = south_rule();
        assert_eq!(
            rule.evaluate(true, &readings(35.0, 5.0, 180.0)),
            Some(Transition::Deactivate)
        );
    }

    #[test]
    fn should_stay_active_when_only_temperature_drops() {
        let rule = south_rule();
        assert_eq!(rule.evaluate(true, &readings(10.0, 45.0, 180.0)), None);
    }

    #[test]
    fn should_require_inside_temperature_when_configured() {
        let rule = ShadeRule::builder()
            .device(DeviceRef::new("blind.office").unwrap())
            .temperature_outside(25.0)
            .temperature_inside(SensorRef::new("sensor.office").unwrap(), 24.0)
            .build()
            .unwrap();

        let mut r = readings(30.0, 45.0, 180.0);
        assert!(!rule.matches_climate(&r));
        r.inside_temperature = Some(23.0);
        assert!(!rule.matches_climate(&r));
        r.inside_temperature = Some(24.0);
        assert!(rule.matches_climate(&r));
    }

    #[test]
    fn should_require_uv_when_configured() {
        let rule = ShadeRule::builder()
            .device(DeviceRef::new("blind.office").unwrap())
            .temperature_outside(25.0)
            .uv(5.0)
            .build()
            .unwrap();

        let mut r = readings(30.0, 45.0, 180.0);
        assert!(!rule.matches_climate(&r));
        r.uv = Some(6.0);
        assert!(rule.matches_climate(&r));
    }

    #[test]
    fn should_match_wrapping_arc_on_north_facade() {
        let rule = ShadeRule::builder()
            .device(DeviceRef::new("blind.north").unwrap())
            .temperature_outside(25.0)
            .azimuth(350.0, 10.0)
            .build()
            .unwrap();
        let sun = |azimuth| SolarPosition {
            altitude: 10.0,
            azimuth,
        };
        assert!(rule.matches_position(sun(355.0)));
        assert!(rule.matches_position(sun(5.0)));
        assert!(!rule.matches_position(sun(180.0)));
    }

    #[test]
    fn should_reject_azimuth_outside_compass() {
        let result = ShadeRule::builder()
            .device(DeviceRef::new("blind.office").unwrap())
            .temperature_outside(25.0)
            .azimuth(90.0, 400.0)
            .build();
        assert!(matches!(
            result,
            Err(BlindHubError::Validation(
                ValidationError::AzimuthOutOfRange(_)
            ))
        ));
    }

    #[test]
    fn should_reject_fully_raised_position() {
        for level in [99, 100] {
            let result = ShadeRule::builder()
                .device(DeviceRef::new("blind.office").unwrap())
                .position(Position::new(level).unwrap())
                .temperature_outside(25.0)
                .build();
            assert!(matches!(
                result,
                Err(BlindHubError::Validation(
                    ValidationError::OpenRulePosition(_)
                ))
            ));
        }
    }
}
