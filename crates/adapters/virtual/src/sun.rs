//! Astronomical sun: solar altitude and azimuth from the observer's location.
//!
//! Uses the NOAA solar calculator approximation, good to a fraction of a
//! degree between 1800 and 2100. Atmospheric refraction is ignored.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Timelike, Utc};
use serde::Deserialize;

use blindhub_app::ports::SolarPositionProvider;
use blindhub_domain::error::BlindHubError;
use blindhub_domain::solar::SolarPosition;

/// Observer location in decimal degrees, north and east positive.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for Location {
    fn default() -> Self {
        // Paris
        Self {
            latitude: 48.8566,
            longitude: 2.3522,
        }
    }
}

/// Sun position provider for a fixed observer.
///
/// A position can be pinned with [`AstronomicalSun::pin`], which is handy in
/// demos and tests.
pub struct AstronomicalSun {
    location: Location,
    pinned: Mutex<Option<SolarPosition>>,
}

impl AstronomicalSun {
    #[must_use]
    pub fn new(location: Location) -> Self {
        Self {
            location,
            pinned: Mutex::new(None),
        }
    }

    /// Always report `position` until [`AstronomicalSun::unpin`] is called.
    pub fn pin(&self, position: SolarPosition) {
        *self.pinned.lock().unwrap_or_else(PoisonError::into_inner) = Some(position);
    }

    pub fn unpin(&self) {
        *self.pinned.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Sun position seen from this observer at `instant`.
    #[must_use]
    pub fn position_at(&self, instant: DateTime<Utc>) -> SolarPosition {
        solar_position(self.location, instant)
    }
}

impl SolarPositionProvider for AstronomicalSun {
    async fn position(&self) -> Result<SolarPosition, BlindHubError> {
        let pinned = *self.pinned.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(pinned.unwrap_or_else(|| self.position_at(Utc::now())))
    }
}

#[allow(clippy::cast_precision_loss)]
fn solar_position(location: Location, instant: DateTime<Utc>) -> SolarPosition {
    let julian_day = instant.timestamp() as f64 / 86_400.0 + 2_440_587.5;
    let century = (julian_day - 2_451_545.0) / 36_525.0;

    let mean_longitude = (280.466_46 + century * (36_000.769_83 + century * 0.000_303_2)) % 360.0;
    let mean_anomaly = 357.529_11 + century * (35_999.050_29 - 0.000_153_7 * century);
    let eccentricity = 0.016_708_634 - century * (0.000_042_037 + 0.000_000_126_7 * century);

    let m = mean_anomaly.to_radians();
    let center = m.sin() * (1.914_602 - century * (0.004_817 + 0.000_014 * century))
        + (2.0 * m).sin() * (0.019_993 - 0.000_101 * century)
        + (3.0 * m).sin() * 0.000_289;
    let true_longitude = mean_longitude + center;
    let omega = (125.04 - 1_934.136 * century).to_radians();
    let apparent_longitude = true_longitude - 0.005_69 - 0.004_78 * omega.sin();

    let mean_obliquity = 23.0
        + (26.0 + (21.448 - century * (46.815 + century * (0.000_59 - century * 0.001_813))) / 60.0)
            / 60.0;
    let obliquity = (mean_obliquity + 0.002_56 * omega.cos()).to_radians();
    let declination = (obliquity.sin() * apparent_longitude.to_radians().sin()).asin();

    let y = (obliquity / 2.0).tan().powi(2);
    let l = mean_longitude.to_radians();
    let equation_of_time = 4.0
        * (y * (2.0 * l).sin() - 2.0 * eccentricity * m.sin()
            + 4.0 * eccentricity * y * m.sin() * (2.0 * l).cos()
            - 0.5 * y * y * (4.0 * l).sin()
            - 1.25 * eccentricity * eccentricity * (2.0 * m).sin())
        .to_degrees();

    let minutes = f64::from(instant.num_seconds_from_midnight()) / 60.0;
    let true_solar_time =
        (minutes + equation_of_time + 4.0 * location.longitude).rem_euclid(1_440.0);
    let hour_angle = true_solar_time / 4.0 - 180.0;

    let latitude = location.latitude.to_radians();
    let cos_zenith = (latitude.sin() * declination.sin()
        + latitude.cos() * declination.cos() * hour_angle.to_radians().cos())
    .clamp(-1.0, 1.0);
    let zenith = cos_zenith.acos();

    let denominator = latitude.cos() * zenith.sin();
    let azimuth = if denominator.abs() < f64::EPSILON {
        // observer at a pole or sun at the zenith
        180.0
    } else {
        let cos_azimuth =
            ((latitude.sin() * zenith.cos() - declination.sin()) / denominator).clamp(-1.0, 1.0);
        let angle = cos_azimuth.acos().to_degrees();
        if hour_angle > 0.0 {
            (angle + 180.0) % 360.0
        } else {
            (540.0 - angle) % 360.0
        }
    };

    SolarPosition {
        altitude: 90.0 - zenith.to_degrees(),
        azimuth,
    }
}
