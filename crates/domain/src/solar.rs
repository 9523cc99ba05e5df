//! Sun geometry: solar position and azimuth arcs.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Where the sun currently is, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarPosition {
    /// Elevation above the horizon; negative at night.
    pub altitude: f64,
    /// Compass bearing, `0..360`, clockwise from north.
    pub azimuth: f64,
}

/// A compass arc between two bearings, walked clockwise from `left` to `right`.
///
/// When `left > right` the arc passes through north (`0°`/`360°`).
/// Both bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AzimuthArc {
    pub left: f64,
    pub right: f64,
}

impl AzimuthArc {
    /// Build an arc, checking both bearings are within `0..=360`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::AzimuthOutOfRange`] for a bearing outside
    /// the compass.
    pub fn new(left: f64, right: f64) -> Result<Self, ValidationError> {
        let arc = Self { left, right };
        arc.validate()?;
        Ok(arc)
    }

    /// Check both bearings are within `0..=360`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::AzimuthOutOfRange`] for the first bad bearing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for bearing in [self.left, self.right] {
            if !(0.0..=360.0).contains(&bearing) {
                return Err(ValidationError::AzimuthOutOfRange(bearing));
            }
        }
        Ok(())
    }

    /// Whether the arc wraps through north.
    #[must_use]
    pub fn wraps(&self) -> bool {
        self.left > self.right
    }

    #[must_use]
    pub fn contains(&self, azimuth: f64) -> bool {
        if self.wraps() {
            azimuth > self.left || azimuth < self.right
        } else {
            azimuth > self.left && azimuth < self.right
        }
    }
}
