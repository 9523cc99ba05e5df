//! Virtual numeric sensor: holds the last reading, if any.

use std::sync::{Mutex, PoisonError};

#[derive(Default)]
pub struct VirtualSensor {
    value: Mutex<Option<f64>>,
}

impl VirtualSensor {
    #[must_use]
    pub fn new(value: Option<f64>) -> Self {
        Self {
            value: Mutex::new(value),
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<f64> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a new reading; `None` or a non-finite value marks it unavailable.
    pub fn set(&self, value: Option<f64>) {
        let value = value.filter(|v| v.is_finite());
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_without_reading() {
        assert_eq!(VirtualSensor::default().value(), None);
    }

    #[test]
    fn should_drop_non_finite_readings() {
        let sensor = VirtualSensor::new(Some(21.5));
        sensor.set(Some(f64::NAN));
        assert_eq!(sensor.value(), None);
    }
}
