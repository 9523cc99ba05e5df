//! Typed reference newtypes backed by registry identifiers.
//!
//! References are opaque strings owned by the host's device and sensor
//! registries (e.g. `"ZWayVDev_zway_5-0-38"` or `"blind.kitchen"`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_ref {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Wrap a registry identifier.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::EmptyReference`] when `id` is blank.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::EmptyReference);
                }
                Ok(Self(id))
            }

            /// Access the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_ref!(
    /// Reference to a cover device in the host registry.
    DeviceRef
);

define_ref!(
    /// Reference to a sensor (temperature, UV, smoke, …) in the host registry.
    SensorRef
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_through_display_and_from_str() {
        let id = DeviceRef::new("blind.kitchen").unwrap();
        let parsed: DeviceRef = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn should_serialize_as_plain_string() {
        let id = SensorRef::new("sensor.outside").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"sensor.outside\"");
    }

    #[test]
    fn should_reject_blank_reference() {
        assert_eq!(DeviceRef::new("  "), Err(ValidationError::EmptyReference));
    }

    #[test]
    fn should_reject_blank_reference_when_deserializing() {
        let result: Result<SensorRef, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
