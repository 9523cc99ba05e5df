//! Wall-clock time, time-of-day values and daily time windows.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Local wall-clock instant. Rules are expressed in local time of day,
/// so the engine never needs a timezone-aware value.
pub type Timestamp = NaiveDateTime;

/// Return the current local wall-clock time.
#[must_use]
pub fn now() -> Timestamp {
    Local::now().naive_local()
}

/// A time of day such as `22:00`, parsed from `HH:MM` or `HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Build from hour and minute.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimeOfDay`] when out of range.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, ValidationError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidTimeOfDay(format!("{hour}:{minute}")))
    }

    #[must_use]
    pub fn as_naive(self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(value: NaiveTime) -> Self {
        Self(value)
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .map(Self)
            .map_err(|_| ValidationError::InvalidTimeOfDay(s.to_string()))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.second() == 0 {
            write!(f, "{}", self.0.format("%H:%M"))
        } else {
            write!(f, "{}", self.0.format("%H:%M:%S"))
        }
    }
}

/// A daily window between two times of day.
///
/// When `to` is earlier than `from` the window crosses midnight, so
/// `22:00..06:00` covers the night. Equal bounds describe an empty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: TimeOfDay,
    pub to: TimeOfDay,
}

impl TimeWindow {
    #[must_use]
    pub fn new(from: TimeOfDay, to: TimeOfDay) -> Self {
        Self { from, to }
    }

    /// Whether the window wraps past midnight.
    #[must_use]
    pub fn crosses_midnight(&self) -> bool {
        self.to < self.from
    }

    /// Whether `now` is inside `[from, to)`, taking the midnight wrap into account.
    #[must_use]
    pub fn contains(&self, now: Timestamp) -> bool {
        self.elapsed(now) < self.length()
    }

    /// Whether `now` falls in the first half of the window, i.e. between
    /// `from` and the temporal midpoint.
    #[must_use]
    pub fn in_first_half(&self, now: Timestamp) -> bool {
        self.elapsed(now) * 2 < self.length()
    }

    /// The time of day halfway between `from` and `to`.
    #[must_use]
    pub fn midpoint(&self) -> TimeOfDay {
        TimeOfDay(self.from.0 + self.length() / 2)
    }

    fn length(&self) -> TimeDelta {
        wrap_day(self.to.0.signed_duration_since(self.from.0))
    }

    fn elapsed(&self, now: Timestamp) -> TimeDelta {
        wrap_day(now.time().signed_duration_since(self.from.0))
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}

fn wrap_day(delta: TimeDelta) -> TimeDelta {
    if delta < TimeDelta::zero() {
        delta + TimeDelta::days(1)
    } else {
        delta
    }
}
