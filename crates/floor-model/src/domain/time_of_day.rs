use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, Time};

use crate::error::{ValidationError, ValidationResult};

/// Day-local wall-clock time with second precision.
///
/// Ordering is field-wise (hour, minute, second), which matches lexical ordering of the
/// zero-padded `HH:MM:SS` form. Values never wrap past midnight: a shift ending after
/// `23:59:59` cannot be expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimeOfDay {
    /// `00:00:00`.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay {
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Build a time of day, rejecting out-of-range components.
    pub fn new(hour: u8, minute: u8, second: u8) -> ValidationResult<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return Err(ValidationError::InvalidTime(format!(
                "{hour:02}:{minute:02}:{second:02}"
            )));
        }
        Ok(Self {
            hour,
            minute,
            second,
        })
    }

    #[inline]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    #[inline]
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    #[inline]
    pub const fn second(&self) -> u8 {
        self.second
    }

    /// Returns `true` if both values fall into the same `HH:MM` minute.
    #[inline]
    pub const fn same_minute(&self, other: &TimeOfDay) -> bool {
        self.hour == other.hour && self.minute == other.minute
    }

    /// Seconds elapsed since midnight.
    pub const fn seconds_from_midnight(&self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }
}

impl Default for TimeOfDay {
    fn default() -> Self {
        Self::MIDNIGHT
    }
}

impl From<Time> for TimeOfDay {
    fn from(t: Time) -> Self {
        Self {
            hour: t.hour(),
            minute: t.minute(),
            second: t.second(),
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    /// Accepts `HH:MM` or `HH:MM:SS`; a missing seconds component is read as `00`.
    fn from_str(s: &str) -> ValidationResult<Self> {
        let invalid = || ValidationError::InvalidTime(s.to_string());

        let parts: Vec<&str> = s.trim().split(':').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(invalid());
        }

        let mut fields = [0u8; 3];
        for (slot, part) in fields.iter_mut().zip(parts.iter()) {
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = part.parse().map_err(|_| invalid())?;
        }
        Self::new(fields[0], fields[1], fields[2]).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValidationError;
    fn try_from(s: String) -> ValidationResult<Self> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// Calendar date plus day-local time, as observed by a [`crate::Clock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalStamp {
    pub date: Date,
    pub time: TimeOfDay,
}

impl LocalStamp {
    pub fn new(date: Date, time: TimeOfDay) -> Self {
        Self { date, time }
    }

    /// `YYYY-MM-DD`.
    pub fn date_string(&self) -> String {
        format_date(self.date)
    }

    /// `HH:MM:SS`.
    pub fn time_string(&self) -> String {
        self.time.to_string()
    }
}

impl From<OffsetDateTime> for LocalStamp {
    fn from(dt: OffsetDateTime) -> Self {
        Self {
            date: dt.date(),
            time: dt.time().into(),
        }
    }
}

/// Formats a date as zero-padded `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
