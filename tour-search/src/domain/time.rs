//! Timetable clock times.
//!
//! The timetable gives every departure and arrival as minutes since the
//! start of the operating day. Services running past midnight keep counting
//! (so 00:30 on the following morning is 24:30), which keeps times along a
//! path monotonic without carrying a date around.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of the operating day, in whole minutes.
///
/// Hours run from 0 to 47 so that overnight services can be expressed
/// without wrapping.
///
/// # Examples
///
/// ```
/// use tour_search::domain::ClockTime;
///
/// let t = ClockTime::parse_hhmm("08:15").unwrap();
/// assert_eq!(t.total_minutes(), 495);
/// assert_eq!(t.hour(), 8);
/// assert_eq!(t.minute(), 15);
/// assert_eq!(t.to_string(), "08:15");
///
/// let late = ClockTime::parse_hhmm("24:30").unwrap();
/// assert_eq!(late.minute_of_day(), 30);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u32);

impl ClockTime {
    /// Latest hour accepted by [`ClockTime::from_hm`].
    pub const MAX_HOUR: u32 = 47;

    /// Create a time from total minutes since the start of the operating day.
    pub const fn from_minutes(total: u32) -> Self {
        Self(total)
    }

    /// Create a time from hour and minute components.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if hour > Self::MAX_HOUR {
            return Err(TimeError::new("hour must be 0-47"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Parse a time from "HH:MM" format.
    ///
    /// # Examples
    ///
    /// ```
    /// use tour_search::domain::ClockTime;
    ///
    /// assert!(ClockTime::parse_hhmm("00:00").is_ok());
    /// assert!(ClockTime::parse_hhmm("47:59").is_ok());
    ///
    /// assert!(ClockTime::parse_hhmm("0815").is_err());
    /// assert!(ClockTime::parse_hhmm("8:15").is_err());
    /// assert!(ClockTime::parse_hhmm("48:00").is_err());
    /// assert!(ClockTime::parse_hhmm("08:60").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();
        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;

        Self::from_hm(hour, minute)
    }

    /// Total minutes since the start of the operating day.
    pub fn total_minutes(&self) -> u32 {
        self.0
    }

    /// Returns the hour (0-47).
    pub fn hour(&self) -> u32 {
        self.0 / 60
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.0 % 60
    }

    /// Minutes since midnight of the calendar day this time falls on.
    pub fn minute_of_day(&self) -> u32 {
        self.0 % MINUTES_PER_DAY
    }

    /// Signed minutes from `earlier` to `self`.
    pub fn minutes_since(&self, earlier: ClockTime) -> i64 {
        i64::from(self.0) - i64::from(earlier.0)
    }

    /// This time moved forward by `minutes`.
    pub fn plus_minutes(&self, minutes: u32) -> Self {
        Self(self.0.saturating_add(minutes))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = TimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hhmm(&value)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse two ASCII digits into a number.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Display then parse returns the same time
        #[test]
        fn roundtrip(h in 0u32..=47, m in 0u32..60) {
            let t = ClockTime::from_hm(h, m).unwrap();
            prop_assert_eq!(ClockTime::parse_hhmm(&t.to_string()).unwrap(), t);
        }

        /// Components recombine into the total
        #[test]
        fn components(total in 0u32..(48 * 60)) {
            let t = ClockTime::from_minutes(total);
            prop_assert_eq!(t.hour() * 60 + t.minute(), total);
        }
    }
}
