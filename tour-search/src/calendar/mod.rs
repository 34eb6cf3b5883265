//! Service calendar.
//!
//! Every connection carries the set of days it operates on, encoded against
//! a fixed planning horizon. This module parses those codes and answers
//! availability questions for connections and whole routes.

mod availability;
mod horizon;
mod service_days;

pub use availability::{
    Availability, available_weekday_groups, available_weekdays, parse_availability,
    route_availability,
};
pub use horizon::PlanningHorizon;
pub use service_days::{DayBitset, ServiceDays};

use chrono::NaiveDate;

/// Errors from calendar arithmetic and service-day parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// A date range ends before it starts
    #[error("date range {start} to {end} ends before it starts")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// A date lies outside the planning horizon
    #[error("{date} is outside the planning horizon")]
    OutsideHorizon { date: NaiveDate },

    /// A service-day code contains a non-hex character
    #[error("invalid hex digit at position {position} in service-day code")]
    InvalidHexDigit { position: usize },

    /// A service-day code does not cover the whole horizon
    #[error("service-day code has {bits} bits, horizon needs {required}")]
    CodeTooShort { bits: usize, required: usize },
}

/// Length of the intersection of `[a, b]` and `[c, d]`, or 0 if disjoint.
///
/// # Examples
///
/// ```
/// use tour_search::calendar::interval_overlap;
///
/// assert_eq!(interval_overlap(480, 540, 510, 600), 30);
/// assert_eq!(interval_overlap(480, 540, 540, 600), 0);
/// assert_eq!(interval_overlap(480, 540, 600, 660), 0);
/// ```
pub fn interval_overlap(a: i64, b: i64, c: i64, d: i64) -> i64 {
    (b.min(d) - a.max(c)).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_symmetric() {
        assert_eq!(interval_overlap(0, 10, 5, 20), interval_overlap(5, 20, 0, 10));
        assert_eq!(interval_overlap(0, 100, 10, 20), 10);
        assert_eq!(interval_overlap(10, 20, 0, 100), 10);
    }

    #[test]
    fn error_display() {
        let date = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        assert_eq!(
            CalendarError::OutsideHorizon { date }.to_string(),
            "2019-01-01 is outside the planning horizon"
        );
        assert_eq!(
            CalendarError::CodeTooShort {
                bits: 8,
                required: 366
            }
            .to_string(),
            "service-day code has 8 bits, horizon needs 366"
        );
    }
}
