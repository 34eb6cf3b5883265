//! Day availability of connections and routes within a measurement period.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::domain::{Path, WeekdayGroup};

use super::{CalendarError, PlanningHorizon, ServiceDays};

/// Days of a period split by whether service runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Availability {
    pub available: Vec<NaiveDate>,
    pub unavailable: Vec<NaiveDate>,
}

impl Availability {
    /// Whether service runs on at least one day of the period.
    pub fn any(&self) -> bool {
        !self.available.is_empty()
    }

    /// Specific weekday groups touched by the available days.
    pub fn weekday_groups(&self) -> BTreeSet<WeekdayGroup> {
        available_weekday_groups(&self.available)
    }
}

/// Available and unavailable days of one service-day code in `[start, end]`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tour_search::calendar::{PlanningHorizon, ServiceDays, parse_availability};
///
/// let horizon = PlanningHorizon::default();
/// let start = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2018, 1, 7).unwrap();
///
/// let availability = parse_availability(&ServiceDays::Daily, &horizon, start, end).unwrap();
/// assert_eq!(availability.available.len(), 7);
/// assert!(availability.unavailable.is_empty());
/// ```
pub fn parse_availability(
    days: &ServiceDays,
    horizon: &PlanningHorizon,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Availability, CalendarError> {
    split_period(horizon, start, end, |offset| days.runs_on_offset(offset))
}

/// Days on which every connection of `path` runs.
pub fn route_availability(
    path: &Path,
    horizon: &PlanningHorizon,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Availability, CalendarError> {
    split_period(horizon, start, end, |offset| {
        path.connections()
            .iter()
            .all(|c| c.service_days.runs_on_offset(offset))
    })
}

/// Distinct weekdays among `dates`, Monday first.
pub fn available_weekdays(dates: &[NaiveDate]) -> Vec<Weekday> {
    let mut seen = [false; 7];
    for date in dates {
        seen[date.weekday().num_days_from_monday() as usize] = true;
    }

    let mut weekdays = Vec::new();
    let mut day = Weekday::Mon;
    for present in seen {
        if present {
            weekdays.push(day);
        }
        day = day.succ();
    }
    weekdays
}

/// Specific weekday groups (never [`WeekdayGroup::All`]) touched by `dates`.
///
/// Groups may overlap in principle, so the result is a set rather than a
/// single value per date.
pub fn available_weekday_groups(dates: &[NaiveDate]) -> BTreeSet<WeekdayGroup> {
    dates
        .iter()
        .map(|d| WeekdayGroup::specific(d.weekday()))
        .collect()
}

fn split_period(
    horizon: &PlanningHorizon,
    start: NaiveDate,
    end: NaiveDate,
    runs: impl Fn(usize) -> bool,
) -> Result<Availability, CalendarError> {
    let first = horizon.first();
    let mut availability = Availability::default();

    for date in horizon.period_days(start, end)? {
        let offset = (date - first).num_days() as usize;
        if runs(offset) {
            availability.available.push(date);
        } else {
            availability.unavailable.push(date);
        }
    }

    Ok(availability)
}
