//! Pre-filter applied while loading the timetable.

use std::collections::HashSet;

use chrono::{Datelike, Weekday};

use crate::calendar::{CalendarError, PlanningHorizon};
use crate::conditions::{Condition, RouteConditions};
use crate::domain::{ClockTime, Connection, LineCategory, StationId};
use crate::planner::SearchConfig;

/// Decides which connections are loaded for a search.
///
/// Built from the pre-filter conditions; everything else is left to the
/// per-connection predicates.
#[derive(Debug, Clone)]
pub struct ConnectionFilter {
    earliest_departure: ClockTime,
    latest_arrival: ClockTime,
    /// Horizon offsets of each selected weekday within the measurement period.
    weekday_offsets: Vec<(Weekday, Vec<usize>)>,
    include_categories: Option<HashSet<LineCategory>>,
    exclude_categories: HashSet<LineCategory>,
    operators: Option<HashSet<String>>,
    stations: Option<HashSet<StationId>>,
    required_offsets: Vec<usize>,
}

impl ConnectionFilter {
    /// A filter that keeps every connection.
    pub fn all() -> Self {
        Self {
            earliest_departure: ClockTime::from_minutes(0),
            latest_arrival: ClockTime::from_minutes(u32::MAX),
            weekday_offsets: Vec::new(),
            include_categories: None,
            exclude_categories: HashSet::new(),
            operators: None,
            stations: None,
            required_offsets: Vec::new(),
        }
    }

    pub fn from_conditions(
        conditions: &RouteConditions,
        config: &SearchConfig,
    ) -> Result<Self, CalendarError> {
        let horizon = &config.horizon;
        let start = conditions.start_time();

        let mut filter = Self {
            earliest_departure: start,
            latest_arrival: start.plus_minutes(conditions.latest_arrival_in()),
            ..Self::all()
        };

        for condition in conditions.iter() {
            match condition {
                Condition::SelectWeekdays { weekdays } => {
                    filter.weekday_offsets = weekday_offsets(weekdays, horizon, config)?;
                }
                Condition::IncludeListedCategoriesOnly { categories } => {
                    filter.include_categories = Some(categories.iter().cloned().collect());
                }
                Condition::ExcludeListedCategories { categories } => {
                    filter.exclude_categories = categories.iter().cloned().collect();
                }
                Condition::IncludeListedOperatorsOnly { operators } => {
                    filter.operators = Some(operators.iter().cloned().collect());
                }
                Condition::VisitStations { stations, option } if option.restricts_to_list() => {
                    let mut allowed: HashSet<_> = stations.iter().copied().collect();
                    allowed.insert(conditions.start_station());
                    allowed.insert(conditions.end_station());
                    filter.stations = Some(allowed);
                }
                Condition::ConnectionsAvailableOnAllListedDays { dates } => {
                    filter.required_offsets = dates
                        .iter()
                        .map(|d| horizon.offset_of(*d))
                        .collect::<Result<_, _>>()?;
                }
                _ => {}
            }
        }

        Ok(filter)
    }

    pub fn matches(&self, c: &Connection) -> bool {
        if c.departure < self.earliest_departure
            || c.departure > self.latest_arrival
            || c.arrival > self.latest_arrival
        {
            return false;
        }

        let runs_on_each_weekday = self
            .weekday_offsets
            .iter()
            .all(|(_, offsets)| offsets.iter().any(|&o| c.service_days.runs_on_offset(o)));
        if !runs_on_each_weekday {
            return false;
        }

        if let Some(included) = &self.include_categories {
            if !included.contains(&c.category) {
                return false;
            }
        }
        if self.exclude_categories.contains(&c.category) {
            return false;
        }

        if let Some(operators) = &self.operators {
            if !operators.contains(&c.operator) {
                return false;
            }
        }

        if let Some(stations) = &self.stations {
            if !stations.contains(&c.from) || !stations.contains(&c.to) {
                return false;
            }
        }

        self.required_offsets
            .iter()
            .all(|&o| c.service_days.runs_on_offset(o))
    }
}

fn weekday_offsets(
    weekdays: &[Weekday],
    horizon: &PlanningHorizon,
    config: &SearchConfig,
) -> Result<Vec<(Weekday, Vec<usize>)>, CalendarError> {
    let period: Vec<_> = horizon
        .period_days(config.period_start, config.period_end)?
        .collect();

    weekdays
        .iter()
        .map(|&weekday| {
            let offsets = period
                .iter()
                .filter(|d| d.weekday() == weekday)
                .map(|d| horizon.offset_of(*d))
                .collect::<Result<_, _>>()?;
            Ok((weekday, offsets))
        })
        .collect()
}
