//! Which measurement requirements a route can satisfy.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::calendar::{CalendarError, route_availability};
use crate::domain::{LineKey, Path, WeekdayGroup};
use crate::planner::SearchConfig;

use super::requirements::LineRequirements;
use super::segments::{RouteSegment, route_segments};

/// Keys satisfied by one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentCoverage {
    pub segment: RouteSegment,
    pub keys: Vec<LineKey>,
}

/// Coverage of a whole route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coverage {
    /// Measurable segments and what each satisfies.
    pub segments: Vec<SegmentCoverage>,
    /// How often each key is satisfied.
    pub keys: BTreeMap<LineKey, u32>,
}

impl Coverage {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Line keys a route satisfies within the measurement period.
///
/// Weekday groups come from the days on which every connection of the route
/// runs. When `requirements` is given, only required keys are counted.
pub fn line_coverage(
    path: &Path,
    config: &SearchConfig,
    requirements: Option<&LineRequirements>,
) -> Result<Coverage, CalendarError> {
    let availability =
        route_availability(path, &config.horizon, config.period_start, config.period_end)?;
    let groups = availability.weekday_groups();

    let mut coverage = Coverage::default();
    for segment in route_segments(path) {
        if !segment.is_measurable(config.min_line_measure_mins) {
            continue;
        }
        let Some(line_id) = segment.line_id.clone() else {
            continue;
        };

        let keys: Vec<LineKey> = groups
            .iter()
            .map(|group| LineKey::new(line_id.clone(), segment.time_window, *group))
            .filter(|key| requirements.is_none_or(|r| r.is_required(key)))
            .collect();

        for key in &keys {
            *coverage.keys.entry(key.clone()).or_insert(0) += 1;
        }
        coverage.segments.push(SegmentCoverage { segment, keys });
    }

    Ok(coverage)
}

/// Line keys a route satisfies when travelled on `date`.
///
/// Empty if any connection of the route does not run that day.
pub fn coverage_for_day(
    path: &Path,
    date: NaiveDate,
    config: &SearchConfig,
    requirements: Option<&LineRequirements>,
) -> Result<BTreeMap<LineKey, u32>, CalendarError> {
    for connection in path.connections() {
        if !connection.service_days.runs_on(date, &config.horizon)? {
            return Ok(BTreeMap::new());
        }
    }

    let group = WeekdayGroup::specific(date.weekday());
    let mut keys = line_coverage(path, config, requirements)?.keys;
    keys.retain(|key, _| key.weekday_group == group);
    Ok(keys)
}

/// Summed coverage of several routes.
pub fn coverage_of_routes(
    routes: &[Path],
    config: &SearchConfig,
    requirements: Option<&LineRequirements>,
) -> Result<BTreeMap<LineKey, u32>, CalendarError> {
    let mut total = BTreeMap::new();
    for route in routes {
        for (key, count) in line_coverage(route, config, requirements)?.keys {
            *total.entry(key).or_insert(0) += count;
        }
    }
    Ok(total)
}
