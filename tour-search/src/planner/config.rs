//! Search configuration for the route planner.

use chrono::NaiveDate;

use crate::calendar::PlanningHorizon;

/// Configuration parameters for route search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Dates the service-day codes are encoded against.
    pub horizon: PlanningHorizon,

    /// First day of the measurement period.
    pub period_start: NaiveDate,

    /// Last day of the measurement period (inclusive).
    pub period_end: NaiveDate,

    /// Minimum time on one line for it to count as measured (minutes).
    pub min_line_measure_mins: u32,

    /// Longest wait at a station when no condition sets one (minutes).
    pub default_max_wait_mins: u32,

    /// Line change time when no condition sets one (minutes).
    pub default_change_mins: u32,

    /// Maximum number of connections in a path, origin included.
    pub max_depth: usize,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        horizon: PlanningHorizon,
        period_start: NaiveDate,
        period_end: NaiveDate,
        min_line_measure_mins: u32,
        default_max_wait_mins: u32,
        default_change_mins: u32,
        max_depth: usize,
    ) -> Self {
        Self {
            horizon,
            period_start,
            period_end,
            min_line_measure_mins,
            default_max_wait_mins,
            default_change_mins,
            max_depth,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        let horizon = PlanningHorizon::default();
        Self {
            horizon,
            period_start: horizon.first(),
            period_end: horizon.last(),
            min_line_measure_mins: 10,
            default_max_wait_mins: 30,
            default_change_mins: 5,
            max_depth: 64,
        }
    }
}
