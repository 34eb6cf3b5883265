//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::conditions::Condition;
use crate::domain::{ClockTime, Connection, LineId, LineKey, Path, StationId, TimeWindow, WeekdayGroup};
use crate::planner::{SearchOutcome, SearchStatus, TerminationReasons};
use crate::scorer::{Coverage, LineRequirements};

/// Request to search for routes.
#[derive(Debug, Deserialize)]
pub struct SearchRoutesRequest {
    /// Route conditions, tagged by `kind`
    pub conditions: Vec<Condition>,

    /// Outstanding measurement requirements
    #[serde(default)]
    pub requirements: Option<Vec<RequirementEntry>>,
}

impl SearchRoutesRequest {
    /// Collect the requirement entries, if any were given.
    pub fn line_requirements(&self) -> Option<LineRequirements> {
        self.requirements.as_ref().map(|entries| {
            entries
                .iter()
                .map(|e| (e.key(), e.count))
                .collect()
        })
    }
}

/// One requirement, or one covered key in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementEntry {
    pub line_id: LineId,
    pub time_window: TimeWindow,
    pub weekday_group: WeekdayGroup,
    pub count: u32,
}

impl RequirementEntry {
    pub fn key(&self) -> LineKey {
        LineKey::new(self.line_id.clone(), self.time_window, self.weekday_group)
    }

    fn from_key(key: &LineKey, count: u32) -> Self {
        Self {
            line_id: key.line_id.clone(),
            time_window: key.time_window,
            weekday_group: key.weekday_group,
            count,
        }
    }
}

/// A leg of a found route.
#[derive(Debug, Serialize)]
pub struct LegResult {
    pub connection_id: u64,
    pub from: StationId,
    pub to: StationId,
    pub departure: ClockTime,
    pub arrival: ClockTime,

    /// Trip identifier, if known
    pub trip_id: Option<String>,

    /// Line identifier, if known
    pub line_id: Option<LineId>,

    pub line_name: String,
    pub category: String,
    pub operator: String,
}

/// A found route.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub legs: Vec<LegResult>,

    /// Departure of the first leg
    pub departure_time: Option<ClockTime>,
    pub arrival_time: ClockTime,

    /// Minutes from the requested start time to the final arrival
    pub duration_mins: i64,

    pub line_changes: usize,

    /// Requirement keys this route satisfies
    pub coverage: Vec<RequirementEntry>,
}

/// Response for route search.
#[derive(Debug, Serialize)]
pub struct SearchRoutesResponse {
    /// Found routes, best first
    pub routes: Vec<RouteResult>,

    pub status: SearchStatus,

    /// Rejection counts per check
    pub termination_reasons: TerminationReasons,

    /// Check that ended the search early
    pub aborted: Option<&'static str>,

    pub elapsed_ms: u128,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl LegResult {
    /// Create from a domain Connection.
    pub fn from_connection(c: &Connection) -> Self {
        Self {
            connection_id: c.id.0,
            from: c.from,
            to: c.to,
            departure: c.departure,
            arrival: c.arrival,
            trip_id: c.trip_id.as_ref().map(|t| t.as_str().to_string()),
            line_id: c.line_id.clone(),
            line_name: c.line_name.clone(),
            category: c.category.to_string(),
            operator: c.operator.clone(),
        }
    }
}

impl RouteResult {
    /// Create from a found route and its coverage.
    pub fn from_route(route: &Path, coverage: &Coverage) -> Self {
        Self {
            legs: route.legs().iter().map(|c| LegResult::from_connection(c)).collect(),
            departure_time: route.first_departure(),
            arrival_time: route.arrival_time(),
            duration_mins: route.total_duration_minutes(),
            line_changes: route.line_changes(),
            coverage: coverage
                .keys
                .iter()
                .map(|(key, count)| RequirementEntry::from_key(key, *count))
                .collect(),
        }
    }
}

impl SearchRoutesResponse {
    /// Create from a search outcome; `coverage` holds one entry per route.
    pub fn from_outcome(outcome: SearchOutcome, coverage: &[Coverage]) -> Self {
        let routes = outcome
            .routes
            .iter()
            .zip(coverage)
            .map(|(route, cov)| RouteResult::from_route(route, cov))
            .collect();

        Self {
            routes,
            status: outcome.status,
            termination_reasons: outcome.termination_reasons,
            aborted: outcome.aborted,
            elapsed_ms: outcome.elapsed.as_millis(),
        }
    }
}
