//! Condition declarations.

use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::{ClockTime, LineCategory, LineId, StationId};

/// How a `VisitStations` list restricts a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncludeOption {
    /// Visit every listed station and nothing else.
    IncludeAllAndOnly,
    /// Visit every listed station; others are allowed.
    IncludeAll,
    /// Visit only listed stations, not necessarily all.
    IncludeOnly,
}

impl IncludeOption {
    /// Whether stations outside the list are forbidden.
    pub fn restricts_to_list(&self) -> bool {
        matches!(self, IncludeOption::IncludeAllAndOnly | IncludeOption::IncludeOnly)
    }

    /// Whether the route must contain every listed station.
    pub fn requires_all(&self) -> bool {
        matches!(self, IncludeOption::IncludeAllAndOnly | IncludeOption::IncludeAll)
    }
}

/// Alternate targets that end a route instead of the end station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationTarget {
    ReachingOneOfTheStations(Vec<StationId>),
    ReachingOneOfTheLineIds(Vec<LineId>),
}

/// Minimum stop at a station, applied on the first visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationWait {
    pub station: StationId,
    pub minutes: u32,
}

/// A single route condition with its parameters.
///
/// Serialized with a `kind` tag:
///
/// ```
/// use tour_search::conditions::{Condition, ConditionKind};
///
/// let json = r#"{"kind": "MaxNumberOfLineChanges", "max": 3}"#;
/// let condition: Condition = serde_json::from_str(json).unwrap();
/// assert_eq!(condition, Condition::MaxNumberOfLineChanges { max: 3 });
/// assert_eq!(condition.kind(), ConditionKind::MaxNumberOfLineChanges);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Condition {
    StartAndEndStations {
        start: StationId,
        end: StationId,
    },
    StartTimeAndDuration {
        start: ClockTime,
        /// Minimum route duration in minutes; `None` or 0 means no floor.
        #[serde(default)]
        earliest_arrival_in: Option<u32>,
        /// Maximum route duration in minutes.
        latest_arrival_in: u32,
    },
    SelectWeekdays {
        weekdays: Vec<Weekday>,
    },
    MaxWaitingTimeAtStation {
        minutes: u32,
    },
    MaxStationCount {
        count: usize,
    },
    MinStationCount {
        count: usize,
    },
    DefaultTimeForLineChange {
        minutes: u32,
    },
    MinWaitingTimeAtStations {
        waits: Vec<StationWait>,
    },
    VisitAStationOnlyOnce {
        enabled: bool,
    },
    VisitAConnectionOnlyOnce,
    IncludeListedCategoriesOnly {
        categories: Vec<LineCategory>,
    },
    ExcludeListedCategories {
        categories: Vec<LineCategory>,
    },
    IncludeListedOperatorsOnly {
        operators: Vec<String>,
    },
    VisitStations {
        stations: Vec<StationId>,
        option: IncludeOption,
    },
    ConnectionsAvailableOnAllListedDays {
        dates: Vec<NaiveDate>,
    },
    ReturnFromCurrentStation {
        enabled: bool,
    },
    MaxNumberOfLineChanges {
        max: usize,
    },
    MaxSearchTime {
        seconds: u64,
    },
    ReportDuringSearch {
        seconds: u64,
    },
    TraceSearch,
    SearchRoutesForEarliestArrival {
        #[serde(default)]
        check_min_line_changes: bool,
    },
    SuccessfulTerminationBy {
        target: TerminationTarget,
    },
    MaxTripDurationSinceFirstDeparture {
        minutes: u32,
    },
    VisitStationsInGivenOrder {
        stations: Vec<StationId>,
    },
}

/// Discriminant of [`Condition`], used as the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConditionKind {
    StartAndEndStations,
    StartTimeAndDuration,
    SelectWeekdays,
    MaxWaitingTimeAtStation,
    MaxStationCount,
    MinStationCount,
    DefaultTimeForLineChange,
    MinWaitingTimeAtStations,
    VisitAStationOnlyOnce,
    VisitAConnectionOnlyOnce,
    IncludeListedCategoriesOnly,
    ExcludeListedCategories,
    IncludeListedOperatorsOnly,
    VisitStations,
    ConnectionsAvailableOnAllListedDays,
    ReturnFromCurrentStation,
    MaxNumberOfLineChanges,
    MaxSearchTime,
    ReportDuringSearch,
    TraceSearch,
    SearchRoutesForEarliestArrival,
    SuccessfulTerminationBy,
    MaxTripDurationSinceFirstDeparture,
    VisitStationsInGivenOrder,
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Condition {
    pub fn kind(&self) -> ConditionKind {
        match self {
            Condition::StartAndEndStations { .. } => ConditionKind::StartAndEndStations,
            Condition::StartTimeAndDuration { .. } => ConditionKind::StartTimeAndDuration,
            Condition::SelectWeekdays { .. } => ConditionKind::SelectWeekdays,
            Condition::MaxWaitingTimeAtStation { .. } => ConditionKind::MaxWaitingTimeAtStation,
            Condition::MaxStationCount { .. } => ConditionKind::MaxStationCount,
            Condition::MinStationCount { .. } => ConditionKind::MinStationCount,
            Condition::DefaultTimeForLineChange { .. } => ConditionKind::DefaultTimeForLineChange,
            Condition::MinWaitingTimeAtStations { .. } => ConditionKind::MinWaitingTimeAtStations,
            Condition::VisitAStationOnlyOnce { .. } => ConditionKind::VisitAStationOnlyOnce,
            Condition::VisitAConnectionOnlyOnce => ConditionKind::VisitAConnectionOnlyOnce,
            Condition::IncludeListedCategoriesOnly { .. } => {
                ConditionKind::IncludeListedCategoriesOnly
            }
            Condition::ExcludeListedCategories { .. } => ConditionKind::ExcludeListedCategories,
            Condition::IncludeListedOperatorsOnly { .. } => {
                ConditionKind::IncludeListedOperatorsOnly
            }
            Condition::VisitStations { .. } => ConditionKind::VisitStations,
            Condition::ConnectionsAvailableOnAllListedDays { .. } => {
                ConditionKind::ConnectionsAvailableOnAllListedDays
            }
            Condition::ReturnFromCurrentStation { .. } => ConditionKind::ReturnFromCurrentStation,
            Condition::MaxNumberOfLineChanges { .. } => ConditionKind::MaxNumberOfLineChanges,
            Condition::MaxSearchTime { .. } => ConditionKind::MaxSearchTime,
            Condition::ReportDuringSearch { .. } => ConditionKind::ReportDuringSearch,
            Condition::TraceSearch => ConditionKind::TraceSearch,
            Condition::SearchRoutesForEarliestArrival { .. } => {
                ConditionKind::SearchRoutesForEarliestArrival
            }
            Condition::SuccessfulTerminationBy { .. } => ConditionKind::SuccessfulTerminationBy,
            Condition::MaxTripDurationSinceFirstDeparture { .. } => {
                ConditionKind::MaxTripDurationSinceFirstDeparture
            }
            Condition::VisitStationsInGivenOrder { .. } => ConditionKind::VisitStationsInGivenOrder,
        }
    }
}
