//! Validated set of route conditions.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::domain::{ClockTime, StationId};

use super::condition::{Condition, ConditionKind, TerminationTarget};

/// Errors raised while validating route conditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    /// A mandatory condition is absent
    #[error("missing mandatory condition {kind}")]
    Missing { kind: ConditionKind },

    /// The same condition kind was given twice
    #[error("condition {kind} given more than once")]
    Duplicate { kind: ConditionKind },

    /// Minimum route duration exceeds the maximum
    #[error("earliest arrival after {earliest} min is later than latest arrival after {latest} min")]
    InvalidDurationWindow { earliest: u32, latest: u32 },

    /// A list parameter is empty
    #[error("condition {kind} needs a non-empty list")]
    EmptyList { kind: ConditionKind },

    /// Station count ceiling leaves no room for a leg
    #[error("max station count must be at least 2, got {count}")]
    StationCountTooSmall { count: usize },
}

/// The conditions of one search, keyed by kind.
///
/// The two mandatory conditions are checked at construction and exposed
/// through dedicated accessors.
///
/// # Examples
///
/// ```
/// use tour_search::conditions::{Condition, RouteConditions};
/// use tour_search::domain::{ClockTime, StationId};
///
/// let conditions = RouteConditions::new(vec![
///     Condition::StartAndEndStations { start: StationId::new(1001), end: StationId::new(1001) },
///     Condition::StartTimeAndDuration {
///         start: ClockTime::parse_hhmm("08:00").unwrap(),
///         earliest_arrival_in: Some(30),
///         latest_arrival_in: 60,
///     },
///     Condition::MaxNumberOfLineChanges { max: 2 },
/// ])
/// .unwrap();
///
/// assert_eq!(conditions.start_station(), StationId::new(1001));
/// assert_eq!(conditions.latest_arrival_in(), 60);
///
/// assert!(RouteConditions::new(vec![Condition::TraceSearch]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteConditions {
    start: StationId,
    end: StationId,
    start_time: ClockTime,
    earliest_arrival_in: Option<u32>,
    latest_arrival_in: u32,
    conditions: BTreeMap<ConditionKind, Condition>,
}

impl RouteConditions {
    pub fn new(conditions: Vec<Condition>) -> Result<Self, ConditionError> {
        let mut by_kind = BTreeMap::new();
        for condition in conditions {
            validate(&condition)?;
            let kind = condition.kind();
            if by_kind.insert(kind, condition).is_some() {
                return Err(ConditionError::Duplicate { kind });
            }
        }

        let Some(&Condition::StartAndEndStations { start, end }) =
            by_kind.get(&ConditionKind::StartAndEndStations)
        else {
            return Err(ConditionError::Missing {
                kind: ConditionKind::StartAndEndStations,
            });
        };

        let Some(&Condition::StartTimeAndDuration {
            start: start_time,
            earliest_arrival_in,
            latest_arrival_in,
        }) = by_kind.get(&ConditionKind::StartTimeAndDuration)
        else {
            return Err(ConditionError::Missing {
                kind: ConditionKind::StartTimeAndDuration,
            });
        };

        Ok(Self {
            start,
            end,
            start_time,
            earliest_arrival_in,
            latest_arrival_in,
            conditions: by_kind,
        })
    }

    pub fn start_station(&self) -> StationId {
        self.start
    }

    pub fn end_station(&self) -> StationId {
        self.end
    }

    pub fn start_time(&self) -> ClockTime {
        self.start_time
    }

    /// Minimum route duration in minutes, if a floor is set.
    pub fn earliest_arrival_in(&self) -> Option<u32> {
        self.earliest_arrival_in.filter(|&m| m > 0)
    }

    /// Maximum route duration in minutes.
    pub fn latest_arrival_in(&self) -> u32 {
        self.latest_arrival_in
    }

    pub fn get(&self, kind: ConditionKind) -> Option<&Condition> {
        self.conditions.get(&kind)
    }

    pub fn contains(&self, kind: ConditionKind) -> bool {
        self.conditions.contains_key(&kind)
    }

    /// All conditions in kind order.
    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.values()
    }

    pub fn max_waiting_time(&self) -> Option<u32> {
        match self.get(ConditionKind::MaxWaitingTimeAtStation) {
            Some(Condition::MaxWaitingTimeAtStation { minutes }) => Some(*minutes),
            _ => None,
        }
    }

    pub fn line_change_time(&self) -> Option<u32> {
        match self.get(ConditionKind::DefaultTimeForLineChange) {
            Some(Condition::DefaultTimeForLineChange { minutes }) => Some(*minutes),
            _ => None,
        }
    }

    pub fn max_search_time(&self) -> Option<Duration> {
        match self.get(ConditionKind::MaxSearchTime) {
            Some(Condition::MaxSearchTime { seconds }) => Some(Duration::from_secs(*seconds)),
            _ => None,
        }
    }

    pub fn report_interval(&self) -> Option<Duration> {
        match self.get(ConditionKind::ReportDuringSearch) {
            Some(Condition::ReportDuringSearch { seconds }) => Some(Duration::from_secs(*seconds)),
            _ => None,
        }
    }

    pub fn trace(&self) -> bool {
        self.contains(ConditionKind::TraceSearch)
    }

    /// `Some(check_min_line_changes)` when searching for earliest arrival.
    pub fn earliest_arrival_search(&self) -> Option<bool> {
        match self.get(ConditionKind::SearchRoutesForEarliestArrival) {
            Some(Condition::SearchRoutesForEarliestArrival {
                check_min_line_changes,
            }) => Some(*check_min_line_changes),
            _ => None,
        }
    }

    pub fn termination_target(&self) -> Option<&TerminationTarget> {
        match self.get(ConditionKind::SuccessfulTerminationBy) {
            Some(Condition::SuccessfulTerminationBy { target }) => Some(target),
            _ => None,
        }
    }
}

fn validate(condition: &Condition) -> Result<(), ConditionError> {
    let kind = condition.kind();
    match condition {
        Condition::StartTimeAndDuration {
            earliest_arrival_in: Some(earliest),
            latest_arrival_in,
            ..
        } if earliest > latest_arrival_in => Err(ConditionError::InvalidDurationWindow {
            earliest: *earliest,
            latest: *latest_arrival_in,
        }),
        Condition::MaxStationCount { count } if *count < 2 => {
            Err(ConditionError::StationCountTooSmall { count: *count })
        }
        Condition::SuccessfulTerminationBy {
            target: TerminationTarget::ReachingOneOfTheStations(list),
        } if list.is_empty() => Err(ConditionError::EmptyList { kind }),
        Condition::SuccessfulTerminationBy {
            target: TerminationTarget::ReachingOneOfTheLineIds(list),
        } if list.is_empty() => Err(ConditionError::EmptyList { kind }),
        Condition::VisitStations { stations, .. }
        | Condition::VisitStationsInGivenOrder { stations }
            if stations.is_empty() =>
        {
            Err(ConditionError::EmptyList { kind })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::IncludeOption;

    fn time(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    fn mandatory() -> Vec<Condition> {
        vec![
            Condition::StartAndEndStations {
                start: StationId::new(1001),
                end: StationId::new(1003),
            },
            Condition::StartTimeAndDuration {
                start: time("08:00"),
                earliest_arrival_in: None,
                latest_arrival_in: 90,
            },
        ]
    }

    #[test]
    fn mandatory_accessors() {
        let conditions = RouteConditions::new(mandatory()).unwrap();
        assert_eq!(conditions.start_station(), StationId::new(1001));
        assert_eq!(conditions.end_station(), StationId::new(1003));
        assert_eq!(conditions.start_time(), time("08:00"));
        assert_eq!(conditions.earliest_arrival_in(), None);
        assert_eq!(conditions.latest_arrival_in(), 90);
    }

    #[test]
    fn zero_floor_means_none() {
        let mut list = mandatory();
        list[1] = Condition::StartTimeAndDuration {
            start: time("08:00"),
            earliest_arrival_in: Some(0),
            latest_arrival_in: 90,
        };
        let conditions = RouteConditions::new(list).unwrap();
        assert_eq!(conditions.earliest_arrival_in(), None);
    }

    #[test]
    fn missing_mandatory() {
        let result = RouteConditions::new(vec![mandatory().remove(0)]);
        assert_eq!(
            result,
            Err(ConditionError::Missing {
                kind: ConditionKind::StartTimeAndDuration
            })
        );

        let result = RouteConditions::new(vec![mandatory().remove(1)]);
        assert_eq!(
            result,
            Err(ConditionError::Missing {
                kind: ConditionKind::StartAndEndStations
            })
        );
    }

    #[test]
    fn duplicate_kind() {
        let mut list = mandatory();
        list.push(Condition::MaxWaitingTimeAtStation { minutes: 10 });
        list.push(Condition::MaxWaitingTimeAtStation { minutes: 20 });
        assert_eq!(
            RouteConditions::new(list),
            Err(ConditionError::Duplicate {
                kind: ConditionKind::MaxWaitingTimeAtStation
            })
        );
    }

    #[test]
    fn invalid_duration_window() {
        let mut list = mandatory();
        list[1] = Condition::StartTimeAndDuration {
            start: time("08:00"),
            earliest_arrival_in: Some(100),
            latest_arrival_in: 90,
        };
        assert_eq!(
            RouteConditions::new(list),
            Err(ConditionError::InvalidDurationWindow {
                earliest: 100,
                latest: 90
            })
        );
    }

    #[test]
    fn empty_lists() {
        let mut list = mandatory();
        list.push(Condition::SuccessfulTerminationBy {
            target: TerminationTarget::ReachingOneOfTheStations(vec![]),
        });
        assert!(matches!(
            RouteConditions::new(list),
            Err(ConditionError::EmptyList { .. })
        ));

        let mut list = mandatory();
        list.push(Condition::VisitStations {
            stations: vec![],
            option: IncludeOption::IncludeAll,
        });
        assert_eq!(
            RouteConditions::new(list),
            Err(ConditionError::EmptyList {
                kind: ConditionKind::VisitStations
            })
        );
    }

    #[test]
    fn station_count_too_small() {
        let mut list = mandatory();
        list.push(Condition::MaxStationCount { count: 1 });
        assert_eq!(
            RouteConditions::new(list),
            Err(ConditionError::StationCountTooSmall { count: 1 })
        );
    }

    #[test]
    fn optional_accessors() {
        let mut list = mandatory();
        list.push(Condition::MaxWaitingTimeAtStation { minutes: 12 });
        list.push(Condition::MaxSearchTime { seconds: 30 });
        list.push(Condition::SearchRoutesForEarliestArrival {
            check_min_line_changes: true,
        });
        list.push(Condition::TraceSearch);
        let conditions = RouteConditions::new(list).unwrap();

        assert_eq!(conditions.max_waiting_time(), Some(12));
        assert_eq!(conditions.line_change_time(), None);
        assert_eq!(conditions.max_search_time(), Some(Duration::from_secs(30)));
        assert_eq!(conditions.report_interval(), None);
        assert_eq!(conditions.earliest_arrival_search(), Some(true));
        assert!(conditions.trace());
        assert!(conditions.termination_target().is_none());
    }

    #[test]
    fn error_display() {
        let err = ConditionError::Missing {
            kind: ConditionKind::StartAndEndStations,
        };
        assert_eq!(
            err.to_string(),
            "missing mandatory condition StartAndEndStations"
        );
    }
}
