//! Compiled, ordered predicate list.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::domain::{Connection, Path};
use crate::planner::{SearchConfig, SearchContext};
use crate::timetable::{EarliestReturnTable, TimetableIndex};

use super::checks::*;
use super::condition::{Condition, ConditionKind};
use super::predicate::{ConnectionPredicate, RoutePredicate, TerminationRule, Verdict};
use super::registry::RouteConditions;

/// Predicates enabled by a set of conditions, in evaluation order.
pub struct RuleSet {
    connection: Vec<Box<dyn ConnectionPredicate>>,
    route: Vec<Box<dyn RoutePredicate>>,
    termination: TerminationRule,
    max_wait: u32,
    change_minutes: u32,
}

impl RuleSet {
    /// Build the predicates for one search.
    ///
    /// `index` is only consulted when the return-feasibility check is enabled.
    pub fn compile(
        conditions: &RouteConditions,
        config: &SearchConfig,
        index: &TimetableIndex,
    ) -> Self {
        let termination =
            TerminationRule::new(conditions.end_station(), conditions.termination_target());
        let max_wait = conditions
            .max_waiting_time()
            .unwrap_or(config.default_max_wait_mins);
        let change_minutes = conditions
            .line_change_time()
            .unwrap_or(config.default_change_mins);
        let latest = conditions.latest_arrival_in();

        let mut connection: Vec<Box<dyn ConnectionPredicate>> = Vec::new();
        let mut route: Vec<Box<dyn RoutePredicate>> = Vec::new();

        if let Some(limit) = conditions.max_search_time() {
            connection.push(Box::new(MaxSearchTime { limit }));
        }
        if let Some(Condition::MaxStationCount { count }) =
            conditions.get(ConditionKind::MaxStationCount)
        {
            connection.push(Box::new(MaxStationCount { count: *count }));
        }
        connection.push(Box::new(MaxWaitingTime { minutes: max_wait }));
        if let Some(Condition::MaxTripDurationSinceFirstDeparture { minutes }) =
            conditions.get(ConditionKind::MaxTripDurationSinceFirstDeparture)
        {
            connection.push(Box::new(MaxTripDuration { minutes: *minutes }));
        }
        connection.push(Box::new(LatestArrival { minutes: latest }));
        if let Some(minutes) = conditions.earliest_arrival_in() {
            connection.push(Box::new(EarliestArrival {
                minutes,
                termination: termination.clone(),
            }));
        }
        if let Some(Condition::VisitStationsInGivenOrder { stations }) =
            conditions.get(ConditionKind::VisitStationsInGivenOrder)
        {
            connection.push(Box::new(VisitStationsInOrder::new(stations)));
        }
        if let Some(Condition::VisitAStationOnlyOnce { enabled: true }) =
            conditions.get(ConditionKind::VisitAStationOnlyOnce)
        {
            connection.push(Box::new(VisitStationOnce {
                termination: termination.clone(),
            }));
        }
        if conditions.contains(ConditionKind::VisitAConnectionOnlyOnce) {
            connection.push(Box::new(VisitConnectionOnce));
        }
        if let Some(check_min_line_changes) = conditions.earliest_arrival_search() {
            connection.push(Box::new(EarliestArrivalSoFar {
                check_min_line_changes,
            }));
        }
        if let Some(Condition::MaxNumberOfLineChanges { max }) =
            conditions.get(ConditionKind::MaxNumberOfLineChanges)
        {
            connection.push(Box::new(MaxLineChanges { max: *max }));
        }
        if let Some(Condition::MinStationCount { count }) =
            conditions.get(ConditionKind::MinStationCount)
        {
            connection.push(Box::new(MinStationCount {
                count: *count,
                termination: termination.clone(),
            }));
        }
        connection.push(Box::new(LineChangeTime {
            minutes: change_minutes,
        }));
        if let Some(Condition::MinWaitingTimeAtStations { waits }) =
            conditions.get(ConditionKind::MinWaitingTimeAtStations)
        {
            connection.push(Box::new(MinWaitingTimeAtStation {
                waits: waits.iter().map(|w| (w.station, w.minutes)).collect(),
            }));
        }
        if let Some(Condition::VisitStations { stations, option }) =
            conditions.get(ConditionKind::VisitStations)
        {
            if option.restricts_to_list() {
                let mut allowed: HashSet<_> = stations.iter().copied().collect();
                allowed.insert(conditions.start_station());
                allowed.insert(conditions.end_station());
                connection.push(Box::new(VisitListedStationsOnly { stations: allowed }));
            }
            if option.requires_all() {
                route.push(Box::new(IncludesAllStations {
                    stations: stations.clone(),
                }));
            }
        }
        if let Some(Condition::ReturnFromCurrentStation { enabled: true }) =
            conditions.get(ConditionKind::ReturnFromCurrentStation)
        {
            let table = EarliestReturnTable::build(index.connections(), conditions.start_station());
            connection.push(Box::new(ReturnFromCurrentStation {
                latest_arrival_in: latest,
                table,
            }));
        }
        connection.push(Box::new(VirtualStationChange));

        let rules = Self {
            connection,
            route,
            termination,
            max_wait,
            change_minutes,
        };
        debug!(?rules, "compiled rules");
        rules
    }

    /// First non-accepting verdict, or `Accept`.
    pub fn evaluate(&self, candidate: &Connection, path: &Path, ctx: &SearchContext) -> Verdict {
        for predicate in &self.connection {
            let verdict = predicate.evaluate(candidate, path, ctx);
            if !verdict.is_accept() {
                return verdict;
            }
        }
        Verdict::Accept
    }

    /// Checks a completed route, returning the name of the first failing check.
    pub fn accepts_route(&self, route: &Path) -> Result<(), &'static str> {
        match self.route.iter().find(|p| !p.accepts(route)) {
            Some(predicate) => Err(predicate.name()),
            None => Ok(()),
        }
    }

    pub fn termination(&self) -> &TerminationRule {
        &self.termination
    }

    /// Longest wait for the next candidate, in minutes.
    pub fn max_wait(&self) -> u32 {
        self.max_wait
    }

    /// Minimum time for a line change, in minutes.
    pub fn change_minutes(&self) -> u32 {
        self.change_minutes
    }

    /// Names of the connection checks in evaluation order.
    pub fn connection_checks(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.connection.iter().map(|p| p.name())
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("connection", &self.connection_checks().collect::<Vec<_>>())
            .field(
                "route",
                &self.route.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("termination", &self.termination)
            .field("max_wait", &self.max_wait)
            .field("change_minutes", &self.change_minutes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::conditions::{IncludeOption, StationWait};
    use crate::domain::{ClockTime, ConnectionId, StationId, TripId};

    fn time(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    fn station(n: u32) -> StationId {
        StationId::new(n)
    }

    fn conn(id: u64, from: u32, to: u32, dep: &str, arr: &str, trip: &str) -> Connection {
        Connection::new(ConnectionId(id), station(from), station(to), time(dep), time(arr))
            .unwrap()
            .with_trip(TripId::new(trip))
    }

    fn base() -> Vec<Condition> {
        vec![
            Condition::StartAndEndStations {
                start: station(1001),
                end: station(1003),
            },
            Condition::StartTimeAndDuration {
                start: time("08:00"),
                earliest_arrival_in: None,
                latest_arrival_in: 60,
            },
        ]
    }

    fn compile(extra: Vec<Condition>) -> RuleSet {
        let mut conditions = base();
        conditions.extend(extra);
        let conditions = RouteConditions::new(conditions).unwrap();
        RuleSet::compile(&conditions, &SearchConfig::default(), &TimetableIndex::default())
    }

    #[test]
    fn always_on_checks() {
        let rules = compile(vec![]);
        assert_eq!(
            rules.connection_checks().collect::<Vec<_>>(),
            vec![
                "max_waiting_time",
                "latest_arrival",
                "line_change_time",
                "virtual_station_change"
            ]
        );
        assert_eq!(rules.max_wait(), 30);
        assert_eq!(rules.change_minutes(), 5);
        assert_eq!(rules.termination(), &TerminationRule::EndStation(station(1003)));
    }

    #[test]
    fn checks_run_in_fixed_order() {
        let rules = compile(vec![
            Condition::VisitStations {
                stations: vec![station(1002)],
                option: IncludeOption::IncludeAllAndOnly,
            },
            Condition::MinWaitingTimeAtStations {
                waits: vec![StationWait {
                    station: station(1002),
                    minutes: 3,
                }],
            },
            Condition::MaxNumberOfLineChanges { max: 2 },
            Condition::MaxSearchTime { seconds: 10 },
            Condition::VisitAStationOnlyOnce { enabled: true },
            Condition::MaxStationCount { count: 8 },
            Condition::MinStationCount { count: 3 },
            Condition::VisitAConnectionOnlyOnce,
            Condition::SearchRoutesForEarliestArrival {
                check_min_line_changes: false,
            },
            Condition::MaxTripDurationSinceFirstDeparture { minutes: 50 },
            Condition::VisitStationsInGivenOrder {
                stations: vec![station(1002), station(1003)],
            },
            Condition::ReturnFromCurrentStation { enabled: true },
        ]);

        assert_eq!(
            rules.connection_checks().collect::<Vec<_>>(),
            vec![
                "max_search_time",
                "max_station_count",
                "max_waiting_time",
                "max_trip_duration",
                "latest_arrival",
                "visit_stations_in_order",
                "visit_station_once",
                "visit_connection_once",
                "earliest_arrival_so_far",
                "max_line_changes",
                "min_station_count",
                "line_change_time",
                "min_waiting_time_at_station",
                "visit_stations",
                "return_from_current_station",
                "virtual_station_change",
            ]
        );
    }

    #[test]
    fn duration_floor_only_when_positive() {
        let mut conditions = base();
        conditions[1] = Condition::StartTimeAndDuration {
            start: time("08:00"),
            earliest_arrival_in: Some(30),
            latest_arrival_in: 60,
        };
        let conditions = RouteConditions::new(conditions).unwrap();
        let rules =
            RuleSet::compile(&conditions, &SearchConfig::default(), &TimetableIndex::default());

        assert!(rules.connection_checks().any(|n| n == "earliest_arrival"));
        assert!(!compile(vec![]).connection_checks().any(|n| n == "earliest_arrival"));
    }

    #[test]
    fn evaluate_returns_first_rejection() {
        let rules = compile(vec![Condition::MaxWaitingTimeAtStation { minutes: 4 }]);
        let ctx = SearchContext::new();
        let path = Path::start(station(1001), time("08:00"))
            .extended(Arc::new(conn(1, 1001, 1002, "08:00", "08:10", "T1")));

        let ok = conn(2, 1002, 1003, "08:12", "08:20", "T1");
        assert_eq!(rules.evaluate(&ok, &path, &ctx), Verdict::Accept);

        // too long a wait and too late: the wait check runs first
        let late = conn(3, 1002, 1003, "08:20", "09:30", "T2");
        assert_eq!(
            rules.evaluate(&late, &path, &ctx),
            Verdict::Reject("max_waiting_time")
        );
    }

    #[test]
    fn route_checks() {
        let rules = compile(vec![Condition::VisitStations {
            stations: vec![station(1002)],
            option: IncludeOption::IncludeAll,
        }]);
        assert!(!rules.connection_checks().any(|n| n == "visit_stations"));

        let direct = Path::start(station(1001), time("08:00"))
            .extended(Arc::new(conn(1, 1001, 1003, "08:00", "08:10", "T1")));
        assert_eq!(rules.accepts_route(&direct), Err("visit_stations_include_all"));

        let via = Path::start(station(1001), time("08:00"))
            .extended(Arc::new(conn(1, 1001, 1002, "08:00", "08:10", "T1")))
            .extended(Arc::new(conn(2, 1002, 1003, "08:10", "08:20", "T1")));
        assert_eq!(rules.accepts_route(&via), Ok(()));
    }

    #[test]
    fn alternate_termination() {
        let rules = compile(vec![Condition::SuccessfulTerminationBy {
            target: crate::conditions::TerminationTarget::ReachingOneOfTheStations(vec![
                station(1005),
            ]),
        }]);
        assert!(rules.termination().terminates(&conn(1, 1004, 1005, "08:00", "08:10", "T1")));
        assert!(!rules.termination().terminates(&conn(2, 1002, 1003, "08:00", "08:10", "T1")));
    }
}
