//! Per-connection and per-route checks.
//!
//! Each check is enabled by one condition and carries the parameters it
//! needs. They are compiled into a [`RuleSet`](super::RuleSet) in a fixed
//! order.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::domain::{Connection, Path, StationId};
use crate::planner::SearchContext;
use crate::timetable::EarliestReturnTable;

use super::predicate::{ConnectionPredicate, RoutePredicate, TerminationRule, Verdict};

fn verdict(ok: bool, name: &'static str) -> Verdict {
    if ok { Verdict::Accept } else { Verdict::Reject(name) }
}

/// Aborts the search once the wall-clock budget is spent.
pub struct MaxSearchTime {
    pub limit: Duration,
}

impl ConnectionPredicate for MaxSearchTime {
    fn name(&self) -> &'static str {
        "max_search_time"
    }

    fn evaluate(&self, _: &Connection, _: &Path, ctx: &SearchContext) -> Verdict {
        if ctx.elapsed() >= self.limit {
            Verdict::Abort(self.name())
        } else {
            Verdict::Accept
        }
    }
}

/// Rejects extending paths that already hold `count` connections.
pub struct MaxStationCount {
    pub count: usize,
}

impl ConnectionPredicate for MaxStationCount {
    fn name(&self) -> &'static str {
        "max_station_count"
    }

    fn evaluate(&self, _: &Connection, path: &Path, _: &SearchContext) -> Verdict {
        verdict(path.len() < self.count, self.name())
    }
}

pub struct MaxWaitingTime {
    pub minutes: u32,
}

impl ConnectionPredicate for MaxWaitingTime {
    fn name(&self) -> &'static str {
        "max_waiting_time"
    }

    fn evaluate(&self, candidate: &Connection, path: &Path, _: &SearchContext) -> Verdict {
        let wait = candidate.departure.minutes_since(path.last().arrival);
        verdict(wait <= i64::from(self.minutes), self.name())
    }
}

/// Limits the time from the first real departure to the candidate's arrival.
pub struct MaxTripDuration {
    pub minutes: u32,
}

impl ConnectionPredicate for MaxTripDuration {
    fn name(&self) -> &'static str {
        "max_trip_duration"
    }

    fn evaluate(&self, candidate: &Connection, path: &Path, _: &SearchContext) -> Verdict {
        let Some(first) = path.first_departure() else {
            return Verdict::Accept;
        };
        let duration = candidate.arrival.minutes_since(first);
        verdict(duration <= i64::from(self.minutes), self.name())
    }
}

/// Rejects candidates arriving after the duration budget.
pub struct LatestArrival {
    pub minutes: u32,
}

impl ConnectionPredicate for LatestArrival {
    fn name(&self) -> &'static str {
        "latest_arrival"
    }

    fn evaluate(&self, candidate: &Connection, path: &Path, _: &SearchContext) -> Verdict {
        let duration = candidate.arrival.minutes_since(path.start_time());
        verdict(duration <= i64::from(self.minutes), self.name())
    }
}

/// Duration floor, checked only when the candidate would complete the route.
pub struct EarliestArrival {
    pub minutes: u32,
    pub termination: TerminationRule,
}

impl ConnectionPredicate for EarliestArrival {
    fn name(&self) -> &'static str {
        "earliest_arrival"
    }

    fn evaluate(&self, candidate: &Connection, path: &Path, _: &SearchContext) -> Verdict {
        if !self.termination.terminates(candidate) {
            return Verdict::Accept;
        }
        let duration = candidate.arrival.minutes_since(path.start_time());
        verdict(duration >= i64::from(self.minutes), self.name())
    }
}

/// Listed stations must be visited in non-decreasing list order.
pub struct VisitStationsInOrder {
    /// 1-based list position of each station.
    positions: HashMap<StationId, usize>,
}

impl VisitStationsInOrder {
    pub fn new(stations: &[StationId]) -> Self {
        let mut positions = HashMap::new();
        for (i, station) in stations.iter().enumerate() {
            positions.entry(*station).or_insert(i + 1);
        }
        Self { positions }
    }
}

impl ConnectionPredicate for VisitStationsInOrder {
    fn name(&self) -> &'static str {
        "visit_stations_in_order"
    }

    fn evaluate(&self, candidate: &Connection, path: &Path, _: &SearchContext) -> Verdict {
        let Some(&position) = self.positions.get(&candidate.to) else {
            return Verdict::Accept;
        };
        let reached = path
            .stations()
            .filter_map(|s| self.positions.get(&s).copied())
            .max()
            .unwrap_or(0);
        verdict(position <= reached + 1, self.name())
    }
}

/// Forbids returning to a station already on the path.
///
/// The station that completes the route is exempt, so round trips can end
/// where they started.
pub struct VisitStationOnce {
    pub termination: TerminationRule,
}

impl ConnectionPredicate for VisitStationOnce {
    fn name(&self) -> &'static str {
        "visit_station_once"
    }

    fn evaluate(&self, candidate: &Connection, path: &Path, _: &SearchContext) -> Verdict {
        if !path.legs().is_empty() && self.termination.terminates(candidate) {
            return Verdict::Accept;
        }
        verdict(!path.visits(candidate.to), self.name())
    }
}

/// Forbids travelling the same edge twice, in either direction.
pub struct VisitConnectionOnce;

impl ConnectionPredicate for VisitConnectionOnce {
    fn name(&self) -> &'static str {
        "visit_connection_once"
    }

    fn evaluate(&self, candidate: &Connection, path: &Path, _: &SearchContext) -> Verdict {
        let repeated = path.legs().iter().any(|leg| leg.same_edge(candidate));
        verdict(!repeated, self.name())
    }
}

/// Prunes branches that cannot beat the best route recorded so far.
///
/// Arrivals never decrease along a path, so a candidate arriving after the
/// watermark cannot lead to a better route. The change count only prunes
/// candidates arriving exactly at the watermark.
pub struct EarliestArrivalSoFar {
    pub check_min_line_changes: bool,
}

impl ConnectionPredicate for EarliestArrivalSoFar {
    fn name(&self) -> &'static str {
        "earliest_arrival_so_far"
    }

    fn evaluate(&self, candidate: &Connection, path: &Path, ctx: &SearchContext) -> Verdict {
        let Some(best) = ctx.earliest_arrival() else {
            return Verdict::Accept;
        };
        if candidate.arrival > best {
            return Verdict::Reject(self.name());
        }
        if self.check_min_line_changes
            && candidate.arrival == best
            && ctx
                .min_line_changes()
                .is_some_and(|fewest| path.line_changes_with(candidate) > fewest)
        {
            return Verdict::Reject(self.name());
        }
        Verdict::Accept
    }
}

pub struct MaxLineChanges {
    pub max: usize,
}

impl ConnectionPredicate for MaxLineChanges {
    fn name(&self) -> &'static str {
        "max_line_changes"
    }

    fn evaluate(&self, candidate: &Connection, path: &Path, _: &SearchContext) -> Verdict {
        verdict(path.line_changes_with(candidate) <= self.max, self.name())
    }
}

/// Rejects completing a route while the path holds fewer than `count - 1`
/// connections.
pub struct MinStationCount {
    pub count: usize,
    pub termination: TerminationRule,
}

impl ConnectionPredicate for MinStationCount {
    fn name(&self) -> &'static str {
        "min_station_count"
    }

    fn evaluate(&self, candidate: &Connection, path: &Path, _: &SearchContext) -> Verdict {
        if !self.termination.terminates(candidate) {
            return Verdict::Accept;
        }
        verdict(path.len() + 1 >= self.count, self.name())
    }
}

/// Requires enough time to change between trips.
pub struct LineChangeTime {
    pub minutes: u32,
}

impl ConnectionPredicate for LineChangeTime {
    fn name(&self) -> &'static str {
        "line_change_time"
    }

    fn evaluate(&self, candidate: &Connection, path: &Path, _: &SearchContext) -> Verdict {
        if path.legs().is_empty() {
            return Verdict::Accept;
        }
        let last = path.last();
        let gap = candidate.departure.minutes_since(last.arrival);

        if (last.is_on_foot() || candidate.is_on_foot()) && gap >= 0 {
            return Verdict::Accept;
        }
        if last.same_trip(candidate) {
            return Verdict::Accept;
        }
        verdict(gap >= i64::from(self.minutes), self.name())
    }
}

/// Minimum stop at given stations, on the first visit only.
pub struct MinWaitingTimeAtStation {
    pub waits: HashMap<StationId, u32>,
}

impl ConnectionPredicate for MinWaitingTimeAtStation {
    fn name(&self) -> &'static str {
        "min_waiting_time_at_station"
    }

    fn evaluate(&self, candidate: &Connection, path: &Path, _: &SearchContext) -> Verdict {
        let last = path.last();
        let Some(&minutes) = self.waits.get(&last.to) else {
            return Verdict::Accept;
        };
        if path.stations().filter(|s| *s == last.to).count() > 1 {
            return Verdict::Accept;
        }
        let wait = candidate.departure.minutes_since(last.arrival);
        verdict(wait >= i64::from(minutes), self.name())
    }
}

/// Only listed stations may be entered.
pub struct VisitListedStationsOnly {
    pub stations: HashSet<StationId>,
}

impl ConnectionPredicate for VisitListedStationsOnly {
    fn name(&self) -> &'static str {
        "visit_stations"
    }

    fn evaluate(&self, candidate: &Connection, _: &Path, _: &SearchContext) -> Verdict {
        verdict(self.stations.contains(&candidate.to), self.name())
    }
}

/// Rejects stations from which the start cannot be reached within the budget.
pub struct ReturnFromCurrentStation {
    pub latest_arrival_in: u32,
    pub table: EarliestReturnTable,
}

impl ConnectionPredicate for ReturnFromCurrentStation {
    fn name(&self) -> &'static str {
        "return_from_current_station"
    }

    fn evaluate(&self, candidate: &Connection, path: &Path, _: &SearchContext) -> Verdict {
        let Some(back) = self.table.minutes_to_start(candidate.to) else {
            return Verdict::Reject(self.name());
        };
        let spent = path.arrival_time().minutes_since(path.start_time());
        verdict(spent + i64::from(back) < i64::from(self.latest_arrival_in), self.name())
    }
}

/// Virtual stations cannot be used to change trips.
pub struct VirtualStationChange;

impl ConnectionPredicate for VirtualStationChange {
    fn name(&self) -> &'static str {
        "virtual_station_change"
    }

    fn evaluate(&self, candidate: &Connection, path: &Path, _: &SearchContext) -> Verdict {
        let last = path.last();
        let changes_at_virtual =
            last.to.is_virtual() && candidate.from.is_virtual() && !last.same_trip(candidate);
        verdict(!changes_at_virtual, self.name())
    }
}

/// The route must contain every listed station.
pub struct IncludesAllStations {
    pub stations: Vec<StationId>,
}

impl RoutePredicate for IncludesAllStations {
    fn name(&self) -> &'static str {
        "visit_stations_include_all"
    }

    fn accepts(&self, route: &Path) -> bool {
        self.stations.iter().all(|s| route.visits(*s))
    }
}
