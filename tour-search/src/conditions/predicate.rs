//! Predicate contract and termination rules.

use std::collections::BTreeSet;

use crate::domain::{Connection, LineId, Path, StationId};
use crate::planner::SearchContext;

use super::condition::TerminationTarget;

/// Outcome of checking a candidate connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    /// Drop this candidate only.
    Reject(&'static str),
    /// Stop the whole search.
    Abort(&'static str),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// A check applied to every candidate connection during expansion.
///
/// `path` is the path the candidate would extend; it is never modified.
pub trait ConnectionPredicate: Send + Sync {
    /// Counter name used for rejections.
    fn name(&self) -> &'static str;

    fn evaluate(&self, candidate: &Connection, path: &Path, ctx: &SearchContext) -> Verdict;
}

/// A check applied once to every completed route.
pub trait RoutePredicate: Send + Sync {
    /// Counter name used for rejections.
    fn name(&self) -> &'static str;

    fn accepts(&self, route: &Path) -> bool;
}

/// Decides whether a candidate completes a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationRule {
    /// Reaching the configured end station.
    EndStation(StationId),
    /// Reaching any of these stations.
    AnyStation(BTreeSet<StationId>),
    /// Riding any of these lines.
    AnyLine(BTreeSet<LineId>),
}

impl TerminationRule {
    /// The alternate target if one is configured, otherwise the end station.
    pub fn new(end: StationId, target: Option<&TerminationTarget>) -> Self {
        match target {
            None => TerminationRule::EndStation(end),
            Some(TerminationTarget::ReachingOneOfTheStations(stations)) => {
                TerminationRule::AnyStation(stations.iter().copied().collect())
            }
            Some(TerminationTarget::ReachingOneOfTheLineIds(lines)) => {
                TerminationRule::AnyLine(lines.iter().cloned().collect())
            }
        }
    }

    /// Whether appending `candidate` ends the route successfully.
    pub fn terminates(&self, candidate: &Connection) -> bool {
        match self {
            TerminationRule::EndStation(end) => candidate.to == *end,
            TerminationRule::AnyStation(stations) => stations.contains(&candidate.to),
            TerminationRule::AnyLine(lines) => candidate
                .line_id
                .as_ref()
                .is_some_and(|line| lines.contains(line)),
        }
    }

    /// Whether a finished route satisfies this rule.
    pub fn is_satisfied_by(&self, route: &Path) -> bool {
        route.legs().last().is_some_and(|leg| self.terminates(leg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClockTime, ConnectionId};

    fn time(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    fn conn(from: u32, to: u32) -> Connection {
        Connection::new(
            ConnectionId(1),
            StationId::new(from),
            StationId::new(to),
            time("08:00"),
            time("08:10"),
        )
        .unwrap()
    }

    #[test]
    fn end_station_rule() {
        let rule = TerminationRule::new(StationId::new(1002), None);
        assert!(rule.terminates(&conn(1001, 1002)));
        assert!(!rule.terminates(&conn(1001, 1003)));
    }

    #[test]
    fn alternate_stations_override_end() {
        let target = TerminationTarget::ReachingOneOfTheStations(vec![
            StationId::new(1003),
            StationId::new(1004),
        ]);
        let rule = TerminationRule::new(StationId::new(1002), Some(&target));
        assert!(rule.terminates(&conn(1001, 1004)));
        assert!(!rule.terminates(&conn(1001, 1002)));
    }

    #[test]
    fn alternate_lines() {
        let target = TerminationTarget::ReachingOneOfTheLineIds(vec![LineId::new("S8")]);
        let rule = TerminationRule::new(StationId::new(1002), Some(&target));
        assert!(rule.terminates(&conn(1001, 1003).with_line(LineId::new("S8"))));
        assert!(!rule.terminates(&conn(1001, 1002).with_line(LineId::new("S9"))));
        assert!(!rule.terminates(&conn(1001, 1002)));
    }

    #[test]
    fn satisfied_by_route() {
        let rule = TerminationRule::new(StationId::new(1002), None);
        let start = Path::start(StationId::new(1001), time("08:00"));
        assert!(!rule.is_satisfied_by(&start));
        let route = start.extended(std::sync::Arc::new(conn(1001, 1002)));
        assert!(rule.is_satisfied_by(&route));
    }
}
