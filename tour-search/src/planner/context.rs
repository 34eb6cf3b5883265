//! Per-search mutable state.

use std::collections::{BTreeMap, HashSet};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::domain::{ClockTime, ConnectionId, LineId, Path};

/// Rejection counts by predicate name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TerminationReasons(BTreeMap<&'static str, usize>);

impl TerminationReasons {
    pub fn record(&mut self, reason: &'static str) {
        *self.0.entry(reason).or_insert(0) += 1;
    }

    pub fn get(&self, reason: &str) -> usize {
        self.0.get(reason).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

/// Counters describing how a search went.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStatus {
    /// Paths expanded.
    pub expansions: usize,
    /// Expanded paths without any accepted candidate.
    pub dead_ends: usize,
    /// Candidates accepted by every connection check.
    pub after_connection_selection: usize,
    /// Completed routes accepted by every route check.
    pub after_route_selection: usize,
    /// Routes left after the final filters.
    pub after_route_filtering: usize,
    /// Recorded routes by number of legs.
    pub routes_per_length: BTreeMap<usize, usize>,
}

/// State threaded through one search.
///
/// Created fresh for every invocation so repeated or concurrent searches
/// never see each other's routes, counters or watermarks.
#[derive(Debug)]
pub struct SearchContext {
    started: Instant,
    last_report: Instant,
    earliest_arrival: Option<ClockTime>,
    min_line_changes: Option<usize>,
    outstanding: HashSet<LineId>,
    routes: Vec<Path>,
    seen: HashSet<Vec<ConnectionId>>,
    pub status: SearchStatus,
    pub reasons: TerminationReasons,
}

impl SearchContext {
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(started: Instant) -> Self {
        Self {
            started,
            last_report: started,
            earliest_arrival: None,
            min_line_changes: None,
            outstanding: HashSet::new(),
            routes: Vec::new(),
            seen: HashSet::new(),
            status: SearchStatus::default(),
            reasons: TerminationReasons::default(),
        }
    }

    /// Seed the lines still worth measuring.
    pub fn with_outstanding(mut self, lines: impl IntoIterator<Item = LineId>) -> Self {
        self.outstanding = lines.into_iter().collect();
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Earliest arrival among recorded routes.
    pub fn earliest_arrival(&self) -> Option<ClockTime> {
        self.earliest_arrival
    }

    /// Fewest line changes among recorded routes arriving at the earliest
    /// arrival.
    pub fn min_line_changes(&self) -> Option<usize> {
        self.min_line_changes
    }

    /// Fold a recorded route into the watermarks.
    ///
    /// The change count is tied to the arrival: a strictly earlier arrival
    /// replaces both, an equal one keeps the fewer changes.
    pub fn update_watermarks(&mut self, arrival: ClockTime, line_changes: usize) {
        match self.earliest_arrival {
            Some(best) if arrival > best => {}
            Some(best) if arrival == best => {
                self.min_line_changes = self.min_line_changes.map(|c| c.min(line_changes));
            }
            _ => {
                self.earliest_arrival = Some(arrival);
                self.min_line_changes = Some(line_changes);
            }
        }
    }

    pub fn outstanding(&self) -> &HashSet<LineId> {
        &self.outstanding
    }

    /// Mark lines as measured.
    pub fn remove_outstanding<'l>(&mut self, lines: impl IntoIterator<Item = &'l LineId>) {
        for line in lines {
            self.outstanding.remove(line);
        }
    }

    /// Whether a route with these connections was already seen.
    ///
    /// Marks the sequence as seen, so each distinct route is handled once.
    pub fn first_sighting(&mut self, route: &Path) -> bool {
        self.seen.insert(route.connection_ids())
    }

    pub fn push_route(&mut self, route: Path) {
        *self
            .status
            .routes_per_length
            .entry(route.legs().len())
            .or_insert(0) += 1;
        self.routes.push(route);
    }

    pub fn routes(&self) -> &[Path] {
        &self.routes
    }

    pub fn take_routes(&mut self) -> Vec<Path> {
        std::mem::take(&mut self.routes)
    }

    /// Whether a progress report is due, resetting the interval if so.
    pub fn report_due(&mut self, interval: Duration) -> bool {
        if self.last_report.elapsed() < interval {
            return false;
        }
        self.last_report = Instant::now();
        true
    }
}

impl Default for SearchContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    #[test]
    fn watermarks_keep_minimum() {
        let mut ctx = SearchContext::new();
        assert_eq!(ctx.earliest_arrival(), None);

        ctx.update_watermarks(time("09:00"), 2);
        ctx.update_watermarks(time("08:45"), 3);
        ctx.update_watermarks(time("09:30"), 1);

        assert_eq!(ctx.earliest_arrival(), Some(time("08:45")));
        // later arrivals never lower the change count
        assert_eq!(ctx.min_line_changes(), Some(3));

        ctx.update_watermarks(time("08:45"), 1);
        assert_eq!(ctx.min_line_changes(), Some(1));

        ctx.update_watermarks(time("08:40"), 4);
        assert_eq!(ctx.earliest_arrival(), Some(time("08:40")));
        assert_eq!(ctx.min_line_changes(), Some(4));
    }

    #[test]
    fn reasons_count_by_name() {
        let mut reasons = TerminationReasons::default();
        reasons.record("max_waiting_time");
        reasons.record("max_waiting_time");
        reasons.record("latest_arrival");

        assert_eq!(reasons.get("max_waiting_time"), 2);
        assert_eq!(reasons.get("visit_station_once"), 0);
        assert_eq!(reasons.total(), 3);
    }

    #[test]
    fn routes_seen_once() {
        let mut ctx = SearchContext::new();
        let route = Path::start(crate::domain::StationId::new(1001), time("08:00"));

        assert!(ctx.first_sighting(&route));
        assert!(!ctx.first_sighting(&route));

        ctx.push_route(route);
        assert_eq!(ctx.routes().len(), 1);
        assert_eq!(ctx.status.routes_per_length.get(&0), Some(&1));
        assert_eq!(ctx.take_routes().len(), 1);
        assert!(ctx.routes().is_empty());
    }

    #[test]
    fn outstanding_lines_shrink() {
        let mut ctx = SearchContext::new().with_outstanding([LineId::new("S1"), LineId::new("S2")]);
        ctx.remove_outstanding(&[LineId::new("S1")]);

        assert!(!ctx.outstanding().contains(&LineId::new("S1")));
        assert!(ctx.outstanding().contains(&LineId::new("S2")));
    }

    #[test]
    fn report_interval() {
        let earlier = Instant::now().checked_sub(Duration::from_secs(10)).unwrap();
        let mut ctx = SearchContext::started_at(earlier);

        assert!(ctx.report_due(Duration::from_secs(5)));
        assert!(!ctx.report_due(Duration::from_secs(5)));
    }
}
