//! In-memory connection index with station/hour lookup.

use std::collections::{BTreeSet, HashMap};
use std::ops::Range;
use std::sync::Arc;

use crate::domain::{ClockTime, Connection, StationId};

/// Connections sorted by departure station and time.
///
/// Built once per search so expansion never goes back to the source.
///
/// # Examples
///
/// ```
/// use tour_search::domain::{ClockTime, Connection, ConnectionId, StationId};
/// use tour_search::timetable::TimetableIndex;
///
/// let t = |s: &str| ClockTime::parse_hhmm(s).unwrap();
/// let a = StationId::new(1001);
/// let b = StationId::new(1002);
///
/// let index = TimetableIndex::build(vec![
///     Connection::new(ConnectionId(2), a, b, t("08:40"), t("08:50")).unwrap(),
///     Connection::new(ConnectionId(1), a, b, t("08:05"), t("08:15")).unwrap(),
/// ]);
///
/// let next = index.next_connections(a, t("08:00"), 30);
/// assert_eq!(next.len(), 1);
/// assert_eq!(next[0].id, ConnectionId(1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimetableIndex {
    rows: Vec<Arc<Connection>>,
    /// First row departing `station` in `hour`.
    by_hour: HashMap<(StationId, u32), usize>,
    by_station: HashMap<StationId, Range<usize>>,
}

impl TimetableIndex {
    pub fn build(mut connections: Vec<Connection>) -> Self {
        connections.sort_by(|a, b| {
            a.from
                .cmp(&b.from)
                .then(a.departure.cmp(&b.departure))
                .then(a.id.cmp(&b.id))
        });

        let rows: Vec<Arc<Connection>> = connections.into_iter().map(Arc::new).collect();
        let mut by_hour = HashMap::new();
        let mut by_station: HashMap<StationId, Range<usize>> = HashMap::new();

        for (i, row) in rows.iter().enumerate() {
            by_hour.entry((row.from, row.departure.hour())).or_insert(i);
            by_station
                .entry(row.from)
                .and_modify(|range| range.end = i + 1)
                .or_insert(i..i + 1);
        }

        Self {
            rows,
            by_hour,
            by_station,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All connections in index order.
    pub fn connections(&self) -> &[Arc<Connection>] {
        &self.rows
    }

    /// All connections leaving `station`, in departure order.
    pub fn connections_from(&self, station: StationId) -> &[Arc<Connection>] {
        match self.by_station.get(&station) {
            Some(range) => &self.rows[range.clone()],
            None => &[],
        }
    }

    /// Every station that appears as a departure or arrival.
    pub fn stations(&self) -> BTreeSet<StationId> {
        self.rows.iter().flat_map(|c| [c.from, c.to]).collect()
    }

    /// Connections leaving `station` with departure in `[after, after + max_wait]`.
    ///
    /// Seeks through the hour buckets from `after` up to the latest allowed
    /// departure, or the station's last departure hour if that is sooner, and
    /// scans forward from the first bucket present.
    pub fn next_connections(
        &self,
        station: StationId,
        after: ClockTime,
        max_wait: u32,
    ) -> &[Arc<Connection>] {
        let Some(range) = self.by_station.get(&station) else {
            return &[];
        };
        let until = after.plus_minutes(max_wait);
        let last_hour = self.rows[range.end - 1].departure.hour();

        let Some(first) = (after.hour()..=until.hour().min(last_hour))
            .find_map(|hour| self.by_hour.get(&(station, hour)).copied())
        else {
            return &[];
        };

        let mut lo = first;
        while lo < self.rows.len() && self.rows[lo].from == station && self.rows[lo].departure < after
        {
            lo += 1;
        }

        let mut hi = lo;
        while hi < self.rows.len() && self.rows[hi].from == station && self.rows[hi].departure <= until
        {
            hi += 1;
        }

        &self.rows[lo..hi]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConnectionId;

    fn time(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    fn conn(id: u64, from: u32, to: u32, dep: &str, arr: &str) -> Connection {
        Connection::new(
            ConnectionId(id),
            StationId::new(from),
            StationId::new(to),
            time(dep),
            time(arr),
        )
        .unwrap()
    }

    fn ids(slice: &[Arc<Connection>]) -> Vec<u64> {
        slice.iter().map(|c| c.id.0).collect()
    }

    fn sample() -> TimetableIndex {
        TimetableIndex::build(vec![
            conn(5, 1002, 1003, "08:15", "08:25"),
            conn(3, 1001, 1002, "09:05", "09:15"),
            conn(1, 1001, 1002, "08:00", "08:10"),
            conn(2, 1001, 1003, "08:50", "09:20"),
            conn(4, 1001, 1004, "08:00", "08:30"),
        ])
    }

    #[test]
    fn sorted_by_station_time_id() {
        let index = sample();
        assert_eq!(ids(index.connections()), vec![1, 4, 2, 3, 5]);
    }

    #[test]
    fn window_within_hour() {
        let index = sample();
        let next = index.next_connections(StationId::new(1001), time("08:00"), 10);
        assert_eq!(ids(next), vec![1, 4]);
    }

    #[test]
    fn window_inclusive_bounds() {
        let index = sample();
        let next = index.next_connections(StationId::new(1001), time("08:00"), 50);
        assert_eq!(ids(next), vec![1, 4, 2]);

        let next = index.next_connections(StationId::new(1001), time("08:01"), 49);
        assert_eq!(ids(next), vec![2]);
    }

    #[test]
    fn crosses_hour_boundary() {
        let index = sample();
        let next = index.next_connections(StationId::new(1001), time("08:40"), 30);
        assert_eq!(ids(next), vec![2, 3]);
    }

    #[test]
    fn falls_back_to_later_hour_bucket() {
        // nothing departs 1001 in hour 7
        let index = sample();
        let next = index.next_connections(StationId::new(1001), time("07:30"), 30);
        assert_eq!(ids(next), vec![1, 4]);
    }

    #[test]
    fn long_wait_spans_empty_hours() {
        let index = TimetableIndex::build(vec![conn(1, 1001, 1002, "11:10", "11:20")]);
        let next = index.next_connections(StationId::new(1001), time("08:00"), 200);
        assert_eq!(ids(next), vec![1]);
        assert!(index
            .next_connections(StationId::new(1001), time("08:00"), 60)
            .is_empty());
    }

    #[test]
    fn stops_at_next_station() {
        let index = sample();
        let next = index.next_connections(StationId::new(1001), time("09:00"), 600);
        assert_eq!(ids(next), vec![3]);
    }

    #[test]
    fn unbounded_wait_stops_at_last_departure() {
        let index = sample();
        let next = index.next_connections(StationId::new(1001), time("08:40"), u32::MAX);
        assert_eq!(ids(next), vec![2, 3]);

        let next = index.next_connections(StationId::new(1002), time("08:00"), u32::MAX);
        assert_eq!(ids(next), vec![5]);

        // after the last departure there is nothing left to find
        assert!(index
            .next_connections(StationId::new(1001), time("10:00"), u32::MAX)
            .is_empty());
    }

    #[test]
    fn unknown_station() {
        let index = sample();
        assert!(index
            .next_connections(StationId::new(9999), time("08:00"), 60)
            .is_empty());
        assert!(index.connections_from(StationId::new(9999)).is_empty());
    }

    #[test]
    fn per_station_ranges() {
        let index = sample();
        assert_eq!(ids(index.connections_from(StationId::new(1001))), vec![1, 4, 2, 3]);
        assert_eq!(ids(index.connections_from(StationId::new(1002))), vec![5]);
        assert_eq!(index.stations().len(), 4);
    }
}
