//! Paths through the timetable.
//!
//! A [`Path`] is an ordered list of connections starting with a synthetic
//! origin. Extending a path yields a new value and leaves the original
//! untouched, so sibling branches of the search never alias each other.

use std::collections::HashMap;
use std::iter;
use std::sync::Arc;

use super::connection::{Connection, ConnectionId};
use super::error::DomainError;
use super::station::StationId;
use super::time::ClockTime;

/// An ordered sequence of connections beginning with an origin connection.
///
/// Invariant: every connection after the first departs from the station
/// the previous one arrived at.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tour_search::domain::{ClockTime, Connection, ConnectionId, Path, StationId};
///
/// let a = StationId::new(8500010);
/// let b = StationId::new(8500020);
/// let start = ClockTime::parse_hhmm("08:00").unwrap();
///
/// let path = Path::start(a, start);
/// let leg = Connection::new(ConnectionId(1), a, b, start, ClockTime::parse_hhmm("08:10").unwrap()).unwrap();
/// let longer = path.extended(Arc::new(leg));
///
/// assert_eq!(path.len(), 1);
/// assert_eq!(longer.len(), 2);
/// assert_eq!(longer.end_station(), b);
/// assert_eq!(longer.total_duration_minutes(), 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    connections: Vec<Arc<Connection>>,
}

impl Path {
    /// A path consisting only of the origin connection at `station` and `time`.
    pub fn start(station: StationId, time: ClockTime) -> Self {
        Self {
            connections: vec![Arc::new(Connection::origin(station, time))],
        }
    }

    /// Build a path from connections, checking continuity.
    pub fn from_connections(connections: Vec<Arc<Connection>>) -> Result<Self, DomainError> {
        if connections.is_empty() {
            return Err(DomainError::EmptyPath);
        }

        for (i, pair) in connections.windows(2).enumerate() {
            if pair[1].from != pair[0].to {
                return Err(DomainError::Discontinuous { index: i + 1 });
            }
        }

        Ok(Self { connections })
    }

    /// A new path with `next` appended.
    pub fn extended(&self, next: Arc<Connection>) -> Path {
        let mut connections = Vec::with_capacity(self.connections.len() + 1);
        connections.extend(self.connections.iter().cloned());
        connections.push(next);
        Path { connections }
    }

    /// Number of connections including the origin.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Always false: a path holds at least its origin.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// All connections including the origin.
    pub fn connections(&self) -> &[Arc<Connection>] {
        &self.connections
    }

    /// Real connections, without the origin.
    pub fn legs(&self) -> &[Arc<Connection>] {
        &self.connections[1..]
    }

    pub fn origin(&self) -> &Connection {
        &self.connections[0]
    }

    pub fn last(&self) -> &Connection {
        &self.connections[self.connections.len() - 1]
    }

    pub fn start_station(&self) -> StationId {
        self.origin().to
    }

    pub fn end_station(&self) -> StationId {
        self.last().to
    }

    /// Stations in visiting order, starting with the origin station.
    pub fn stations(&self) -> impl Iterator<Item = StationId> + '_ {
        iter::once(self.origin().to).chain(self.legs().iter().map(|c| c.to))
    }

    pub fn visits(&self, station: StationId) -> bool {
        self.stations().any(|s| s == station)
    }

    /// Time the search was anchored at.
    pub fn start_time(&self) -> ClockTime {
        self.origin().arrival
    }

    /// Departure of the first real leg, if any.
    pub fn first_departure(&self) -> Option<ClockTime> {
        self.legs().first().map(|c| c.departure)
    }

    /// Arrival at the last station.
    pub fn arrival_time(&self) -> ClockTime {
        self.last().arrival
    }

    /// Minutes from the anchor time to the final arrival.
    pub fn total_duration_minutes(&self) -> i64 {
        self.arrival_time().minutes_since(self.start_time())
    }

    /// Number of line changes along the path.
    ///
    /// A change is a leg on a different trip than its predecessor, unless the
    /// leg is an on-foot passage. Boarding the first leg is not a change.
    pub fn line_changes(&self) -> usize {
        count_line_changes(self.legs().iter().map(Arc::as_ref))
    }

    /// Line changes if `next` were appended.
    pub fn line_changes_with(&self, next: &Connection) -> usize {
        count_line_changes(self.legs().iter().map(Arc::as_ref).chain(iter::once(next)))
    }

    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.legs().iter().map(|c| c.id).collect()
    }

    /// Append `other`'s legs to this path.
    ///
    /// `other` must start where this path ends, leave no earlier than this
    /// path arrives and no later than `max_wait` minutes after. Changing trips
    /// needs at least the change time at the joining station, taken from
    /// `change_at_station` or falling back to `default_change`.
    pub fn join(
        &self,
        other: &Path,
        max_wait: u32,
        default_change: u32,
        change_at_station: &HashMap<StationId, u32>,
    ) -> Result<Path, DomainError> {
        if self.legs().is_empty() {
            return Ok(other.clone());
        }
        let Some(first) = other.legs().first() else {
            return Ok(self.clone());
        };

        let last = self.last();
        if last.to != first.from {
            return Err(DomainError::JoinStationMismatch {
                end: last.to,
                start: first.from,
            });
        }

        let wait = first.departure.minutes_since(last.arrival);
        if wait < 0 {
            return Err(DomainError::JoinDepartsBeforeArrival);
        }
        if wait > i64::from(max_wait) {
            return Err(DomainError::JoinWaitTooLong {
                wait,
                max: max_wait,
            });
        }

        let required = change_at_station
            .get(&last.to)
            .copied()
            .unwrap_or(default_change);
        if !last.same_trip(first) && wait < i64::from(required) {
            return Err(DomainError::JoinChangeTooShort {
                gap: wait,
                required,
            });
        }

        let mut connections = self.connections.clone();
        connections.extend(other.legs().iter().cloned());
        Ok(Path { connections })
    }
}

fn count_line_changes<'a>(legs: impl Iterator<Item = &'a Connection>) -> usize {
    let mut changes = 0;
    let mut previous: Option<&Connection> = None;

    for leg in legs {
        if let Some(prev) = previous {
            if !leg.is_on_foot() && !prev.same_trip(leg) {
                changes += 1;
            }
        }
        previous = Some(leg);
    }

    changes
}
