//! Timetable sources.

use super::{ConnectionFilter, TimetableError};
use crate::domain::Connection;

/// Loads the connections matching a pre-filter.
///
/// This abstraction allows the planner to be tested with in-memory data
/// and served from a file in production.
pub trait TimetableSource: Send + Sync {
    fn load(&self, filter: &ConnectionFilter) -> Result<Vec<Connection>, TimetableError>;
}

/// A timetable held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTimetable {
    connections: Vec<Connection>,
}

impl InMemoryTimetable {
    pub fn new(connections: Vec<Connection>) -> Self {
        Self { connections }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl TimetableSource for InMemoryTimetable {
    fn load(&self, filter: &ConnectionFilter) -> Result<Vec<Connection>, TimetableError> {
        Ok(self
            .connections
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClockTime, ConnectionId, LineCategory, StationId};

    #[test]
    fn load_applies_filter() {
        let t = |s: &str| ClockTime::parse_hhmm(s).unwrap();
        let conn = Connection::new(
            ConnectionId(1),
            StationId::new(1001),
            StationId::new(1002),
            t("08:00"),
            t("08:10"),
        )
        .unwrap();
        let source = InMemoryTimetable::new(vec![
            conn.clone().with_category(LineCategory::new("S")),
            conn.with_category(LineCategory::new("BUS")),
        ]);

        assert_eq!(source.load(&ConnectionFilter::all()).unwrap().len(), 2);
        assert_eq!(source.len(), 2);
    }
}
