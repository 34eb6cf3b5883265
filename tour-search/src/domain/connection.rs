//! Timetable connections.
//!
//! A connection is one scheduled, directed hop between two adjacent stops.
//! Connections that share a trip id belong to the same vehicle run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calendar::ServiceDays;

use super::error::DomainError;
use super::station::StationId;
use super::time::ClockTime;

/// Unique row identifier of a connection.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u64);

impl fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionId({})", self.0)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one vehicle run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(String);

impl TripId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a line, the unit measurements are planned against.
///
/// The legacy data marks unknown lines with `-1`; such ids exist on
/// connections but can never be measured.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(String);

impl LineId {
    /// Placeholder id used for lines without a known identity.
    pub const UNKNOWN: &'static str = "-1";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether measurements can be attributed to this line.
    pub fn is_measurable(&self) -> bool {
        !self.0.is_empty() && self.0 != Self::UNKNOWN
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transport category of a connection (e.g. `S`, `IR`, `BUS`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineCategory(String);

impl LineCategory {
    /// Category codes for on-foot passages between stops, with their display forms.
    pub const ON_FOOT: [&'static str; 8] = ["Y", "YM", "YB", "YT", "ZF", "ZF+M", "ZF+B", "ZF+T"];

    /// Category of the synthetic origin connection.
    pub const ORIGIN: &'static str = "W";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// On-foot legs never count as a line change.
    pub fn is_on_foot(&self) -> bool {
        Self::ON_FOOT.contains(&self.0.as_str())
    }
}

impl fmt::Display for LineCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One scheduled hop between two adjacent stops.
///
/// Connections are immutable once loaded; paths share them through `Arc`.
///
/// # Examples
///
/// ```
/// use tour_search::domain::{ClockTime, Connection, ConnectionId, StationId, TripId};
///
/// let dep = ClockTime::parse_hhmm("08:00").unwrap();
/// let arr = ClockTime::parse_hhmm("08:10").unwrap();
/// let conn = Connection::new(ConnectionId(1), StationId::new(8500010), StationId::new(8500020), dep, arr)
///     .unwrap()
///     .with_trip(TripId::new("T1"));
///
/// assert_eq!(conn.duration_minutes(), 10);
/// assert_eq!(conn.trip_id.as_ref().map(|t| t.as_str()), Some("T1"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: StationId,
    pub to: StationId,
    pub line_id: Option<LineId>,
    pub trip_id: Option<TripId>,
    pub trip_number: Option<u32>,
    pub operator: String,
    pub category: LineCategory,
    pub line_name: String,
    pub departure: ClockTime,
    pub arrival: ClockTime,
    pub service_days: ServiceDays,
    /// Position of the departure stop within its trip.
    pub station_order: u32,
}

impl Connection {
    /// Create a connection with the mandatory fields.
    ///
    /// Fails if the arrival is earlier than the departure.
    pub fn new(
        id: ConnectionId,
        from: StationId,
        to: StationId,
        departure: ClockTime,
        arrival: ClockTime,
    ) -> Result<Self, DomainError> {
        if arrival < departure {
            return Err(DomainError::ArrivalBeforeDeparture { id });
        }

        Ok(Self {
            id,
            from,
            to,
            line_id: None,
            trip_id: None,
            trip_number: None,
            operator: String::new(),
            category: LineCategory::default(),
            line_name: String::new(),
            departure,
            arrival,
            service_days: ServiceDays::Daily,
            station_order: 0,
        })
    }

    /// The synthetic zero-duration connection anchoring a search at
    /// `station` and `time`.
    pub fn origin(station: StationId, time: ClockTime) -> Self {
        Self {
            id: ConnectionId(0),
            from: station,
            to: station,
            line_id: None,
            trip_id: None,
            trip_number: None,
            operator: String::new(),
            category: LineCategory::new(LineCategory::ORIGIN),
            line_name: String::new(),
            departure: time,
            arrival: time,
            service_days: ServiceDays::Daily,
            station_order: 0,
        }
    }

    pub fn with_trip(mut self, trip_id: TripId) -> Self {
        self.trip_id = Some(trip_id);
        self
    }

    pub fn with_line(mut self, line_id: LineId) -> Self {
        self.line_id = Some(line_id);
        self
    }

    pub fn with_category(mut self, category: LineCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    pub fn with_line_name(mut self, line_name: impl Into<String>) -> Self {
        self.line_name = line_name.into();
        self
    }

    pub fn with_trip_number(mut self, trip_number: u32) -> Self {
        self.trip_number = Some(trip_number);
        self
    }

    pub fn with_service_days(mut self, service_days: ServiceDays) -> Self {
        self.service_days = service_days;
        self
    }

    pub fn with_station_order(mut self, station_order: u32) -> Self {
        self.station_order = station_order;
        self
    }

    /// In-vehicle time of this hop.
    pub fn duration_minutes(&self) -> u32 {
        self.arrival.total_minutes() - self.departure.total_minutes()
    }

    /// Whether this hop is an on-foot passage.
    pub fn is_on_foot(&self) -> bool {
        self.category.is_on_foot()
    }

    /// Whether `next` continues the same vehicle run.
    ///
    /// Two connections without trip ids compare equal, as in the source data.
    pub fn same_trip(&self, next: &Connection) -> bool {
        self.trip_id == next.trip_id
    }

    /// Whether this hop uses the same edge as `other` in either direction.
    pub fn same_edge(&self, other: &Connection) -> bool {
        (self.from == other.from && self.to == other.to)
            || (self.from == other.to && self.to == other.from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn rejects_arrival_before_departure() {
        let result = Connection::new(
            ConnectionId(7),
            StationId::new(1001),
            StationId::new(1002),
            time("08:10"),
            time("08:00"),
        );
        assert!(matches!(
            result,
            Err(DomainError::ArrivalBeforeDeparture { id }) if id == ConnectionId(7)
        ));
    }

    #[test]
    fn origin_is_zero_duration_self_loop() {
        let origin = Connection::origin(StationId::new(8503000), time("08:00"));
        assert_eq!(origin.from, origin.to);
        assert_eq!(origin.duration_minutes(), 0);
        assert_eq!(origin.category.as_str(), "W");
        assert!(origin.trip_id.is_none());
    }

    #[test]
    fn on_foot_categories() {
        for code in ["Y", "YM", "YB", "YT", "ZF", "ZF+M", "ZF+B", "ZF+T"] {
            assert!(LineCategory::new(code).is_on_foot(), "{code}");
        }
        for code in ["S", "IR", "BUS", "W", ""] {
            assert!(!LineCategory::new(code).is_on_foot(), "{code}");
        }
    }

    #[test]
    fn line_id_measurability() {
        assert!(LineId::new("11-S8").is_measurable());
        assert!(!LineId::new("-1").is_measurable());
        assert!(!LineId::new("").is_measurable());
    }

    #[test]
    fn same_trip() {
        let a = conn(1, 1001, 1002, "08:00", "08:05").with_trip(TripId::new("T1"));
        let b = conn(2, 1002, 1003, "08:06", "08:10").with_trip(TripId::new("T1"));
        let c = conn(3, 1002, 1003, "08:06", "08:10").with_trip(TripId::new("T2"));
        assert!(a.same_trip(&b));
        assert!(!a.same_trip(&c));
    }

    #[test]
    fn same_edge_is_undirected() {
        let ab = conn(1, 1001, 1002, "08:00", "08:05");
        let ba = conn(2, 1002, 1001, "09:00", "09:05");
        let bc = conn(3, 1002, 1003, "09:00", "09:05");
        assert!(ab.same_edge(&ba));
        assert!(ab.same_edge(&ab));
        assert!(!ab.same_edge(&bc));
    }
}
