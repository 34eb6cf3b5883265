//! Splitting routes into same-line segments.

use serde::Serialize;

use crate::domain::{ClockTime, Connection, LineCategory, LineId, Path, StationId, TimeWindow, TripId};

/// A maximal run of one trip on one line within one time window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSegment {
    /// Index of the segment's first connection within the path.
    pub first_index: usize,
    /// Window of the first departure.
    pub time_window: TimeWindow,
    pub trip_id: Option<TripId>,
    pub line_id: Option<LineId>,
    pub line_name: String,
    pub category: LineCategory,
    pub operator: String,
    pub trip_number: Option<u32>,
    pub first_station: StationId,
    pub last_station: StationId,
    /// First departure and last arrival.
    pub line_interval: (ClockTime, ClockTime),
    /// Arrival at the boarding station and the departure from it.
    pub station_interval: (ClockTime, ClockTime),
    /// Arrival at the end of the same-trip, same-line run this segment is part of.
    pub final_arrival_of_line: ClockTime,
}

impl RouteSegment {
    /// Whether enough time is spent on the line to measure it.
    ///
    /// Counts from the segment's first departure to the end of the whole
    /// run on the line, so a run split by a time-window boundary measures
    /// in both windows.
    pub fn is_measurable(&self, min_minutes: u32) -> bool {
        let measurable_line = self.line_id.as_ref().is_some_and(LineId::is_measurable);
        measurable_line
            && self.final_arrival_of_line.minutes_since(self.line_interval.0)
                >= i64::from(min_minutes)
    }

    pub fn duration_minutes(&self) -> i64 {
        self.line_interval.1.minutes_since(self.line_interval.0)
    }
}

/// Split a route into segments.
///
/// A new segment starts whenever the trip or line id changes, or the
/// departure crosses into another time window. Legs without a trip id
/// (on-foot passages) form segments of their own.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tour_search::domain::{ClockTime, Connection, ConnectionId, LineId, Path, StationId, TripId};
/// use tour_search::scorer::route_segments;
///
/// let t = |s| ClockTime::parse_hhmm(s).unwrap();
/// let leg = |id, from, to, dep, arr| {
///     Connection::new(ConnectionId(id), StationId::new(from), StationId::new(to), t(dep), t(arr))
///         .unwrap()
///         .with_trip(TripId::new("T1"))
///         .with_line(LineId::new("S1"))
/// };
///
/// // 10:50 to 11:10 crosses from the morning into the midday window
/// let path = Path::start(StationId::new(1001), t("10:45"))
///     .extended(Arc::new(leg(1, 1001, 1002, "10:50", "10:58")))
///     .extended(Arc::new(leg(2, 1002, 1003, "11:00", "11:10")));
///
/// let segments = route_segments(&path);
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0].final_arrival_of_line, t("11:10"));
/// assert_eq!(segments[1].station_interval, (t("10:58"), t("11:00")));
/// ```
pub fn route_segments(path: &Path) -> Vec<RouteSegment> {
    let connections = path.connections();
    let mut segments: Vec<RouteSegment> = Vec::new();

    for index in 1..connections.len() {
        let leg = &connections[index];
        let window = TimeWindow::of(leg.departure);

        if let Some(current) = segments.last_mut() {
            let previous = &connections[index - 1];
            if continues_line(previous, leg) && current.time_window == window {
                current.last_station = leg.to;
                current.line_interval.1 = leg.arrival;
                continue;
            }
        }

        segments.push(RouteSegment {
            first_index: index,
            time_window: window,
            trip_id: leg.trip_id.clone(),
            line_id: leg.line_id.clone(),
            line_name: leg.line_name.clone(),
            category: leg.category.clone(),
            operator: leg.operator.clone(),
            trip_number: leg.trip_number,
            first_station: leg.from,
            last_station: leg.to,
            line_interval: (leg.departure, leg.arrival),
            station_interval: (connections[index - 1].arrival, leg.departure),
            final_arrival_of_line: final_arrival(connections, index),
        });
    }

    segments
}

fn continues_line(previous: &Connection, next: &Connection) -> bool {
    previous.trip_id.is_some() && previous.same_trip(next) && previous.line_id == next.line_id
}

fn final_arrival(connections: &[std::sync::Arc<Connection>], from: usize) -> ClockTime {
    let mut last = from;
    while last + 1 < connections.len() && continues_line(&connections[last], &connections[last + 1])
    {
        last += 1;
    }
    connections[last].arrival
}
