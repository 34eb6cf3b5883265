//! Station chains of whole trips.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{ClockTime, Connection, LineCategory, LineId, StationId, TripId};

/// The ordered stops of one trip with their times.
///
/// `departures` has no value at the last stop and `arrivals` none at the
/// first, so all three stop vectors have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripChain {
    pub stations: Vec<StationId>,
    pub departures: Vec<Option<ClockTime>>,
    pub arrivals: Vec<Option<ClockTime>>,
    /// Line of each leg, one per departure.
    pub line_ids: Vec<Option<LineId>>,
    pub trip_number: Option<u32>,
    pub operator: String,
    pub category: LineCategory,
    pub line_name: String,
}

impl TripChain {
    /// Number of stops.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Group connections by trip and chain their stops.
///
/// Legs are ordered by station order, then departure. Connections without a
/// trip id are skipped.
///
/// # Examples
///
/// ```
/// use tour_search::domain::{ClockTime, Connection, ConnectionId, StationId, TripId};
/// use tour_search::timetable::build_trip_station_chains;
///
/// let t = |s: &str| ClockTime::parse_hhmm(s).unwrap();
/// let s = StationId::new;
/// let legs = vec![
///     Connection::new(ConnectionId(2), s(1002), s(1003), t("08:12"), t("08:20")).unwrap()
///         .with_trip(TripId::new("T1")).with_station_order(2),
///     Connection::new(ConnectionId(1), s(1001), s(1002), t("08:00"), t("08:10")).unwrap()
///         .with_trip(TripId::new("T1")).with_station_order(1),
/// ];
///
/// let chains = build_trip_station_chains(legs.iter());
/// let chain = &chains[&TripId::new("T1")];
/// assert_eq!(chain.stations, vec![s(1001), s(1002), s(1003)]);
/// assert_eq!(chain.departures.last(), Some(&None));
/// ```
pub fn build_trip_station_chains<'a>(
    connections: impl IntoIterator<Item = &'a Connection>,
) -> BTreeMap<TripId, TripChain> {
    let mut by_trip: BTreeMap<TripId, Vec<&Connection>> = BTreeMap::new();
    for c in connections {
        if let Some(trip) = &c.trip_id {
            by_trip.entry(trip.clone()).or_default().push(c);
        }
    }

    by_trip
        .into_iter()
        .filter_map(|(trip, mut legs)| {
            legs.sort_by(|a, b| {
                a.station_order
                    .cmp(&b.station_order)
                    .then(a.departure.cmp(&b.departure))
            });
            let first = *legs.first()?;

            let mut stations = vec![first.from];
            let mut departures = Vec::with_capacity(legs.len() + 1);
            let mut arrivals = vec![None];
            let mut line_ids = Vec::with_capacity(legs.len());

            for leg in &legs {
                stations.push(leg.to);
                departures.push(Some(leg.departure));
                arrivals.push(Some(leg.arrival));
                line_ids.push(leg.line_id.clone());
            }
            departures.push(None);

            let chain = TripChain {
                stations,
                departures,
                arrivals,
                line_ids,
                trip_number: first.trip_number,
                operator: first.operator.clone(),
                category: first.category.clone(),
                line_name: first.line_name.clone(),
            };
            Some((trip, chain))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConnectionId;

    fn time(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    fn leg(id: u64, from: u32, to: u32, dep: &str, arr: &str, trip: &str, order: u32) -> Connection {
        Connection::new(
            ConnectionId(id),
            StationId::new(from),
            StationId::new(to),
            time(dep),
            time(arr),
        )
        .unwrap()
        .with_trip(TripId::new(trip))
        .with_station_order(order)
        .with_line(LineId::new("S8"))
        .with_operator("SBB")
        .with_trip_number(18815)
    }

    #[test]
    fn chains_per_trip() {
        let connections = vec![
            leg(3, 1003, 1004, "08:22", "08:30", "T1", 3),
            leg(1, 1001, 1002, "08:00", "08:10", "T1", 1),
            leg(2, 1002, 1003, "08:11", "08:20", "T1", 2),
            leg(4, 2001, 2002, "09:00", "09:10", "T2", 1),
        ];

        let chains = build_trip_station_chains(&connections);
        assert_eq!(chains.len(), 2);

        let t1 = &chains[&TripId::new("T1")];
        assert_eq!(t1.len(), 4);
        assert_eq!(
            t1.stations,
            vec![
                StationId::new(1001),
                StationId::new(1002),
                StationId::new(1003),
                StationId::new(1004)
            ]
        );
        assert_eq!(
            t1.departures,
            vec![Some(time("08:00")), Some(time("08:11")), Some(time("08:22")), None]
        );
        assert_eq!(
            t1.arrivals,
            vec![None, Some(time("08:10")), Some(time("08:20")), Some(time("08:30"))]
        );
        assert_eq!(t1.line_ids.len(), 3);
        assert_eq!(t1.operator, "SBB");
        assert_eq!(t1.trip_number, Some(18815));
    }

    #[test]
    fn skips_connections_without_trip() {
        let anonymous = Connection::new(
            ConnectionId(9),
            StationId::new(1001),
            StationId::new(1002),
            time("08:00"),
            time("08:05"),
        )
        .unwrap();
        assert!(build_trip_station_chains([&anonymous]).is_empty());
    }
}
