//! Post-processing of recorded routes.

use std::sync::Arc;

use crate::domain::{Connection, Path};

/// Merge legs passing through virtual stations into their successor.
///
/// A leg ending at a virtual station is combined with the following leg:
/// the merged leg keeps the first leg's identity and departure and takes
/// the second leg's arrival and destination. A missing line id is taken
/// from the second leg, or failing that from the previous leg on the same
/// trip.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tour_search::domain::{ClockTime, Connection, ConnectionId, Path, StationId};
/// use tour_search::planner::correct_virtual_stations;
///
/// let t = |s| ClockTime::parse_hhmm(s).unwrap();
/// let hop = |id, from, to, dep, arr| {
///     Arc::new(Connection::new(ConnectionId(id), StationId::new(from), StationId::new(to), t(dep), t(arr)).unwrap())
/// };
///
/// let path = Path::start(StationId::new(1001), t("08:00"))
///     .extended(hop(1, 1001, 17, "08:00", "08:05"))
///     .extended(hop(2, 17, 1002, "08:05", "08:12"));
///
/// let corrected = correct_virtual_stations(&path);
/// assert_eq!(corrected.legs().len(), 1);
/// assert_eq!(corrected.end_station(), StationId::new(1002));
/// assert_eq!(corrected.arrival_time(), t("08:12"));
/// ```
pub fn correct_virtual_stations(path: &Path) -> Path {
    let legs = path.legs();
    if !legs.iter().any(|c| c.to.is_virtual()) {
        return path.clone();
    }

    let mut corrected: Vec<Arc<Connection>> = Vec::with_capacity(legs.len());
    let mut i = 0;
    while i < legs.len() {
        let mut leg = Arc::clone(&legs[i]);
        while leg.to.is_virtual() && i + 1 < legs.len() {
            let next = &legs[i + 1];
            let mut merged = (*leg).clone();
            merged.to = next.to;
            merged.arrival = next.arrival;
            if merged.line_id.is_none() {
                merged.line_id = next
                    .line_id
                    .clone()
                    .or_else(|| previous_line_on_trip(&corrected, &merged));
            }
            leg = Arc::new(merged);
            i += 1;
        }
        corrected.push(leg);
        i += 1;
    }

    corrected
        .into_iter()
        .fold(Path::start(path.start_station(), path.start_time()), |p, c| {
            p.extended(c)
        })
}

fn previous_line_on_trip(
    legs: &[Arc<Connection>],
    leg: &Connection,
) -> Option<crate::domain::LineId> {
    leg.trip_id.as_ref()?;
    legs.iter()
        .rev()
        .filter(|c| c.same_trip(leg))
        .find_map(|c| c.line_id.clone())
}
