//! Shortest ride time from every station back to the start.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;

use tracing::debug;

use crate::domain::{Connection, StationId};

/// Minimum in-vehicle minutes from each station to the start station.
///
/// Waiting is ignored, so the values are lower bounds on the real return
/// time.
#[derive(Debug, Clone)]
pub struct EarliestReturnTable {
    start: StationId,
    minutes: HashMap<StationId, u32>,
}

impl EarliestReturnTable {
    /// Dijkstra from `start` over reversed connections.
    pub fn build(connections: &[Arc<Connection>], start: StationId) -> Self {
        // arrival station -> (departure station, ride minutes)
        let mut incoming: HashMap<StationId, HashMap<StationId, u32>> = HashMap::new();
        for c in connections {
            let ride = c.duration_minutes();
            incoming
                .entry(c.to)
                .or_default()
                .entry(c.from)
                .and_modify(|best| *best = (*best).min(ride))
                .or_insert(ride);
        }

        let mut minutes = HashMap::new();
        let mut queue = BinaryHeap::new();
        minutes.insert(start, 0);
        queue.push(Reverse((0u32, start)));

        while let Some(Reverse((dist, station))) = queue.pop() {
            if minutes.get(&station).is_some_and(|&best| dist > best) {
                continue;
            }
            let Some(sources) = incoming.get(&station) else {
                continue;
            };
            for (&from, &ride) in sources {
                let candidate = dist + ride;
                let improves = minutes.get(&from).is_none_or(|&best| candidate < best);
                if improves {
                    minutes.insert(from, candidate);
                    queue.push(Reverse((candidate, from)));
                }
            }
        }

        debug!(%start, reachable = minutes.len(), "built earliest return table");
        Self { start, minutes }
    }

    pub fn start(&self) -> StationId {
        self.start
    }

    /// Ride minutes back to the start, or `None` if the start is unreachable.
    pub fn minutes_to_start(&self, station: StationId) -> Option<u32> {
        self.minutes.get(&station).copied()
    }

    /// Number of stations that can reach the start.
    pub fn len(&self) -> usize {
        self.minutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minutes.is_empty()
    }
}
