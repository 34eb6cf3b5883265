//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from I/O and configuration errors.

use super::{ConnectionId, StationId};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A connection arrives before it departs
    #[error("connection {id} arrives before it departs")]
    ArrivalBeforeDeparture { id: ConnectionId },

    /// Path has no connections at all
    #[error("path must start with an origin connection")]
    EmptyPath,

    /// Consecutive connections don't meet at the same station
    #[error("connection {index} does not depart from the previous arrival station")]
    Discontinuous { index: usize },

    /// Joined route starts somewhere else than the first one ends
    #[error("cannot join routes: first ends at {end}, second starts at {start}")]
    JoinStationMismatch { end: StationId, start: StationId },

    /// Joined route leaves before the first one arrives
    #[error("cannot join routes: second route departs before the first arrives")]
    JoinDepartsBeforeArrival,

    /// Waiting between the joined routes is too long
    #[error("cannot join routes: waiting {wait} min exceeds {max} min")]
    JoinWaitTooLong { wait: i64, max: u32 },

    /// Not enough time for the line change between the joined routes
    #[error("cannot join routes: {gap} min is less than the {required} min change time")]
    JoinChangeTooShort { gap: i64, required: u32 },
}
