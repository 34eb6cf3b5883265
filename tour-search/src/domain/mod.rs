//! Domain types for the measurement tour planner.
//!
//! This module contains the core domain model types that represent
//! validated timetable data. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod connection;
mod error;
mod measurement;
mod path;
mod station;
mod time;

pub use connection::{Connection, ConnectionId, LineCategory, LineId, TripId};
pub use error::DomainError;
pub use measurement::{LineKey, TimeWindow, WeekdayGroup};
pub use path::Path;
pub use station::{InvalidStationId, StationId};
pub use time::{ClockTime, MINUTES_PER_DAY, TimeError};
