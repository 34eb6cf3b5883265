//! Timetable loading and indexing.
//!
//! Connections are loaded once per search through a [`TimetableSource`],
//! narrowed by a [`ConnectionFilter`], and sorted into a [`TimetableIndex`]
//! the search engine queries by station and time.

mod chains;
mod csv;
mod filter;
mod index;
mod return_table;
mod source;

pub use self::csv::CsvTimetable;
pub use chains::{TripChain, build_trip_station_chains};
pub use filter::ConnectionFilter;
pub use index::TimetableIndex;
pub use return_table::EarliestReturnTable;
pub use source::{InMemoryTimetable, TimetableSource};

use std::path::PathBuf;

use crate::calendar::CalendarError;

/// Errors from loading a timetable.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// Timetable file could not be opened
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV could not be parsed
    #[error("failed to read timetable: {0}")]
    Csv(#[from] ::csv::Error),

    /// A row holds inconsistent values
    #[error("invalid timetable row at line {line}: {reason}")]
    InvalidRow { line: usize, reason: String },

    /// A row's service-day code does not fit the planning horizon
    #[error("invalid service days at line {line}: {source}")]
    Calendar {
        line: usize,
        #[source]
        source: CalendarError,
    },
}
