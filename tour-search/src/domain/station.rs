//! Station identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid station number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station number: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// A numeric station identifier from the timetable.
///
/// Numbers below [`StationId::VIRTUAL_LIMIT`] denote virtual pseudo-stations
/// (tunnel portals and similar timing points) that riders cannot change at.
///
/// # Examples
///
/// ```
/// use tour_search::domain::StationId;
///
/// let zurich = StationId::parse("8503000").unwrap();
/// assert_eq!(zurich.number(), 8503000);
/// assert!(!zurich.is_virtual());
///
/// assert!(StationId::new(138).is_virtual());
/// assert!(StationId::parse("85x").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(u32);

impl StationId {
    /// Station numbers below this limit are virtual.
    pub const VIRTUAL_LIMIT: u32 = 1000;

    /// Create a station id from its number.
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// Parse a station id from its decimal representation.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStationId {
                reason: "must be decimal digits only",
            });
        }

        s.parse::<u32>().map(Self).map_err(|_| InvalidStationId {
            reason: "out of range",
        })
    }

    /// Returns the station number.
    pub fn number(&self) -> u32 {
        self.0
    }

    /// Whether this is a virtual pseudo-station.
    pub fn is_virtual(&self) -> bool {
        self.0 < Self::VIRTUAL_LIMIT
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
