//! Per-connection service-day codes.
//!
//! The timetable stores the days a connection operates as a hexadecimal bit
//! string aligned to the planning horizon: two padding bits, then one bit per
//! horizon day (most significant bit of each digit first), then more padding.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

use super::{CalendarError, PlanningHorizon};

/// Fixed-size bitset with one bit per horizon day.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DayBitset {
    words: Vec<u64>,
    len: usize,
}

impl DayBitset {
    /// A bitset of `len` days, all cleared.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether day `offset` is set. Offsets past the end are never set.
    pub fn get(&self, offset: usize) -> bool {
        if offset >= self.len {
            return false;
        }
        self.words[offset / 64] & (1 << (offset % 64)) != 0
    }

    pub fn set(&mut self, offset: usize) {
        if offset < self.len {
            self.words[offset / 64] |= 1 << (offset % 64);
        }
    }

    /// Number of set days.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

impl fmt::Debug for DayBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DayBitset({}/{} days)", self.count(), self.len)
    }
}

/// The days a connection operates on.
///
/// Identical codes are usually shared between many connections, so the
/// bitset sits behind an `Arc`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tour_search::calendar::{PlanningHorizon, ServiceDays};
///
/// let first = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
/// let last = NaiveDate::from_ymd_opt(2018, 1, 6).unwrap();
/// let horizon = PlanningHorizon::new(first, last).unwrap();
///
/// // 11 | 101010 | 1111 -> runs on Jan 1st, 3rd and 5th
/// let days = ServiceDays::parse("eaf", &horizon).unwrap();
/// assert!(days.runs_on_offset(0));
/// assert!(!days.runs_on_offset(1));
/// assert!(days.runs_on_offset(4));
///
/// assert!(ServiceDays::parse("", &horizon).unwrap().is_daily());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ServiceDays {
    /// Runs every day of the horizon.
    #[default]
    Daily,
    Calendar(Arc<DayBitset>),
}

impl ServiceDays {
    /// Number of padding bits before the first day.
    pub const LEADING_BITS: usize = 2;

    /// Parse a hex code against `horizon`. An empty code means daily service.
    pub fn parse(code: &str, horizon: &PlanningHorizon) -> Result<Self, CalendarError> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(ServiceDays::Daily);
        }

        let available_bits = code.len() * 4;
        let required_bits = Self::LEADING_BITS + horizon.len();
        if available_bits < required_bits {
            return Err(CalendarError::CodeTooShort {
                bits: available_bits,
                required: required_bits,
            });
        }

        let mut days = DayBitset::new(horizon.len());
        for (index, ch) in code.chars().enumerate() {
            let nibble = ch
                .to_digit(16)
                .ok_or(CalendarError::InvalidHexDigit { position: index })?;
            for bit in 0..4 {
                if nibble & (0b1000 >> bit) == 0 {
                    continue;
                }
                let position = index * 4 + bit;
                if position >= Self::LEADING_BITS {
                    days.set(position - Self::LEADING_BITS);
                }
            }
        }

        Ok(ServiceDays::Calendar(Arc::new(days)))
    }

    /// Service on exactly the given dates.
    pub fn from_dates(
        dates: impl IntoIterator<Item = NaiveDate>,
        horizon: &PlanningHorizon,
    ) -> Result<Self, CalendarError> {
        let mut days = DayBitset::new(horizon.len());
        for date in dates {
            days.set(horizon.offset_of(date)?);
        }
        Ok(ServiceDays::Calendar(Arc::new(days)))
    }

    pub fn is_daily(&self) -> bool {
        matches!(self, ServiceDays::Daily)
    }

    /// Whether the connection runs on horizon day `offset`.
    pub fn runs_on_offset(&self, offset: usize) -> bool {
        match self {
            ServiceDays::Daily => true,
            ServiceDays::Calendar(days) => days.get(offset),
        }
    }

    /// Whether the connection runs on `date`.
    pub fn runs_on(&self, date: NaiveDate, horizon: &PlanningHorizon) -> Result<bool, CalendarError> {
        let offset = horizon.offset_of(date)?;
        Ok(self.runs_on_offset(offset))
    }

    /// Encode as a hex code aligned to `horizon`.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use tour_search::calendar::{PlanningHorizon, ServiceDays};
    ///
    /// let first = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
    /// let last = NaiveDate::from_ymd_opt(2018, 1, 6).unwrap();
    /// let horizon = PlanningHorizon::new(first, last).unwrap();
    ///
    /// let days = ServiceDays::parse("eaf", &horizon).unwrap();
    /// assert_eq!(days.to_hex(&horizon), "eaf");
    /// assert_eq!(ServiceDays::Daily.to_hex(&horizon), "fff");
    /// ```
    pub fn to_hex(&self, horizon: &PlanningHorizon) -> String {
        let mut bits = Vec::with_capacity(horizon.len() + 2 * Self::LEADING_BITS + 3);
        bits.extend([true; Self::LEADING_BITS]);
        bits.extend((0..horizon.len()).map(|d| self.runs_on_offset(d)));
        bits.extend([true; Self::LEADING_BITS]);
        while bits.len() % 4 != 0 {
            bits.push(true);
        }

        bits.chunks(4)
            .map(|chunk| {
                let nibble = chunk
                    .iter()
                    .fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit));
                char::from_digit(nibble, 16).unwrap_or('f')
            })
            .collect()
    }
}
