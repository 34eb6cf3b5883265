//! The planning horizon every service-day code is aligned to.

use chrono::NaiveDate;

use super::CalendarError;

const DEFAULT_FIRST: NaiveDate = match NaiveDate::from_ymd_opt(2017, 12, 10) {
    Some(date) => date,
    None => panic!("invalid default horizon start"),
};

const DEFAULT_LAST: NaiveDate = match NaiveDate::from_ymd_opt(2018, 12, 8) {
    Some(date) => date,
    None => panic!("invalid default horizon end"),
};

/// An inclusive range of calendar days.
///
/// Day offsets count from `first` (offset 0) to `last`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tour_search::calendar::PlanningHorizon;
///
/// let first = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
/// let last = NaiveDate::from_ymd_opt(2018, 1, 31).unwrap();
/// let horizon = PlanningHorizon::new(first, last).unwrap();
///
/// assert_eq!(horizon.len(), 31);
/// assert_eq!(horizon.offset_of(NaiveDate::from_ymd_opt(2018, 1, 3).unwrap()).unwrap(), 2);
/// assert!(horizon.offset_of(NaiveDate::from_ymd_opt(2018, 2, 1).unwrap()).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanningHorizon {
    first: NaiveDate,
    last: NaiveDate,
}

impl PlanningHorizon {
    pub fn new(first: NaiveDate, last: NaiveDate) -> Result<Self, CalendarError> {
        if last < first {
            return Err(CalendarError::InvalidRange { start: first, end: last });
        }
        Ok(Self { first, last })
    }

    pub fn first(&self) -> NaiveDate {
        self.first
    }

    pub fn last(&self) -> NaiveDate {
        self.last
    }

    /// Number of days in the horizon.
    pub fn len(&self) -> usize {
        // last >= first is checked at construction
        (self.last - self.first).num_days() as usize + 1
    }

    /// Always false: a horizon holds at least one day.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    /// Offset of `date` from the first day.
    pub fn offset_of(&self, date: NaiveDate) -> Result<usize, CalendarError> {
        if !self.contains(date) {
            return Err(CalendarError::OutsideHorizon { date });
        }
        Ok((date - self.first).num_days() as usize)
    }

    /// The date at `offset`, if it lies within the horizon.
    pub fn date_of(&self, offset: usize) -> Option<NaiveDate> {
        if offset >= self.len() {
            return None;
        }
        self.first.checked_add_days(chrono::Days::new(offset as u64))
    }

    /// Check that `[start, end]` is a non-empty range inside the horizon.
    pub fn check_period(&self, start: NaiveDate, end: NaiveDate) -> Result<(), CalendarError> {
        if end < start {
            return Err(CalendarError::InvalidRange { start, end });
        }
        self.offset_of(start)?;
        self.offset_of(end)?;
        Ok(())
    }

    /// All dates in `[start, end]`. The range must lie inside the horizon.
    pub fn period_days(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<impl Iterator<Item = NaiveDate>, CalendarError> {
        self.check_period(start, end)?;
        let count = (end - start).num_days() as usize + 1;
        Ok(start.iter_days().take(count))
    }
}

impl Default for PlanningHorizon {
    fn default() -> Self {
        Self {
            first: DEFAULT_FIRST,
            last: DEFAULT_LAST,
        }
    }
}
