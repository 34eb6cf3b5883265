//! Measurement buckets: time windows, weekday groups and line keys.

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::connection::LineId;
use super::time::ClockTime;

/// A fixed time-of-day bucket.
///
/// The legacy numbering (`1`-`5`, with `0` for the whole day) is kept in
/// [`TimeWindow::id`] because requirement files refer to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    AllDay,
    Night,
    Morning,
    Midday,
    Afternoon,
    Evening,
}

impl TimeWindow {
    /// The windows a time point can fall into, in order.
    pub const PARTITION: [TimeWindow; 5] = [
        TimeWindow::Night,
        TimeWindow::Morning,
        TimeWindow::Midday,
        TimeWindow::Afternoon,
        TimeWindow::Evening,
    ];

    /// Inclusive minute-of-day bounds of this window.
    pub fn bounds(&self) -> (u32, u32) {
        match self {
            TimeWindow::AllDay => (0, 1439),
            TimeWindow::Night => (0, 359),
            TimeWindow::Morning => (360, 659),
            TimeWindow::Midday => (660, 959),
            TimeWindow::Afternoon => (960, 1259),
            TimeWindow::Evening => (1260, 1439),
        }
    }

    /// The window a time point belongs to. Never returns `AllDay`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tour_search::domain::{ClockTime, TimeWindow};
    ///
    /// let t = ClockTime::parse_hhmm("08:15").unwrap();
    /// assert_eq!(TimeWindow::of(t), TimeWindow::Morning);
    ///
    /// // Past midnight wraps onto the next calendar day.
    /// let late = ClockTime::parse_hhmm("24:30").unwrap();
    /// assert_eq!(TimeWindow::of(late), TimeWindow::Night);
    /// ```
    pub fn of(time: ClockTime) -> TimeWindow {
        let minute = time.minute_of_day();
        Self::PARTITION
            .into_iter()
            .find(|w| {
                let (lo, hi) = w.bounds();
                lo <= minute && minute <= hi
            })
            .unwrap_or(TimeWindow::Evening)
    }

    /// Legacy numeric id.
    pub fn id(&self) -> u8 {
        match self {
            TimeWindow::AllDay => 0,
            TimeWindow::Night => 1,
            TimeWindow::Morning => 2,
            TimeWindow::Midday => 3,
            TimeWindow::Afternoon => 4,
            TimeWindow::Evening => 5,
        }
    }

    /// Look up a window by its legacy id.
    pub fn from_id(id: u8) -> Option<TimeWindow> {
        match id {
            0 => Some(TimeWindow::AllDay),
            1 => Some(TimeWindow::Night),
            2 => Some(TimeWindow::Morning),
            3 => Some(TimeWindow::Midday),
            4 => Some(TimeWindow::Afternoon),
            5 => Some(TimeWindow::Evening),
            _ => None,
        }
    }
}

/// A category of days used to bucket measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekdayGroup {
    All,
    Weekdays,
    Saturday,
    Sunday,
}

impl WeekdayGroup {
    pub const ALL_GROUPS: [WeekdayGroup; 4] = [
        WeekdayGroup::All,
        WeekdayGroup::Weekdays,
        WeekdayGroup::Saturday,
        WeekdayGroup::Sunday,
    ];

    /// Whether `day` belongs to this group.
    pub fn contains(&self, day: Weekday) -> bool {
        match self {
            WeekdayGroup::All => true,
            WeekdayGroup::Weekdays => day.number_from_monday() <= 5,
            WeekdayGroup::Saturday => day == Weekday::Sat,
            WeekdayGroup::Sunday => day == Weekday::Sun,
        }
    }

    /// The specific (non-`All`) group a weekday belongs to.
    pub fn specific(day: Weekday) -> WeekdayGroup {
        match day {
            Weekday::Sat => WeekdayGroup::Saturday,
            Weekday::Sun => WeekdayGroup::Sunday,
            _ => WeekdayGroup::Weekdays,
        }
    }

    /// Legacy numeric id.
    pub fn id(&self) -> u8 {
        match self {
            WeekdayGroup::All => 10,
            WeekdayGroup::Weekdays => 11,
            WeekdayGroup::Saturday => 12,
            WeekdayGroup::Sunday => 13,
        }
    }

    /// Look up a group by its legacy id.
    pub fn from_id(id: u8) -> Option<WeekdayGroup> {
        Self::ALL_GROUPS.into_iter().find(|g| g.id() == id)
    }
}

/// The addressable unit of a measurement requirement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub line_id: LineId,
    pub time_window: TimeWindow,
    pub weekday_group: WeekdayGroup,
}

impl LineKey {
    pub fn new(line_id: LineId, time_window: TimeWindow, weekday_group: WeekdayGroup) -> Self {
        Self {
            line_id,
            time_window,
            weekday_group,
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.line_id,
            self.time_window.id(),
            self.weekday_group.id()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    #[test]
    fn window_boundaries() {
        assert_eq!(TimeWindow::of(time("00:00")), TimeWindow::Night);
        assert_eq!(TimeWindow::of(time("05:59")), TimeWindow::Night);
        assert_eq!(TimeWindow::of(time("06:00")), TimeWindow::Morning);
        assert_eq!(TimeWindow::of(time("10:59")), TimeWindow::Morning);
        assert_eq!(TimeWindow::of(time("11:00")), TimeWindow::Midday);
        assert_eq!(TimeWindow::of(time("16:00")), TimeWindow::Afternoon);
        assert_eq!(TimeWindow::of(time("21:00")), TimeWindow::Evening);
        assert_eq!(TimeWindow::of(time("23:59")), TimeWindow::Evening);
    }

    #[test]
    fn window_wraps_after_midnight() {
        assert_eq!(TimeWindow::of(time("24:00")), TimeWindow::Night);
        assert_eq!(TimeWindow::of(time("30:00")), TimeWindow::Morning);
    }

    #[test]
    fn window_ids_roundtrip() {
        for id in 0..=5 {
            assert_eq!(TimeWindow::from_id(id).map(|w| w.id()), Some(id));
        }
        assert_eq!(TimeWindow::from_id(6), None);
    }

    #[test]
    fn weekday_groups() {
        assert!(WeekdayGroup::All.contains(Weekday::Sun));
        assert!(WeekdayGroup::Weekdays.contains(Weekday::Fri));
        assert!(!WeekdayGroup::Weekdays.contains(Weekday::Sat));
        assert!(WeekdayGroup::Saturday.contains(Weekday::Sat));
        assert!(!WeekdayGroup::Sunday.contains(Weekday::Mon));
        assert_eq!(WeekdayGroup::specific(Weekday::Wed), WeekdayGroup::Weekdays);
        assert_eq!(WeekdayGroup::specific(Weekday::Sun), WeekdayGroup::Sunday);
    }

    #[test]
    fn weekday_group_ids() {
        assert_eq!(WeekdayGroup::from_id(11), Some(WeekdayGroup::Weekdays));
        assert_eq!(WeekdayGroup::from_id(14), None);
    }

    #[test]
    fn line_key_display() {
        let key = LineKey::new(LineId::new("S8"), TimeWindow::Morning, WeekdayGroup::Saturday);
        assert_eq!(key.to_string(), "(S8, 2, 12)");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every time point lands inside the bounds of its window
        #[test]
        fn time_in_own_window(total in 0u32..(48 * 60)) {
            let t = ClockTime::from_minutes(total);
            let window = TimeWindow::of(t);
            let (lo, hi) = window.bounds();
            prop_assert!(window != TimeWindow::AllDay);
            prop_assert!(lo <= t.minute_of_day() && t.minute_of_day() <= hi);
        }
    }
}
