use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime};
use std::ops::Range;
use types::DayOfWeek;

use crate::ConfigError;

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parses a time of day out of the formats calendar rows arrive in.
/// Dates and offsets are dropped, only the wall-clock time is kept.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for f in TIME_FORMATS {
        if let Ok(t) = NaiveTime::parse_from_str(s, f) {
            return Some(t);
        }
    }
    for f in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, f) {
            return Some(dt.time());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.time());
    }
    // "08:00:00+01" style columns
    let head = s.split(['+', 'Z']).next().unwrap_or(s);
    if head != s {
        return parse_time_of_day(head);
    }
    None
}

/// Weekly grid of fixed-length slots. Global slot `g = day * slots_per_day + slot_in_day`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeGrid {
    start_of_day: NaiveTime,
    slot_minutes: i64,
    slots_per_day: usize,
    days: Vec<DayOfWeek>,
}

impl TimeGrid {
    pub const DEFAULT_SLOT_MINUTES: i64 = 60;

    pub fn new(
        start_of_day: NaiveTime,
        end_of_day: NaiveTime,
        slot_minutes: i64,
        days: Vec<DayOfWeek>,
    ) -> Result<Self, ConfigError> {
        if slot_minutes <= 0 {
            return Err(ConfigError::SlotDuration(slot_minutes));
        }
        if days.is_empty() {
            return Err(ConfigError::NoDays);
        }
        let span = (end_of_day - start_of_day).num_minutes();
        if span <= 0 {
            return Err(ConfigError::InvalidTimeRange {
                start: start_of_day.format("%H:%M").to_string(),
                end: end_of_day.format("%H:%M").to_string(),
            });
        }
        let slots_per_day = (span / slot_minutes) as usize;
        if slots_per_day == 0 {
            return Err(ConfigError::EmptyGrid {
                start: start_of_day.format("%H:%M").to_string(),
                end: end_of_day.format("%H:%M").to_string(),
            });
        }
        Ok(Self {
            start_of_day,
            slot_minutes,
            slots_per_day,
            days,
        })
    }

    /// One-hour slots, Monday to Friday.
    pub fn weekly(start_of_day: &str, end_of_day: &str) -> Result<Self, ConfigError> {
        let start = parse_time_of_day(start_of_day)
            .ok_or_else(|| ConfigError::BadTime(start_of_day.to_string()))?;
        let end = parse_time_of_day(end_of_day)
            .ok_or_else(|| ConfigError::BadTime(end_of_day.to_string()))?;
        Self::new(
            start,
            end,
            Self::DEFAULT_SLOT_MINUTES,
            DayOfWeek::WEEKDAYS.to_vec(),
        )
    }

    pub fn slots_per_day(&self) -> usize {
        self.slots_per_day
    }

    pub fn total_slots(&self) -> usize {
        self.slots_per_day * self.days.len()
    }

    pub fn days(&self) -> &[DayOfWeek] {
        &self.days
    }

    pub fn start_of_day(&self) -> NaiveTime {
        self.start_of_day
    }

    pub fn end_of_day(&self) -> NaiveTime {
        self.time_of(self.slots_per_day)
    }

    /// Wall-clock start of the `slot_in_day`-th slot.
    pub fn time_of(&self, slot_in_day: usize) -> NaiveTime {
        self.start_of_day + Duration::minutes(slot_in_day as i64 * self.slot_minutes)
    }

    /// Day and start time of a global slot.
    pub fn locate(&self, slot: usize) -> Option<(DayOfWeek, NaiveTime)> {
        let day = *self.days.get(slot / self.slots_per_day)?;
        Some((day, self.time_of(slot % self.slots_per_day)))
    }

    /// "HH:MM" label of every slot in a day.
    pub fn slot_labels(&self) -> Vec<String> {
        (0..self.slots_per_day)
            .map(|s| self.time_of(s).format("%H:%M").to_string())
            .collect()
    }

    /// Global slot range covered by a calendar block, clamped to the day.
    /// `None` when the day is not on the grid, a time does not parse, or
    /// the clamped range is empty.
    pub fn slot_range(&self, day: &str, start: &str, end: &str) -> Option<Range<usize>> {
        let day = DayOfWeek::from_name(day)?;
        let day_idx = self.days.iter().position(|d| *d == day)?;
        let start = parse_time_of_day(start)?;
        let end = parse_time_of_day(end)?;

        let to_slot = |t: NaiveTime| {
            (t - self.start_of_day)
                .num_minutes()
                .div_euclid(self.slot_minutes)
        };
        let first = to_slot(start).max(0);
        let last = to_slot(end).min(self.slots_per_day as i64);
        if first >= last {
            return None;
        }
        let base = day_idx * self.slots_per_day;
        Some(base + first as usize..base + last as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_calendar_time_formats() {
        assert_eq!(parse_time_of_day("09:30"), Some(hm(9, 30)));
        assert_eq!(parse_time_of_day("09:30:00"), Some(hm(9, 30)));
        assert_eq!(
            parse_time_of_day("09:30:00.250").map(|t| t.format("%H:%M").to_string()),
            Some("09:30".into())
        );
        assert_eq!(parse_time_of_day("2024-01-02 14:00:00"), Some(hm(14, 0)));
        assert_eq!(parse_time_of_day("2024-01-02T14:00:00"), Some(hm(14, 0)));
        assert_eq!(parse_time_of_day("2024-01-02T14:00:00+01:00"), Some(hm(14, 0)));
        assert_eq!(parse_time_of_day("08:00:00+01"), Some(hm(8, 0)));
        assert_eq!(parse_time_of_day(""), None);
        assert_eq!(parse_time_of_day("noon"), None);
    }

    #[test]
    fn weekly_grid_counts_whole_slots() {
        let g = TimeGrid::weekly("08:00", "17:30").unwrap();
        assert_eq!(g.slots_per_day(), 9);
        assert_eq!(g.total_slots(), 45);
        assert_eq!(g.locate(10), Some((DayOfWeek::Tue, hm(9, 0))));
        assert_eq!(g.locate(45), None);
        assert_eq!(g.slot_labels()[0], "08:00");
    }

    #[test]
    fn rejects_bad_windows() {
        assert!(matches!(
            TimeGrid::weekly("17:00", "08:00"),
            Err(ConfigError::InvalidTimeRange { .. })
        ));
        assert!(matches!(
            TimeGrid::weekly("08:00", "08:00"),
            Err(ConfigError::InvalidTimeRange { .. })
        ));
        assert!(matches!(
            TimeGrid::weekly("08:00", "08:30"),
            Err(ConfigError::EmptyGrid { .. })
        ));
        assert!(matches!(
            TimeGrid::weekly("eight", "17:00"),
            Err(ConfigError::BadTime(_))
        ));
        assert_eq!(
            TimeGrid::new(hm(8, 0), hm(9, 0), 0, vec![DayOfWeek::Mon]),
            Err(ConfigError::SlotDuration(0))
        );
        assert_eq!(
            TimeGrid::new(hm(8, 0), hm(9, 0), 60, vec![]),
            Err(ConfigError::NoDays)
        );
    }

    #[test]
    fn calendar_blocks_map_to_clamped_ranges() {
        let g = TimeGrid::weekly("08:00", "12:00").unwrap();
        assert_eq!(g.slot_range("Monday", "09:00", "11:00"), Some(1..3));
        assert_eq!(g.slot_range("wed", "07:00", "09:00"), Some(8..9));
        assert_eq!(g.slot_range("Friday", "10:00", "18:00"), Some(18..20));
        // partial slots are truncated
        assert_eq!(g.slot_range("Monday", "09:30", "10:30"), Some(1..2));
        assert_eq!(g.slot_range("Saturday", "09:00", "11:00"), None);
        assert_eq!(g.slot_range("Monday", "11:00", "09:00"), None);
        assert_eq!(g.slot_range("Monday", "13:00", "15:00"), None);
        assert_eq!(g.slot_range("Monday", "bogus", "15:00"), None);
    }
}
