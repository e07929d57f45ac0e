use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDate {
    year: u16,
    month: u8,
    day: u8,
}

impl CalendarDate {
    /// Out-of-range months and days are pulled back into the calendar.
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        let month = month.clamp(1, 12);
        let day = day.clamp(1, days_in_month(year, month - 1));
        Self { year, month, day }
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    /// 1. April 925, the day the campaign opens.
    pub fn from_start() -> Self {
        Self::new(925, 4, 1)
    }

    /// Zero-based month, as used by the season and banner helpers.
    pub fn month_index(&self) -> u8 {
        self.month.saturating_sub(1)
    }

    pub fn days_in_current_month(&self) -> u8 {
        days_in_month(self.year, self.month_index())
    }

    /// `DD.MM.YYYY` with the year left unpadded (`01.04.925`).
    pub fn format(&self) -> String {
        format!("{:02}.{:02}.{}", self.day, self.month, self.year)
    }

    /// Percentage of the month elapsed before the current day, 0..=100.
    pub fn day_progress(&self) -> u8 {
        let total = f64::from(self.days_in_current_month());
        let elapsed = f64::from(self.day.saturating_sub(1));
        let pct = ((elapsed / total) * 100.0 + 0.5).floor();
        pct.clamp(0.0, 100.0) as u8
    }

    pub fn advance_days(&mut self, days: u64) {
        let mut remaining = days;
        while remaining > 0 {
            let days_in_month = self.days_in_current_month();
            if self.day as u64 + remaining <= days_in_month as u64 {
                self.day = (self.day as u64 + remaining) as u8;
                break;
            } else {
                remaining -= days_in_month.saturating_sub(self.day) as u64 + 1;
                self.advance_to_next_month();
            }
        }
    }

    /// Jumps to the first day of the following month.
    pub fn advance_to_next_month(&mut self) {
        self.advance_months(1);
    }

    /// Jumps to the first day `months` months later. The year saturates at
    /// `u16::MAX`.
    pub fn advance_months(&mut self, months: u32) {
        let total = u64::from(self.month_index()) + u64::from(months);
        let years = u16::try_from(total / 12).unwrap_or(u16::MAX);
        self.year = self.year.saturating_add(years);
        self.month = (total % 12) as u8 + 1;
        self.day = 1;
    }
}

impl Default for CalendarDate {
    fn default() -> Self {
        Self::from_start()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Number of days in `month_index` (0 = January) of `year`.
#[inline]
pub fn days_in_month(year: u16, month_index: u8) -> u8 {
    match month_index {
        0 | 2 | 4 | 6 | 7 | 9 | 11 => 31,
        3 | 5 | 8 | 10 => 30,
        1 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

#[inline]
fn is_leap_year(year: u16) -> bool {
    (year as u32 % 4 == 0 && year as u32 % 100 != 0) || year as u32 % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2021, 0), 31);
        assert_eq!(days_in_month(2021, 1), 28);
        assert_eq!(days_in_month(2020, 1), 29);
        assert_eq!(days_in_month(1900, 1), 28);
        assert_eq!(days_in_month(2000, 1), 29);
        assert_eq!(days_in_month(925, 3), 30);
    }

    #[test]
    fn format_pads_day_and_month_only() {
        assert_eq!(CalendarDate::new(925, 4, 1).format(), "01.04.925");
        assert_eq!(CalendarDate::new(1024, 12, 31).to_string(), "31.12.1024");
    }

    #[test]
    fn day_progress_starts_at_zero() {
        assert_eq!(CalendarDate::new(2021, 1, 1).day_progress(), 0);
        assert_eq!(CalendarDate::new(2021, 1, 16).day_progress(), 48);
        assert_eq!(CalendarDate::new(2021, 1, 31).day_progress(), 97);
    }

    #[test]
    fn advance_days_rolls_over_months_and_years() {
        let mut date = CalendarDate::new(925, 4, 29);
        date.advance_days(2);
        assert_eq!(date, CalendarDate::new(925, 5, 1));

        let mut date = CalendarDate::new(925, 12, 31);
        date.advance_days(1);
        assert_eq!(date, CalendarDate::new(926, 1, 1));

        let mut date = CalendarDate::from_start();
        date.advance_days(30 + 31);
        assert_eq!(date, CalendarDate::new(925, 6, 1));
    }

    #[test]
    fn new_pulls_dates_into_the_calendar() {
        assert_eq!(CalendarDate::new(925, 2, 30), CalendarDate::new(925, 2, 28));
        assert_eq!(CalendarDate::new(925, 13, 0), CalendarDate::new(925, 12, 1));
        assert_eq!(CalendarDate::new(925, 0, 5).month(), 1);
    }

    #[test]
    fn advance_days_survives_an_overlong_month() {
        let mut date: CalendarDate =
            serde_json::from_str(r#"{ "year": 925, "month": 2, "day": 30 }"#).unwrap();
        date.advance_days(1);
        assert_eq!(date, CalendarDate::new(925, 3, 1));
    }

    #[test]
    fn advance_months_counts_whole_years() {
        let mut date = CalendarDate::from_start();
        date.advance_months(24);
        assert_eq!(date, CalendarDate::new(927, 4, 1));

        let mut date = CalendarDate::new(925, 11, 20);
        date.advance_months(3);
        assert_eq!(date, CalendarDate::new(926, 2, 1));
    }

    #[test]
    fn advance_months_saturates_the_year() {
        let mut date = CalendarDate::new(u16::MAX, 12, 1);
        date.advance_to_next_month();
        assert_eq!(date.year(), u16::MAX);
        assert_eq!(date.month(), 1);

        let mut date = CalendarDate::from_start();
        date.advance_months(u32::MAX);
        assert_eq!(date.year(), u16::MAX);
    }

    #[test]
    fn advance_to_next_month_resets_day() {
        let mut date = CalendarDate::new(925, 4, 17);
        date.advance_to_next_month();
        assert_eq!(date, CalendarDate::new(925, 5, 1));
    }
}
