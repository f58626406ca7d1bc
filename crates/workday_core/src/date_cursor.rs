//! Selected-date cursor.
//!
//! # Responsibility
//! - Hold the one calendar date every day-scoped view reads from.
//! - Step by whole days without local-timezone drift.
//!
//! # Invariants
//! - The selected value is always a valid calendar date.
//! - `go_to` only accepts `YYYY-MM-DD`; anything else leaves state unchanged.

use crate::model::bucket::ISO_DATE_FORMAT;
use chrono::{Days, NaiveDate, Utc};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

/// Current date in UTC.
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parses a strict `YYYY-MM-DD` string.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if !ISO_DATE_RE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT).ok()
}

/// Calendar day before `day`.
pub fn previous_day(day: NaiveDate) -> Option<NaiveDate> {
    day.checked_sub_days(Days::new(1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCursor {
    selected: NaiveDate,
}

impl Default for DateCursor {
    fn default() -> Self {
        Self::today()
    }
}

impl DateCursor {
    pub fn new(selected: NaiveDate) -> Self {
        Self { selected }
    }

    pub fn today() -> Self {
        Self::new(utc_today())
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn selected_iso(&self) -> String {
        self.selected.format(ISO_DATE_FORMAT).to_string()
    }

    /// Moves to an absolute date. Returns whether the value was accepted.
    pub fn go_to(&mut self, iso: &str) -> bool {
        match parse_iso_date(iso) {
            Some(day) => {
                self.selected = day;
                true
            }
            None => {
                debug!("event=date_go_to module=date_cursor status=rejected");
                false
            }
        }
    }

    pub fn go_today(&mut self) {
        self.selected = utc_today();
    }

    /// Steps by `days`; out-of-range results leave the cursor in place.
    pub fn add_days(&mut self, days: i64) {
        let magnitude = Days::new(days.unsigned_abs());
        let next = if days >= 0 {
            self.selected.checked_add_days(magnitude)
        } else {
            self.selected.checked_sub_days(magnitude)
        };
        if let Some(next) = next {
            self.selected = next;
        }
    }

    pub fn go_prev_day(&mut self) {
        self.add_days(-1);
    }

    pub fn go_next_day(&mut self) {
        self.add_days(1);
    }

    pub fn previous_day(&self) -> Option<NaiveDate> {
        previous_day(self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_iso_date, DateCursor};
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn go_to_rejects_non_iso_input() {
        let mut cursor = DateCursor::new(ymd(2024, 1, 5));
        assert!(!cursor.go_to("2024-1-5"));
        assert!(!cursor.go_to("05/01/2024"));
        assert!(!cursor.go_to("2024-02-30"));
        assert_eq!(cursor.selected(), ymd(2024, 1, 5));

        assert!(cursor.go_to("2024-02-29"));
        assert_eq!(cursor.selected_iso(), "2024-02-29");
    }

    #[test]
    fn stepping_crosses_month_and_year_boundaries() {
        let mut cursor = DateCursor::new(ymd(2023, 12, 31));
        cursor.go_next_day();
        assert_eq!(cursor.selected(), ymd(2024, 1, 1));
        cursor.go_prev_day();
        cursor.go_prev_day();
        assert_eq!(cursor.selected(), ymd(2023, 12, 30));

        let mut march = DateCursor::new(ymd(2024, 3, 1));
        assert_eq!(march.previous_day(), Some(ymd(2024, 2, 29)));
        march.add_days(-366);
        assert_eq!(march.selected(), ymd(2023, 3, 1));
    }

    #[test]
    fn parse_iso_date_requires_zero_padding() {
        assert_eq!(parse_iso_date("2024-01-05"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_iso_date(" 2024-01-05"), None);
    }
}
