use chrono::{Datelike, Days, NaiveDate};

use crate::error::CoreError;
use crate::repeat::RepeatRule;

/// Storage and wire format of task dates.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Human format accepted by the list search (`DD.MM.YYYY`).
pub const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";

/// Parses a strict `YYYYMMDD` date: exactly eight ASCII digits forming a
/// valid calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a strict `DD.MM.YYYY` date.
pub fn parse_display_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[2] != b'.' || bytes[5] != b'.' {
        return None;
    }
    let digits_only = bytes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 2 && *i != 5)
        .all(|(_, b)| b.is_ascii_digit());
    if !digits_only {
        return None;
    }
    NaiveDate::parse_from_str(value, DISPLAY_DATE_FORMAT).ok()
}

/// Adds whole years, rolling an impossible Feb 29 forward to Mar 1.
///
/// The day is re-applied as an offset from the first of the target month,
/// which is how calendar overflow normalizes everywhere else.
fn add_years(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    let year = date.year().checked_add(i32::try_from(years).ok()?)?;
    NaiveDate::from_ymd_opt(year, date.month(), 1)?
        .checked_add_days(Days::new(u64::from(date.day0())))
}

impl RepeatRule {
    /// The date `periods` whole periods after `base`.
    pub fn advance_by(&self, base: NaiveDate, periods: u32) -> Option<NaiveDate> {
        match *self {
            RepeatRule::Daily { interval } => {
                base.checked_add_days(Days::new(u64::from(interval) * u64::from(periods)))
            }
            RepeatRule::Yearly => add_years(base, periods),
        }
    }

    /// One period after `date`.
    pub fn advance(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.advance_by(date, 1)
    }

    /// First occurrence counted from `base` that falls strictly after `now`.
    ///
    /// Always advances at least once, so a `base` already in the future
    /// still moves forward by one period. Occurrences are measured from
    /// `base` rather than chained, so a Feb 29 base lands on Feb 29 again in
    /// leap years and on Mar 1 otherwise.
    pub fn next_after(&self, now: NaiveDate, base: NaiveDate) -> Result<NaiveDate, CoreError> {
        let mut periods: u32 = 1;
        loop {
            let candidate = self
                .advance_by(base, periods)
                .ok_or(CoreError::InvalidData("date"))?;
            if candidate > now {
                return Ok(candidate);
            }
            periods = periods
                .checked_add(1)
                .ok_or(CoreError::InvalidData("date"))?;
        }
    }
}

/// Next occurrence of a task dated `base` with rule `repeat`, strictly after
/// `now`.
pub fn next_date(now: NaiveDate, base: NaiveDate, repeat: &str) -> Result<NaiveDate, CoreError> {
    RepeatRule::parse(repeat)?.next_after(now, base)
}
