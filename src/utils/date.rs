//! Calendar helpers: half-open day ranges and the institutional day boundary.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDateRange(format!("malformed date '{s}'")))
}

/// Midnight UTC of a calendar day, the normalised storage key.
pub fn utc_midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Calendar days `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn half_open(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if end < start {
            return Err(AppError::InvalidDateRange(format!(
                "end {end} is before start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Both bounds included, as typed by users.
    pub fn inclusive(from: NaiveDate, to: NaiveDate) -> AppResult<Self> {
        if to < from {
            return Err(AppError::InvalidDateRange(format!(
                "end {to} is before start {from}"
            )));
        }
        let end = to
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::InvalidDateRange(format!("date {to} out of range")))?;
        Ok(Self { start: from, end })
    }

    pub fn single(day: NaiveDate) -> AppResult<Self> {
        Self::inclusive(day, day)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end_exclusive(&self) -> NaiveDate {
        self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Every day in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d < end)
    }
}

/// The institution's local day expressed as a UTC window.
///
/// Records are keyed by their calendar day (stored as UTC midnight), so a
/// window selects exactly the stored day it was built from; `from`/`to`
/// are echoed back to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Day cutover as a fixed offset from UTC, in minutes.
///
/// 330 reproduces the 18:30 UTC cutover (UTC+05:30 local midnight).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset_minutes: i32,
}

impl DayBoundary {
    pub fn new(offset_minutes: i32) -> AppResult<Self> {
        if offset_minutes.abs() >= 24 * 60 {
            return Err(AppError::Config(format!(
                "day_offset_minutes must be within ±1439, got {offset_minutes}"
            )));
        }
        Ok(Self { offset_minutes })
    }

    /// `[local midnight, next local midnight - 1ms]` in UTC.
    pub fn window(&self, day: NaiveDate) -> DayWindow {
        let from = utc_midnight(day) - Duration::minutes(self.offset_minutes as i64);
        let to = from + Duration::days(1) - Duration::milliseconds(1);
        DayWindow { from, to }
    }

    /// Local calendar day containing `now`.
    pub fn day_of(&self, now: DateTime<Utc>) -> NaiveDate {
        (now + Duration::minutes(self.offset_minutes as i64)).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.day_of(Utc::now())
    }
}
