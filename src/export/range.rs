// src/export/range.rs

use crate::errors::{AppError, AppResult};
use crate::utils::date::DateRange;
use chrono::NaiveDate;

fn bad(msg: &str, r: &str) -> AppError {
    AppError::InvalidDateRange(format!("{msg} in '{r}'"))
}

/// Parse `--range` (year / month / day / interval), both ends inclusive.
///
/// Supported:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub fn parse_range(r: &str) -> AppResult<DateRange> {
    let (first, last) = match r.split_once(':') {
        Some((start_raw, end_raw)) => {
            let start = start_raw.trim();
            let end = end_raw.trim();

            if start.len() != end.len() {
                return Err(bad("start and end must have the same format", r));
            }
            (period(start, r)?.0, period(end, r)?.1)
        }
        None => period(r.trim(), r)?,
    };

    DateRange::inclusive(first, last)
}

/// First and last day of a single `YYYY`, `YYYY-MM` or `YYYY-MM-DD` period.
fn period(p: &str, r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match p.len() {
        4 => {
            let y: i32 = p.parse().map_err(|_| bad("invalid year", r))?;
            let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| bad("invalid year", r))?;
            let d2 = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| bad("invalid year", r))?;
            Ok((d1, d2))
        }
        7 => {
            let (ys, ms) = p.split_once('-').ok_or_else(|| bad("invalid month", r))?;
            let y: i32 = ys.parse().map_err(|_| bad("invalid year", r))?;
            let m: u32 = ms.parse().map_err(|_| bad("invalid month", r))?;
            let last = month_last_day(y, m).ok_or_else(|| bad("invalid month", r))?;

            let d1 = NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(|| bad("invalid month", r))?;
            let d2 = NaiveDate::from_ymd_opt(y, m, last).ok_or_else(|| bad("invalid month", r))?;
            Ok((d1, d2))
        }
        10 => {
            let d = NaiveDate::parse_from_str(p, "%Y-%m-%d").map_err(|_| bad("invalid date", r))?;
            Ok((d, d))
        }
        _ => Err(bad("unsupported range format", r)),
    }
}

fn month_last_day(y: i32, m: u32) -> Option<u32> {
    match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 => {
            let leap = (y % 4 == 0 && y % 100 != 0) || (y % 400 == 0);
            Some(if leap { 29 } else { 28 })
        }
        _ => None,
    }
}
