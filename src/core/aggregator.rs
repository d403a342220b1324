//! Range aggregation.
//!
//! Storage is partitioned by day and has no cross-day scan, so a range is
//! replayed one day at a time: day reader, then reconciler, then the rows
//! the tag-state filter lets through. Output order is day ascending, then
//! retrieval order (present rows as stored, absent rows in cohort order).
//! Any parallel driver must restore that order before sorting/paging.

use crate::core::cohort::Cohort;
use crate::core::day_reader::read_day;
use crate::core::reconciler::reconcile;
use crate::core::taxonomy::TagState;
use crate::errors::AppResult;
use crate::models::kind::Kind;
use crate::models::row::AggregatedRow;
use crate::utils::date::DateRange;
use chrono::NaiveDate;
use log::{debug, info};
use rusqlite::Connection;

/// Rows emitted for a single day.
///
/// The reconciler always runs; its rows are emitted only for `Total` and
/// `Absent`.
pub fn day_rows(
    conn: &Connection,
    kind: Kind,
    day: NaiveDate,
    cohort: &Cohort,
    state: TagState,
) -> AppResult<Vec<AggregatedRow>> {
    let reading = read_day(conn, kind, day, cohort)?;
    let absent = reconcile(cohort, day, &reading.present_ids());

    let mut rows: Vec<AggregatedRow> = reading
        .filtered(state)
        .into_iter()
        .filter_map(|r| {
            cohort
                .get(r.student_id)
                .map(|m| AggregatedRow::present(m.clone(), r.clone()))
        })
        .collect();

    debug!(
        "day {} kind={} present={} absent={} emitted_present={}",
        day,
        kind.to_db_str(),
        reading.records.len(),
        absent.len(),
        rows.len()
    );

    if matches!(state, TagState::Total | TagState::Absent) {
        rows.extend(absent);
    }

    Ok(rows)
}

/// Replay every day of `range`. Any storage failure aborts the whole range.
pub fn aggregate(
    conn: &Connection,
    kind: Kind,
    range: &DateRange,
    cohort: &Cohort,
    state: TagState,
) -> AppResult<Vec<AggregatedRow>> {
    let mut out = Vec::new();

    for day in range.days() {
        out.extend(day_rows(conn, kind, day, cohort, state)?);
    }

    info!(
        "aggregated kind={} {}..{} days={} cohort={} rows={}",
        kind.to_db_str(),
        range.start(),
        range.end_exclusive(),
        range.num_days(),
        cohort.len(),
        out.len()
    );

    Ok(out)
}
