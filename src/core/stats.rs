//! Same-day counters, computed straight from the day partition.
//!
//! Every counter comes from the taxonomy's state table: a cohort member is
//! evaluated against its events (empty when absent), so `present + absent`
//! always equals `total` and a tag's `present + missed` does too.

use crate::core::cohort::Cohort;
use crate::core::day_reader::read_day;
use crate::core::reconciler::DayPartition;
use crate::core::taxonomy::{TagState, states};
use crate::errors::AppResult;
use crate::models::kind::Kind;
use crate::models::row::AggregatedRow;
use crate::utils::date::DayWindow;
use chrono::NaiveDate;
use log::info;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub kind: Kind,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub window: DayWindow,
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    /// `<tag>` / `<tag>Missed` counters (plus `markedAbsent` for classes).
    #[serde(flatten)]
    pub per_tag: BTreeMap<&'static str, usize>,
    pub in_school: usize,
    pub out_school: usize,
    pub in_but_not_out_school: usize,
    /// Bus only; always 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrong_bus: Option<usize>,
    /// Bus only; always 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrong_stop: Option<usize>,
}

impl DayStats {
    /// Counter by its state name (`present`, `mCheckInMissed`, ...).
    pub fn count(&self, name: &str) -> Option<usize> {
        match name {
            "total" => Some(self.total),
            "present" => Some(self.present),
            "absent" => Some(self.absent),
            "inSchool" => Some(self.in_school),
            "outSchool" => Some(self.out_school),
            "inButNotOutSchool" => Some(self.in_but_not_out_school),
            "wrongBus" => self.wrong_bus,
            "wrongStop" => self.wrong_stop,
            other => self.per_tag.get(other).copied(),
        }
    }
}

/// Count every named state over one day's partition.
pub fn tally(kind: Kind, partition: &DayPartition) -> BTreeMap<&'static str, usize> {
    let mut counts: BTreeMap<&'static str, usize> =
        states(kind).iter().map(|s| (s.name, 0)).collect();

    let rows = partition.present.iter().chain(partition.absent.iter());
    for row in rows {
        for s in states(kind) {
            if row_matches(kind, s.state, row) {
                *counts.entry(s.name).or_default() += 1;
            }
        }
    }
    counts
}

/// Presence is "has a stored record", not "has a specific tag".
fn row_matches(kind: Kind, state: TagState, row: &AggregatedRow) -> bool {
    match state {
        TagState::Present => !row.is_absent(),
        TagState::Absent => row.is_absent(),
        s => s.matches(kind, row.events()),
    }
}

pub fn build(kind: Kind, date: NaiveDate, window: DayWindow, partition: &DayPartition) -> DayStats {
    let mut counts = tally(kind, partition);
    let mut take = |name: &str| counts.remove(name).unwrap_or(0);

    let total = take("total");
    let present = take("present");
    let absent = take("absent");
    let in_school = take("inSchool");
    let out_school = take("outSchool");
    take("inButNotOutSchool");
    let wrong_bus = take("wrongBus");
    let wrong_stop = take("wrongStop");
    let is_bus = kind == Kind::Bus;

    DayStats {
        kind,
        date,
        window,
        total,
        present,
        absent,
        per_tag: counts,
        in_school,
        out_school,
        in_but_not_out_school: in_school.saturating_sub(out_school),
        wrong_bus: is_bus.then_some(wrong_bus),
        wrong_stop: is_bus.then_some(wrong_stop),
    }
}

/// Stats for `date`; `window` is the institutional day it stands for.
pub fn compute(
    conn: &Connection,
    kind: Kind,
    date: NaiveDate,
    window: DayWindow,
    cohort: &Cohort,
) -> AppResult<DayStats> {
    let reading = read_day(conn, kind, date, cohort)?;
    let partition = DayPartition::build(&reading, cohort);
    let stats = build(kind, date, window, &partition);

    info!(
        "stats kind={} date={} total={} present={} absent={}",
        kind.to_db_str(),
        date,
        stats.total,
        stats.present,
        stats.absent
    );

    Ok(stats)
}
