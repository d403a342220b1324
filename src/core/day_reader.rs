//! Day reader: stored records for one day, restricted to the cohort.
//!
//! Pure retrieval plus tag-state filtering; absence is never inferred here.

use crate::core::cohort::Cohort;
use crate::core::taxonomy::TagState;
use crate::db::queries::load_day_records;
use crate::errors::AppResult;
use crate::models::attendance::AttendanceRecord;
use crate::models::kind::Kind;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct DayReading {
    pub kind: Kind,
    pub day: NaiveDate,
    /// Cohort members' records, in retrieval order.
    pub records: Vec<AttendanceRecord>,
}

impl DayReading {
    /// Students with a stored record on this day.
    pub fn present_ids(&self) -> HashSet<i64> {
        self.records.iter().map(|r| r.student_id).collect()
    }

    /// Records whose classification matches `state`.
    ///
    /// `Total` and `Present` keep every record; `Absent` keeps none, since
    /// absent students have no record to return.
    pub fn filtered(&self, state: TagState) -> Vec<&AttendanceRecord> {
        match state {
            TagState::Total | TagState::Present => self.records.iter().collect(),
            TagState::Absent => Vec::new(),
            s => self
                .records
                .iter()
                .filter(|r| s.matches(self.kind, &r.events))
                .collect(),
        }
    }
}

pub fn read_day(conn: &Connection, kind: Kind, day: NaiveDate, cohort: &Cohort) -> AppResult<DayReading> {
    let records = load_day_records(conn, kind, &day)?
        .into_iter()
        .filter(|r| cohort.contains(r.student_id))
        .collect();

    Ok(DayReading { kind, day, records })
}
