use super::{attendance::AttendanceRecord, student::CohortMember, tag_event::TagEvent};
use chrono::NaiveDate;
use std::sync::Arc;

/// Engine output for one (student, date) pair. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRow {
    pub date: NaiveDate,
    pub member: Arc<CohortMember>,
    pub status: RowStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowStatus {
    Present(AttendanceRecord),
    /// Synthesised: the student has no record for `date`.
    Absent,
}

impl AggregatedRow {
    pub fn present(member: Arc<CohortMember>, record: AttendanceRecord) -> Self {
        Self {
            date: record.date,
            member,
            status: RowStatus::Present(record),
        }
    }

    pub fn absent(member: Arc<CohortMember>, date: NaiveDate) -> Self {
        Self {
            date,
            member,
            status: RowStatus::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self.status, RowStatus::Absent)
    }

    pub fn student_id(&self) -> i64 {
        self.member.id
    }

    /// Events of the row; empty for absent rows.
    pub fn events(&self) -> &[TagEvent] {
        match &self.status {
            RowStatus::Present(rec) => &rec.events,
            RowStatus::Absent => &[],
        }
    }
}
