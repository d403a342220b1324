use super::{kind::Kind, tag_event::TagEvent};
use chrono::NaiveDate;
use serde::Serialize;

/// Stored attendance for one student, one day, one kind.
///
/// `date` is the calendar day normalised to 00:00:00 UTC; `events` keep
/// arrival order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub kind: Kind,
    pub date: NaiveDate,
    pub student_id: i64,
    pub events: Vec<TagEvent>,
    pub last_vehicle: Option<i64>,
}
