//! Absence reconciliation.
//!
//! Absence is never stored: for one day it is the cohort minus the students
//! the day reader found. Present and absent rows together cover the cohort
//! exactly once.

use crate::core::cohort::Cohort;
use crate::core::day_reader::DayReading;
use crate::models::row::AggregatedRow;
use chrono::NaiveDate;
use std::collections::HashSet;

/// One synthesized absent row per cohort member not in `present`, in
/// cohort order.
pub fn reconcile(cohort: &Cohort, day: NaiveDate, present: &HashSet<i64>) -> Vec<AggregatedRow> {
    cohort
        .members()
        .iter()
        .filter(|m| !present.contains(&m.id))
        .map(|m| AggregatedRow::absent(m.clone(), day))
        .collect()
}

/// Every cohort member for one day, split into present and absent rows.
#[derive(Debug, Clone, Default)]
pub struct DayPartition {
    pub present: Vec<AggregatedRow>,
    pub absent: Vec<AggregatedRow>,
}

impl DayPartition {
    pub fn build(reading: &DayReading, cohort: &Cohort) -> Self {
        let present = reading
            .records
            .iter()
            .filter_map(|r| {
                cohort
                    .get(r.student_id)
                    .map(|m| AggregatedRow::present(m.clone(), r.clone()))
            })
            .collect();

        let absent = reconcile(cohort, reading.day, &reading.present_ids());

        Self { present, absent }
    }

    pub fn len(&self) -> usize {
        self.present.len() + self.absent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
