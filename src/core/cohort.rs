//! Cohort resolution: filter parameters → concrete, ordered student set.
//!
//! Filters combine with AND; inside a filter, alternatives combine with OR
//! (several class/section tokens, pick-or-drop vehicle assignment, the
//! free-text fields). Names that do not resolve are a hard `NotFound`,
//! raised before any query runs. A valid filter matching nobody is an
//! empty cohort, not an error.

use crate::db::roster::{self, RosterQuery};
use crate::errors::{AppError, AppResult};
use crate::models::student::CohortMember;
use log::debug;
use regex::Regex;
use rusqlite::Connection;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CohortFilter {
    /// Compound `<class[ stream]>-<section>` tokens, e.g. `10 Science-A`.
    pub class_sections: Vec<String>,
    pub buses: Vec<String>,
    pub search: Option<String>,
    /// Overrides the configured academic year.
    pub academic_year: Option<String>,
}

/// Resolved cohort, shared read-only by every day of a request.
#[derive(Debug, Clone, Default)]
pub struct Cohort {
    members: Vec<Arc<CohortMember>>,
    index: HashMap<i64, usize>,
}

impl Cohort {
    pub fn from_members(members: Vec<CohortMember>) -> Self {
        let members: Vec<Arc<CohortMember>> = members.into_iter().map(Arc::new).collect();
        let index = members
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id, i))
            .collect();
        Self { members, index }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, student_id: i64) -> bool {
        self.index.contains_key(&student_id)
    }

    pub fn get(&self, student_id: i64) -> Option<&Arc<CohortMember>> {
        self.index.get(&student_id).map(|i| &self.members[*i])
    }

    /// Members in roster order.
    pub fn members(&self) -> &[Arc<CohortMember>] {
        &self.members
    }
}

static CLASS_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<class>.+?)\s*-\s*(?P<section>[^-]+?)\s*$").expect("valid class/section pattern")
});

/// Split a compound token into (class-and-stream, section) at the last `-`.
pub fn split_class_section(token: &str) -> AppResult<(String, String)> {
    let caps = CLASS_SECTION.captures(token).ok_or_else(|| {
        AppError::InvalidFilter(format!(
            "class/section token '{token}' must look like '<class>-<section>'"
        ))
    })?;

    Ok((caps["class"].to_string(), caps["section"].to_string()))
}

/// Resolve `filter` against the roster, scoped to one academic year.
pub fn resolve(conn: &Connection, filter: &CohortFilter, default_year: &str) -> AppResult<Cohort> {
    let year = filter.academic_year.as_deref().unwrap_or(default_year);

    let mut class_sections = Vec::with_capacity(filter.class_sections.len());
    for token in &filter.class_sections {
        let (class_name, section_name) = split_class_section(token)?;
        let class_id = roster::find_class_id(conn, &class_name, year)?.ok_or_else(|| {
            AppError::NotFound(format!("class '{class_name}' in academic year {year}"))
        })?;
        let section_id = roster::find_section_id(conn, class_id, &section_name)?
            .ok_or_else(|| AppError::NotFound(format!("section '{section_name}' of class '{class_name}'")))?;
        class_sections.push((class_id, section_id));
    }

    let mut vehicles = Vec::with_capacity(filter.buses.len());
    for name in &filter.buses {
        let id = roster::find_vehicle_id(conn, name)?
            .ok_or_else(|| AppError::NotFound(format!("vehicle '{name}'")))?;
        vehicles.push(id);
    }

    let members = roster::load_members(
        conn,
        &RosterQuery {
            academic_year: year,
            class_sections: &class_sections,
            vehicles: &vehicles,
            search: filter.search.as_deref(),
        },
    )?;

    debug!(
        "cohort resolved: year={} class_sections={} vehicles={} search={:?} size={}",
        year,
        class_sections.len(),
        vehicles.len(),
        filter.search,
        members.len()
    );

    Ok(Cohort::from_members(members))
}
