//! Flattening projector: one aggregated row → one fixed-width flat row.
//!
//! The column set is total: every column of the kind's layout is present on
//! every row. Missing data (absent student, tag not recorded, no geo) is
//! filled with sentinels, `"NA"` for text and `0` for coordinates.

use crate::models::kind::{Kind, TagField};
use crate::models::row::AggregatedRow;
use crate::models::tag_event::TagEvent;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cmp::Ordering;
use std::fmt;

pub const NA: &str = "NA";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn na() -> Self {
        Cell::Text(NA.to_string())
    }

    pub fn is_na(&self) -> bool {
        matches!(self, Cell::Text(s) if s == NA)
    }

    fn rank(&self) -> u8 {
        match self {
            Cell::Number(_) => 0,
            Cell::Bool(_) => 1,
            Cell::Text(_) => 2,
        }
    }

    /// Natural order within a variant; across variants numbers sort first,
    /// then booleans, then text.
    pub fn compare(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            (Cell::Number(a), Cell::Number(b)) => a.total_cmp(b),
            (Cell::Bool(a), Cell::Bool(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Number(n) => serializer.serialize_f64(*n),
            Cell::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

/// Flattened row; cells keep the kind's column order.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRow {
    pub cells: Vec<(&'static str, Cell)>,
}

impl FlatRow {
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.iter().find(|(c, _)| *c == column).map(|(_, v)| v)
    }

    pub fn headers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cells.iter().map(|(c, _)| *c)
    }

    pub fn values(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().map(|(_, v)| v)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self.get("absent"), Some(Cell::Bool(true)))
    }
}

impl Serialize for FlatRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (k, v) in &self.cells {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

fn tag_cell(field: TagField, event: Option<&TagEvent>) -> Cell {
    let Some(ev) = event else {
        return match field {
            TagField::Lat | TagField::Lon => Cell::Number(0.0),
            _ => Cell::na(),
        };
    };

    match field {
        TagField::Label => text(ev.tag.label()),
        TagField::Time => Cell::Text(ev.time_str()),
        TagField::Lat => Cell::Number(ev.geo.as_ref().map_or(0.0, |g| g.lat)),
        TagField::Lon => Cell::Number(ev.geo.as_ref().map_or(0.0, |g| g.lon)),
        TagField::Address => match &ev.geo {
            Some(g) if !g.address.is_empty() => text(&g.address),
            _ => Cell::na(),
        },
        TagField::Message if ev.message.is_empty() => Cell::na(),
        TagField::Message => text(&ev.message),
        TagField::MarkAsAbsent => Cell::Bool(ev.mark_as_absent),
    }
}

/// Project one row into the kind's full column layout.
pub fn flatten(kind: Kind, row: &AggregatedRow, default_photo: &str) -> FlatRow {
    let descriptor = kind.descriptor();
    let m = &row.member;
    let photo = match m.photo.as_deref() {
        Some(p) if !p.trim().is_empty() => p,
        _ => default_photo,
    };

    let mut cells: Vec<(&'static str, Cell)> = vec![
        ("admission_no", text(&m.admission_no)),
        ("student_name", text(&m.name)),
        ("class_name", text(&m.class_name)),
        ("section_name", text(&m.section_name)),
        ("photo_url", text(photo)),
        ("date", Cell::Text(row.date.format("%Y-%m-%d").to_string())),
        ("absent", Cell::Bool(row.is_absent())),
    ];

    let events = row.events();
    for t in descriptor.tags {
        // First occurrence wins; storage keeps one event per tag and day.
        let event = events.iter().find(|e| e.tag == t.tag);
        for (name, field) in t.columns {
            cells.push((*name, tag_cell(*field, event)));
        }
    }

    FlatRow { cells }
}

pub fn flatten_all(kind: Kind, rows: &[AggregatedRow], default_photo: &str) -> Vec<FlatRow> {
    rows.iter().map(|r| flatten(kind, r, default_photo)).collect()
}
