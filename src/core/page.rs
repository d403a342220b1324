//! In-memory sorting and pagination over the merged row set.
//!
//! Paging cannot be pushed down to storage because absent rows only exist
//! after reconciliation, so the full sequence is sorted here (stable, ties
//! keep input order) and then sliced.

use crate::core::flatten::FlatRow;
use crate::errors::{AppError, AppResult};
use crate::models::kind::Kind;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            other => Err(AppError::InvalidSort(format!(
                "direction '{other}' must be 'asc' or 'desc'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub dir: SortDir,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: "date".to_string(),
            dir: SortDir::Asc,
        }
    }
}

impl SortSpec {
    pub fn new(field: &str, dir: SortDir) -> Self {
        Self {
            field: field.trim().to_string(),
            dir,
        }
    }

    /// Reject fields that are not part of `kind`'s column layout.
    pub fn validate(&self, kind: Kind) -> AppResult<()> {
        if kind.descriptor().has_column(&self.field) {
            Ok(())
        } else {
            Err(AppError::InvalidSort(format!(
                "unknown {} sort field '{}'",
                kind.to_db_str(),
                self.field
            )))
        }
    }
}

/// One page of results plus the totals of the whole set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub result: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

/// Stable sort by `cmp`; `Desc` reverses the comparator, not the output,
/// so equal rows keep their input order in both directions.
pub fn sort_by<T, F>(items: &mut [T], dir: SortDir, cmp: F)
where
    F: Fn(&T, &T) -> Ordering,
{
    match dir {
        SortDir::Asc => items.sort_by(|a, b| cmp(a, b)),
        SortDir::Desc => items.sort_by(|a, b| cmp(b, a)),
    }
}

pub fn sort_rows(rows: &mut [FlatRow], spec: &SortSpec) {
    let field = spec.field.as_str();
    sort_by(rows, spec.dir, |a, b| match (a.get(field), b.get(field)) {
        (Some(x), Some(y)) => x.compare(y),
        _ => Ordering::Equal,
    });
}

/// 1-based page of `items`. A page past the end is empty, with totals intact.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> AppResult<Page<T>> {
    if page == 0 || page_size == 0 {
        return Err(AppError::InvalidFilter(format!(
            "page ({page}) and page_size ({page_size}) must be at least 1"
        )));
    }

    let total = items.len();
    let total_pages = total.div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size);

    let result = if start >= total {
        Vec::new()
    } else {
        items.into_iter().skip(start).take(page_size).collect()
    };

    Ok(Page {
        result,
        total,
        page,
        page_size,
        total_pages,
    })
}
