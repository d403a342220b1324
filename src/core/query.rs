use crate::core::cohort::CohortFilter;
use crate::core::page::SortSpec;
use crate::core::taxonomy::TagState;
use crate::models::kind::Kind;
use crate::utils::date::DateRange;
use chrono::NaiveDate;

/// Range query: timeline of present + absent rows over `range`.
#[derive(Debug, Clone)]
pub struct RangeQuery {
    pub kind: Kind,
    pub range: DateRange,
    pub cohort: CohortFilter,
    pub state: TagState,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
    pub sort: SortSpec,
}

impl RangeQuery {
    /// Every row of `range`, first page of `page_size`, sorted by date.
    pub fn new(kind: Kind, range: DateRange, page_size: usize) -> Self {
        Self {
            kind,
            range,
            cohort: CohortFilter::default(),
            state: TagState::Total,
            page: 1,
            page_size,
            sort: SortSpec::default(),
        }
    }
}

/// Same-day counters for one calendar day.
#[derive(Debug, Clone)]
pub struct StatsQuery {
    pub kind: Kind,
    pub day: NaiveDate,
    pub cohort: CohortFilter,
}
