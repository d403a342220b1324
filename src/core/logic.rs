use crate::config::Config;
use crate::core::aggregator::aggregate;
use crate::core::cohort::resolve;
use crate::core::flatten::{FlatRow, flatten_all};
use crate::core::page::{Page, paginate, sort_rows};
use crate::core::query::{RangeQuery, StatsQuery};
use crate::core::stats::{self, DayStats};
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Engine entry points: request in, response out.
pub struct Core;

impl Core {
    /// Paged range response.
    pub fn range_report(pool: &DbPool, cfg: &Config, q: &RangeQuery) -> AppResult<Page<FlatRow>> {
        let rows = Self::range_rows(pool, cfg, q)?;
        paginate(rows, q.page, q.page_size)
    }

    /// Full sorted range, no paging.
    pub fn range_rows(pool: &DbPool, cfg: &Config, q: &RangeQuery) -> AppResult<Vec<FlatRow>> {
        // Bad input fails before any storage read.
        q.sort.validate(q.kind)?;

        let cohort = resolve(&pool.conn, &q.cohort, &cfg.academic_year)?;
        let rows = aggregate(&pool.conn, q.kind, &q.range, &cohort, q.state)?;

        let mut flat = flatten_all(q.kind, &rows, &cfg.default_photo_url);
        sort_rows(&mut flat, &q.sort);
        Ok(flat)
    }

    pub fn day_stats(pool: &DbPool, cfg: &Config, q: &StatsQuery) -> AppResult<DayStats> {
        let boundary = cfg.day_boundary()?;
        let cohort = resolve(&pool.conn, &q.cohort, &cfg.academic_year)?;
        stats::compute(&pool.conn, q.kind, q.day, boundary.window(q.day), &cohort)
    }
}
