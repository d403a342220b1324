use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::query::RangeQuery;
use crate::core::taxonomy::TagState;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::{ExportLogic, parse_range};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        kind,
        format,
        file,
        range,
        cohort,
        state,
        sort,
        force,
    } = cmd
    {
        let query = RangeQuery {
            kind: *kind,
            range: parse_range(range)?,
            cohort: cohort.into(),
            state: TagState::parse(*kind, state)?,
            page: 1,
            page_size: cfg.default_page_size,
            sort: sort.to_spec()?,
        };

        let pool = DbPool::new(&cfg.database)?;
        ExportLogic::export(&pool, cfg, &query, *format, file, *force)?;
    }
    Ok(())
}
