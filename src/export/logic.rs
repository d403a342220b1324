// src/export/logic.rs

use crate::config::Config;
use crate::core::logic::Core;
use crate::core::query::RangeQuery;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::xlsx::export_xlsx;
use crate::ui::messages::{info, warning};
use log::info as log_info;
use std::path::Path;

/// High-level export of a range query.
pub struct ExportLogic;

impl ExportLogic {
    /// Write the full sorted, unpaginated range to `file`.
    ///
    /// - `format`: csv | json | xlsx
    /// - `file`: absolute path of the output file
    ///
    /// Returns the number of rows written.
    pub fn export(
        pool: &DbPool,
        cfg: &Config,
        query: &RangeQuery,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);
        ensure_writable(path, force)?;

        let rows = Core::range_rows(pool, cfg, query)?;
        let headers = query.kind.descriptor().column_names();

        if rows.is_empty() {
            warning("No rows for the selected range and cohort; writing headers only.");
        }

        info(format!(
            "Exporting {} {} rows to {}: {}",
            rows.len(),
            query.kind.to_db_str(),
            format.as_str().to_uppercase(),
            path.display()
        ));

        match format {
            ExportFormat::Csv => export_csv(&headers, &rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
            ExportFormat::Xlsx => export_xlsx(&headers, &rows, query.kind.to_db_str(), path)?,
        }

        ttlog(
            &pool.conn,
            "export",
            file,
            &format!(
                "{} {} {}..{} rows={}",
                format.as_str(),
                query.kind.to_db_str(),
                query.range.start(),
                query.range.end_exclusive(),
                rows.len()
            ),
        )?;
        log_info!("export format={} rows={} file={}", format.as_str(), rows.len(), file);

        Ok(rows.len())
    }
}
