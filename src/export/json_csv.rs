// src/export/json_csv.rs

use crate::core::flatten::FlatRow;
use crate::errors::{AppError, AppResult};
use crate::export::notify_export_success;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Pretty JSON array of row objects, keys in column order.
pub(crate) fn export_json(rows: &[FlatRow], path: &Path) -> AppResult<()> {
    let json_data = serde_json::to_string_pretty(rows)
        .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;
    file.write_all(b"\n")?;

    notify_export_success("JSON", path);
    Ok(())
}

/// CSV with a header row; the header is written even for an empty set.
pub(crate) fn export_csv(headers: &[&str], rows: &[FlatRow], path: &Path) -> AppResult<()> {
    let mut wtr =
        csv::Writer::from_path(path).map_err(|e| AppError::Export(format!("CSV open error: {e}")))?;

    wtr.write_record(headers)
        .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;

    for row in rows {
        wtr.write_record(row.values().map(|c| c.to_string()))
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}
