// src/export/xlsx.rs

use crate::core::flatten::{Cell, FlatRow};
use crate::errors::{AppError, AppResult};
use crate::export::excel_date::parse_to_excel_date;
use crate::export::notify_export_success;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

/// XLSX with a styled header, banded rows and auto-sized columns.
pub(crate) fn export_xlsx(headers: &[&str], rows: &[FlatRow], sheet: &str, path: &Path) -> AppResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).map_err(to_export_error)?;

    // ---------------------------
    // Header
    // ---------------------------
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &header_format)
            .map_err(to_export_error)?;
    }

    worksheet.set_freeze_panes(1, 0).map_err(to_export_error)?;

    let mut col_widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    // ---------------------------
    // Rows
    // ---------------------------
    for (row_index, flat) in rows.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band_color = if row_index % 2 == 0 { band1 } else { band2 };

        for (col, cell) in flat.values().enumerate() {
            let width = write_xlsx_cell(worksheet, row, col as u16, cell, band_color)?;
            if let Some(w) = col_widths.get_mut(col) {
                *w = (*w).max(width);
            }
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(to_export_error)?;
    }

    workbook.save(path).map_err(to_export_error)?;

    notify_export_success("XLSX", path);
    Ok(())
}

fn base_format(bg: Color) -> Format {
    Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin)
}

/// Write one cell by variant; text that reads as a date/time becomes an
/// Excel serial. Returns the display width used for column sizing.
fn write_xlsx_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &Cell, bg: Color) -> AppResult<usize> {
    match cell {
        Cell::Number(n) => {
            let fmt = base_format(bg).set_align(FormatAlign::Right);
            worksheet
                .write_with_format(row, col, *n, &fmt)
                .map_err(to_export_error)?;
            Ok(n.to_string().len())
        }
        Cell::Bool(b) => {
            let fmt = base_format(bg).set_align(FormatAlign::Center);
            worksheet
                .write_with_format(row, col, *b, &fmt)
                .map_err(to_export_error)?;
            Ok(5)
        }
        Cell::Text(s) => {
            if let Some((num_format, serial)) = parse_to_excel_date(s) {
                let fmt = base_format(bg).set_num_format(num_format);
                worksheet
                    .write_with_format(row, col, serial, &fmt)
                    .map_err(to_export_error)?;
                return Ok(num_format.len());
            }

            worksheet
                .write_with_format(row, col, s.as_str(), &base_format(bg))
                .map_err(to_export_error)?;
            Ok(UnicodeWidthStr::width(s.as_str()))
        }
    }
}

fn to_export_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}
