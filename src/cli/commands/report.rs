use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::flatten::{Cell, FlatRow};
use crate::core::logic::Core;
use crate::core::page::Page;
use crate::core::query::RangeQuery;
use crate::core::taxonomy::TagState;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::parse_range;
use crate::models::kind::{Kind, TagField};
use crate::ui::messages::{header, info};
use crate::utils::colors::{colorize_presence, colorize_sentinel};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Report {
        kind,
        range,
        cohort,
        state,
        page,
        page_size,
        sort,
        json,
    } = cmd
    {
        let query = RangeQuery {
            kind: *kind,
            range: parse_range(range)?,
            cohort: cohort.into(),
            state: TagState::parse(*kind, state)?,
            page: *page,
            page_size: page_size.unwrap_or(cfg.default_page_size),
            sort: sort.to_spec()?,
        };

        let pool = DbPool::new(&cfg.database)?;
        let result = Core::range_report(&pool, cfg, &query)?;

        if *json {
            let out = serde_json::to_string_pretty(&result)
                .map_err(|e| AppError::Other(format!("JSON serialization error: {e}")))?;
            println!("{out}");
        } else {
            header(format!("{} attendance {} [{}]", kind.to_db_str(), range, state));
            print_page(*kind, &result);
        }
    }

    Ok(())
}

/// Compact console view: identity, presence, one time column per tag.
fn print_page(kind: Kind, page: &Page<FlatRow>) {
    if page.result.is_empty() {
        info(format!(
            "No rows on page {} (total {}, {} page(s)).",
            page.page, page.total, page.total_pages
        ));
        return;
    }

    let time_columns: Vec<&'static str> = kind
        .descriptor()
        .tags
        .iter()
        .flat_map(|t| t.columns.iter())
        .filter(|(_, f)| *f == TagField::Time)
        .map(|(name, _)| *name)
        .collect();

    let mut headers: Vec<String> = ["date", "admission_no", "student", "class", "status"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    headers.extend(time_columns.iter().map(|c| c.to_string()));

    let mut table = Table::new(headers);
    for row in &page.result {
        let text = |col: &str| row.get(col).map(Cell::to_string).unwrap_or_default();

        let mut cells = vec![
            text("date"),
            text("admission_no"),
            text("student_name"),
            format!("{}-{}", text("class_name"), text("section_name")),
            colorize_presence(row.is_absent()),
        ];
        cells.extend(time_columns.iter().map(|c| colorize_sentinel(&text(c))));
        table.add_row(cells);
    }

    print!("{}", table.render());
    println!(
        "\nPage {}/{} · {} row(s) total · page size {}",
        page.page, page.total_pages, page.total, page.page_size
    );
}
