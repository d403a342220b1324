use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::logic::Core;
use crate::core::query::StatsQuery;
use crate::core::stats::DayStats;
use crate::core::taxonomy::{TagState, states};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::header;
use crate::utils::colors::{CYAN, GREY, RESET};
use crate::utils::date::parse_date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stats {
        kind,
        date,
        cohort,
        json,
    } = cmd
    {
        let day = match date {
            Some(d) => parse_date(d)?,
            None => cfg.day_boundary()?.today(),
        };

        let pool = DbPool::new(&cfg.database)?;
        let stats = Core::day_stats(
            &pool,
            cfg,
            &StatsQuery {
                kind: *kind,
                day,
                cohort: cohort.into(),
            },
        )?;

        if *json {
            let out = serde_json::to_string_pretty(&stats)
                .map_err(|e| AppError::Other(format!("JSON serialization error: {e}")))?;
            println!("{out}");
        } else {
            print_stats(&stats);
        }
    }

    Ok(())
}

fn print_stats(stats: &DayStats) {
    header(format!("{} stats for {}", stats.kind.to_db_str(), stats.date));
    println!(
        "{GREY}window {} → {}{RESET}\n",
        stats.window.from.to_rfc3339(),
        stats.window.to.to_rfc3339()
    );

    let names = states(stats.kind).iter().filter(|s| s.state != TagState::Total);
    let width = names.clone().map(|s| s.name.len()).max().unwrap_or(0);

    println!("{CYAN}{:<width$}{RESET} {}", "total", stats.total);
    for s in names {
        if let Some(n) = stats.count(s.name) {
            println!("{CYAN}{:<width$}{RESET} {}", s.name, n);
        }
    }
}
