use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::kind::Kind;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use chrono::NaiveDate;
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROSTER
    //
    let students: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
    println!("{}• Students:{} {}{}{}", CYAN, RESET, GREEN, students, RESET);

    //
    // 3) PER-KIND RECORDS / EVENTS / DATE RANGE
    //
    for kind in [Kind::Bus, Kind::Class] {
        let k = kind.to_db_str();
        let records: i64 = pool.conn.query_row(
            "SELECT COUNT(*) FROM attendance WHERE kind = ?1",
            [k],
            |row| row.get(0),
        )?;
        let events: i64 = pool.conn.query_row(
            "SELECT COUNT(*) FROM tag_events WHERE kind = ?1",
            [k],
            |row| row.get(0),
        )?;
        let bounds: Option<(String, String)> = pool
            .conn
            .query_row(
                "SELECT MIN(date), MAX(date) FROM attendance WHERE kind = ?1 HAVING COUNT(*) > 0",
                [k],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        println!(
            "{}• {} attendance:{} {}{}{} records, {} events",
            CYAN, k, RESET, GREEN, records, RESET, events
        );

        match bounds {
            Some((first, last)) => {
                println!("    from: {}", first);
                println!("    to:   {}", last);
                if let (Some(d1), Some(d2)) = (parse_date(&first), parse_date(&last)) {
                    let days = (d2 - d1).num_days() + 1;
                    println!("    average records/day: {:.2}", records as f64 / days as f64);
                }
            }
            None => println!("    {GREY}--{RESET}"),
        }
    }

    println!();
    Ok(())
}

fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
}
