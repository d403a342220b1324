use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let pool = DbPool::new(&cfg.database)?;
        let rows = load_log(&pool.conn)?;

        if rows.is_empty() {
            info("The internal log is empty.");
            return Ok(());
        }

        let mut table = Table::new(
            ["id", "date", "operation", "target", "message"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
        );
        for (id, date, op, target, message) in rows {
            table.add_row(vec![id.to_string(), date, op, target, message]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
