//! Diagnostic logging bootstrap.
//!
//! Diagnostics go through the `log` facade to stderr, leaving stdout to
//! command output. Level precedence: `--log-level`, then `RUST_LOG`, then
//! the configured `log_level`.

use crate::errors::{AppError, AppResult};
use flexi_logger::{Logger, LoggerHandle, WriteMode};
use log::debug;

fn normalize_level(level: &str) -> AppResult<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => Ok("off"),
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(AppError::Config(format!(
            "unsupported log level `{other}`; expected off|trace|debug|info|warn|error"
        ))),
    }
}

/// Start the stderr logger. Keep the handle alive for the whole run.
pub fn init_logging(cli_level: Option<&str>, config_level: &str) -> AppResult<LoggerHandle> {
    let logger = match cli_level {
        Some(level) => Logger::try_with_str(normalize_level(level)?),
        None => Logger::try_with_env_or_str(normalize_level(config_level)?),
    }
    .map_err(|e| AppError::Config(format!("invalid log specification: {e}")))?;

    let handle = logger
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .write_mode(WriteMode::Direct)
        .start()
        .map_err(|e| AppError::Other(format!("failed to start logger: {e}")))?;

    debug!(
        "event=logging_ready version={} platform={}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );

    Ok(handle)
}
