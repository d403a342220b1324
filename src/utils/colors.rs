/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Grey for sentinel cells ("NA", "0"), plain otherwise.
pub fn colorize_sentinel(value: &str) -> String {
    if value == "NA" || value == "0" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

/// Red for absent rows, green for present ones.
pub fn colorize_presence(absent: bool) -> String {
    if absent {
        format!("{RED}absent{RESET}")
    } else {
        format!("{GREEN}present{RESET}")
    }
}
