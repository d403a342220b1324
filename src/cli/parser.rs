use crate::export::ExportFormat;
use crate::models::kind::Kind;
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for rollcall
/// CLI application to reconcile and report school attendance stored in SQLite
#[derive(Parser)]
#[command(
    name = "rollcall",
    version = env!("CARGO_PKG_VERSION"),
    about = "School attendance reports: present/absent timelines, daily stats and exports over bus and classroom tag events",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Diagnostic log level (off, error, warn, info, debug, trace)
    #[arg(global = true, long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which students a query covers. Filters combine with AND.
#[derive(Args, Debug, Clone, Default)]
pub struct CohortArgs {
    /// Class and section as `<class[ stream]>-<section>`, e.g. "10 Science-A" (repeatable)
    #[arg(long = "class-section", value_name = "TOKEN")]
    pub class_sections: Vec<String>,

    /// Vehicle name; matches pick or drop assignment (repeatable)
    #[arg(long = "bus", value_name = "NAME")]
    pub buses: Vec<String>,

    /// Free text over admission no, name, email, phone and biometric id
    #[arg(long)]
    pub search: Option<String>,

    /// Academic year (defaults to the configured one)
    #[arg(long = "academic-year", value_name = "YEAR")]
    pub academic_year: Option<String>,
}

/// Sort options shared by `report` and `export`.
#[derive(Args, Debug, Clone)]
pub struct SortArgs {
    /// Column to sort on (any column of the kind's layout)
    #[arg(long, default_value = "date")]
    pub sort: String,

    /// Sort direction: asc or desc
    #[arg(long, default_value = "asc")]
    pub dir: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing configuration fields with their defaults")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Present + absent timeline over a date range, paged
    Report {
        #[arg(long, value_enum)]
        kind: Kind,

        #[arg(
            long,
            value_name = "RANGE",
            help = "YYYY, YYYY-MM, YYYY-MM-DD or start:end of the same form (inclusive)"
        )]
        range: String,

        #[command(flatten)]
        cohort: CohortArgs,

        /// Tag state filter, e.g. absent, mCheckInMissed, checkOut
        #[arg(long, default_value = "total")]
        state: String,

        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page (defaults to the configured page size)
        #[arg(long = "page-size")]
        page_size: Option<usize>,

        #[command(flatten)]
        sort: SortArgs,

        /// Print the range response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Same-day counters for one institutional day
    Stats {
        #[arg(long, value_enum)]
        kind: Kind,

        /// Day to count (YYYY-MM-DD); defaults to today at the configured day offset
        #[arg(long)]
        date: Option<String>,

        #[command(flatten)]
        cohort: CohortArgs,

        /// Print the counters as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the full sorted timeline of a date range
    Export {
        #[arg(long, value_enum)]
        kind: Kind,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "YYYY, YYYY-MM, YYYY-MM-DD or start:end of the same form (inclusive)"
        )]
        range: String,

        #[command(flatten)]
        cohort: CohortArgs,

        #[arg(long, default_value = "total")]
        state: String,

        #[command(flatten)]
        sort: SortArgs,

        #[arg(long, short = 'f')]
        force: bool,
    },
}
