pub mod aggregator;
pub mod cohort;
pub mod day_reader;
pub mod flatten;
pub mod logic;
pub mod page;
pub mod query;
pub mod reconciler;
pub mod stats;
pub mod taxonomy;
