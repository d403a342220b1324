pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod log;
pub mod report;
pub mod stats;

use crate::cli::parser::{CohortArgs, SortArgs};
use crate::core::cohort::CohortFilter;
use crate::core::page::{SortDir, SortSpec};
use crate::errors::AppResult;

impl From<&CohortArgs> for CohortFilter {
    fn from(a: &CohortArgs) -> Self {
        CohortFilter {
            class_sections: a.class_sections.clone(),
            buses: a.buses.clone(),
            search: a.search.clone().filter(|s| !s.trim().is_empty()),
            academic_year: a.academic_year.clone(),
        }
    }
}

impl SortArgs {
    pub fn to_spec(&self) -> AppResult<SortSpec> {
        Ok(SortSpec::new(&self.sort, SortDir::parse(&self.dir)?))
    }
}
