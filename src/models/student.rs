use serde::Serialize;

/// Roster row projected for the engine. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortMember {
    pub id: i64,
    pub admission_no: String,
    pub name: String,
    pub class_name: String,
    pub section_name: String,
    pub bus_pick: Option<String>,
    pub bus_drop: Option<String>,
    pub photo: Option<String>,
}

/// Fields needed to add a student to the roster.
#[derive(Debug, Clone, Default)]
pub struct NewStudent {
    pub admission_no: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub biometric_id: String,
    pub class_id: i64,
    pub section_id: i64,
    pub bus_pick: Option<i64>,
    pub bus_drop: Option<i64>,
    pub photo: Option<String>,
    pub academic_year: String,
}

impl NewStudent {
    pub fn new(
        admission_no: &str,
        name: &str,
        class_id: i64,
        section_id: i64,
        academic_year: &str,
    ) -> Self {
        Self {
            admission_no: admission_no.to_string(),
            name: name.to_string(),
            class_id,
            section_id,
            academic_year: academic_year.to_string(),
            ..Default::default()
        }
    }
}
