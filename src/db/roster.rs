//! Roster lookups (students, classes, sections, vehicles).
//!
//! The roster is owned by the school-management side; the engine only reads
//! it. The insert helpers exist for fixtures and seeding tools.

use crate::errors::AppResult;
use crate::models::student::{CohortMember, NewStudent};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn insert_class(conn: &Connection, name: &str, stream: &str, academic_year: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO classes (name, stream, academic_year) VALUES (?1, ?2, ?3)",
        params![name, stream, academic_year],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_section(conn: &Connection, class_id: i64, name: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO sections (class_id, name) VALUES (?1, ?2)",
        params![class_id, name],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_vehicle(conn: &Connection, name: &str) -> AppResult<i64> {
    conn.execute("INSERT INTO vehicles (name) VALUES (?1)", [name])?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_student(conn: &Connection, s: &NewStudent) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO students (admission_no, name, email, phone, biometric_id,
                               class_id, section_id, bus_pick, bus_drop, photo, academic_year)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            s.admission_no,
            s.name,
            s.email,
            s.phone,
            s.biometric_id,
            s.class_id,
            s.section_id,
            s.bus_pick,
            s.bus_drop,
            s.photo,
            s.academic_year,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Resolve a class by display name (`name` or `name stream`), case-insensitive.
pub fn find_class_id(conn: &Connection, display_name: &str, academic_year: &str) -> AppResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM classes
             WHERE academic_year = ?1
               AND (CASE WHEN stream = '' THEN name ELSE name || ' ' || stream END) = ?2 COLLATE NOCASE
             ORDER BY id ASC
             LIMIT 1",
            params![academic_year, display_name.trim()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

pub fn find_section_id(conn: &Connection, class_id: i64, name: &str) -> AppResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM sections WHERE class_id = ?1 AND name = ?2 COLLATE NOCASE",
            params![class_id, name.trim()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

pub fn find_vehicle_id(conn: &Connection, name: &str) -> AppResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM vehicles WHERE name = ?1 COLLATE NOCASE",
            [name.trim()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

/// Resolved roster filter. Empty lists mean "no constraint".
#[derive(Debug, Default)]
pub struct RosterQuery<'a> {
    pub academic_year: &'a str,
    pub class_sections: &'a [(i64, i64)],
    pub vehicles: &'a [i64],
    pub search: Option<&'a str>,
}

const MEMBER_SELECT: &str = "
    SELECT s.id, s.admission_no, s.name,
           CASE WHEN c.stream = '' THEN c.name ELSE c.name || ' ' || c.stream END AS class_name,
           sec.name AS section_name,
           vp.name AS bus_pick, vd.name AS bus_drop, s.photo
    FROM students s
    JOIN classes c    ON c.id = s.class_id
    JOIN sections sec ON sec.id = s.section_id
    LEFT JOIN vehicles vp ON vp.id = s.bus_pick
    LEFT JOIN vehicles vd ON vd.id = s.bus_drop";

/// Build the WHERE clause: AND across filter kinds, OR inside each kind.
fn build_member_query(q: &RosterQuery) -> (String, Vec<Value>) {
    let mut conditions = vec!["s.academic_year = ?".to_string()];
    let mut params: Vec<Value> = vec![Value::Text(q.academic_year.to_string())];

    if !q.class_sections.is_empty() {
        let pairs = vec!["(s.class_id = ? AND s.section_id = ?)"; q.class_sections.len()].join(" OR ");
        conditions.push(format!("({pairs})"));
        for (class_id, section_id) in q.class_sections {
            params.push(Value::Integer(*class_id));
            params.push(Value::Integer(*section_id));
        }
    }

    if !q.vehicles.is_empty() {
        let placeholders = vec!["?"; q.vehicles.len()].join(",");
        conditions.push(format!(
            "(s.bus_pick IN ({placeholders}) OR s.bus_drop IN ({placeholders}))"
        ));
        for _ in 0..2 {
            params.extend(q.vehicles.iter().map(|v| Value::Integer(*v)));
        }
    }

    if let Some(term) = q.search.map(str::trim).filter(|t| !t.is_empty()) {
        let fields = ["s.admission_no", "s.name", "s.email", "s.phone", "s.biometric_id"];
        let ors: Vec<String> = fields
            .iter()
            .map(|f| format!("{f} LIKE ? ESCAPE '\\'"))
            .collect();
        conditions.push(format!("({})", ors.join(" OR ")));
        let pattern = format!("%{}%", escape_like(term));
        params.extend(fields.iter().map(|_| Value::Text(pattern.clone())));
    }

    let sql = format!(
        "{MEMBER_SELECT} WHERE {} ORDER BY s.id ASC",
        conditions.join(" AND ")
    );
    (sql, params)
}

/// Make `%`, `_` and `\` match literally inside a LIKE pattern.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn map_member(row: &Row) -> rusqlite::Result<CohortMember> {
    Ok(CohortMember {
        id: row.get("id")?,
        admission_no: row.get("admission_no")?,
        name: row.get("name")?,
        class_name: row.get("class_name")?,
        section_name: row.get("section_name")?,
        bus_pick: row.get("bus_pick")?,
        bus_drop: row.get("bus_drop")?,
        photo: row.get("photo")?,
    })
}

/// Roster rows matching the query, in roster (id) order.
pub fn load_members(conn: &Connection, q: &RosterQuery) -> AppResult<Vec<CohortMember>> {
    let (sql, params) = build_member_query(q);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(params), map_member)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
