use crate::errors::{AppError, AppResult};
use log::info;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. Migration bookkeeping lives there.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Ordered schema migrations: (version, description, sql).
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20240601_0001_roster",
        "Created roster tables (classes, sections, vehicles, students)",
        r#"
        CREATE TABLE IF NOT EXISTS classes (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            name          TEXT NOT NULL,
            stream        TEXT NOT NULL DEFAULT '',
            academic_year TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sections (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            class_id INTEGER NOT NULL REFERENCES classes(id),
            name     TEXT NOT NULL,
            UNIQUE(class_id, name)
        );

        CREATE TABLE IF NOT EXISTS vehicles (
            id   INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS students (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            admission_no  TEXT NOT NULL,
            name          TEXT NOT NULL,
            email         TEXT NOT NULL DEFAULT '',
            phone         TEXT NOT NULL DEFAULT '',
            biometric_id  TEXT NOT NULL DEFAULT '',
            class_id      INTEGER NOT NULL REFERENCES classes(id),
            section_id    INTEGER NOT NULL REFERENCES sections(id),
            bus_pick      INTEGER REFERENCES vehicles(id),
            bus_drop      INTEGER REFERENCES vehicles(id),
            photo         TEXT,
            academic_year TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_students_year_class
            ON students(academic_year, class_id, section_id);
        "#,
    ),
    (
        "20240601_0002_attendance",
        "Created attendance and tag_events tables",
        r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            kind         TEXT NOT NULL CHECK(kind IN ('bus','class')),
            date         TEXT NOT NULL,
            student_id   INTEGER NOT NULL REFERENCES students(id),
            last_vehicle INTEGER REFERENCES vehicles(id),
            UNIQUE(kind, date, student_id)
        );

        CREATE TABLE IF NOT EXISTS tag_events (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            attendance_id  INTEGER NOT NULL REFERENCES attendance(id),
            kind           TEXT NOT NULL CHECK(kind IN ('bus','class')),
            tag            TEXT NOT NULL,
            date           TEXT NOT NULL,
            student_id     INTEGER NOT NULL,
            time           TEXT NOT NULL,
            message        TEXT NOT NULL DEFAULT '',
            mark_as_absent INTEGER NOT NULL DEFAULT 0,
            lat            REAL,
            lon            REAL,
            address        TEXT,
            vehicle_id     INTEGER REFERENCES vehicles(id)
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_kind_date ON attendance(kind, date);
        CREATE INDEX IF NOT EXISTS idx_tag_events_kind_date ON tag_events(kind, date);
        "#,
    ),
    (
        "20240715_0003_tag_unique_per_kind",
        "Added per-kind uniqueness on (tag, date, student)",
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS uq_tag_events_kind_tag_date_student
            ON tag_events(kind, tag, date, student_id);
        "#,
    ),
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, version: &str, description: &str, sql: &str) -> AppResult<()> {
    let batch = format!("BEGIN;\n{sql}\nCOMMIT;");
    if let Err(e) = conn.execute_batch(&batch) {
        let _ = conn.execute_batch("ROLLBACK;");
        return Err(AppError::Migration(format!("{version}: {e}")));
    }

    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, description],
    )?;

    info!("migration applied: {version} ({description})");
    Ok(())
}

/// Versions that have not been applied yet.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for (version, _, _) in MIGRATIONS {
        if !is_applied(conn, version)? {
            out.push(*version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations, returns how many ran.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for (version, description, sql) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }
        apply(conn, version, description, sql)?;
        applied += 1;
    }

    Ok(applied)
}
