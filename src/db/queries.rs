use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;
use crate::models::kind::Kind;
use crate::models::tag::Tag;
use crate::models::tag_event::{GeoPoint, TagEvent};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, Row, params};
use std::collections::HashMap;

fn conversion_error(msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(AppError::Other(msg)),
    )
}

fn date_key(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Mapping DB → TagEvent. Returns the owning attendance id alongside.
fn map_event(row: &Row) -> rusqlite::Result<(i64, TagEvent)> {
    let tag_str: String = row.get("tag")?;
    let tag = Tag::from_db_str(&tag_str)
        .ok_or_else(|| conversion_error(format!("Invalid tag: {tag_str}")))?;

    let time_str: String = row.get("time")?;
    let time = DateTime::parse_from_rfc3339(&time_str)
        .map_err(|_| conversion_error(format!("Invalid event time: {time_str}")))?
        .with_timezone(&Utc);

    let lat: Option<f64> = row.get("lat")?;
    let lon: Option<f64> = row.get("lon")?;
    let address: Option<String> = row.get("address")?;
    let geo = match (lat, lon) {
        (Some(lat), Some(lon)) => Some(GeoPoint {
            lat,
            lon,
            address: address.unwrap_or_default(),
        }),
        _ => None,
    };

    Ok((
        row.get("attendance_id")?,
        TagEvent {
            tag,
            time,
            message: row.get("message")?,
            mark_as_absent: row.get::<_, i32>("mark_as_absent")? == 1,
            geo,
            vehicle: row.get("vehicle_id")?,
        },
    ))
}

/// All stored records of one kind for one normalised day, in retrieval
/// (insertion) order, each with its events in arrival order.
pub fn load_day_records(conn: &Connection, kind: Kind, date: &NaiveDate) -> AppResult<Vec<AttendanceRecord>> {
    let day = date_key(date);

    let mut events_by_record: HashMap<i64, Vec<TagEvent>> = HashMap::new();
    {
        let mut stmt = conn.prepare_cached(
            "SELECT attendance_id, tag, time, message, mark_as_absent, lat, lon, address, vehicle_id
             FROM tag_events
             WHERE kind = ?1 AND date = ?2
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![kind.to_db_str(), day], map_event)?;
        for r in rows {
            let (attendance_id, ev) = r?;
            events_by_record.entry(attendance_id).or_default().push(ev);
        }
    }

    let mut stmt = conn.prepare_cached(
        "SELECT id, student_id, last_vehicle
         FROM attendance
         WHERE kind = ?1 AND date = ?2
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![kind.to_db_str(), day], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, Option<i64>>(2)?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        let (id, student_id, last_vehicle) = r?;
        out.push(AttendanceRecord {
            id,
            kind,
            date: *date,
            student_id,
            events: events_by_record.remove(&id).unwrap_or_default(),
            last_vehicle,
        });
    }
    Ok(out)
}

/// Store an already-captured tag event: upserts the (kind, date, student)
/// record and appends the event. Returns the attendance record id.
pub fn record_tag_event(
    conn: &Connection,
    kind: Kind,
    student_id: i64,
    date: &NaiveDate,
    ev: &TagEvent,
) -> AppResult<i64> {
    if !kind.descriptor().accepts(ev.tag) {
        return Err(AppError::InvalidFilter(format!(
            "tag '{}' does not belong to {} attendance",
            ev.tag.key(),
            kind.to_db_str()
        )));
    }

    let day = date_key(date);
    let vehicle = if kind == Kind::Bus { ev.vehicle } else { None };

    // A rejected event must not leave the record upsert behind.
    let tx = conn.unchecked_transaction()?;

    tx.execute(
        "INSERT INTO attendance (kind, date, student_id, last_vehicle)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(kind, date, student_id)
         DO UPDATE SET last_vehicle = COALESCE(excluded.last_vehicle, attendance.last_vehicle)",
        params![kind.to_db_str(), day, student_id, vehicle],
    )?;

    let attendance_id: i64 = tx.query_row(
        "SELECT id FROM attendance WHERE kind = ?1 AND date = ?2 AND student_id = ?3",
        params![kind.to_db_str(), day, student_id],
        |row| row.get(0),
    )?;

    let geo = if kind.descriptor().has_geo { ev.geo.as_ref() } else { None };

    tx.execute(
        "INSERT INTO tag_events (attendance_id, kind, tag, date, student_id, time, message,
                                 mark_as_absent, lat, lon, address, vehicle_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            attendance_id,
            kind.to_db_str(),
            ev.tag.to_db_str(),
            day,
            student_id,
            ev.time_str(),
            ev.message,
            if ev.mark_as_absent && kind == Kind::Class { 1 } else { 0 },
            geo.map(|g| g.lat),
            geo.map(|g| g.lon),
            geo.map(|g| g.address.as_str()),
            vehicle,
        ],
    )?;

    tx.commit()?;
    Ok(attendance_id)
}
