#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, NaiveDate, Utc};
use rollcall::db::initialize::init_db;
use rollcall::db::queries::record_tag_event;
use rollcall::db::roster::{insert_class, insert_section, insert_student, insert_vehicle};
use rollcall::models::kind::Kind;
use rollcall::models::student::NewStudent;
use rollcall::models::tag::Tag;
use rollcall::models::tag_event::TagEvent;
use rusqlite::Connection;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const YEAR: &str = "2024-25";

/// Binary under test, with HOME pointed at a scratch directory so the
/// user's own config file is never read.
pub fn rti() -> Command {
    let mut home = env::temp_dir();
    home.push("rollcall_test_home");
    fs::create_dir_all(&home).ok();

    let mut cmd = cargo_bin_cmd!("rollcall");
    cmd.env("HOME", &home).env_remove("RUST_LOG");
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{name}_rollcall.sqlite"));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{name}_out.{ext}"));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

pub fn at(d: &str, h: u32, m: u32) -> DateTime<Utc> {
    day(d).and_hms_opt(h, m, 0).expect("valid time").and_utc()
}

/// Ids of the seeded roster.
pub struct School {
    pub aarav: i64,
    pub bina: i64,
    pub chirag: i64,
    pub devika: i64,
    pub old_year: i64,
    pub bus1: i64,
    pub bus2: i64,
}

/// Roster and attendance shared by the engine and CLI tests.
///
/// "10 Science-A" (2024-25): Aarav, Bina, Chirag. "10 Science-B": Devika.
/// A 2023-24 "10 Science-A" holds one student who must never leak into
/// 2024-25 cohorts.
///
/// Bus, 2024-07-01: Aarav morning entry only; Bina nothing; Chirag all
/// four tags. Bus, 2024-07-02: Bina morning entry only.
/// Class, 2024-07-01: Aarav entry + exit; Devika entry marked absent.
pub fn seed(conn: &Connection) -> School {
    init_db(conn).expect("migrations");

    let class = insert_class(conn, "10", "Science", YEAR).unwrap();
    let sec_a = insert_section(conn, class, "A").unwrap();
    let sec_b = insert_section(conn, class, "B").unwrap();
    let old_class = insert_class(conn, "10", "Science", "2023-24").unwrap();
    let old_sec = insert_section(conn, old_class, "A").unwrap();
    let bus1 = insert_vehicle(conn, "Bus 1").unwrap();
    let bus2 = insert_vehicle(conn, "Bus 2").unwrap();

    let student = |adm: &str, name: &str, class_id: i64, section_id: i64, year: &str| {
        NewStudent::new(adm, name, class_id, section_id, year)
    };

    let aarav = insert_student(
        conn,
        &NewStudent {
            bus_pick: Some(bus1),
            bus_drop: Some(bus1),
            photo: Some("/photos/adm-001.jpg".into()),
            email: "aarav@example.org".into(),
            ..student("ADM-001", "Aarav Shah", class, sec_a, YEAR)
        },
    )
    .unwrap();
    let bina = insert_student(
        conn,
        &NewStudent {
            bus_pick: Some(bus1),
            ..student("ADM-002", "Bina Rao", class, sec_a, YEAR)
        },
    )
    .unwrap();
    let chirag = insert_student(
        conn,
        &NewStudent {
            bus_drop: Some(bus2),
            phone: "98450 11223".into(),
            ..student("ADM-003", "Chirag Iyer", class, sec_a, YEAR)
        },
    )
    .unwrap();
    let devika = insert_student(conn, &student("ADM-004", "Devika Nair", class, sec_b, YEAR)).unwrap();
    let old_year = insert_student(conn, &student("ADM-000", "Esha Old", old_class, old_sec, "2023-24")).unwrap();

    let d1 = day("2024-07-01");
    let d2 = day("2024-07-02");

    record_tag_event(
        conn,
        Kind::Bus,
        aarav,
        &d1,
        &TagEvent::new(Tag::MorningEntry, at("2024-07-01", 2, 10))
            .with_geo(12.9716, 77.5946, "MG Road stop")
            .with_vehicle(bus1),
    )
    .unwrap();

    for (tag, h) in [
        (Tag::MorningEntry, 2),
        (Tag::MorningExit, 3),
        (Tag::AfternoonEntry, 9),
        (Tag::AfternoonExit, 10),
    ] {
        record_tag_event(
            conn,
            Kind::Bus,
            chirag,
            &d1,
            &TagEvent::new(tag, at("2024-07-01", h, 30)).with_vehicle(bus2),
        )
        .unwrap();
    }

    record_tag_event(
        conn,
        Kind::Bus,
        bina,
        &d2,
        &TagEvent::new(Tag::MorningEntry, at("2024-07-02", 2, 15)).with_message("late pickup"),
    )
    .unwrap();

    record_tag_event(conn, Kind::Class, aarav, &d1, &TagEvent::new(Tag::Entry, at("2024-07-01", 3, 20))).unwrap();
    record_tag_event(conn, Kind::Class, aarav, &d1, &TagEvent::new(Tag::Exit, at("2024-07-01", 9, 0))).unwrap();
    record_tag_event(
        conn,
        Kind::Class,
        devika,
        &d1,
        &TagEvent::new(Tag::Entry, at("2024-07-01", 3, 25))
            .with_message("sent home")
            .marked_absent(),
    )
    .unwrap();

    School {
        aarav,
        bina,
        chirag,
        devika,
        old_year,
        bus1,
        bus2,
    }
}

/// Fresh on-disk database with the shared fixture.
pub fn seed_file(db_path: &str) -> School {
    let conn = Connection::open(db_path).expect("open db");
    seed(&conn)
}
