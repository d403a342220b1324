mod common;

use common::{School, YEAR, at, day, seed};
use rollcall::config::Config;
use rollcall::core::aggregator::{aggregate, day_rows};
use rollcall::core::cohort::{Cohort, CohortFilter, resolve};
use rollcall::core::day_reader::read_day;
use rollcall::core::flatten::Cell;
use rollcall::core::logic::Core;
use rollcall::core::page::{SortDir, SortSpec};
use rollcall::core::query::{RangeQuery, StatsQuery};
use rollcall::core::reconciler::DayPartition;
use rollcall::core::taxonomy::{TagState, states};
use rollcall::db::pool::DbPool;
use rollcall::db::queries::{load_day_records, record_tag_event};
use rollcall::errors::AppError;
use rollcall::models::kind::Kind;
use rollcall::models::tag::Tag;
use rollcall::models::tag_event::TagEvent;
use rollcall::utils::date::DateRange;
use std::cmp::Ordering;
use std::collections::HashSet;

fn setup() -> (DbPool, School, Config) {
    let pool = DbPool::in_memory().expect("in-memory db");
    let school = seed(&pool.conn);
    let cfg = Config {
        academic_year: YEAR.to_string(),
        default_photo_url: "/img/placeholder.png".to_string(),
        ..Config::default()
    };
    (pool, school, cfg)
}

fn section_a() -> CohortFilter {
    CohortFilter {
        class_sections: vec!["10 Science-A".to_string()],
        ..Default::default()
    }
}

fn cohort(pool: &DbPool, filter: &CohortFilter) -> Cohort {
    resolve(&pool.conn, filter, YEAR).expect("cohort")
}

fn two_days() -> DateRange {
    DateRange::inclusive(day("2024-07-01"), day("2024-07-02")).unwrap()
}

fn query(kind: Kind, range: DateRange, filter: CohortFilter) -> RangeQuery {
    RangeQuery {
        cohort: filter,
        ..RangeQuery::new(kind, range, 50)
    }
}

fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// Cohort resolution
// ---------------------------------------------------------------------------

#[test]
fn class_section_cohort_is_year_scoped() {
    let (pool, s, _) = setup();
    let c = cohort(&pool, &section_a());

    let ids: Vec<i64> = c.members().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![s.aarav, s.bina, s.chirag]);
    assert!(!c.contains(s.old_year));
    assert!(!c.contains(s.devika));
}

#[test]
fn filters_combine_with_and_and_bus_matches_pick_or_drop() {
    let (pool, s, _) = setup();

    let bus2 = cohort(
        &pool,
        &CohortFilter {
            buses: vec!["Bus 2".into()],
            ..Default::default()
        },
    );
    assert_eq!(bus2.len(), 1);
    assert!(bus2.contains(s.chirag));

    let narrowed = cohort(
        &pool,
        &CohortFilter {
            buses: vec!["Bus 1".into()],
            search: Some("bina".into()),
            ..section_a()
        },
    );
    assert_eq!(narrowed.len(), 1);
    assert!(narrowed.contains(s.bina));

    let by_phone = cohort(
        &pool,
        &CohortFilter {
            search: Some("11223".into()),
            ..Default::default()
        },
    );
    assert!(by_phone.contains(s.chirag));
}

#[test]
fn search_treats_like_wildcards_literally() {
    let (pool, _, _) = setup();
    let search = |term: &str| {
        cohort(
            &pool,
            &CohortFilter {
                search: Some(term.into()),
                ..Default::default()
            },
        )
        .len()
    };

    assert_eq!(search("%"), 0);
    assert_eq!(search("ADM_00"), 0);
    assert_eq!(search("ADM-00"), 4);
}

#[test]
fn unknown_names_are_not_found() {
    let (pool, _, _) = setup();

    for filter in [
        CohortFilter {
            class_sections: vec!["12 Arts-A".into()],
            ..Default::default()
        },
        CohortFilter {
            class_sections: vec!["10 Science-Z".into()],
            ..Default::default()
        },
        CohortFilter {
            buses: vec!["Bus 9".into()],
            ..Default::default()
        },
    ] {
        let err = resolve(&pool.conn, &filter, YEAR).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)), "{err}");
    }
}

#[test]
fn empty_cohort_is_success_with_zero_rows() {
    let (pool, _, cfg) = setup();
    let q = query(
        Kind::Bus,
        two_days(),
        CohortFilter {
            search: Some("nobody-matches-this".into()),
            ..Default::default()
        },
    );

    let page = Core::range_report(&pool, &cfg, &q).unwrap();
    assert!(page.result.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);
}

// ---------------------------------------------------------------------------
// Reconciliation and range aggregation
// ---------------------------------------------------------------------------

#[test]
fn every_day_partitions_the_cohort() {
    let (pool, _, _) = setup();
    let c = cohort(&pool, &CohortFilter::default());
    let all: HashSet<i64> = c.members().iter().map(|m| m.id).collect();

    for kind in [Kind::Bus, Kind::Class] {
        for d in ["2024-06-30", "2024-07-01", "2024-07-02"] {
            let reading = read_day(&pool.conn, kind, day(d), &c).unwrap();
            let part = DayPartition::build(&reading, &c);

            let present: HashSet<i64> = part.present.iter().map(|r| r.student_id()).collect();
            let absent: HashSet<i64> = part.absent.iter().map(|r| r.student_id()).collect();

            assert_eq!(part.len(), c.len(), "{kind:?} {d}");
            assert!(present.is_disjoint(&absent));
            assert_eq!(&present | &absent, all);
        }
    }
}

#[test]
fn total_rows_cover_cohort_once_per_day() {
    let (pool, _, _) = setup();
    let c = cohort(&pool, &section_a());
    let rows = aggregate(&pool.conn, Kind::Bus, &two_days(), &c, TagState::Total).unwrap();

    assert_eq!(rows.len(), 2 * c.len());
    let keys: HashSet<_> = rows.iter().map(|r| (r.date, r.student_id())).collect();
    assert_eq!(keys.len(), rows.len());

    // day ascending, then present rows, then absent rows
    assert!(rows.windows(2).all(|w| w[0].date <= w[1].date));
    let first_day: Vec<bool> = rows.iter().take(3).map(|r| r.is_absent()).collect();
    assert_eq!(first_day, vec![false, false, true]);
}

#[test]
fn single_day_range_equals_one_day_replay() {
    let (pool, _, _) = setup();
    let c = cohort(&pool, &section_a());
    let d = day("2024-07-01");

    for state in states(Kind::Bus).iter().map(|s| s.state) {
        let ranged = aggregate(&pool.conn, Kind::Bus, &DateRange::single(d).unwrap(), &c, state).unwrap();
        let direct = day_rows(&pool.conn, Kind::Bus, d, &c, state).unwrap();
        assert_eq!(ranged, direct, "{:?}", state.name(Kind::Bus));
    }
}

#[test]
fn tag_state_filter_selects_rows() {
    let (pool, s, _) = setup();
    let c = cohort(&pool, &section_a());
    let d = day("2024-07-01");

    let ids = |name: &str| -> Vec<i64> {
        let state = TagState::parse(Kind::Bus, name).unwrap();
        day_rows(&pool.conn, Kind::Bus, d, &c, state)
            .unwrap()
            .iter()
            .map(|r| r.student_id())
            .collect()
    };

    assert_eq!(ids("absent"), vec![s.bina]);
    assert_eq!(ids("present"), vec![s.aarav, s.chirag]);
    // absent students are "missed" too, but only the absent filter emits them
    assert_eq!(ids("aCheckOutMissed"), vec![s.aarav]);
    assert!(ids("mCheckInMissed").is_empty());
    assert_eq!(ids("inButNotOutSchool"), vec![s.aarav]);
    assert!(ids("wrongBus").is_empty());
}

#[test]
fn unknown_tag_state_is_invalid_filter() {
    assert!(matches!(
        TagState::parse(Kind::Bus, "checkIn"),
        Err(AppError::InvalidFilter(_))
    ));
}

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

#[test]
fn flattened_rows_are_total_with_sentinels() {
    let (pool, _, cfg) = setup();
    let q = query(
        Kind::Bus,
        DateRange::single(day("2024-07-01")).unwrap(),
        section_a(),
    );
    let rows = Core::range_rows(&pool, &cfg, &q).unwrap();
    let layout = Kind::Bus.descriptor().column_names();

    for row in &rows {
        assert_eq!(row.headers().collect::<Vec<_>>(), layout);
    }

    let aarav = rows.iter().find(|r| r.get("admission_no") == Some(&text("ADM-001"))).unwrap();
    assert_eq!(aarav.get("absent"), Some(&Cell::Bool(false)));
    assert_eq!(aarav.get("photo_url"), Some(&text("/photos/adm-001.jpg")));
    assert_eq!(aarav.get("morning_entry_tag"), Some(&text("Morning Check-In")));
    assert_eq!(aarav.get("morning_entry_time"), Some(&text("2024-07-01T02:10:00Z")));
    assert_eq!(aarav.get("morning_entry_lat"), Some(&Cell::Number(12.9716)));
    assert_eq!(aarav.get("morning_entry_address"), Some(&text("MG Road stop")));
    assert_eq!(aarav.get("afternoon_exit_tag"), Some(&text("NA")));
    assert_eq!(aarav.get("afternoon_exit_lon"), Some(&Cell::Number(0.0)));

    let bina = rows.iter().find(|r| r.is_absent()).unwrap();
    assert_eq!(bina.get("student_name"), Some(&text("Bina Rao")));
    assert_eq!(bina.get("photo_url"), Some(&text("/img/placeholder.png")));
    assert_eq!(bina.get("date"), Some(&text("2024-07-01")));
    for t in Kind::Bus.descriptor().tags {
        for (col, _) in t.columns {
            let cell = bina.get(col).unwrap();
            assert!(cell.is_na() || *cell == Cell::Number(0.0), "{col}: {cell:?}");
        }
    }
}

#[test]
fn classroom_rows_carry_mark_as_absent() {
    let (pool, _, cfg) = setup();
    let q = query(
        Kind::Class,
        DateRange::single(day("2024-07-01")).unwrap(),
        CohortFilter::default(),
    );
    let rows = Core::range_rows(&pool, &cfg, &q).unwrap();
    assert_eq!(rows.len(), 4);

    let devika = rows.iter().find(|r| r.get("student_name") == Some(&text("Devika Nair"))).unwrap();
    assert_eq!(devika.get("entry_tag"), Some(&text("Check-In")));
    assert_eq!(devika.get("entry_msg"), Some(&text("sent home")));
    assert_eq!(devika.get("entry_mark_as_absent"), Some(&Cell::Bool(true)));
    assert!(devika.get("exit_time").unwrap().is_na());
    assert!(devika.get("morning_entry_lat").is_none());
}

// ---------------------------------------------------------------------------
// Sorting and pagination
// ---------------------------------------------------------------------------

#[test]
fn date_desc_pages_of_one() {
    let (pool, _, cfg) = setup();
    let mut q = query(Kind::Bus, two_days(), section_a());
    q.page_size = 1;
    q.sort = SortSpec::new("date", SortDir::Desc);

    let p1 = Core::range_report(&pool, &cfg, &q).unwrap();
    assert_eq!(p1.result.len(), 1);
    assert_eq!(p1.result[0].get("date"), Some(&text("2024-07-02")));
    assert_eq!(p1.total, 6);
    assert_eq!(p1.total_pages, 6);

    q.page = 2;
    let p2 = Core::range_report(&pool, &cfg, &q).unwrap();
    assert_eq!(p2.result.len(), 1);
    assert_eq!(p2.result[0].get("date"), Some(&text("2024-07-02")));
    assert_ne!(p1.result, p2.result);
}

#[test]
fn pages_are_stable_and_concatenate_to_full_set() {
    let (pool, _, cfg) = setup();
    let mut q = query(Kind::Bus, two_days(), CohortFilter::default());
    q.sort = SortSpec::new("student_name", SortDir::Asc);
    let full = Core::range_rows(&pool, &cfg, &q).unwrap();

    q.page_size = 3;
    let mut joined = Vec::new();
    for page in 1..=4 {
        q.page = page;
        let a = Core::range_report(&pool, &cfg, &q).unwrap();
        let b = Core::range_report(&pool, &cfg, &q).unwrap();
        assert_eq!(a, b);
        joined.extend(a.result);
    }
    assert_eq!(joined, full);

    q.page = 99;
    let past = Core::range_report(&pool, &cfg, &q).unwrap();
    assert!(past.result.is_empty());
    assert_eq!(past.total, full.len());
}

#[test]
fn sort_direction_is_respected() {
    let (pool, _, cfg) = setup();
    for (field, dir) in [
        ("student_name", SortDir::Asc),
        ("student_name", SortDir::Desc),
        ("morning_entry_time", SortDir::Desc),
        ("absent", SortDir::Asc),
    ] {
        let mut q = query(Kind::Bus, two_days(), CohortFilter::default());
        q.sort = SortSpec::new(field, dir);
        let rows = Core::range_rows(&pool, &cfg, &q).unwrap();

        let want = match dir {
            SortDir::Asc => Ordering::Greater,
            SortDir::Desc => Ordering::Less,
        };
        for w in rows.windows(2) {
            let ord = w[0].get(field).unwrap().compare(w[1].get(field).unwrap());
            assert_ne!(ord, want, "{field} {dir:?}");
        }
    }
}

#[test]
fn unknown_sort_field_is_rejected_before_reading() {
    let (pool, _, cfg) = setup();
    let mut q = query(Kind::Class, two_days(), CohortFilter::default());
    q.sort = SortSpec::new("morning_entry_lat", SortDir::Asc);

    assert!(matches!(
        Core::range_report(&pool, &cfg, &q),
        Err(AppError::InvalidSort(_))
    ));
}

#[test]
fn zero_page_size_is_invalid() {
    let (pool, _, cfg) = setup();
    let mut q = query(Kind::Bus, two_days(), CohortFilter::default());
    q.page_size = 0;
    assert!(matches!(
        Core::range_report(&pool, &cfg, &q),
        Err(AppError::InvalidFilter(_))
    ));
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[test]
fn bus_stats_worked_example() {
    let (pool, _, cfg) = setup();
    let stats = Core::day_stats(
        &pool,
        &cfg,
        &StatsQuery {
            kind: Kind::Bus,
            day: day("2024-07-01"),
            cohort: section_a(),
        },
    )
    .unwrap();

    let c = |name: &str| stats.count(name).unwrap();
    assert_eq!(c("total"), 3);
    assert_eq!((c("present"), c("absent")), (2, 1));
    assert_eq!((c("mCheckIn"), c("mCheckInMissed")), (2, 1));
    assert_eq!((c("aCheckOut"), c("aCheckOutMissed")), (1, 2));
    assert_eq!((c("inSchool"), c("outSchool")), (2, 1));
    assert_eq!(c("inButNotOutSchool"), 1);
    assert_eq!((c("wrongBus"), c("wrongStop")), (0, 0));

    assert_eq!(stats.window.from.to_rfc3339(), "2024-06-30T18:30:00+00:00");
}

#[test]
fn stats_counters_are_consistent() {
    let (pool, _, cfg) = setup();
    for kind in [Kind::Bus, Kind::Class] {
        for d in ["2024-07-01", "2024-07-02", "2024-08-15"] {
            let st = Core::day_stats(
                &pool,
                &cfg,
                &StatsQuery {
                    kind,
                    day: day(d),
                    cohort: CohortFilter::default(),
                },
            )
            .unwrap();

            assert_eq!(st.present + st.absent, st.total);
            assert_eq!(st.in_but_not_out_school, st.in_school.saturating_sub(st.out_school));
            for t in kind.descriptor().tags {
                let key = states(kind)
                    .iter()
                    .find(|s| s.state == TagState::Has(t.tag))
                    .map(|s| s.name);
                if let Some(has) = key {
                    let missed = format!("{has}Missed");
                    assert_eq!(st.count(has).unwrap() + st.count(&missed).unwrap(), st.total);
                }
            }
        }
    }
}

#[test]
fn class_stats_count_marked_absent_and_skip_bus_counters() {
    let (pool, _, cfg) = setup();
    let st = Core::day_stats(
        &pool,
        &cfg,
        &StatsQuery {
            kind: Kind::Class,
            day: day("2024-07-01"),
            cohort: CohortFilter::default(),
        },
    )
    .unwrap();

    assert_eq!(st.total, 4);
    assert_eq!(st.present, 2);
    assert_eq!(st.count("checkIn"), Some(2));
    assert_eq!(st.count("checkOut"), Some(1));
    assert_eq!(st.count("markedAbsent"), Some(1));
    assert_eq!(st.in_but_not_out_school, 1);
    assert_eq!(st.wrong_bus, None);

    let json = serde_json::to_value(&st).unwrap();
    assert_eq!(json["kind"], "class");
    assert_eq!(json["checkInMissed"], 2);
    assert!(json.get("wrongBus").is_none());
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

#[test]
fn duplicate_tag_is_rejected_and_leaves_record_untouched() {
    let (pool, s, _) = setup();
    let d1 = day("2024-07-01");

    let before = load_day_records(&pool.conn, Kind::Bus, &d1).unwrap();
    let chirag_before = before.iter().find(|r| r.student_id == s.chirag).unwrap();
    assert_eq!(chirag_before.last_vehicle, Some(s.bus2));

    let dup = record_tag_event(
        &pool.conn,
        Kind::Bus,
        s.chirag,
        &d1,
        &TagEvent::new(Tag::MorningEntry, at("2024-07-01", 4, 0)).with_vehicle(s.bus1),
    );
    assert!(matches!(dup, Err(AppError::Upstream(_))));

    let after = load_day_records(&pool.conn, Kind::Bus, &d1).unwrap();
    let chirag_after = after.iter().find(|r| r.student_id == s.chirag).unwrap();
    assert_eq!(chirag_after.last_vehicle, Some(s.bus2));
    assert_eq!(chirag_after.events.len(), 4);
}

#[test]
fn bus_and_class_tags_for_same_day_are_both_stored() {
    let (pool, s, _) = setup();
    let d3 = day("2024-07-03");

    record_tag_event(
        &pool.conn,
        Kind::Bus,
        s.bina,
        &d3,
        &TagEvent::new(Tag::MorningEntry, at("2024-07-03", 2, 0)).with_vehicle(s.bus1),
    )
    .unwrap();
    record_tag_event(
        &pool.conn,
        Kind::Class,
        s.bina,
        &d3,
        &TagEvent::new(Tag::Entry, at("2024-07-03", 3, 0)),
    )
    .unwrap();

    let bus = load_day_records(&pool.conn, Kind::Bus, &d3).unwrap();
    let class = load_day_records(&pool.conn, Kind::Class, &d3).unwrap();
    assert_eq!(bus.len(), 1);
    assert_eq!(class.len(), 1);
    assert_eq!(bus[0].events[0].tag, Tag::MorningEntry);
    assert_eq!(class[0].events[0].tag, Tag::Entry);
    assert_ne!(bus[0].id, class[0].id);
}

#[test]
fn corrupt_row_fails_the_whole_range() {
    let (pool, _, cfg) = setup();
    pool.conn
        .execute(
            "UPDATE tag_events SET tag = 'teleport' WHERE kind = 'bus' AND date = '2024-07-02'",
            [],
        )
        .unwrap();

    let q = query(Kind::Bus, two_days(), CohortFilter::default());
    assert!(matches!(
        Core::range_report(&pool, &cfg, &q),
        Err(AppError::Upstream(_))
    ));
    assert!(matches!(
        Core::range_rows(&pool, &cfg, &q),
        Err(AppError::Upstream(_))
    ));

    // The first day alone still reads fine.
    let day_one = DateRange::inclusive(day("2024-07-01"), day("2024-07-01")).unwrap();
    let q = query(Kind::Bus, day_one, CohortFilter::default());
    assert!(Core::range_report(&pool, &cfg, &q).is_ok());
}

#[test]
fn unparsable_event_time_is_an_upstream_failure() {
    let (pool, _, cfg) = setup();
    pool.conn
        .execute(
            "UPDATE tag_events SET time = 'yesterday' WHERE kind = 'bus' AND date = '2024-07-02'",
            [],
        )
        .unwrap();

    let q = query(Kind::Bus, two_days(), CohortFilter::default());
    assert!(matches!(
        Core::range_report(&pool, &cfg, &q),
        Err(AppError::Upstream(_))
    ));
}
