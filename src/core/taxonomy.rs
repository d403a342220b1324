//! Tag taxonomy: the named states an event list can be classified into.
//!
//! Each attendance kind has a fixed table `name → TagState`. Filtering (day
//! reader) and counting (stats) both evaluate states through this table, so
//! the two can never disagree on what e.g. `mCheckInMissed` means.
//!
//! An empty event list is simultaneously `absent` and "missed" for every tag.
//! `wrongBus` / `wrongStop` are part of the vocabulary but have no route or
//! geofence data behind them: they never match.

use crate::errors::{AppError, AppResult};
use crate::models::kind::Kind;
use crate::models::tag::Tag;
use crate::models::tag_event::TagEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagState {
    /// Every cohort member, present or absent.
    Total,
    Present,
    Absent,
    Has(Tag),
    Missed(Tag),
    InSchool,
    OutSchool,
    InButNotOutSchool,
    /// Some classroom event carries `mark_as_absent`.
    MarkedAbsent,
    /// Always false.
    WrongBus,
    /// Always false.
    WrongStop,
}

#[derive(Debug)]
pub struct NamedState {
    pub name: &'static str,
    pub state: TagState,
}

const fn named(name: &'static str, state: TagState) -> NamedState {
    NamedState { name, state }
}

static BUS_STATES: [NamedState; 16] = [
    named("total", TagState::Total),
    named("present", TagState::Present),
    named("absent", TagState::Absent),
    named("mCheckIn", TagState::Has(Tag::MorningEntry)),
    named("mCheckInMissed", TagState::Missed(Tag::MorningEntry)),
    named("mCheckOut", TagState::Has(Tag::MorningExit)),
    named("mCheckOutMissed", TagState::Missed(Tag::MorningExit)),
    named("aCheckIn", TagState::Has(Tag::AfternoonEntry)),
    named("aCheckInMissed", TagState::Missed(Tag::AfternoonEntry)),
    named("aCheckOut", TagState::Has(Tag::AfternoonExit)),
    named("aCheckOutMissed", TagState::Missed(Tag::AfternoonExit)),
    named("inSchool", TagState::InSchool),
    named("outSchool", TagState::OutSchool),
    named("inButNotOutSchool", TagState::InButNotOutSchool),
    named("wrongBus", TagState::WrongBus),
    named("wrongStop", TagState::WrongStop),
];

static CLASS_STATES: [NamedState; 11] = [
    named("total", TagState::Total),
    named("present", TagState::Present),
    named("absent", TagState::Absent),
    named("checkIn", TagState::Has(Tag::Entry)),
    named("checkInMissed", TagState::Missed(Tag::Entry)),
    named("checkOut", TagState::Has(Tag::Exit)),
    named("checkOutMissed", TagState::Missed(Tag::Exit)),
    named("inSchool", TagState::InSchool),
    named("outSchool", TagState::OutSchool),
    named("inButNotOutSchool", TagState::InButNotOutSchool),
    named("markedAbsent", TagState::MarkedAbsent),
];

/// State vocabulary of `kind`, in canonical order.
pub fn states(kind: Kind) -> &'static [NamedState] {
    match kind {
        Kind::Bus => &BUS_STATES,
        Kind::Class => &CLASS_STATES,
    }
}

fn has(events: &[TagEvent], tag: Tag) -> bool {
    events.iter().any(|e| e.tag == tag)
}

fn in_school(kind: Kind, events: &[TagEvent]) -> bool {
    match kind {
        Kind::Bus => has(events, Tag::MorningEntry) || has(events, Tag::MorningExit),
        Kind::Class => has(events, Tag::Entry),
    }
}

fn out_school(kind: Kind, events: &[TagEvent]) -> bool {
    match kind {
        Kind::Bus => has(events, Tag::AfternoonEntry) || has(events, Tag::AfternoonExit),
        Kind::Class => has(events, Tag::Exit),
    }
}

impl TagState {
    /// Look up a state by its wire name for `kind`.
    pub fn parse(kind: Kind, name: &str) -> AppResult<Self> {
        let wanted = name.trim();
        states(kind)
            .iter()
            .find(|s| s.name == wanted)
            .map(|s| s.state)
            .ok_or_else(|| {
                let known: Vec<&str> = states(kind).iter().map(|s| s.name).collect();
                AppError::InvalidFilter(format!(
                    "unknown {} tag state '{}'. Use one of: {}",
                    kind.to_db_str(),
                    wanted,
                    known.join(", ")
                ))
            })
    }

    pub fn name(&self, kind: Kind) -> Option<&'static str> {
        states(kind).iter().find(|s| s.state == *self).map(|s| s.name)
    }

    /// Evaluate the state against one student's events for one day.
    pub fn matches(&self, kind: Kind, events: &[TagEvent]) -> bool {
        match self {
            TagState::Total => true,
            TagState::Present => !events.is_empty(),
            TagState::Absent => events.is_empty(),
            TagState::Has(tag) => has(events, *tag),
            TagState::Missed(tag) => !has(events, *tag),
            TagState::InSchool => in_school(kind, events),
            TagState::OutSchool => out_school(kind, events),
            TagState::InButNotOutSchool => in_school(kind, events) && !out_school(kind, events),
            TagState::MarkedAbsent => events.iter().any(|e| e.mark_as_absent),
            TagState::WrongBus | TagState::WrongStop => false,
        }
    }
}

/// Every named state (except `total`) that holds for `events`.
pub fn classify(kind: Kind, events: &[TagEvent]) -> Vec<&'static str> {
    states(kind)
        .iter()
        .filter(|s| s.state != TagState::Total && s.state.matches(kind, events))
        .map(|s| s.name)
        .collect()
}
