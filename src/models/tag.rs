use super::kind::Kind;
use serde::Serialize;

/// Tag carried by a single attendance event.
///
/// Bus tags and classroom tags share one enum; `kind()` tells which
/// vocabulary a tag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    // bus
    MorningEntry,
    MorningExit,
    AfternoonEntry,
    AfternoonExit,
    Unknown,
    // classroom
    Entry,
    Exit,
}

impl Tag {
    /// Stable key used for DB storage and flattened column prefixes.
    pub fn key(&self) -> &'static str {
        match self {
            Tag::MorningEntry => "morning_entry",
            Tag::MorningExit => "morning_exit",
            Tag::AfternoonEntry => "afternoon_entry",
            Tag::AfternoonExit => "afternoon_exit",
            Tag::Unknown => "unknown",
            Tag::Entry => "entry",
            Tag::Exit => "exit",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.key()
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "morning_entry" => Some(Tag::MorningEntry),
            "morning_exit" => Some(Tag::MorningExit),
            "afternoon_entry" => Some(Tag::AfternoonEntry),
            "afternoon_exit" => Some(Tag::AfternoonExit),
            "unknown" => Some(Tag::Unknown),
            "entry" => Some(Tag::Entry),
            "exit" => Some(Tag::Exit),
            _ => None,
        }
    }

    /// Human label used in flattened output.
    pub fn label(&self) -> &'static str {
        match self {
            Tag::MorningEntry => "Morning Check-In",
            Tag::MorningExit => "Morning Check-Out",
            Tag::AfternoonEntry => "Afternoon Check-In",
            Tag::AfternoonExit => "Afternoon Check-Out",
            Tag::Unknown => "Unknown",
            Tag::Entry => "Check-In",
            Tag::Exit => "Check-Out",
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Tag::Entry | Tag::Exit => Kind::Class,
            _ => Kind::Bus,
        }
    }
}
