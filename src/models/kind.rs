//! Attendance kinds and their static descriptors.
//!
//! Bus and classroom attendance run through the same engine; everything that
//! differs between them (tag vocabulary, flattened column layout, geo fields)
//! lives in a `KindDescriptor`.

use super::tag::Tag;
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Bus,
    Class,
}

impl Kind {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Kind::Bus => "bus",
            Kind::Class => "class",
        }
    }

    pub fn descriptor(&self) -> &'static KindDescriptor {
        match self {
            Kind::Bus => &BUS,
            Kind::Class => &CLASS,
        }
    }
}

/// Which piece of a tag event a flattened column carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    Label,
    Time,
    Lat,
    Lon,
    Address,
    Message,
    MarkAsAbsent,
}

/// Flattened columns emitted for one tag.
#[derive(Debug)]
pub struct TagColumns {
    pub tag: Tag,
    pub columns: &'static [(&'static str, TagField)],
}

#[derive(Debug)]
pub struct KindDescriptor {
    pub kind: Kind,
    pub tags: &'static [TagColumns],
    pub has_geo: bool,
}

/// Columns present on every flattened row, in output order.
pub const FIXED_COLUMNS: [&str; 7] = [
    "admission_no",
    "student_name",
    "class_name",
    "section_name",
    "photo_url",
    "date",
    "absent",
];

impl KindDescriptor {
    /// Full column layout: fixed columns followed by per-tag columns.
    pub fn column_names(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = FIXED_COLUMNS.to_vec();
        for t in self.tags {
            out.extend(t.columns.iter().map(|(name, _)| *name));
        }
        out
    }

    pub fn has_column(&self, name: &str) -> bool {
        FIXED_COLUMNS.contains(&name)
            || self
                .tags
                .iter()
                .any(|t| t.columns.iter().any(|(c, _)| *c == name))
    }

    pub fn accepts(&self, tag: Tag) -> bool {
        tag.kind() == self.kind
    }
}

macro_rules! bus_columns {
    ($tag:literal) => {
        &[
            (concat!($tag, "_tag"), TagField::Label),
            (concat!($tag, "_time"), TagField::Time),
            (concat!($tag, "_lat"), TagField::Lat),
            (concat!($tag, "_lon"), TagField::Lon),
            (concat!($tag, "_address"), TagField::Address),
            (concat!($tag, "_msg"), TagField::Message),
        ]
    };
}

macro_rules! class_columns {
    ($tag:literal) => {
        &[
            (concat!($tag, "_tag"), TagField::Label),
            (concat!($tag, "_time"), TagField::Time),
            (concat!($tag, "_msg"), TagField::Message),
            (concat!($tag, "_mark_as_absent"), TagField::MarkAsAbsent),
        ]
    };
}

static BUS: KindDescriptor = KindDescriptor {
    kind: Kind::Bus,
    tags: &[
        TagColumns {
            tag: Tag::MorningEntry,
            columns: bus_columns!("morning_entry"),
        },
        TagColumns {
            tag: Tag::MorningExit,
            columns: bus_columns!("morning_exit"),
        },
        TagColumns {
            tag: Tag::AfternoonEntry,
            columns: bus_columns!("afternoon_entry"),
        },
        TagColumns {
            tag: Tag::AfternoonExit,
            columns: bus_columns!("afternoon_exit"),
        },
        TagColumns {
            tag: Tag::Unknown,
            columns: bus_columns!("unknown"),
        },
    ],
    has_geo: true,
};

static CLASS: KindDescriptor = KindDescriptor {
    kind: Kind::Class,
    tags: &[
        TagColumns {
            tag: Tag::Entry,
            columns: class_columns!("entry"),
        },
        TagColumns {
            tag: Tag::Exit,
            columns: class_columns!("exit"),
        },
    ],
    has_geo: false,
};
