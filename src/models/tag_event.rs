use super::tag::Tag;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Location captured by the bus device when a tag is read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub address: String,
}

/// One recorded occurrence inside an attendance record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagEvent {
    pub tag: Tag,
    pub time: DateTime<Utc>, // ⇔ tag_events.time (TEXT, RFC 3339 UTC)
    pub message: String,
    pub mark_as_absent: bool, // classroom kind only
    pub geo: Option<GeoPoint>, // bus kind only
    pub vehicle: Option<i64>,  // bus kind only
}

impl TagEvent {
    pub fn new(tag: Tag, time: DateTime<Utc>) -> Self {
        Self {
            tag,
            time,
            message: String::new(),
            mark_as_absent: false,
            geo: None,
            vehicle: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_geo(mut self, lat: f64, lon: f64, address: impl Into<String>) -> Self {
        self.geo = Some(GeoPoint {
            lat,
            lon,
            address: address.into(),
        });
        self
    }

    pub fn with_vehicle(mut self, vehicle_id: i64) -> Self {
        self.vehicle = Some(vehicle_id);
        self
    }

    pub fn marked_absent(mut self) -> Self {
        self.mark_as_absent = true;
        self
    }

    pub fn time_str(&self) -> String {
        self.time.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    }
}
