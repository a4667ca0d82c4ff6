//! Calendar events

use std::error::Error;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::item::ItemId;

/// The shape of a calendar event in storage.
///
/// Dates are kept as text: they are written by the calendar (see [`format_event_time`]) or directly by the "add event" form.
/// Any other field that may have been stored (e.g. an `id`) is ignored when loading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub title: String,
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
}

impl StoredEvent {
    pub fn new(title: String, start: String, end: Option<String>) -> Self {
        Self { title, start, end }
    }
}

impl From<&CalendarEvent> for StoredEvent {
    fn from(event: &CalendarEvent) -> Self {
        Self {
            title: event.title().to_string(),
            start: format_event_time(event.start()),
            end: event.end().map(format_event_time),
        }
    }
}


/// An event, as displayed by the calendar
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarEvent {
    id: ItemId,
    title: String,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    all_day: bool,
}

impl CalendarEvent {
    /// Create a new event, with a new (random) ID
    pub fn new(title: String, start: DateTime<Utc>, end: Option<DateTime<Utc>>, all_day: bool) -> Self {
        Self { id: ItemId::random(), title, start, end, all_day }
    }

    /// Build an event from its stored shape
    pub fn from_stored(stored: &StoredEvent) -> Result<Self, Box<dyn Error>> {
        let (start, all_day) = parse_event_time(&stored.start)?;
        // A blank end means "no end"
        let end = match stored.end.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(end) => Some(parse_event_time(end)?.0),
        };
        Ok(Self::new(stored.title.clone(), start, end, all_day))
    }

    pub fn id(&self) -> &ItemId                 { &self.id     }
    pub fn title(&self) -> &str                 { &self.title  }
    pub fn start(&self) -> &DateTime<Utc>       { &self.start  }
    pub fn end(&self) -> Option<&DateTime<Utc>> { self.end.as_ref() }
    pub fn all_day(&self) -> bool               { self.all_day }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    /// Move or resize this event
    pub fn set_dates(&mut self, start: DateTime<Utc>, end: Option<DateTime<Utc>>) {
        self.start = start;
        self.end = end;
    }
}


/// Format a date the way it is stored (UTC, millisecond precision, e.g. `2024-05-01T09:30:00.000Z`)
pub fn format_event_time(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored date.
///
/// This supports RFC3339 dates, dates without a timezone (considered as UTC), and bare days.
/// The returned boolean tells whether this was a bare day (i.e. an all-day event).
pub fn parse_event_time(text: &str) -> Result<(DateTime<Utc>, bool), Box<dyn Error>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok((dt.with_timezone(&Utc), false));
    }
    for format in &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok((Utc.from_utc_datetime(&naive), false));
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok((Utc.from_utc_datetime(&midnight), true));
        }
    }

    Err(format!("Invalid event date {:?}", text).into())
}
