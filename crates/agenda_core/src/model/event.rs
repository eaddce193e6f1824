//! Agenda event model.
//!
//! # Responsibility
//! - Define the event record rendered as one agenda row.
//! - Expand a source event into per-day instances.
//!
//! # Invariants
//! - An instance carries `instance_day = Some(day)`; source events may leave it
//!   unset.
//! - `kind` is a dot-separated type path rooted at `base`.

use crate::model::day::Day;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub type EventId = Uuid;

/// Root event kind every other kind descends from.
pub const BASE_EVENT_KIND: &str = "base";
/// Title used for synthesized rows of empty days.
pub const DEFAULT_PLACEHOLDER_TITLE: &str = "No events";

const DEFAULT_EVENT_COLOR: u32 = 0xFF3F_51B5;
const DEFAULT_TEXT_COLOR: u32 = 0xFFFF_FFFF;

/// Type tag of an event, used to pick its renderer.
///
/// `base.drawable.weather` is a `base.drawable`, which is a `base`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventKind(String);

impl Default for EventKind {
    fn default() -> Self {
        Self::base()
    }
}

impl EventKind {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn base() -> Self {
        Self(BASE_EVENT_KIND.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives a sub-kind, e.g. `base` -> `base.drawable`.
    pub fn child(&self, segment: &str) -> Self {
        Self(format!("{}.{segment}", self.0))
    }

    /// Whether this kind equals `ancestor` or descends from it.
    pub fn is_a(&self, ancestor: &EventKind) -> bool {
        match self.0.strip_prefix(ancestor.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('.'),
            None => false,
        }
    }
}

impl From<&str> for EventKind {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One agenda row: a real event instance or an empty-day placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default = "Uuid::new_v4")]
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub all_day: bool,
    /// ARGB card color.
    #[serde(default = "default_event_color")]
    pub color: u32,
    /// ARGB title/location color.
    #[serde(default = "default_text_color")]
    pub text_color: u32,
    #[serde(default)]
    pub kind: EventKind,
    /// Free-form values consumed by custom renderers.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub placeholder: bool,
    /// Day this record is rendered under.
    #[serde(default)]
    pub instance_day: Option<NaiveDate>,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            location: String::new(),
            start,
            end,
            all_day: false,
            color: DEFAULT_EVENT_COLOR,
            text_color: DEFAULT_TEXT_COLOR,
            kind: EventKind::base(),
            attributes: BTreeMap::new(),
            placeholder: false,
            instance_day: None,
        }
    }

    /// Creates an all-day event covering the single date `date`.
    pub fn all_day(title: impl Into<String>, date: NaiveDate) -> Self {
        let midnight = date.and_time(NaiveTime::default());
        let mut event = Self::new(title, midnight, midnight);
        event.all_day = true;
        event
    }

    /// Creates the filler row shown for a day without events.
    pub fn placeholder(date: NaiveDate, title: impl Into<String>) -> Self {
        let mut event = Self::all_day(title, date);
        event.placeholder = true;
        event.color = 0;
        event.instance_day = Some(date);
        event
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<EventKind>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_colors(mut self, color: u32, text_color: u32) -> Self {
        self.color = color;
        self.text_color = text_color;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_instance_day(mut self, day: NaiveDate) -> Self {
        self.instance_day = Some(day);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Last day the event occupies.
    ///
    /// An end exactly at midnight closes on the previous day; a reversed window
    /// collapses to the start day.
    pub fn last_day(&self) -> NaiveDate {
        if self.end <= self.start {
            return self.start.date();
        }
        if self.end.time() == NaiveTime::default() {
            return self.end.date().pred_opt().unwrap_or(self.end.date());
        }
        self.end.date()
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.first_day() <= date && date <= self.last_day()
    }

    /// Copy of this event rendered under `date`.
    pub fn instance_for(&self, date: NaiveDate) -> Self {
        let mut instance = self.clone();
        instance.instance_day = Some(date);
        instance
    }
}

/// Produces the placeholder row for a day without events.
pub trait PlaceholderFactory {
    fn placeholder_for(&self, day: &Day) -> CalendarEvent;
}

impl<F> PlaceholderFactory for F
where
    F: Fn(&Day) -> CalendarEvent,
{
    fn placeholder_for(&self, day: &Day) -> CalendarEvent {
        self(day)
    }
}

/// Placeholder factory producing a fixed title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitledPlaceholder {
    title: String,
}

impl TitledPlaceholder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for TitledPlaceholder {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_TITLE)
    }
}

impl PlaceholderFactory for TitledPlaceholder {
    fn placeholder_for(&self, day: &Day) -> CalendarEvent {
        CalendarEvent::placeholder(day.date, self.title.clone())
    }
}

fn default_event_color() -> u32 {
    DEFAULT_EVENT_COLOR
}

fn default_text_color() -> u32 {
    DEFAULT_TEXT_COLOR
}
