//! Agenda list addressing: flat positions to day sections.
//!
//! # Responsibility
//! - Map agenda positions to their section day and header id in O(1).
//! - Map a day back to the first position of its section.
//!
//! # Invariants
//! - Sections are contiguous, ordered by day, and cover every position.
//! - All positions of one section share one header id.

use crate::model::calendar::CalendarModel;
use crate::model::day::Day;
use crate::model::event::CalendarEvent;
use chrono::{NaiveDate, NaiveTime};
use log::debug;
use std::collections::BTreeMap;
use thiserror::Error;

/// Agenda index lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgendaIndexError {
    #[error("day {0} has no agenda rows")]
    DayNotFound(NaiveDate),
}

/// Sticky header identity of a section: the day's UTC midnight in epoch
/// milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeaderId(i64);

impl HeaderId {
    pub fn for_date(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::default()).and_utc().timestamp_millis())
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

/// Contiguous run of agenda rows sharing one instance day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaSection {
    pub day: NaiveDate,
    pub header_id: HeaderId,
    pub first_position: usize,
    pub len: usize,
}

/// Section addressing over the model's flat agenda ordering.
#[derive(Debug, Clone, Default)]
pub struct AgendaIndex {
    sections: Vec<AgendaSection>,
    section_by_position: Vec<usize>,
    section_by_day: BTreeMap<NaiveDate, usize>,
    revision: u64,
}

impl AgendaIndex {
    /// Builds the index from the model's current agenda rows.
    pub fn build(model: &CalendarModel) -> Self {
        let mut index = Self {
            revision: model.revision(),
            ..Self::default()
        };
        index.section_by_position.reserve(model.events().len());

        for (position, event) in model.events().iter().enumerate() {
            let day = section_day(event);
            let extends_last = index
                .sections
                .last()
                .is_some_and(|section| section.day == day);
            if extends_last {
                if let Some(section) = index.sections.last_mut() {
                    section.len += 1;
                }
            } else {
                index.section_by_day.insert(day, index.sections.len());
                index.sections.push(AgendaSection {
                    day,
                    header_id: HeaderId::for_date(day),
                    first_position: position,
                    len: 1,
                });
            }
            index.section_by_position.push(index.sections.len() - 1);
        }

        debug!(
            "event=agenda_indexed module=agenda status=ok rows={} sections={} revision={}",
            index.len(),
            index.section_count(),
            index.revision
        );
        index
    }

    /// Day owning agenda `position`.
    pub fn section_of(&self, position: usize) -> Option<NaiveDate> {
        self.section_at(position).map(|section| section.day)
    }

    /// Section owning agenda `position`.
    pub fn section_at(&self, position: usize) -> Option<&AgendaSection> {
        let section = *self.section_by_position.get(position)?;
        self.sections.get(section)
    }

    /// `Day` record owning agenda `position`.
    pub fn day_at<'m>(&self, model: &'m CalendarModel, position: usize) -> Option<&'m Day> {
        model.day(self.section_of(position)?)
    }

    /// First agenda position of `day`'s section.
    ///
    /// # Errors
    /// - `DayNotFound` when `day` has no agenda rows.
    pub fn position_of_first(&self, day: NaiveDate) -> Result<usize, AgendaIndexError> {
        self.section_by_day
            .get(&day)
            .and_then(|section| self.sections.get(*section))
            .map(|section| section.first_position)
            .ok_or(AgendaIndexError::DayNotFound(day))
    }

    /// Sticky header id of the section owning `position`.
    pub fn header_id_of(&self, position: usize) -> Option<HeaderId> {
        self.section_at(position).map(|section| section.header_id)
    }

    /// Event displayed at `position`.
    pub fn event_at<'m>(
        &self,
        model: &'m CalendarModel,
        position: usize,
    ) -> Option<&'m CalendarEvent> {
        model.event(position)
    }

    pub fn sections(&self) -> &[AgendaSection] {
        &self.sections
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of agenda rows.
    pub fn len(&self) -> usize {
        self.section_by_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.section_by_position.is_empty()
    }

    /// Model revision this index was built from.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the index still mirrors `model`'s agenda rows.
    pub fn is_current(&self, model: &CalendarModel) -> bool {
        self.revision == model.revision() && self.len() == model.events().len()
    }
}

fn section_day(event: &CalendarEvent) -> NaiveDate {
    event.instance_day.unwrap_or_else(|| event.first_day())
}
