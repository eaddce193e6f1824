//! Calendar model: weeks, days and the flat agenda ordering.
//!
//! # Responsibility
//! - Build or load the week/day grid for a date range.
//! - Expand events into per-day instances and keep the flat agenda order.
//! - Own the single-day selection state.
//!
//! # Invariants
//! - Every event instance references a day owned by the model's weeks.
//! - At most one day is selected.
//! - `events` is ordered by instance day, ascending.
//! - `weeks[i].row_index == i`.

use crate::model::day::Day;
use crate::model::event::{CalendarEvent, PlaceholderFactory};
use crate::model::locale::Locale;
use crate::model::week::{Week, DAYS_PER_WEEK};
use chrono::{Days, Local, NaiveDate};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

/// Calendar model construction and mutation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid date range: {min} is after {max}")]
    InvalidRange { min: NaiveDate, max: NaiveDate },
    #[error("inconsistent calendar data: {0}")]
    InconsistentModel(String),
    #[error("date {0} is outside the calendar range")]
    DayOutOfRange(NaiveDate),
}

/// Counters describing one `attach_events` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachReport {
    /// Source events handed to the model.
    pub source_events: usize,
    /// Real instances created (one per covered day).
    pub instances: usize,
    /// Synthesized rows for empty days.
    pub placeholders: usize,
    /// Source events with no covered day inside the range.
    pub dropped: usize,
}

/// Date-indexed model shared by the weeks grid and the agenda list.
#[derive(Debug, Clone)]
pub struct CalendarModel {
    locale: Locale,
    today: NaiveDate,
    weeks: Vec<Week>,
    events: Vec<CalendarEvent>,
    selected: Option<NaiveDate>,
    revision: u64,
}

impl CalendarModel {
    /// Empty model: no weeks, no events, nothing selected.
    pub fn empty(locale: Locale, today: NaiveDate) -> Self {
        Self {
            locale,
            today,
            weeks: Vec::new(),
            events: Vec::new(),
            selected: None,
            revision: 0,
        }
    }

    /// Builds weeks covering `[min_date, max_date]` with today's date from the
    /// local clock.
    pub fn build(min_date: NaiveDate, max_date: NaiveDate, locale: Locale) -> ModelResult<Self> {
        Self::build_with_today(min_date, max_date, locale, Local::now().date_naive())
    }

    /// Builds weeks covering `[min_date, max_date]`, aligned to the locale's
    /// first day of week.
    ///
    /// The first and last weeks may include days outside the range to complete
    /// their rows.
    ///
    /// # Errors
    /// - `InvalidRange` when `min_date > max_date` or the aligned range cannot
    ///   be represented.
    pub fn build_with_today(
        min_date: NaiveDate,
        max_date: NaiveDate,
        locale: Locale,
        today: NaiveDate,
    ) -> ModelResult<Self> {
        let invalid = || ModelError::InvalidRange {
            min: min_date,
            max: max_date,
        };
        if min_date > max_date {
            return Err(invalid());
        }

        let mut cursor = locale.week_start(min_date).ok_or_else(invalid)?;
        let mut weeks = Vec::new();
        loop {
            let week = Week::new(weeks.len(), cursor, today).ok_or_else(invalid)?;
            let last = week.last_date();
            weeks.push(week);
            if last >= max_date {
                break;
            }
            cursor = last.succ_opt().ok_or_else(invalid)?;
        }

        info!(
            "event=model_built module=model status=ok locale={} weeks={} first={} last={}",
            locale.tag(),
            weeks.len(),
            weeks[0].first_date(),
            weeks[weeks.len() - 1].last_date()
        );

        Ok(Self {
            weeks,
            ..Self::empty(locale, today)
        })
    }

    /// Accepts a host-built grid and event list.
    ///
    /// `days` carries the authoritative day flags (today, badge, selection);
    /// `events` must already be per-day instances. Rows are renumbered to their
    /// position and events are ordered by instance day.
    ///
    /// # Errors
    /// - `InconsistentModel` when weeks are not contiguous 7-day runs in
    ///   ascending order, a listed day or an event's instance day is not owned
    ///   by any week, or more than one day is selected.
    pub fn load_external(
        weeks: Vec<Week>,
        days: Vec<Day>,
        events: Vec<CalendarEvent>,
        locale: Locale,
    ) -> ModelResult<Self> {
        let today = days
            .iter()
            .find(|day| day.is_today)
            .map(|day| day.date)
            .unwrap_or_else(|| Local::now().date_naive());
        let mut model = Self {
            weeks,
            ..Self::empty(locale, today)
        };

        for (position, week) in model.weeks.iter_mut().enumerate() {
            if !week.is_contiguous() {
                return Err(ModelError::InconsistentModel(format!(
                    "week {position} does not hold consecutive dates"
                )));
            }
            week.renumber(position);
        }
        for pair in model.weeks.windows(2) {
            if pair[0].last_date().succ_opt() != Some(pair[1].first_date()) {
                return Err(ModelError::InconsistentModel(format!(
                    "week starting {} does not follow week starting {}",
                    pair[1].first_date(),
                    pair[0].first_date()
                )));
            }
        }

        for listed in &days {
            let day = model.day_mut(listed.date).ok_or_else(|| {
                ModelError::InconsistentModel(format!(
                    "day {} is not part of any week",
                    listed.date
                ))
            })?;
            day.is_today = listed.is_today;
            day.show_badge = listed.show_badge;
            day.selected = listed.selected;
        }

        let selected: Vec<NaiveDate> = model
            .days()
            .filter(|day| day.selected)
            .map(|day| day.date)
            .collect();
        if selected.len() > 1 {
            return Err(ModelError::InconsistentModel(format!(
                "{} days are selected, expected at most one",
                selected.len()
            )));
        }
        model.selected = selected.first().copied();

        for event in &events {
            let Some(instance_day) = event.instance_day else {
                return Err(ModelError::InconsistentModel(format!(
                    "event {} has no instance day",
                    event.id
                )));
            };
            if model.find_week_index(instance_day).is_none() {
                return Err(ModelError::InconsistentModel(format!(
                    "event {} references day {instance_day} outside the weeks",
                    event.id
                )));
            }
        }
        model.events = events;
        model.events.sort_by_key(|event| event.instance_day);
        model.revision = 1;

        info!(
            "event=model_loaded module=model status=ok locale={} weeks={} events={}",
            model.locale.tag(),
            model.weeks.len(),
            model.events.len()
        );
        Ok(model)
    }

    /// Replaces the agenda rows with `events` expanded per covered day.
    ///
    /// Every day without a real instance receives exactly one placeholder from
    /// `placeholders`. Events with no covered day in range are dropped.
    pub fn attach_events(
        &mut self,
        events: Vec<CalendarEvent>,
        placeholders: &dyn PlaceholderFactory,
    ) -> AttachReport {
        let mut report = AttachReport {
            source_events: events.len(),
            ..AttachReport::default()
        };
        let mut buckets: Vec<Vec<CalendarEvent>> =
            vec![Vec::new(); self.weeks.len() * DAYS_PER_WEEK];

        let (Some(range_start), Some(range_end)) = (self.first_date(), self.last_date()) else {
            report.dropped = events.len();
            self.events.clear();
            self.revision += 1;
            warn!(
                "event=events_attached module=model status=empty_model dropped={}",
                report.dropped
            );
            return report;
        };

        for event in &events {
            let first = event.first_day().max(range_start);
            let last = event.last_day().min(range_end);
            if first > last {
                report.dropped += 1;
                continue;
            }
            let mut date = first;
            loop {
                if let Some(slot) = self.slot_of(date) {
                    buckets[slot].push(event.instance_for(date));
                    report.instances += 1;
                }
                match date.checked_add_days(Days::new(1)) {
                    Some(next) if next <= last => date = next,
                    _ => break,
                }
            }
        }

        let mut flat = Vec::with_capacity(report.instances + buckets.len());
        for (day, bucket) in self.days().zip(buckets) {
            if bucket.is_empty() {
                let mut placeholder = placeholders.placeholder_for(day);
                placeholder.placeholder = true;
                placeholder.instance_day = Some(day.date);
                flat.push(placeholder);
                report.placeholders += 1;
            } else {
                flat.extend(bucket);
            }
        }
        self.events = flat;
        self.revision += 1;

        info!(
            "event=events_attached module=model status=ok sources={} instances={} placeholders={} dropped={} revision={}",
            report.source_events, report.instances, report.placeholders, report.dropped, self.revision
        );
        report
    }

    /// Position of the week containing `date`, if any.
    pub fn find_week_index(&self, date: NaiveDate) -> Option<usize> {
        let index = self.weeks.partition_point(|week| week.last_date() < date);
        self.weeks
            .get(index)
            .filter(|week| week.contains(date))
            .map(|_| index)
    }

    /// Moves the selection to `date` and returns the week rows to redraw.
    ///
    /// Selecting the already-selected day is a no-op returning an empty set.
    ///
    /// # Errors
    /// - `DayOutOfRange` when no week owns `date`.
    pub fn select_day(&mut self, date: NaiveDate) -> ModelResult<BTreeSet<usize>> {
        let new_week = self
            .find_week_index(date)
            .ok_or(ModelError::DayOutOfRange(date))?;
        if self.selected == Some(date) {
            return Ok(BTreeSet::new());
        }

        let mut redraw = self.clear_selection();
        if let Some(day) = self.weeks[new_week].day_mut(date) {
            day.selected = true;
        }
        self.selected = Some(date);
        redraw.insert(new_week);

        debug!(
            "event=day_selected module=model status=ok date={date} redraw={}",
            redraw.len()
        );
        Ok(redraw)
    }

    /// Clears the selection and returns the week row to redraw, if any.
    pub fn clear_selection(&mut self) -> BTreeSet<usize> {
        let mut redraw = BTreeSet::new();
        if let Some(previous) = self.selected.take() {
            if let Some(week) = self.find_week_index(previous) {
                if let Some(day) = self.weeks[week].day_mut(previous) {
                    day.selected = false;
                }
                redraw.insert(week);
            }
        }
        redraw
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    /// Flat agenda ordering.
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn event(&self, position: usize) -> Option<&CalendarEvent> {
        self.events.get(position)
    }

    /// All days in grid order.
    pub fn days(&self) -> impl Iterator<Item = &Day> + '_ {
        self.weeks.iter().flat_map(|week| week.days.iter())
    }

    pub fn day(&self, date: NaiveDate) -> Option<&Day> {
        let index = self.find_week_index(date)?;
        self.weeks[index].day(date)
    }

    pub fn selected_day(&self) -> Option<&Day> {
        self.selected.and_then(|date| self.day(date))
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.weeks.first().map(Week::first_date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.weeks.last().map(Week::last_date)
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Incremented on every agenda row replacement.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Sets the badge flag of one day.
    pub fn set_badge(&mut self, date: NaiveDate, show_badge: bool) -> ModelResult<()> {
        let day = self.day_mut(date).ok_or(ModelError::DayOutOfRange(date))?;
        day.show_badge = show_badge;
        Ok(())
    }

    fn day_mut(&mut self, date: NaiveDate) -> Option<&mut Day> {
        let index = self.find_week_index(date)?;
        self.weeks[index].day_mut(date)
    }

    /// Flat day slot (week * 7 + weekday offset) of `date`.
    fn slot_of(&self, date: NaiveDate) -> Option<usize> {
        let index = self.find_week_index(date)?;
        let offset = (date - self.weeks[index].first_date()).num_days();
        usize::try_from(offset)
            .ok()
            .map(|offset| index * DAYS_PER_WEEK + offset)
    }
}
