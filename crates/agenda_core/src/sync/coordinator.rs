//! Synchronization coordinator between the weeks grid and the agenda list.
//!
//! # Responsibility
//! - Own the calendar model and both view indices.
//! - Translate bus inputs from one view into commands for the other.
//! - Notify the host picker controller about user-driven changes.
//!
//! # Invariants
//! - Every event is applied to the model and indices before subscribers see
//!   it, and before the next queued event is processed.
//! - Scroll commands are idempotent: a request for the position a view is
//!   already at, or already heading to, emits nothing.
//! - While an agenda scroll is in flight, section changes for other days are
//!   ignored so the views never chase each other.

use crate::index::agenda::AgendaIndex;
use crate::index::week::WeekIndex;
use crate::model::calendar::CalendarModel;
use crate::model::day::Day;
use crate::model::event::{CalendarEvent, PlaceholderFactory, TitledPlaceholder};
use crate::sync::bus::{BusSender, EventBus, SubscriberResult, Subscription};
use crate::sync::events::SyncEvent;
use chrono::NaiveDate;
use log::{debug, info, warn};

/// Host callbacks for user-driven calendar changes.
pub trait CalendarPickerController {
    /// A day cell was tapped.
    fn on_day_selected(&mut self, day: &Day);
    /// An agenda row was tapped.
    fn on_event_selected(&mut self, event: &CalendarEvent);
    /// Scrolling the agenda moved the selection to `date`.
    fn on_scroll_to_date(&mut self, date: NaiveDate);
}

/// Requested vs reported position of one scrolling view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ScrollTracker {
    reported: Option<usize>,
    requested: Option<usize>,
}

impl ScrollTracker {
    /// Records a request; returns `false` when it would be a no-op.
    fn request(&mut self, target: usize) -> bool {
        let heading_there = self.requested == Some(target);
        let already_there = self.requested.is_none() && self.reported == Some(target);
        if heading_there || already_there {
            return false;
        }
        self.requested = Some(target);
        true
    }

    fn report(&mut self, position: usize) {
        self.reported = Some(position);
        if self.requested == Some(position) {
            self.requested = None;
        }
    }

    fn cancel(&mut self) {
        self.requested = None;
    }

    fn in_flight(&self) -> Option<usize> {
        self.requested
    }
}

/// Owner of the model and the rules keeping both views in sync.
pub struct SyncCoordinator {
    model: CalendarModel,
    agenda: AgendaIndex,
    weeks: WeekIndex,
    bus: EventBus,
    controller: Option<Box<dyn CalendarPickerController>>,
    placeholders: Box<dyn PlaceholderFactory>,
    agenda_scroll: ScrollTracker,
    weeks_scroll: ScrollTracker,
    weeks_expanded: bool,
    weeks_view_enabled: bool,
    scrolled_to_today: bool,
    torn_down: bool,
}

impl SyncCoordinator {
    /// Coordinator over `model`, delivering on `bus`.
    pub fn new(model: CalendarModel, bus: EventBus) -> Self {
        let agenda = AgendaIndex::build(&model);
        let weeks = WeekIndex::new(&model);
        Self {
            model,
            agenda,
            weeks,
            bus,
            controller: None,
            placeholders: Box::new(TitledPlaceholder::default()),
            agenda_scroll: ScrollTracker::default(),
            weeks_scroll: ScrollTracker::default(),
            weeks_expanded: false,
            weeks_view_enabled: true,
            scrolled_to_today: false,
            torn_down: false,
        }
    }

    pub fn with_controller(mut self, controller: Box<dyn CalendarPickerController>) -> Self {
        self.controller = Some(controller);
        self
    }

    pub fn with_placeholders(mut self, placeholders: Box<dyn PlaceholderFactory>) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// Disables expand/collapse commands when the weeks grid is hidden.
    pub fn with_weeks_view_enabled(mut self, enabled: bool) -> Self {
        self.weeks_view_enabled = enabled;
        self
    }

    pub fn model(&self) -> &CalendarModel {
        &self.model
    }

    pub fn agenda_index(&self) -> &AgendaIndex {
        &self.agenda
    }

    pub fn week_index(&self) -> &WeekIndex {
        &self.weeks
    }

    /// Restricts the weeks grid to a window of model weeks.
    pub fn set_week_window(&mut self, first: usize, len: usize) {
        self.weeks.set_window(&self.model, first, len);
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn sender(&self) -> BusSender {
        self.bus.sender()
    }

    pub fn subscribe(
        &self,
        label: impl Into<String>,
        callback: impl FnMut(&SyncEvent) -> SubscriberResult + 'static,
    ) -> Subscription {
        self.bus.subscribe(label, callback)
    }

    pub fn is_weeks_expanded(&self) -> bool {
        self.weeks_expanded
    }

    /// Enqueues `event` and processes the queue until it is empty.
    ///
    /// Returns the number of events processed.
    pub fn dispatch(&mut self, event: SyncEvent) -> usize {
        if self.torn_down {
            warn!(
                "event=dispatch module=sync status=ignored kind={} reason=torn_down",
                event.name()
            );
            return 0;
        }
        self.bus.publish(event);
        self.run_pending()
    }

    /// Processes queued events, including those sent by subscribers while
    /// delivering.
    pub fn run_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Some(event) = self.bus.next_event() {
            if self.torn_down {
                break;
            }
            self.apply(&event);
            let report = self.bus.deliver(&event);
            debug!(
                "event=dispatched module=sync status=ok kind={} delivered={} failed={}",
                event.name(),
                report.delivered,
                report.failed
            );
            processed += 1;
        }
        processed
    }

    /// Agenda list reports the position at the top of its viewport.
    pub fn report_agenda_top(&mut self, position: usize) {
        self.agenda_scroll.report(position);
    }

    /// Weeks grid reports the row at its top.
    pub fn report_weeks_top(&mut self, row: usize) {
        self.weeks_scroll.report(row);
        self.weeks.set_current_row(row);
    }

    /// Sticky header of the agenda moved to the section owning `position`.
    ///
    /// Returns the number of events processed.
    pub fn sticky_header_changed(&mut self, position: usize) -> usize {
        let Some(day) = self.agenda.section_of(position) else {
            debug!(
                "event=sticky_header_changed module=sync status=ignored position={position} reason=out_of_range"
            );
            return 0;
        };
        self.report_agenda_top(position);
        self.dispatch(SyncEvent::AgendaSectionChanged(day))
    }

    /// Re-indexes the agenda after the model rows changed and announces it.
    ///
    /// The first refresh also scrolls both views to today.
    pub fn refresh_agenda(&mut self) {
        self.agenda = AgendaIndex::build(&self.model);
        self.weeks.sync_with(&self.model);
        self.agenda_scroll = ScrollTracker::default();
        self.bus.publish(SyncEvent::AgendaRefreshed {
            revision: self.model.revision(),
            rows: self.agenda.len(),
        });

        if !self.scrolled_to_today {
            self.scrolled_to_today = true;
            let today = self.model.today();
            self.scroll_agenda_to(today);
            if let Some(row) = self.weeks.row_of(&self.model, today) {
                self.scroll_weeks_to(row);
            }
        }
    }

    /// Unsubscribes every listener and stops processing events.
    pub fn teardown(&mut self) {
        self.bus.unsubscribe_all();
        self.bus.clear_pending();
        self.torn_down = true;
        info!("event=coordinator_teardown module=sync status=ok");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn apply(&mut self, event: &SyncEvent) {
        match event {
            SyncEvent::DayTapped(date) => self.on_day_tapped(*date),
            SyncEvent::AgendaSectionChanged(date) => self.on_agenda_section_changed(*date),
            SyncEvent::AgendaTouched => {
                self.agenda_scroll.cancel();
                self.set_weeks_expanded(false);
            }
            SyncEvent::EventsReady(events) => {
                self.model
                    .attach_events(events.clone(), self.placeholders.as_ref());
                self.refresh_agenda();
            }
            SyncEvent::AgendaEventTapped(position) => self.on_agenda_event_tapped(*position),
            SyncEvent::TodayRequested => {
                let today = self.model.today();
                self.scroll_agenda_to(today);
            }
            SyncEvent::ScrollAgendaTo { .. }
            | SyncEvent::ScrollWeeksTo { .. }
            | SyncEvent::ExpandWeeksView
            | SyncEvent::CollapseWeeksView
            | SyncEvent::AgendaRefreshed { .. }
            | SyncEvent::WeekRowsInvalidated(_) => {}
        }
    }

    fn on_day_tapped(&mut self, date: NaiveDate) {
        if !self.select(date) {
            return;
        }
        if let (Some(controller), Some(day)) = (self.controller.as_mut(), self.model.day(date)) {
            controller.on_day_selected(day);
        }
        self.scroll_agenda_to(date);
    }

    fn on_agenda_section_changed(&mut self, date: NaiveDate) {
        if let Some(target) = self.agenda_scroll.in_flight() {
            if self.agenda.section_of(target) != Some(date) {
                debug!(
                    "event=section_changed module=sync status=ignored date={date} reason=scroll_in_flight"
                );
                return;
            }
            self.agenda_scroll.report(target);
        }
        if !self.select(date) {
            return;
        }
        self.track_agenda_section(date);
        if let Some(row) = self.weeks.row_of(&self.model, date) {
            self.scroll_weeks_to(row);
        }
        self.set_weeks_expanded(true);
        if let Some(controller) = self.controller.as_mut() {
            controller.on_scroll_to_date(date);
        }
    }

    /// Keeps the reported agenda position inside the section at the top.
    fn track_agenda_section(&mut self, date: NaiveDate) {
        let reported_day = self
            .agenda_scroll
            .reported
            .and_then(|position| self.agenda.section_of(position));
        if reported_day == Some(date) {
            return;
        }
        if let Ok(position) = self.agenda.position_of_first(date) {
            self.agenda_scroll.report(position);
        }
    }

    fn on_agenda_event_tapped(&mut self, position: usize) {
        match (self.controller.as_mut(), self.model.event(position)) {
            (Some(controller), Some(event)) => controller.on_event_selected(event),
            (_, None) => warn!(
                "event=agenda_event_tapped module=sync status=ignored position={position} reason=out_of_range"
            ),
            (None, Some(_)) => {}
        }
    }

    /// Moves the selection; returns `false` when `date` is outside the model.
    fn select(&mut self, date: NaiveDate) -> bool {
        match self.weeks.on_day_selected(&mut self.model, date) {
            Ok(rows) => {
                if !rows.is_empty() {
                    self.bus.publish(SyncEvent::WeekRowsInvalidated(rows));
                }
                true
            }
            Err(err) => {
                warn!("event=select_day module=sync status=ignored error={err}");
                false
            }
        }
    }

    /// Requests an agenda scroll to `date`, falling back to today when the
    /// day has no rows.
    fn scroll_agenda_to(&mut self, date: NaiveDate) {
        let (day, position) = match self.agenda.position_of_first(date) {
            Ok(position) => (date, position),
            Err(err) => {
                let today = self.model.today();
                warn!(
                    "event=scroll_agenda module=sync status=fallback error={err} fallback={today}"
                );
                match self.agenda.position_of_first(today) {
                    Ok(position) => (today, position),
                    Err(err) => {
                        warn!("event=scroll_agenda module=sync status=skipped error={err}");
                        return;
                    }
                }
            }
        };

        if self.agenda_scroll.request(position) {
            self.bus
                .publish_latest(SyncEvent::ScrollAgendaTo { day, position });
        } else {
            debug!(
                "event=scroll_agenda module=sync status=noop day={day} position={position}"
            );
        }
    }

    fn scroll_weeks_to(&mut self, row: usize) {
        if self.weeks_scroll.request(row) {
            self.bus.publish_latest(SyncEvent::ScrollWeeksTo { week: row });
        } else {
            debug!("event=scroll_weeks module=sync status=noop row={row}");
        }
    }

    fn set_weeks_expanded(&mut self, expanded: bool) {
        if !self.weeks_view_enabled {
            return;
        }
        self.weeks_expanded = expanded;
        self.bus.publish(if expanded {
            SyncEvent::ExpandWeeksView
        } else {
            SyncEvent::CollapseWeeksView
        });
    }
}
