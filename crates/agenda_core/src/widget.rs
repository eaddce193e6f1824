//! Host-facing agenda calendar facade.
//!
//! # Responsibility
//! - Build the model, renderer registry and coordinator from host input.
//! - Forward view reports to the coordinator and serve agenda rows.
//!
//! # Invariants
//! - Initialization either yields a fully indexed widget or an error; there is
//!   no partially built widget.
//! - After `teardown` every input is ignored and no listener is called again.

use crate::config::{AgendaCalendarConfig, ConfigError};
use crate::index::agenda::HeaderId;
use crate::model::calendar::{CalendarModel, ModelError};
use crate::model::day::Day;
use crate::model::event::{CalendarEvent, TitledPlaceholder};
use crate::model::locale::Locale;
use crate::model::week::Week;
use crate::render::registry::{RendererBinding, RendererRegistry};
use crate::render::RenderedRow;
use crate::sync::bus::{BusSender, EventBus, SubscriberResult, Subscription};
use crate::sync::coordinator::{CalendarPickerController, SyncCoordinator};
use crate::sync::events::SyncEvent;
use chrono::NaiveDate;
use log::info;
use thiserror::Error;

/// Widget initialization errors.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Config(ConfigError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl From<ConfigError> for WidgetError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Range(err) => Self::Model(err),
            other => Self::Config(other),
        }
    }
}

pub type WidgetResult<T> = Result<T, WidgetError>;

/// Agenda calendar: weeks grid and agenda list kept in sync.
pub struct AgendaCalendar {
    coordinator: SyncCoordinator,
    registry: RendererRegistry,
    floating_indicator_enabled: bool,
}

impl AgendaCalendar {
    /// Builds the widget on a private bus and attaches `events`.
    pub fn init(
        config: &AgendaCalendarConfig,
        events: Vec<CalendarEvent>,
        controller: Option<Box<dyn CalendarPickerController>>,
        renderers: Vec<RendererBinding>,
    ) -> WidgetResult<Self> {
        Self::init_with_bus(config, EventBus::new(), events, controller, renderers)
    }

    /// Builds the widget on `bus` and attaches `events`.
    ///
    /// Subscribers already on `bus` observe the initial refresh and the
    /// scroll to today.
    pub fn init_with_bus(
        config: &AgendaCalendarConfig,
        bus: EventBus,
        events: Vec<CalendarEvent>,
        controller: Option<Box<dyn CalendarPickerController>>,
        renderers: Vec<RendererBinding>,
    ) -> WidgetResult<Self> {
        config.validate()?;
        let locale = config.resolve_locale()?;
        let model = CalendarModel::build_with_today(
            config.min_date,
            config.max_date,
            locale,
            config.today(),
        )?;

        let coordinator = SyncCoordinator::new(model, bus)
            .with_placeholders(Box::new(TitledPlaceholder::new(
                config.placeholder_title.clone(),
            )))
            .with_weeks_view_enabled(config.calendar_view_enabled);
        let mut widget = Self::assemble(coordinator, controller, renderers);
        widget.floating_indicator_enabled = config.floating_indicator_enabled;
        widget.coordinator.dispatch(SyncEvent::EventsReady(events));

        info!(
            "event=widget_init module=widget status=ok weeks={} rows={}",
            widget.model().weeks().len(),
            widget.row_count()
        );
        Ok(widget)
    }

    /// Builds the widget from a host-computed grid and per-day event list.
    pub fn init_external(
        locale: Locale,
        weeks: Vec<Week>,
        days: Vec<Day>,
        events: Vec<CalendarEvent>,
        controller: Option<Box<dyn CalendarPickerController>>,
        renderers: Vec<RendererBinding>,
    ) -> WidgetResult<Self> {
        Self::init_external_with_bus(
            EventBus::new(),
            locale,
            weeks,
            days,
            events,
            controller,
            renderers,
        )
    }

    /// `init_external` on a host-provided bus.
    pub fn init_external_with_bus(
        bus: EventBus,
        locale: Locale,
        weeks: Vec<Week>,
        days: Vec<Day>,
        events: Vec<CalendarEvent>,
        controller: Option<Box<dyn CalendarPickerController>>,
        renderers: Vec<RendererBinding>,
    ) -> WidgetResult<Self> {
        let model = CalendarModel::load_external(weeks, days, events, locale)?;
        let mut widget = Self::assemble(SyncCoordinator::new(model, bus), controller, renderers);
        widget.coordinator.refresh_agenda();
        widget.coordinator.run_pending();

        info!(
            "event=widget_init_external module=widget status=ok weeks={} rows={}",
            widget.model().weeks().len(),
            widget.row_count()
        );
        Ok(widget)
    }

    fn assemble(
        coordinator: SyncCoordinator,
        controller: Option<Box<dyn CalendarPickerController>>,
        renderers: Vec<RendererBinding>,
    ) -> Self {
        let coordinator = match controller {
            Some(controller) => coordinator.with_controller(controller),
            None => coordinator,
        };
        let mut registry = RendererRegistry::new();
        for binding in renderers {
            registry.register_binding(binding);
        }
        Self {
            coordinator,
            registry,
            floating_indicator_enabled: true,
        }
    }

    pub fn model(&self) -> &CalendarModel {
        self.coordinator.model()
    }

    pub fn coordinator(&self) -> &SyncCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut SyncCoordinator {
        &mut self.coordinator
    }

    pub fn registry(&self) -> &RendererRegistry {
        &self.registry
    }

    /// Whether the host should show the floating "today" button.
    pub fn floating_indicator_enabled(&self) -> bool {
        self.floating_indicator_enabled
    }

    /// Enqueue-only handle for views.
    pub fn sender(&self) -> BusSender {
        self.coordinator.sender()
    }

    pub fn subscribe(
        &self,
        label: impl Into<String>,
        callback: impl FnMut(&SyncEvent) -> SubscriberResult + 'static,
    ) -> Subscription {
        self.coordinator.subscribe(label, callback)
    }

    pub fn day_tapped(&mut self, date: NaiveDate) -> usize {
        self.coordinator.dispatch(SyncEvent::DayTapped(date))
    }

    pub fn agenda_touched(&mut self) -> usize {
        self.coordinator.dispatch(SyncEvent::AgendaTouched)
    }

    pub fn sticky_header_changed(&mut self, position: usize) -> usize {
        self.coordinator.sticky_header_changed(position)
    }

    pub fn event_tapped(&mut self, position: usize) -> usize {
        self.coordinator.dispatch(SyncEvent::AgendaEventTapped(position))
    }

    pub fn today_requested(&mut self) -> usize {
        self.coordinator.dispatch(SyncEvent::TodayRequested)
    }

    /// Replaces the source events and rebuilds the agenda.
    pub fn replace_events(&mut self, events: Vec<CalendarEvent>) -> usize {
        self.coordinator.dispatch(SyncEvent::EventsReady(events))
    }

    /// Processes events queued through `sender` handles.
    pub fn run_pending(&mut self) -> usize {
        self.coordinator.run_pending()
    }

    pub fn report_agenda_top(&mut self, position: usize) {
        self.coordinator.report_agenda_top(position);
    }

    pub fn report_weeks_top(&mut self, row: usize) {
        self.coordinator.report_weeks_top(row);
    }

    /// Number of agenda rows.
    pub fn row_count(&self) -> usize {
        self.coordinator.agenda_index().len()
    }

    /// Renders the agenda row at `position`.
    pub fn render_row(&self, position: usize) -> Option<RenderedRow> {
        self.model()
            .event(position)
            .map(|event| self.registry.render(event))
    }

    /// View type of the agenda row at `position`.
    pub fn view_type_of(&self, position: usize) -> Option<usize> {
        self.model()
            .event(position)
            .map(|event| self.registry.view_type_of(event))
    }

    pub fn header_id_of(&self, position: usize) -> Option<HeaderId> {
        self.coordinator.agenda_index().header_id_of(position)
    }

    pub fn section_of(&self, position: usize) -> Option<NaiveDate> {
        self.coordinator.agenda_index().section_of(position)
    }

    /// Weeks grid header labels.
    pub fn weekday_labels(&self) -> [String; 7] {
        self.coordinator.week_index().weekday_labels(self.model())
    }

    /// Unsubscribes every listener and stops processing input.
    pub fn teardown(&mut self) {
        self.coordinator.teardown();
    }

    pub fn is_torn_down(&self) -> bool {
        self.coordinator.is_torn_down()
    }
}
