//! Core logic of the agenda calendar widget.
//! Views render from this crate; all calendar invariants live here.

pub mod config;
pub mod index;
pub mod logging;
pub mod model;
pub mod render;
pub mod sync;
pub mod widget;

pub use config::{AgendaCalendarConfig, ConfigError};
pub use index::agenda::{AgendaIndex, AgendaIndexError, AgendaSection, HeaderId};
pub use index::week::WeekIndex;
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::calendar::{AttachReport, CalendarModel, ModelError, ModelResult};
pub use model::day::Day;
pub use model::event::{
    CalendarEvent, EventId, EventKind, PlaceholderFactory, TitledPlaceholder,
};
pub use model::locale::{Locale, LocaleError};
pub use model::week::Week;
pub use render::default::DefaultEventRenderer;
pub use render::registry::{
    EventMatcher, EventRenderer, LayoutKey, RendererBinding, RendererRegistry,
};
pub use render::{CardStyle, RenderedRow};
pub use sync::bus::{BusSender, EventBus, SubscriberError, SubscriberResult, Subscription};
pub use sync::coordinator::{CalendarPickerController, SyncCoordinator};
pub use sync::events::SyncEvent;
pub use widget::{AgendaCalendar, WidgetError, WidgetResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
