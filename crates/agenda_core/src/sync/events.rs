//! Bus event vocabulary shared with the view layer.

use crate::model::event::CalendarEvent;
use chrono::NaiveDate;

/// Events flowing on the synchronization bus.
///
/// Inputs are reported by views or the host; commands are emitted by the
/// coordinator for the views to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Input: a day cell of the weeks grid was tapped.
    DayTapped(NaiveDate),
    /// Input: the agenda scrolled past a section boundary into `day`.
    AgendaSectionChanged(NaiveDate),
    /// Input: the user touched the agenda list.
    AgendaTouched,
    /// Input: a new source event list is available.
    EventsReady(Vec<CalendarEvent>),
    /// Input: the agenda row at `position` was tapped.
    AgendaEventTapped(usize),
    /// Input: the floating "today" indicator was pressed.
    TodayRequested,
    /// Command: scroll the agenda so `position` (first row of `day`) is on top.
    ScrollAgendaTo { day: NaiveDate, position: usize },
    /// Command: scroll the weeks grid so row `week` is on top.
    ScrollWeeksTo { week: usize },
    /// Command: show more rows of the weeks grid.
    ExpandWeeksView,
    /// Command: show the compact weeks grid.
    CollapseWeeksView,
    /// Command: the agenda rows were replaced; rebind the list.
    AgendaRefreshed { revision: u64, rows: usize },
    /// Command: redraw these weeks grid rows.
    WeekRowsInvalidated(Vec<usize>),
}

impl SyncEvent {
    /// Stable name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DayTapped(_) => "day_tapped",
            Self::AgendaSectionChanged(_) => "agenda_section_changed",
            Self::AgendaTouched => "agenda_touched",
            Self::EventsReady(_) => "events_ready",
            Self::AgendaEventTapped(_) => "agenda_event_tapped",
            Self::TodayRequested => "today_requested",
            Self::ScrollAgendaTo { .. } => "scroll_agenda_to",
            Self::ScrollWeeksTo { .. } => "scroll_weeks_to",
            Self::ExpandWeeksView => "expand_weeks_view",
            Self::CollapseWeeksView => "collapse_weeks_view",
            Self::AgendaRefreshed { .. } => "agenda_refreshed",
            Self::WeekRowsInvalidated(_) => "week_rows_invalidated",
        }
    }

    /// Whether the coordinator emits this event for the views.
    pub fn is_command(&self) -> bool {
        matches!(
            self,
            Self::ScrollAgendaTo { .. }
                | Self::ScrollWeeksTo { .. }
                | Self::ExpandWeeksView
                | Self::CollapseWeeksView
                | Self::AgendaRefreshed { .. }
                | Self::WeekRowsInvalidated(_)
        )
    }

    /// Whether a pending `self` is made obsolete by a newer `other`.
    pub(crate) fn is_superseded_by(&self, other: &SyncEvent) -> bool {
        matches!(
            (self, other),
            (Self::ScrollAgendaTo { .. }, Self::ScrollAgendaTo { .. })
                | (Self::ScrollWeeksTo { .. }, Self::ScrollWeeksTo { .. })
        )
    }
}
