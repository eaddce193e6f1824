//! Built-in agenda row renderer.

use crate::model::event::CalendarEvent;
use crate::render::registry::{EventRenderer, LayoutKey};
use crate::render::{CardStyle, RenderedRow};

/// Layout key of the built-in row.
pub const DEFAULT_EVENT_LAYOUT: &str = "agenda_event";

/// Default row: title, optional location line, colored card.
///
/// Placeholder rows get a flat transparent card and keep the list's default
/// text color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultEventRenderer;

impl EventRenderer for DefaultEventRenderer {
    fn name(&self) -> &str {
        "default"
    }

    fn layout_key(&self) -> LayoutKey {
        LayoutKey::new(DEFAULT_EVENT_LAYOUT)
    }

    fn render(&self, event: &CalendarEvent) -> RenderedRow {
        let location = (!event.location.is_empty()).then(|| event.location.clone());
        if event.placeholder {
            return RenderedRow {
                layout_key: self.layout_key(),
                title: event.title.clone(),
                location,
                text_color: None,
                card: CardStyle::Flat,
            };
        }

        RenderedRow {
            layout_key: self.layout_key(),
            title: event.title.clone(),
            location,
            text_color: Some(event.text_color),
            card: CardStyle::Filled {
                background: event.color,
            },
        }
    }
}
