//! Renderer registry: event type to rendering strategy.
//!
//! # Responsibility
//! - Keep ordered (matcher, renderer) bindings plus one default renderer.
//! - Resolve the renderer of an event and its list view type.
//!
//! # Invariants
//! - Resolution follows registration order; the first accepting binding wins.
//! - The default renderer is tried last and accepts every event, so
//!   resolution never fails.

use crate::model::event::{CalendarEvent, EventKind};
use crate::render::default::DefaultEventRenderer;
use crate::render::RenderedRow;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Row layout identity used by the agenda list to recycle row views.
///
/// A recycled row whose key differs from the resolved renderer's key must be
/// re-created; a matching key only needs re-rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutKey(String);

impl LayoutKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Pluggable strategy drawing one agenda row.
pub trait EventRenderer {
    /// Diagnostic name used in logs.
    fn name(&self) -> &str;
    fn layout_key(&self) -> LayoutKey;
    fn render(&self, event: &CalendarEvent) -> RenderedRow;
}

/// Predicate deciding whether a binding handles an event.
#[derive(Clone)]
pub enum EventMatcher {
    /// Accepts every event.
    Any,
    /// Accepts events whose kind is this kind or descends from it.
    Kind(EventKind),
    /// Accepts events for which the closure returns `true`.
    Predicate(Arc<dyn Fn(&CalendarEvent) -> bool>),
}

impl EventMatcher {
    pub fn kind(kind: impl Into<EventKind>) -> Self {
        Self::Kind(kind.into())
    }

    pub fn predicate(predicate: impl Fn(&CalendarEvent) -> bool + 'static) -> Self {
        Self::Predicate(Arc::new(predicate))
    }

    pub fn accepts(&self, event: &CalendarEvent) -> bool {
        match self {
            Self::Any => true,
            Self::Kind(kind) => event.kind.is_a(kind),
            Self::Predicate(predicate) => predicate(event),
        }
    }
}

impl Debug for EventMatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "Any"),
            Self::Kind(kind) => write!(f, "Kind({})", kind.as_str()),
            Self::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

/// One registered (matcher, renderer) pair.
#[derive(Clone)]
pub struct RendererBinding {
    pub matcher: EventMatcher,
    pub renderer: Arc<dyn EventRenderer>,
}

impl RendererBinding {
    pub fn new(matcher: EventMatcher, renderer: Arc<dyn EventRenderer>) -> Self {
        Self { matcher, renderer }
    }

    pub fn for_kind(kind: impl Into<EventKind>, renderer: Arc<dyn EventRenderer>) -> Self {
        Self::new(EventMatcher::kind(kind), renderer)
    }
}

impl Debug for RendererBinding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererBinding")
            .field("matcher", &self.matcher)
            .field("renderer", &self.renderer.name())
            .finish()
    }
}

/// Ordered renderer bindings with a catch-all default.
pub struct RendererRegistry {
    bindings: Vec<RendererBinding>,
    default: Arc<dyn EventRenderer>,
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::with_default(Arc::new(DefaultEventRenderer))
    }
}

impl Debug for RendererRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("bindings", &self.bindings)
            .field("default", &self.default.name())
            .finish()
    }
}

impl RendererRegistry {
    /// Registry with only the built-in default renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose catch-all is `default`.
    pub fn with_default(default: Arc<dyn EventRenderer>) -> Self {
        Self {
            bindings: Vec::new(),
            default,
        }
    }

    /// Appends one binding after all existing ones.
    ///
    /// Broader matchers registered later never shadow earlier specific ones.
    pub fn register(&mut self, matcher: EventMatcher, renderer: Arc<dyn EventRenderer>) {
        debug!(
            "event=renderer_registered module=render status=ok renderer={} view_type={}",
            renderer.name(),
            self.bindings.len()
        );
        self.bindings.push(RendererBinding::new(matcher, renderer));
    }

    pub fn register_binding(&mut self, binding: RendererBinding) {
        self.register(binding.matcher, binding.renderer);
    }

    /// Registered bindings, excluding the default.
    pub fn bindings(&self) -> &[RendererBinding] {
        &self.bindings
    }

    pub fn default_renderer(&self) -> &Arc<dyn EventRenderer> {
        &self.default
    }

    /// Renderer for `event`: first accepting binding, else the default.
    pub fn resolve(&self, event: &CalendarEvent) -> &Arc<dyn EventRenderer> {
        self.bindings
            .iter()
            .find(|binding| binding.matcher.accepts(event))
            .map_or(&self.default, |binding| &binding.renderer)
    }

    /// Layout identity of `renderer`.
    pub fn layout_key_of(&self, renderer: &dyn EventRenderer) -> LayoutKey {
        renderer.layout_key()
    }

    /// Dense view type of `event`: binding position, default last.
    pub fn view_type_of(&self, event: &CalendarEvent) -> usize {
        self.bindings
            .iter()
            .position(|binding| binding.matcher.accepts(event))
            .unwrap_or(self.bindings.len())
    }

    /// Number of distinct view types, default included.
    pub fn view_type_count(&self) -> usize {
        self.bindings.len() + 1
    }

    /// Whether a recycled row built with `recycled` must be re-created for
    /// `event` instead of re-rendered.
    pub fn needs_recreate(&self, recycled: Option<&LayoutKey>, event: &CalendarEvent) -> bool {
        let key = self.layout_key_of(self.resolve(event).as_ref());
        recycled != Some(&key)
    }

    /// Renders `event` with its resolved renderer.
    pub fn render(&self, event: &CalendarEvent) -> RenderedRow {
        self.resolve(event).render(event)
    }
}

#[cfg(test)]
mod tests {
    use super::{EventMatcher, EventRenderer, LayoutKey, RendererRegistry};
    use crate::model::event::{CalendarEvent, EventKind};
    use crate::render::{CardStyle, RenderedRow};
    use chrono::NaiveDate;
    use std::sync::Arc;

    struct BadgeRenderer;

    impl EventRenderer for BadgeRenderer {
        fn name(&self) -> &str {
            "badge"
        }

        fn layout_key(&self) -> LayoutKey {
            LayoutKey::new("agenda_event_badge")
        }

        fn render(&self, event: &CalendarEvent) -> RenderedRow {
            RenderedRow {
                layout_key: self.layout_key(),
                title: event.title.to_uppercase(),
                location: None,
                text_color: None,
                card: CardStyle::Flat,
            }
        }
    }

    fn event(kind: &str) -> CalendarEvent {
        let date = NaiveDate::from_ymd_opt(2026, 10, 14).expect("valid date");
        CalendarEvent::all_day("standup", date).with_kind(kind)
    }

    #[test]
    fn empty_registry_resolves_to_default() {
        let registry = RendererRegistry::new();
        assert_eq!(registry.view_type_count(), 1);
        assert_eq!(registry.view_type_of(&event("base")), 0);
        assert_eq!(registry.resolve(&event("base")).name(), "default");
    }

    #[test]
    fn predicate_matcher_participates_in_order() {
        let mut registry = RendererRegistry::new();
        registry.register(
            EventMatcher::predicate(|event| event.attribute("badge").is_some()),
            Arc::new(BadgeRenderer),
        );

        let plain = event("base");
        let badged = event("base").with_attribute("badge", "1");
        assert_eq!(registry.resolve(&plain).name(), "default");
        assert_eq!(registry.resolve(&badged).name(), "badge");
        assert_eq!(registry.render(&badged).title, "STANDUP");
    }

    #[test]
    fn recycling_rule_compares_layout_keys() {
        let mut registry = RendererRegistry::new();
        registry.register(
            EventMatcher::Kind(EventKind::new("base.badge")),
            Arc::new(BadgeRenderer),
        );
        let badge_key = LayoutKey::new("agenda_event_badge");

        assert!(registry.needs_recreate(None, &event("base.badge")));
        assert!(!registry.needs_recreate(Some(&badge_key), &event("base.badge")));
        assert!(registry.needs_recreate(Some(&badge_key), &event("base")));
    }
}
