//! Pluggable agenda row rendering.
//!
//! Renderers describe a row in toolkit-neutral terms; the view layer maps a
//! `RenderedRow` onto its own widgets.

pub mod default;
pub mod registry;

use crate::render::registry::LayoutKey;
use serde::Serialize;

/// Card decoration of an agenda row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "style")]
pub enum CardStyle {
    /// Elevated card painted with an ARGB color.
    Filled { background: u32 },
    /// Transparent card without elevation.
    Flat,
}

/// Toolkit-neutral description of one rendered agenda row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    pub layout_key: LayoutKey,
    pub title: String,
    /// `None` hides the location line.
    pub location: Option<String>,
    /// `None` keeps the list's default text color.
    pub text_color: Option<u32>,
    pub card: CardStyle,
}
