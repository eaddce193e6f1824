//! Day cell model.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One date cell of the weeks grid and the grouping key of agenda sections.
///
/// `selected` is only flipped through `CalendarModel::select_day`, which keeps
/// at most one selected day across the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    pub is_today: bool,
    #[serde(default)]
    pub selected: bool,
    /// Host-controlled marker drawn under the day number.
    #[serde(default)]
    pub show_badge: bool,
    /// Row index of the owning week.
    #[serde(default)]
    pub week_index: usize,
}

impl Day {
    pub fn new(date: NaiveDate, today: NaiveDate, week_index: usize) -> Self {
        Self {
            date,
            is_today: date == today,
            selected: false,
            show_badge: false,
            week_index,
        }
    }

    pub fn day_of_month(&self) -> u32 {
        self.date.day()
    }

    /// Month boundaries get a month label in the grid.
    pub fn is_first_day_of_month(&self) -> bool {
        self.date.day() == 1
    }

    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.date < today
    }

    /// Abbreviated month name, e.g. `Oct`.
    pub fn month_label(&self) -> String {
        self.date.format("%b").to_string()
    }
}
