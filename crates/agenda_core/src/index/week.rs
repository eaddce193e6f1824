//! Weeks grid addressing and selection.

use crate::model::calendar::{CalendarModel, ModelResult};
use crate::model::week::Week;
use chrono::NaiveDate;
use log::debug;

/// Row addressing over the displayed window of model weeks.
///
/// Rows are window-relative: row 0 is the first displayed week.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekIndex {
    window_start: usize,
    window_len: usize,
    current_row: Option<usize>,
}

impl WeekIndex {
    /// Index displaying every week of `model`.
    pub fn new(model: &CalendarModel) -> Self {
        Self {
            window_start: 0,
            window_len: model.weeks().len(),
            current_row: None,
        }
    }

    /// Restricts the displayed rows to `len` weeks starting at model week
    /// `first`, clamped to the model.
    pub fn set_window(&mut self, model: &CalendarModel, first: usize, len: usize) {
        let total = model.weeks().len();
        self.window_start = first.min(total);
        self.window_len = len.min(total - self.window_start);
        if self.current_row.is_some_and(|row| row >= self.window_len) {
            self.current_row = None;
        }
    }

    /// Re-clamps the window after the model changed.
    pub fn sync_with(&mut self, model: &CalendarModel) {
        let (first, len) = (self.window_start, self.window_len);
        self.set_window(model, first, len);
    }

    /// Displayed row of the week containing `date`.
    pub fn row_of(&self, model: &CalendarModel, date: NaiveDate) -> Option<usize> {
        model
            .find_week_index(date)
            .and_then(|week| self.row_of_week(week))
    }

    /// Window-relative row of model week `week`.
    pub fn row_of_week(&self, week: usize) -> Option<usize> {
        week.checked_sub(self.window_start)
            .filter(|row| *row < self.window_len)
    }

    /// Model week shown at `row`.
    pub fn week_of_row(&self, row: usize) -> Option<usize> {
        (row < self.window_len).then_some(self.window_start + row)
    }

    /// Selects `date` and returns the displayed rows to redraw.
    ///
    /// Rows outside the window are not reported. The selected row becomes the
    /// current row.
    pub fn on_day_selected(
        &mut self,
        model: &mut CalendarModel,
        date: NaiveDate,
    ) -> ModelResult<Vec<usize>> {
        let weeks = model.select_day(date)?;
        let rows: Vec<usize> = weeks
            .into_iter()
            .filter_map(|week| self.row_of_week(week))
            .collect();
        if let Some(row) = self.row_of(model, date) {
            self.current_row = Some(row);
        }
        debug!(
            "event=week_rows_invalidated module=weeks status=ok date={date} rows={rows:?}"
        );
        Ok(rows)
    }

    /// Displayed weeks.
    pub fn rows<'m>(&self, model: &'m CalendarModel) -> &'m [Week] {
        let end = (self.window_start + self.window_len).min(model.weeks().len());
        model.weeks().get(self.window_start..end).unwrap_or(&[])
    }

    /// Row the grid was last moved to.
    pub fn current_row(&self) -> Option<usize> {
        self.current_row
    }

    pub fn set_current_row(&mut self, row: usize) {
        if row < self.window_len {
            self.current_row = Some(row);
        }
    }

    pub fn len(&self) -> usize {
        self.window_len
    }

    pub fn is_empty(&self) -> bool {
        self.window_len == 0
    }

    /// Grid header labels in display order.
    pub fn weekday_labels(&self, model: &CalendarModel) -> [String; 7] {
        model.locale().weekday_labels()
    }
}
