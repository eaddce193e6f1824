//! Week row model.

use crate::model::day::Day;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DAYS_PER_WEEK: usize = 7;

/// A fixed 7-day row of the weeks grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    /// Position of this week in the model's week sequence.
    pub row_index: usize,
    pub days: [Day; DAYS_PER_WEEK],
}

impl Week {
    /// Creates the week starting at `first_date`.
    ///
    /// Returns `None` when the last day would overflow the date range.
    pub fn new(row_index: usize, first_date: NaiveDate, today: NaiveDate) -> Option<Self> {
        let days = consecutive_dates(first_date)?;
        Some(Self {
            row_index,
            days: days.map(|date| Day::new(date, today, row_index)),
        })
    }

    pub fn first_date(&self) -> NaiveDate {
        self.days[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.days[DAYS_PER_WEEK - 1].date
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first_date() <= date && date <= self.last_date()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&Day> {
        self.days.iter().find(|day| day.date == date)
    }

    pub(crate) fn day_mut(&mut self, date: NaiveDate) -> Option<&mut Day> {
        self.days.iter_mut().find(|day| day.date == date)
    }

    /// Whether the seven days are consecutive dates.
    pub fn is_contiguous(&self) -> bool {
        self.days
            .windows(2)
            .all(|pair| pair[0].date.succ_opt() == Some(pair[1].date))
    }

    /// Month shown for this row: the month of the first day-of-month inside
    /// the week, or of the first day otherwise.
    pub fn month_label(&self) -> String {
        self.days
            .iter()
            .find(|day| day.is_first_day_of_month())
            .unwrap_or(&self.days[0])
            .month_label()
    }

    pub(crate) fn renumber(&mut self, row_index: usize) {
        self.row_index = row_index;
        for day in &mut self.days {
            day.week_index = row_index;
        }
    }
}

fn consecutive_dates(first: NaiveDate) -> Option<[NaiveDate; DAYS_PER_WEEK]> {
    let mut dates = [first; DAYS_PER_WEEK];
    for (offset, slot) in dates.iter_mut().enumerate().skip(1) {
        *slot = first.checked_add_days(Days::new(offset as u64))?;
    }
    Some(dates)
}
