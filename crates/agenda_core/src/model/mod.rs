//! Date-indexed calendar model.
//!
//! # Responsibility
//! - Define days, weeks and agenda events shared by both views.
//! - Keep selection and agenda ordering consistent inside one owner.
//!
//! # Invariants
//! - Events only reference days owned by the model's weeks.
//! - Mutation goes through `CalendarModel` methods; indices only read.

pub mod calendar;
pub mod day;
pub mod event;
pub mod locale;
pub mod week;
