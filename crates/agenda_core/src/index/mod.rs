//! Read-only view addressing over the calendar model.
//!
//! # Responsibility
//! - Translate agenda positions and grid rows to days and back.
//!
//! # Invariants
//! - Indices never mutate the model directly; selection changes go through
//!   `CalendarModel::select_day`.

pub mod agenda;
pub mod week;
