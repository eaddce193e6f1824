//! Cross-view synchronization.
//!
//! # Responsibility
//! - Carry the sync event vocabulary on an injectable bus.
//! - Apply the rules turning one view's input into the other view's commands.
//!
//! # Invariants
//! - Single logical thread: dispatch is sequential and never re-entrant.

pub mod bus;
pub mod coordinator;
pub mod events;
