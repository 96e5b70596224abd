//! Feature implementations for focusdesk.
//!
//! - Focus mode: the Pomodoro timer and its backend sessions
//! - Objectives: per-task checklists

pub mod focus;
pub mod objectives;
