//! Focus objectives: a checklist per task, kept alongside the timer.

pub mod board;

pub use board::{validate_text, ObjectiveBoard};
