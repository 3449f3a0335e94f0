//! Input bindings: raw mouse, touch and wheel events mapped to gallery actions.
//!
//! # Invariants
//! - The controller consumes actions, never raw window events.
//! - Mouse and touch share one pointer path; only the first touch drives a drag.
//! - A detached tracker produces no actions.

pub mod action;
pub mod debounce;
pub mod pointer;

pub use action::{Action, PixelDelta, WheelDelta};
pub use debounce::Debouncer;
pub use pointer::{PointerTracker, TouchPhase};

pub fn crate_info() -> &'static str {
    "gallery-input v0.1.0"
}
