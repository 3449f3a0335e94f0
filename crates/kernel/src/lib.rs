//! Gallery kernel: scroll state, plane layout with infinite wraparound, and
//! the per-frame update loop.
//!
//! # Invariants
//! - Every frame renders first, then eases, derives direction, updates items
//!   in index order and commits `last`.
//! - `position_x = base_offset - current * scroll_factor - wrap_extra` for
//!   every item after each update.
//! - At most one group width of wraparound per item per frame.
//! - The kernel holds no platform handles; rendering is a callback.

pub mod camera;
pub mod frame;
pub mod gallery;
pub mod item;
pub mod scroll;

pub use camera::PerspectiveCamera;
pub use frame::FrameLoop;
pub use gallery::{DragState, Gallery};
pub use item::{Item, ItemLayout, ItemParams, PlaneUniforms};
pub use scroll::ScrollState;

pub fn crate_info() -> &'static str {
    "gallery-kernel v0.1.0"
}
