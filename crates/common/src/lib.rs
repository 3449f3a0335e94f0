//! Shared types for the plane gallery: screen/viewport geometry, scroll
//! direction, configuration and small math helpers.
//!
//! # Invariants
//! - Viewport is always derived from the camera, never edited directly.
//! - Configuration is validated once at load time.

mod config;
mod types;

pub use config::{ConfigError, GalleryConfig};
pub use types::{Direction, Screen, Viewport, lerp};
