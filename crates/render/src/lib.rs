//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read the gallery, never mutate it.
//! - Plane transforms and uniforms derive only from committed item state.
//!
//! The GPU backend lives in `gallery-render-wgpu`; the text renderer here
//! serves the CLI, logging and tests.

mod plane;
mod renderer;

pub use plane::{PlaneInstance, plane_instances};
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "gallery-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
