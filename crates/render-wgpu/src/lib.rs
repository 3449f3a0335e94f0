//! wgpu render backend for the plane gallery.
//!
//! Draws one textured quad per gallery item through a shared unit-quad mesh.
//! Each plane owns a uniform buffer (model matrix plus plane, image and
//! viewport sizes) and a texture bind group that starts as a blank 1x1
//! texture and is swapped when its image arrives.
//!
//! # Invariants
//! - Renderer never mutates gallery state.
//! - Texture uploads happen on the frame thread only.

mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;
