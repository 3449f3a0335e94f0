//! Developer Tooling: read-only gallery inspection.
//!
//! # Invariants
//! - Tools never mutate gallery state.

mod inspector;

pub use inspector::{GalleryInspector, GallerySummary, ItemInfo};

pub fn crate_info() -> &'static str {
    "gallery-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
