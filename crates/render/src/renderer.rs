use crate::plane::plane_instances;
use gallery_kernel::Gallery;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the gallery and produces output. It never mutates
/// scroll or item state; that only changes inside `Gallery::tick`.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the gallery's committed state.
    fn render(&self, gallery: &Gallery) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable dump of scroll state and plane placement.
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug)]
pub struct DebugTextRenderer {
    /// Include planes outside the visible slice.
    pub show_hidden: bool,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self { show_hidden: true }
    }

    pub fn visible_only() -> Self {
        Self { show_hidden: false }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, gallery: &Gallery) -> String {
        let scroll = gallery.scroll();
        let viewport = gallery.viewport();
        let mut out = String::new();
        out.push_str(&format!(
            "=== Gallery (frame={}, direction={}) ===\n",
            gallery.frame(),
            gallery.direction()
        ));
        out.push_str(&format!(
            "Scroll: current={:.3} target={:.3} dragging={}\n",
            scroll.current,
            scroll.target,
            gallery.is_dragging()
        ));
        out.push_str(&format!(
            "Viewport: {:.2}x{:.2}  Planes: {}\n",
            viewport.width,
            viewport.height,
            gallery.items().len()
        ));

        for (plane, item) in plane_instances(gallery).iter().zip(gallery.items()) {
            if !plane.visible && !self.show_hidden {
                continue;
            }
            out.push_str(&format!(
                "  [{:>2}] {:<12} x={:>8.2} extra={:>8.2} {}{}\n",
                plane.index,
                item.label(),
                item.position_x(),
                item.wrap_extra(),
                if plane.visible { "visible" } else { "hidden" },
                if item.has_image() { "" } else { " (no image)" }
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_common::{GalleryConfig, Screen};
    use gallery_input::PixelDelta;

    fn gallery(count: usize) -> Gallery {
        Gallery::new(
            GalleryConfig::default(),
            (0..count).map(|i| format!("img-{i}")),
            Screen::new(1280.0, 720.0),
        )
    }

    #[test]
    fn debug_renderer_empty_gallery() {
        let g = gallery(0);
        let output = DebugTextRenderer::new().render(&g);

        assert!(output.contains("frame=0"));
        assert!(output.contains("Planes: 0"));
    }

    #[test]
    fn debug_renderer_lists_planes() {
        let mut g = gallery(4);
        g.set_image_size(0, 10, 10);
        let output = DebugTextRenderer::new().render(&g);

        assert!(output.contains("Planes: 4"));
        assert!(output.contains("img-3"));
        assert!(output.contains("(no image)"));
        assert_eq!(output.lines().count(), 3 + 4);
        assert!(output.ends_with("(no image)\n"));
    }

    #[test]
    fn visible_only_skips_hidden_planes() {
        let g = gallery(12);
        let all = DebugTextRenderer::new().render(&g);
        let visible = DebugTextRenderer::visible_only().render(&g);
        assert!(visible.lines().count() < all.lines().count());
        assert!(!visible.contains("hidden"));
    }

    #[test]
    fn render_inside_tick_sees_previous_frame() {
        let mut g = gallery(2);
        g.on_wheel(PixelDelta::new(0.0, 100.0));
        let renderer = DebugTextRenderer::new();
        let mut first = String::new();
        g.tick(|g| first = renderer.render(g));
        assert!(first.contains("current=0.000"));
        assert!(first.contains("target=5.000"));
    }
}
