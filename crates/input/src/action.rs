use gallery_common::Screen;
use glam::Vec2;

/// Pixels per wheel "line" step.
const LINE_HEIGHT: f32 = 40.0;
/// Pixels per wheel "page" step.
const PAGE_HEIGHT: f32 = 800.0;

/// A wheel delta in pixels. Positive `pixel_y` scrolls content down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelDelta {
    pub pixel_x: f32,
    pub pixel_y: f32,
}

impl PixelDelta {
    pub fn new(pixel_x: f32, pixel_y: f32) -> Self {
        Self { pixel_x, pixel_y }
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.pixel_x, self.pixel_y)
    }
}

/// A raw wheel delta as reported by the platform, in its native unit.
///
/// Sign convention follows the DOM: positive `y` means the wheel moved down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelDelta {
    Pixels { x: f32, y: f32 },
    Lines { x: f32, y: f32 },
    Pages { x: f32, y: f32 },
}

impl WheelDelta {
    /// Normalize to a per-axis pixel delta.
    pub fn normalize(self) -> PixelDelta {
        match self {
            WheelDelta::Pixels { x, y } => PixelDelta::new(x, y),
            WheelDelta::Lines { x, y } => PixelDelta::new(x * LINE_HEIGHT, y * LINE_HEIGHT),
            WheelDelta::Pages { x, y } => PixelDelta::new(x * PAGE_HEIGHT, y * PAGE_HEIGHT),
        }
    }
}

/// A high-level gallery action produced from raw input.
///
/// The controller consumes actions, never platform events, so mouse and
/// touch drive the same scroll logic.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A drag started at the given horizontal pointer coordinate.
    PointerDown { x: f32 },
    /// The pointer moved to the given horizontal coordinate.
    PointerMove { x: f32 },
    /// The drag ended.
    PointerUp,
    /// Normalized wheel motion.
    Wheel(PixelDelta),
    /// The window was resized.
    Resize(Screen),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_delta_passes_through() {
        let d = WheelDelta::Pixels { x: 3.0, y: 100.0 }.normalize();
        assert_eq!(d, PixelDelta::new(3.0, 100.0));
    }

    #[test]
    fn line_delta_scales_by_line_height() {
        let d = WheelDelta::Lines { x: 0.0, y: -3.0 }.normalize();
        assert_eq!(d.pixel_y, -120.0);
    }

    #[test]
    fn page_delta_scales_by_page_height() {
        let d = WheelDelta::Pages { x: 1.0, y: 1.0 }.normalize();
        assert_eq!(d.as_vec2(), Vec2::new(800.0, 800.0));
    }

    #[test]
    fn action_wheel_is_constructible() {
        let a = Action::Wheel(PixelDelta::new(0.0, 10.0));
        assert!(matches!(a, Action::Wheel(_)));
    }
}
