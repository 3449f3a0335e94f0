use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Window size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
}

impl Screen {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height. Zero-height screens yield a non-finite aspect.
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Visible extent of the z = 0 plane in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Frustum cross-section at `distance` for a perspective camera.
    ///
    /// `height = 2 * tan(fov / 2) * distance`, `width = height * aspect`.
    pub fn from_perspective(fov_radians: f32, distance: f32, aspect: f32) -> Self {
        let height = 2.0 * (fov_radians / 2.0).tan() * distance;
        Self {
            width: height * aspect,
            height,
        }
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Horizontal scroll direction derived once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Left,
    Right,
}

impl Direction {
    /// `Right` only when `current` is strictly greater than `last`; ties are `Left`.
    pub fn between(current: f32, last: f32) -> Self {
        if current > last {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Linear interpolation from `start` toward `end` by `t`.
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_strictly_greater_is_right() {
        assert_eq!(Direction::between(5.0, 3.0), Direction::Right);
        assert_eq!(Direction::between(3.0, 5.0), Direction::Left);
    }

    #[test]
    fn direction_tie_resolves_left() {
        assert_eq!(Direction::between(5.0, 5.0), Direction::Left);
        assert_eq!(Direction::between(5.0, 5.0).to_string(), "left");
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 10.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 10.0, 1.0), 10.0);
        assert!((lerp(0.0, 10.0, 0.05) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn viewport_from_perspective() {
        let vp = Viewport::from_perspective(90.0_f32.to_radians(), 10.0, 2.0);
        assert!((vp.height - 20.0).abs() < 1e-4);
        assert!((vp.width - 40.0).abs() < 1e-4);
    }

    #[test]
    fn screen_aspect() {
        assert_eq!(Screen::new(1600.0, 800.0).aspect(), 2.0);
    }
}
