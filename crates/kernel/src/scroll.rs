use gallery_common::{Direction, lerp};

/// One-dimensional eased scroll state.
///
/// `current` chases `target` by `ease` of the remaining distance per frame.
/// `last` holds the previous frame's `current` and is only read to derive
/// the scroll direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub current: f32,
    pub target: f32,
    pub last: f32,
    pub ease: f32,
}

impl ScrollState {
    pub fn new(ease: f32) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            last: 0.0,
            ease,
        }
    }

    /// Move `current` one easing step toward `target`.
    pub fn advance(&mut self) {
        self.current = lerp(self.current, self.target, self.ease);
    }

    pub fn direction(&self) -> Direction {
        Direction::between(self.current, self.last)
    }

    /// Record this frame's `current` as the next frame's `last`.
    pub fn commit(&mut self) {
        self.last = self.current;
    }

    /// Distance still to cover.
    pub fn remaining(&self) -> f32 {
        self.target - self.current
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(0.05)
    }
}
