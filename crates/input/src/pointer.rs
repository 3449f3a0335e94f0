use crate::action::{Action, WheelDelta};
use gallery_common::Screen;

/// Phase of a touch contact, mirroring the platform's touch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Translates raw mouse, touch, wheel and resize events into [`Action`]s.
///
/// This is the single binding object between the window and the gallery.
/// [`PointerTracker::detach`] unbinds everything at once: afterwards every
/// handler returns `None`.
#[derive(Debug)]
pub struct PointerTracker {
    attached: bool,
    cursor_x: f32,
    mouse_down: bool,
    touch_id: Option<u64>,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerTracker {
    pub fn new() -> Self {
        Self {
            attached: true,
            cursor_x: 0.0,
            mouse_down: false,
            touch_id: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Stop producing actions and forget any in-progress drag.
    pub fn detach(&mut self) {
        if self.attached {
            tracing::debug!("input bindings detached");
        }
        self.attached = false;
        self.mouse_down = false;
        self.touch_id = None;
    }

    /// Cursor moved. Moves are always forwarded; the controller ignores them
    /// outside a drag.
    pub fn cursor_moved(&mut self, x: f32) -> Option<Action> {
        if !self.attached {
            return None;
        }
        self.cursor_x = x;
        Some(Action::PointerMove { x })
    }

    /// Primary mouse button pressed or released at the last cursor position.
    pub fn mouse_button(&mut self, pressed: bool) -> Option<Action> {
        if !self.attached {
            return None;
        }
        self.mouse_down = pressed;
        if pressed {
            Some(Action::PointerDown { x: self.cursor_x })
        } else {
            Some(Action::PointerUp)
        }
    }

    /// Touch contact update. Only the first active touch drives the drag.
    pub fn touch(&mut self, id: u64, phase: TouchPhase, x: f32) -> Option<Action> {
        if !self.attached {
            return None;
        }
        match phase {
            TouchPhase::Started => {
                if self.touch_id.is_some() {
                    return None;
                }
                self.touch_id = Some(id);
                Some(Action::PointerDown { x })
            }
            TouchPhase::Moved if self.touch_id == Some(id) => Some(Action::PointerMove { x }),
            TouchPhase::Ended | TouchPhase::Cancelled if self.touch_id == Some(id) => {
                self.touch_id = None;
                Some(Action::PointerUp)
            }
            _ => None,
        }
    }

    pub fn wheel(&self, delta: WheelDelta) -> Option<Action> {
        if !self.attached {
            return None;
        }
        Some(Action::Wheel(delta.normalize()))
    }

    pub fn resized(&self, width: f32, height: f32) -> Option<Action> {
        if !self.attached {
            return None;
        }
        Some(Action::Resize(Screen::new(width, height)))
    }

    /// Whether the mouse button or a touch is currently held.
    pub fn is_pressed(&self) -> bool {
        self.mouse_down || self.touch_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::PixelDelta;

    #[test]
    fn mouse_press_uses_last_cursor_position() {
        let mut tracker = PointerTracker::new();
        tracker.cursor_moved(50.0);
        assert_eq!(
            tracker.mouse_button(true),
            Some(Action::PointerDown { x: 50.0 })
        );
        assert!(tracker.is_pressed());
        assert_eq!(tracker.mouse_button(false), Some(Action::PointerUp));
        assert!(!tracker.is_pressed());
    }

    #[test]
    fn second_touch_is_ignored() {
        let mut tracker = PointerTracker::new();
        assert_eq!(
            tracker.touch(1, TouchPhase::Started, 10.0),
            Some(Action::PointerDown { x: 10.0 })
        );
        assert_eq!(tracker.touch(2, TouchPhase::Started, 90.0), None);
        assert_eq!(tracker.touch(2, TouchPhase::Moved, 80.0), None);
        assert_eq!(
            tracker.touch(1, TouchPhase::Moved, 5.0),
            Some(Action::PointerMove { x: 5.0 })
        );
        assert_eq!(tracker.touch(2, TouchPhase::Ended, 80.0), None);
        assert_eq!(
            tracker.touch(1, TouchPhase::Cancelled, 5.0),
            Some(Action::PointerUp)
        );
        assert!(!tracker.is_pressed());
    }

    #[test]
    fn wheel_is_normalized() {
        let tracker = PointerTracker::new();
        assert_eq!(
            tracker.wheel(WheelDelta::Lines { x: 0.0, y: 1.0 }),
            Some(Action::Wheel(PixelDelta::new(0.0, 40.0)))
        );
    }

    #[test]
    fn detached_tracker_produces_nothing() {
        let mut tracker = PointerTracker::new();
        tracker.mouse_button(true);
        tracker.detach();
        assert!(!tracker.is_attached());
        assert!(!tracker.is_pressed());
        assert_eq!(tracker.cursor_moved(1.0), None);
        assert_eq!(tracker.mouse_button(true), None);
        assert_eq!(tracker.touch(1, TouchPhase::Started, 0.0), None);
        assert_eq!(tracker.wheel(WheelDelta::Pixels { x: 0.0, y: 1.0 }), None);
        assert_eq!(tracker.resized(800.0, 600.0), None);
    }
}
