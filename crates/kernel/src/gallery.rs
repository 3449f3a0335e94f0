use crate::camera::PerspectiveCamera;
use crate::item::{Item, ItemLayout, ItemParams};
use crate::scroll::ScrollState;
use gallery_common::{Direction, GalleryConfig, Screen, Viewport};
use gallery_input::{Action, PixelDelta};

/// Pointer interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// A drag is in progress. `origin` is the scroll value latched at
    /// pointer-down, `start_x` the pointer coordinate at that moment.
    Dragging { origin: f32, start_x: f32 },
}

/// The gallery controller.
///
/// Owns the scroll state machine, the camera-derived screen/viewport pair and
/// the ordered items. Input mutates only `scroll.target`; [`Gallery::tick`]
/// moves everything else once per frame.
#[derive(Debug, Clone)]
pub struct Gallery {
    config: GalleryConfig,
    camera: PerspectiveCamera,
    screen: Screen,
    viewport: Viewport,
    scroll: ScrollState,
    drag: DragState,
    direction: Direction,
    items: Vec<Item>,
    frame: u64,
}

impl Gallery {
    /// Build a gallery with one item per label.
    ///
    /// The screen is measured and the viewport derived before any item is
    /// created, so items never lay out against an empty viewport.
    pub fn new<I, S>(config: GalleryConfig, labels: I, screen: Screen) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let camera = PerspectiveCamera::new(config.fov_degrees, config.camera_distance);
        let mut gallery = Self {
            scroll: ScrollState::new(config.ease),
            config,
            camera,
            screen,
            viewport: Viewport::default(),
            drag: DragState::Idle,
            direction: Direction::default(),
            items: Vec::new(),
            frame: 0,
        };
        gallery.measure(screen);

        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let group_len = labels.len();
        let layout = ItemLayout::from(&gallery.config);
        let (screen, viewport) = (gallery.screen, gallery.viewport);
        gallery.items = labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| {
                Item::new(ItemParams {
                    index,
                    group_len,
                    label,
                    screen,
                    viewport,
                    layout,
                })
            })
            .collect();

        tracing::info!(
            items = group_len,
            viewport_w = gallery.viewport.width,
            viewport_h = gallery.viewport.height,
            "gallery created"
        );
        gallery
    }

    /// Remeasure from a new window size and forward the geometry to every item.
    pub fn resize(&mut self, screen: Screen) {
        self.measure(screen);
        for item in &mut self.items {
            item.resize(Some(self.screen), Some(self.viewport));
        }
        tracing::debug!(
            screen_w = screen.width,
            screen_h = screen.height,
            viewport_w = self.viewport.width,
            viewport_h = self.viewport.height,
            "gallery resized"
        );
    }

    fn measure(&mut self, screen: Screen) {
        self.screen = screen;
        self.camera.set_aspect_from(screen);
        self.viewport = self.camera.viewport();
    }

    /// Dispatch a high-level input action.
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::PointerDown { x } => self.on_pointer_down(*x),
            Action::PointerMove { x } => self.on_pointer_move(*x),
            Action::PointerUp => self.on_pointer_up(),
            Action::Wheel(delta) => self.on_wheel(*delta),
            Action::Resize(screen) => self.resize(*screen),
        }
    }

    pub fn on_pointer_down(&mut self, x: f32) {
        self.drag = DragState::Dragging {
            origin: self.scroll.current,
            start_x: x,
        };
    }

    /// Dragging left (decreasing `x`) increases the target.
    pub fn on_pointer_move(&mut self, x: f32) {
        let DragState::Dragging { origin, start_x } = self.drag else {
            return;
        };
        let distance = (start_x - x) * self.config.drag_sensitivity;
        self.scroll.target = origin + distance;
    }

    /// End the drag. Easing continues toward the last target.
    pub fn on_pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Vertical wheel motion scrolls horizontally. Accepted while dragging.
    pub fn on_wheel(&mut self, delta: PixelDelta) {
        self.scroll.target += delta.pixel_y * self.config.wheel_sensitivity;
    }

    /// Set the scroll target directly.
    pub fn scroll_to(&mut self, target: f32) {
        self.scroll.target = target;
    }

    /// Round the target to the nearest whole item step.
    ///
    /// A step is one item width expressed in scroll units, so after easing
    /// settles an item sits at the origin. No-op for an empty gallery.
    pub fn snap_to_item(&mut self) {
        let Some(first) = self.items.first() else {
            return;
        };
        let step = first.width() / self.config.scroll_factor;
        if !step.is_finite() || step <= 0.0 {
            return;
        }
        let index = (self.scroll.target.abs() / step).round();
        let snapped = index * step;
        self.scroll.target = if self.scroll.target < 0.0 {
            -snapped
        } else {
            snapped
        };
        tracing::debug!(scroll_target = self.scroll.target, "snapped to item");
    }

    /// Advance one frame.
    ///
    /// `render` sees the state committed by the previous frame; afterwards the
    /// scroll eases, the direction is derived and every item is updated in
    /// index order.
    pub fn tick<F>(&mut self, render: F) -> Direction
    where
        F: FnOnce(&Gallery),
    {
        render(self);

        self.scroll.advance();
        self.direction = self.scroll.direction();

        let scroll = self.scroll;
        for item in &mut self.items {
            item.update(&scroll, self.direction);
        }

        self.scroll.commit();
        self.frame += 1;
        self.direction
    }

    /// Record the natural size of a loaded image. Returns `false` for an
    /// unknown index.
    pub fn set_image_size(&mut self, index: usize, width: u32, height: u32) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.set_image_size(width, height);
                true
            }
            None => false,
        }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Direction derived by the most recent tick.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// Frames ticked so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery(count: usize) -> Gallery {
        Gallery::new(
            GalleryConfig::default(),
            (0..count).map(|i| format!("{:02}", i + 1)),
            Screen::new(1600.0, 900.0),
        )
    }

    #[test]
    fn items_created_with_measured_viewport() {
        let g = gallery(6);
        assert_eq!(g.items().len(), 6);
        assert!(g.viewport().width > 0.0);
        let expected_h = 2.0 * 22.5_f32.to_radians().tan() * 20.0;
        assert!((g.viewport().height - expected_h).abs() < 1e-4);
        for (i, item) in g.items().iter().enumerate() {
            assert_eq!(item.index(), i);
            assert_eq!(item.group_len(), 6);
            assert_eq!(item.viewport(), g.viewport());
            assert!(item.plane_scale().x > 0.0);
        }
        assert_eq!(g.items()[0].width_total(), g.items()[5].width_total());
    }

    #[test]
    fn wheel_adds_scaled_pixel_delta() {
        let mut g = gallery(6);
        g.on_wheel(PixelDelta::new(0.0, 100.0));
        assert!((g.scroll().target - 5.0).abs() < 1e-6);
    }

    #[test]
    fn drag_sets_target_from_origin() {
        let mut g = gallery(6);
        g.on_pointer_down(50.0);
        assert!(g.is_dragging());
        g.on_pointer_move(30.0);
        assert!((g.scroll().target - 0.2).abs() < 1e-6);
        g.on_pointer_up();
        assert!(!g.is_dragging());
        assert_eq!(g.drag(), DragState::Idle);
    }

    #[test]
    fn move_without_drag_is_ignored() {
        let mut g = gallery(6);
        g.on_pointer_move(30.0);
        assert_eq!(g.scroll().target, 0.0);
    }

    #[test]
    fn drag_origin_is_current_not_target() {
        let mut g = gallery(3);
        g.scroll_to(10.0);
        g.tick(|_| {});
        let current = g.scroll().current;
        assert!((current - 0.5).abs() < 1e-6);

        g.on_pointer_down(100.0);
        g.on_pointer_move(100.0);
        assert_eq!(g.scroll().target, current);
    }

    #[test]
    fn wheel_mid_drag_is_last_writer_wins() {
        let mut g = gallery(3);
        g.on_pointer_down(0.0);
        g.on_pointer_move(-100.0);
        assert!((g.scroll().target - 1.0).abs() < 1e-6);
        g.on_wheel(PixelDelta::new(0.0, 40.0));
        assert!((g.scroll().target - 3.0).abs() < 1e-6);
        assert!(g.is_dragging());
        g.on_pointer_move(-200.0);
        assert!((g.scroll().target - 2.0).abs() < 1e-6);
    }

    #[test]
    fn tick_renders_before_advancing() {
        let mut g = gallery(2);
        g.scroll_to(20.0);
        let mut seen = None;
        g.tick(|g| seen = Some((g.scroll().current, g.frame())));
        assert_eq!(seen, Some((0.0, 0)));
        assert!((g.scroll().current - 1.0).abs() < 1e-6);
        assert_eq!(g.scroll().last, g.scroll().current);
        assert_eq!(g.frame(), 1);
    }

    #[test]
    fn tick_derives_direction() {
        let mut g = gallery(2);
        g.scroll_to(10.0);
        assert_eq!(g.tick(|_| {}), Direction::Right);
        g.scroll_to(-10.0);
        assert_eq!(g.tick(|_| {}), Direction::Left);
        assert_eq!(g.direction(), Direction::Left);
    }

    #[test]
    fn idle_tick_is_left() {
        let mut g = gallery(2);
        assert_eq!(g.tick(|_| {}), Direction::Left);
    }

    #[test]
    fn tick_updates_item_positions() {
        let mut g = gallery(6);
        g.scroll_to(30.0);
        for _ in 0..20 {
            g.tick(|_| {});
        }
        let current = g.scroll().current;
        for item in g.items() {
            let expected = item.base_offset() - current * 0.1 - item.wrap_extra();
            assert!((item.position_x() - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn resize_recomputes_viewport_and_items() {
        let mut g = gallery(4);
        let before = g.items()[1].plane_scale();
        g.apply(&Action::Resize(Screen::new(800.0, 600.0)));
        assert_eq!(g.screen(), Screen::new(800.0, 600.0));
        assert!((g.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_ne!(g.items()[1].plane_scale(), before);
        for item in g.items() {
            assert_eq!(item.viewport(), g.viewport());
            assert_eq!(item.screen(), g.screen());
        }
    }

    #[test]
    fn apply_dispatches_pointer_actions() {
        let mut g = gallery(2);
        g.apply(&Action::PointerDown { x: 50.0 });
        g.apply(&Action::PointerMove { x: 30.0 });
        assert!((g.scroll().target - 0.2).abs() < 1e-6);
        g.apply(&Action::PointerUp);
        assert!(!g.is_dragging());
        g.apply(&Action::Wheel(PixelDelta::new(0.0, 100.0)));
        assert!((g.scroll().target - 5.2).abs() < 1e-5);
    }

    #[test]
    fn snap_rounds_to_item_step() {
        let mut g = gallery(6);
        let step = g.items()[0].width() / 0.1;
        g.scroll_to(step * 2.4);
        g.snap_to_item();
        assert!((g.scroll().target - step * 2.0).abs() < 1e-3);

        g.scroll_to(-step * 1.6);
        g.snap_to_item();
        assert!((g.scroll().target + step * 2.0).abs() < 1e-3);
    }

    #[test]
    fn empty_gallery_ticks() {
        let mut g = gallery(0);
        g.scroll_to(3.0);
        g.snap_to_item();
        assert_eq!(g.scroll().target, 3.0);
        g.tick(|_| {});
        assert!(g.items().is_empty());
    }

    #[test]
    fn image_size_by_index() {
        let mut g = gallery(2);
        assert!(g.set_image_size(1, 640, 480));
        assert!(g.item(1).is_some_and(|item| item.has_image()));
        assert!(!g.set_image_size(5, 640, 480));
    }

    #[test]
    fn band_holds_after_large_scroll_jump() {
        let config = GalleryConfig {
            scroll_factor: 1.0,
            ..GalleryConfig::default()
        };
        let mut g = Gallery::new(config, ["a", "b", "c", "d", "e", "f"], Screen::new(1600.0, 900.0));

        for target in [5000.0, 0.0, -3200.0] {
            g.scroll_to(target);
            for _ in 0..400 {
                g.tick(|_| {});
                for item in g.items() {
                    let bound = item.viewport().width
                        + item.plane_scale().x / 2.0
                        + item.width_total();
                    assert!(
                        item.position_x().abs() <= bound + 1e-2,
                        "item {} at {} outside ±{} (target {target})",
                        item.index(),
                        item.position_x(),
                        bound
                    );
                }
            }
        }
    }
}
