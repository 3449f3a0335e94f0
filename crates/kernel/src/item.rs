use crate::scroll::ScrollState;
use gallery_common::{Direction, GalleryConfig, Screen, Viewport};
use glam::Vec2;

/// Layout constants shared by every item in a gallery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemLayout {
    /// Screen height at which `scale == 1`.
    pub reference_height: f32,
    pub plane_width: f32,
    pub plane_height: f32,
    pub padding: f32,
    /// World units per scroll unit.
    pub scroll_factor: f32,
}

impl From<&GalleryConfig> for ItemLayout {
    fn from(config: &GalleryConfig) -> Self {
        Self {
            reference_height: config.reference_height,
            plane_width: config.plane_width,
            plane_height: config.plane_height,
            padding: config.padding,
            scroll_factor: config.scroll_factor,
        }
    }
}

impl Default for ItemLayout {
    fn default() -> Self {
        Self::from(&GalleryConfig::default())
    }
}

/// Shader-facing sizes for one plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaneUniforms {
    pub plane_sizes: Vec2,
    /// Natural pixel size of the image; zero until the image has loaded.
    pub image_sizes: Vec2,
    pub viewport_sizes: Vec2,
}

/// Construction parameters for an [`Item`].
#[derive(Debug, Clone)]
pub struct ItemParams {
    pub index: usize,
    pub group_len: usize,
    pub label: String,
    pub screen: Screen,
    pub viewport: Viewport,
    pub layout: ItemLayout,
}

/// One image plane in the strip.
///
/// Items never reference each other. They share `group_len`, and therefore
/// `width_total`, so the band of recycled planes stays contiguous.
#[derive(Debug, Clone)]
pub struct Item {
    index: usize,
    group_len: usize,
    label: String,
    layout: ItemLayout,
    screen: Screen,
    viewport: Viewport,
    scale: f32,
    plane_scale: Vec2,
    width: f32,
    width_total: f32,
    base_offset: f32,
    wrap_extra: f32,
    position_x: f32,
    is_before: bool,
    is_after: bool,
    uniforms: PlaneUniforms,
}

impl Item {
    pub fn new(params: ItemParams) -> Self {
        let ItemParams {
            index,
            group_len,
            label,
            screen,
            viewport,
            layout,
        } = params;
        let mut item = Self {
            index,
            group_len,
            label,
            layout,
            screen,
            viewport,
            scale: 0.0,
            plane_scale: Vec2::ZERO,
            width: 0.0,
            width_total: 0.0,
            base_offset: 0.0,
            wrap_extra: 0.0,
            position_x: 0.0,
            is_before: false,
            is_after: false,
            uniforms: PlaneUniforms {
                viewport_sizes: viewport.as_vec2(),
                ..PlaneUniforms::default()
            },
        };
        item.resize(None, None);
        item.position_x = item.base_offset;
        item
    }

    /// Recompute the horizontal position and recycle the plane to the other
    /// end of the strip if it has left the band in the scroll direction.
    ///
    /// A single frame may carry the plane several group widths past its
    /// edge; it is moved back by as many whole group widths as needed.
    pub fn update(&mut self, scroll: &ScrollState, direction: Direction) {
        self.reposition(scroll);

        let plane_offset = self.plane_scale.x / 2.0;
        let viewport_offset = self.viewport.width;

        self.is_before = self.position_x + plane_offset < -viewport_offset;
        self.is_after = self.position_x - plane_offset > viewport_offset;

        if !(self.width_total > 0.0 && self.width_total.is_finite()) {
            return;
        }

        let wraps = match direction {
            Direction::Right if self.is_before => {
                let overshoot = -viewport_offset - plane_offset - self.position_x;
                let wraps = (overshoot / self.width_total).ceil().max(1.0);
                self.wrap_extra -= wraps * self.width_total;
                wraps
            }
            Direction::Left if self.is_after => {
                let overshoot = self.position_x - plane_offset - viewport_offset;
                let wraps = (overshoot / self.width_total).ceil().max(1.0);
                self.wrap_extra += wraps * self.width_total;
                wraps
            }
            _ => return,
        };

        self.is_before = false;
        self.is_after = false;
        self.reposition(scroll);
        tracing::trace!(
            index = self.index,
            %direction,
            wraps,
            wrap_extra = self.wrap_extra,
            x = self.position_x,
            "item wrapped"
        );
    }

    /// Recompute scale and layout from screen/viewport, replacing the stored
    /// copies when given. Idempotent for identical inputs.
    pub fn resize(&mut self, screen: Option<Screen>, viewport: Option<Viewport>) {
        if let Some(screen) = screen {
            self.screen = screen;
        }
        if let Some(viewport) = viewport {
            self.viewport = viewport;
            self.uniforms.viewport_sizes = viewport.as_vec2();
        }

        self.scale = self.screen.height / self.layout.reference_height;

        self.plane_scale.y =
            self.viewport.height * (self.layout.plane_height * self.scale) / self.screen.height;
        self.plane_scale.x =
            self.viewport.width * (self.layout.plane_width * self.scale) / self.screen.width;
        self.uniforms.plane_sizes = self.plane_scale;

        self.width = self.plane_scale.x + self.layout.padding;
        self.width_total = self.width * self.group_len as f32;
        self.base_offset = self.width * self.index as f32;
    }

    /// Record the natural size of the loaded image.
    pub fn set_image_size(&mut self, width: u32, height: u32) {
        self.uniforms.image_sizes = Vec2::new(width as f32, height as f32);
    }

    pub fn has_image(&self) -> bool {
        self.uniforms.image_sizes != Vec2::ZERO
    }

    fn reposition(&mut self, scroll: &ScrollState) {
        self.position_x =
            self.base_offset - scroll.current * self.layout.scroll_factor - self.wrap_extra;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn group_len(&self) -> usize {
        self.group_len
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position_x(&self) -> f32 {
        self.position_x
    }

    /// Plane scale (`x` = width, `y` = height) in world units.
    pub fn plane_scale(&self) -> Vec2 {
        self.plane_scale
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Plane width plus padding.
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn width_total(&self) -> f32 {
        self.width_total
    }

    pub fn base_offset(&self) -> f32 {
        self.base_offset
    }

    pub fn wrap_extra(&self) -> f32 {
        self.wrap_extra
    }

    pub fn is_before(&self) -> bool {
        self.is_before
    }

    pub fn is_after(&self) -> bool {
        self.is_after
    }

    pub fn uniforms(&self) -> PlaneUniforms {
        self.uniforms
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }
}
