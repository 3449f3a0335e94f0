use gallery_common::{Direction, Viewport};
use gallery_kernel::Gallery;

/// Gallery inspector for developer tooling.
///
/// Provides read-only queries against the gallery for debugging and the
/// desktop overlay.
pub struct GalleryInspector;

impl GalleryInspector {
    /// Produce a summary of the gallery state.
    pub fn summary(gallery: &Gallery) -> GallerySummary {
        let scroll = gallery.scroll();
        GallerySummary {
            frame: gallery.frame(),
            current: scroll.current,
            target: scroll.target,
            direction: gallery.direction(),
            dragging: gallery.is_dragging(),
            viewport: gallery.viewport(),
            item_count: gallery.items().len(),
            loaded_images: gallery.items().iter().filter(|i| i.has_image()).count(),
        }
    }

    /// Layout details of one item.
    pub fn inspect_item(gallery: &Gallery, index: usize) -> Option<ItemInfo> {
        gallery.item(index).map(|item| ItemInfo {
            index: item.index(),
            label: item.label().to_string(),
            position_x: item.position_x(),
            scale: [item.plane_scale().x, item.plane_scale().y],
            base_offset: item.base_offset(),
            wrap_extra: item.wrap_extra(),
            width_total: item.width_total(),
        })
    }

    /// Index of the item closest to the centre of the view.
    pub fn centered_item(gallery: &Gallery) -> Option<usize> {
        gallery
            .items()
            .iter()
            .min_by(|a, b| a.position_x().abs().total_cmp(&b.position_x().abs()))
            .map(|item| item.index())
    }
}

/// Summary of gallery state for the inspector.
#[derive(Debug, Clone)]
pub struct GallerySummary {
    pub frame: u64,
    pub current: f32,
    pub target: f32,
    pub direction: Direction,
    pub dragging: bool,
    pub viewport: Viewport,
    pub item_count: usize,
    pub loaded_images: usize,
}

impl std::fmt::Display for GallerySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Gallery: frame={} current={:.3} target={:.3} direction={} dragging={} items={} loaded={}",
            self.frame,
            self.current,
            self.target,
            self.direction,
            self.dragging,
            self.item_count,
            self.loaded_images
        )
    }
}

/// Detailed info about a single item.
#[derive(Debug, Clone)]
pub struct ItemInfo {
    pub index: usize,
    pub label: String,
    pub position_x: f32,
    pub scale: [f32; 2],
    pub base_offset: f32,
    pub wrap_extra: f32,
    pub width_total: f32,
}

impl std::fmt::Display for ItemInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Item [{}] {} x={:.2} scale=({:.2}, {:.2}) base={:.2} extra={:.2}",
            self.index,
            self.label,
            self.position_x,
            self.scale[0],
            self.scale[1],
            self.base_offset,
            self.wrap_extra,
        )
    }
}
