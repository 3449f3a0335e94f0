use gallery_kernel::{Gallery, PlaneUniforms};
use glam::{Mat4, Quat, Vec3};

/// Per-plane draw data derived from an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneInstance {
    pub index: usize,
    pub model: Mat4,
    pub uniforms: PlaneUniforms,
    /// Whether any part of the plane is inside the visible frustum slice.
    pub visible: bool,
}

/// Extract draw data for every item, in index order.
pub fn plane_instances(gallery: &Gallery) -> Vec<PlaneInstance> {
    let half_view = gallery.viewport().width / 2.0;
    gallery
        .items()
        .iter()
        .map(|item| {
            let scale = item.plane_scale();
            let x = item.position_x();
            PlaneInstance {
                index: item.index(),
                model: Mat4::from_scale_rotation_translation(
                    Vec3::new(scale.x, scale.y, 1.0),
                    Quat::IDENTITY,
                    Vec3::new(x, 0.0, 0.0),
                ),
                uniforms: item.uniforms(),
                visible: (x.abs() - scale.x / 2.0) < half_view,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_common::{GalleryConfig, Screen};

    #[test]
    fn instances_follow_items() {
        let g = Gallery::new(
            GalleryConfig::default(),
            ["a", "b", "c"],
            Screen::new(1280.0, 720.0),
        );
        let planes = plane_instances(&g);
        assert_eq!(planes.len(), 3);
        for (plane, item) in planes.iter().zip(g.items()) {
            assert_eq!(plane.index, item.index());
            assert_eq!(plane.model.w_axis.x, item.position_x());
            assert_eq!(plane.model.x_axis.x, item.plane_scale().x);
            assert_eq!(plane.model.y_axis.y, item.plane_scale().y);
            assert_eq!(plane.uniforms, item.uniforms());
        }
        assert!(planes[0].visible);
    }

    #[test]
    fn far_planes_are_not_visible() {
        let g = Gallery::new(
            GalleryConfig::default(),
            (0..20).map(|i| i.to_string()),
            Screen::new(1280.0, 720.0),
        );
        let planes = plane_instances(&g);
        assert!(!planes[19].visible);
    }
}
