use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or validating a gallery configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunable constants for layout, input and camera.
///
/// Every field has a default, so a config file only needs the values it
/// overrides. Missing file fields fall back to [`GalleryConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Fraction of the remaining distance covered each frame.
    pub ease: f32,
    /// Screen height (px) at which planes are drawn at reference size.
    pub reference_height: f32,
    /// Reference plane height in screen pixels.
    pub plane_height: f32,
    /// Reference plane width in screen pixels.
    pub plane_width: f32,
    /// Gap between neighbouring planes in world units.
    pub padding: f32,
    /// Scroll units per pixel of pointer drag.
    pub drag_sensitivity: f32,
    /// Scroll units per normalized wheel pixel.
    pub wheel_sensitivity: f32,
    /// World units each plane moves per scroll unit.
    pub scroll_factor: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Camera distance from the plane row along +Z.
    pub camera_distance: f32,
    /// Debounce delay before snapping to the nearest item; `None` disables snapping.
    pub snap_delay_ms: Option<u64>,
    /// Image files, one plane each, in display order.
    pub images: Vec<PathBuf>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            ease: 0.05,
            reference_height: 1500.0,
            plane_height: 900.0,
            plane_width: 700.0,
            padding: 2.0,
            drag_sensitivity: 0.01,
            wheel_sensitivity: 0.05,
            scroll_factor: 0.1,
            fov_degrees: 45.0,
            camera_distance: 20.0,
            snap_delay_ms: None,
            images: Vec::new(),
        }
    }
}

impl GalleryConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ease > 0.0 && self.ease <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "ease",
                reason: format!("must be in (0, 1], got {}", self.ease),
            });
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid {
                field: "fov_degrees",
                reason: format!("must be in (0, 180), got {}", self.fov_degrees),
            });
        }
        let positive = [
            ("reference_height", self.reference_height),
            ("plane_height", self.plane_height),
            ("plane_width", self.plane_width),
            ("camera_distance", self.camera_distance),
            ("scroll_factor", self.scroll_factor),
            ("drag_sensitivity", self.drag_sensitivity),
            ("wheel_sensitivity", self.wheel_sensitivity),
        ];
        for (field, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        if self.padding < 0.0 || !self.padding.is_finite() {
            return Err(ConfigError::Invalid {
                field: "padding",
                reason: format!("must be zero or positive, got {}", self.padding),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_constants() {
        let cfg = GalleryConfig::default();
        assert_eq!(cfg.ease, 0.05);
        assert_eq!(cfg.reference_height, 1500.0);
        assert_eq!(cfg.plane_height, 900.0);
        assert_eq!(cfg.plane_width, 700.0);
        assert_eq!(cfg.padding, 2.0);
        assert_eq!(cfg.drag_sensitivity, 0.01);
        assert_eq!(cfg.wheel_sensitivity, 0.05);
        assert_eq!(cfg.fov_degrees, 45.0);
        assert_eq!(cfg.camera_distance, 20.0);
        assert!(cfg.snap_delay_ms.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_file_uses_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{ "ease": 0.2, "images": ["a.png", "b.png"] }}"#).unwrap();

        let cfg = GalleryConfig::load(tmp.path()).unwrap();
        assert_eq!(cfg.ease, 0.2);
        assert_eq!(cfg.images.len(), 2);
        assert_eq!(cfg.padding, 2.0);
    }

    #[test]
    fn rejects_zero_ease() {
        let cfg = GalleryConfig {
            ease: 0.0,
            ..GalleryConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid { field: "ease", .. })
        ));
    }

    #[test]
    fn rejects_negative_plane_width() {
        let cfg = GalleryConfig {
            plane_width: -1.0,
            ..GalleryConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid {
                field: "plane_width",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_scroll_factor_and_sensitivities() {
        for (field, cfg) in [
            (
                "scroll_factor",
                GalleryConfig {
                    scroll_factor: 0.0,
                    ..GalleryConfig::default()
                },
            ),
            (
                "drag_sensitivity",
                GalleryConfig {
                    drag_sensitivity: f32::NAN,
                    ..GalleryConfig::default()
                },
            ),
            (
                "wheel_sensitivity",
                GalleryConfig {
                    wheel_sensitivity: -0.05,
                    ..GalleryConfig::default()
                },
            ),
        ] {
            match cfg.validate() {
                Err(ConfigError::Invalid { field: got, .. }) => assert_eq!(got, field),
                other => panic!("{field}: expected invalid, got {other:?}"),
            }
        }
    }

    #[test]
    fn load_rejects_zero_scroll_factor() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{ "scroll_factor": 0.0 }}"#).unwrap();
        assert!(matches!(
            GalleryConfig::load(tmp.path()),
            Err(ConfigError::Invalid {
                field: "scroll_factor",
                ..
            })
        ));
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let cfg = GalleryConfig {
            snap_delay_ms: Some(200),
            ..GalleryConfig::default()
        };
        cfg.save(tmp.path()).unwrap();

        let loaded = GalleryConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{{ not json").unwrap();
        assert!(matches!(
            GalleryConfig::load(tmp.path()),
            Err(ConfigError::Json(_))
        ));
    }
}
