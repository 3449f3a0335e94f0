use image::imageops::FilterType;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Errors from image loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image has zero size: {0}")]
    Empty(PathBuf),
}

/// An image file backing one plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    pub path: PathBuf,
}

impl ImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Short display name: the file stem, or the full path if it has none.
    pub fn label(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// A decoded RGBA8 image for the plane at `index`.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub index: usize,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// One-shot completion event for a single image.
#[derive(Debug)]
pub enum LoadEvent {
    Loaded(DecodedImage),
    Failed { index: usize, error: AssetError },
}

impl LoadEvent {
    pub fn index(&self) -> usize {
        match self {
            LoadEvent::Loaded(image) => image.index,
            LoadEvent::Failed { index, .. } => *index,
        }
    }
}

/// Decode an image file into RGBA8 pixels.
///
/// Images larger than `max_dimension` on either side are downscaled to fit,
/// keeping their aspect ratio.
pub fn decode_file(
    path: impl AsRef<Path>,
    max_dimension: u32,
) -> Result<(u32, u32, Vec<u8>), AssetError> {
    let path = path.as_ref();
    let mut image = image::open(path)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(AssetError::Empty(path.to_path_buf()));
    }
    let max_dimension = max_dimension.max(1);
    if image.width() > max_dimension || image.height() > max_dimension {
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            max_dimension,
            path = %path.display(),
            "downscaling oversized image"
        );
        image = image.resize(max_dimension, max_dimension, FilterType::Triangle);
    }
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok((width, height, rgba.into_raw()))
}

/// Decodes a fixed list of sources on a background thread.
///
/// Results arrive through a channel and are picked up with
/// [`ImageLoader::drain`], which never blocks.
#[derive(Debug)]
pub struct ImageLoader {
    rx: Receiver<LoadEvent>,
    pending: usize,
}

impl ImageLoader {
    /// Start decoding `sources`; event indices match the slice order.
    /// Decoded images never exceed `max_dimension` on either side.
    pub fn spawn(sources: Vec<ImageSource>, max_dimension: u32) -> Result<Self, AssetError> {
        let (tx, rx) = mpsc::channel();
        let pending = sources.len();
        // Detached: the worker exits after the last source, or as soon as a
        // send fails because the loader was dropped.
        std::thread::Builder::new()
            .name("image-loader".into())
            .spawn(move || decode_all(sources, max_dimension, tx))?;
        tracing::info!(images = pending, "image loader started");
        Ok(Self { rx, pending })
    }

    /// Take every completion event that has arrived so far.
    pub fn drain(&mut self) -> Vec<LoadEvent> {
        let events: Vec<LoadEvent> = self.rx.try_iter().collect();
        self.pending = self.pending.saturating_sub(events.len());
        events
    }

    /// Block up to `timeout` for the next event.
    pub fn wait_next(&mut self, timeout: Duration) -> Option<LoadEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                self.pending = self.pending.saturating_sub(1);
                Some(event)
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Images not yet reported.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_done(&self) -> bool {
        self.pending == 0
    }
}

fn decode_all(sources: Vec<ImageSource>, max_dimension: u32, tx: Sender<LoadEvent>) {
    for (index, source) in sources.into_iter().enumerate() {
        let event = match decode_file(&source.path, max_dimension) {
            Ok((width, height, pixels)) => {
                tracing::debug!(index, width, height, path = %source.path.display(), "image decoded");
                LoadEvent::Loaded(DecodedImage {
                    index,
                    width,
                    height,
                    pixels,
                })
            }
            Err(error) => LoadEvent::Failed { index, error },
        };
        if tx.send(event).is_err() {
            tracing::debug!("image loader receiver dropped, stopping");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]))
            .save(&path)
            .unwrap();
        path
    }

    fn collect(loader: &mut ImageLoader, count: usize) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while events.len() < count {
            match loader.wait_next(Duration::from_secs(10)) {
                Some(event) => events.push(event),
                None => break,
            }
        }
        events
    }

    #[test]
    fn label_is_file_stem() {
        assert_eq!(ImageSource::new("photos/01.webp").label(), "01");
    }

    #[test]
    fn decode_reports_natural_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "a.png", 7, 3);
        let (w, h, pixels) = decode_file(&path, 8192).unwrap();
        assert_eq!((w, h), (7, 3));
        assert_eq!(pixels.len(), 7 * 3 * 4);
    }

    #[test]
    fn oversized_image_is_downscaled_to_fit() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "wide.png", 40, 10);
        let (w, h, pixels) = decode_file(&path, 16).unwrap();
        assert_eq!((w, h), (16, 4));
        assert_eq!(pixels.len(), 16 * 4 * 4);

        let tall = write_png(dir.path(), "tall.png", 6, 30);
        let (w, h, _) = decode_file(&tall, 15).unwrap();
        assert_eq!((w, h), (3, 15));
    }

    #[test]
    fn loader_delivers_one_event_per_source_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![
            ImageSource::new(write_png(dir.path(), "a.png", 4, 2)),
            ImageSource::new(dir.path().join("missing.png")),
            ImageSource::new(write_png(dir.path(), "c.png", 2, 5)),
        ];
        let mut loader = ImageLoader::spawn(sources, 8192).unwrap();
        assert_eq!(loader.pending(), 3);

        let events = collect(&mut loader, 3);
        assert_eq!(events.len(), 3);
        assert!(loader.is_done());
        assert_eq!(
            events.iter().map(LoadEvent::index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(matches!(&events[0], LoadEvent::Loaded(img) if img.width == 4 && img.height == 2));
        assert!(matches!(&events[1], LoadEvent::Failed { index: 1, .. }));
        assert!(matches!(&events[2], LoadEvent::Loaded(img) if img.width == 2 && img.height == 5));
        assert!(loader.drain().is_empty());
    }

    #[test]
    fn empty_source_list_is_done() {
        let mut loader = ImageLoader::spawn(Vec::new(), 8192).unwrap();
        assert!(loader.is_done());
        assert!(loader.wait_next(Duration::from_millis(50)).is_none());
    }
}
