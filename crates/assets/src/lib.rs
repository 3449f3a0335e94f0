//! Image loading: decode image files on a worker thread and hand the results
//! back as one-shot completion events.
//!
//! The consumer drains events at the start of a frame, so decoded images only
//! ever reach gallery state on the frame thread. A failed load is reported
//! once and never retried.

mod loader;

pub use loader::{AssetError, DecodedImage, ImageLoader, ImageSource, LoadEvent, decode_file};

pub fn crate_info() -> &'static str {
    "gallery-assets v0.1.0"
}
