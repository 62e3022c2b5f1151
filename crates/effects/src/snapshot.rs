//! PNG export of a composited [`Page`].
//!
//! This module is feature-gated behind `png` (default on) so that WASM builds
//! can depend on the `effects` crate without pulling in the `image` crate.
//! The compositing itself lives in [`crate::pixel`] (always available).

use driftfield_core::error::EngineError;
use std::path::Path;

use crate::Page;

/// Writes the page's current frame as a PNG image.
///
/// Returns `EngineError::Io` on write failure.
pub fn write_png(page: &Page, path: &Path) -> Result<(), EngineError> {
    let rgba = page.to_rgba()?;
    let size = page.scene().size();
    let img = image::RgbaImage::from_raw(size.width, size.height, rgba)
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftfield_core::{Surface, Theme};
    use serde_json::json;

    #[test]
    fn write_png_round_trip() {
        let mut page =
            Page::portfolio(Surface::new(64, 48), Theme::dark(), 42, true, &json!({})).unwrap();
        page.run_for(2);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");

        write_png(&page, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 64);
        assert_eq!(img.height(), 48);
        assert_eq!(img.as_raw(), &page.to_rgba().unwrap());
    }

    #[test]
    fn write_png_to_missing_dir_is_io_error() {
        let page =
            Page::single("waves", Surface::new(8, 8), Theme::light(), 1, &json!({})).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        assert!(matches!(write_png(&page, &path), Err(EngineError::Io(_))));
    }
}
