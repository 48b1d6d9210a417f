//! Pure Rust image processing backend — zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header read, no full decode) |
//! | Decode (JPEG, PNG, GIF, WebP) | `image` crate (pure Rust decoders) |
//! | Crop-resize | `image::DynamicImage::resize_to_fill` with `Lanczos3` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use crate::breakpoints::Size;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn crop_resize_batch(
        &self,
        source: &Path,
        sizes: &[Size],
    ) -> Result<Vec<DynamicImage>, BackendError> {
        // One decode feeds every size. resize_to_fill scales the source to
        // cover the target box and center-crops, so output dimensions are
        // exact even when the source ratio disagrees with the target.
        let img = load_image(source)?;
        Ok(sizes
            .iter()
            .map(|size| img.resize_to_fill(size.w, size.h, FilterType::Lanczos3))
            .collect())
    }
}
