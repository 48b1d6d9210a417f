//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the engine needs:
//! identify (pixel dimensions without a full decode where possible) and the
//! batched crop-resize transform that produces thumbnail variants.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust on the
//! `image` crate, statically linked.

use crate::breakpoints::Size;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `crop_resize_batch` decodes the source once and produces one in-memory
/// image per requested size, order-aligned with the request list. Each
/// output has *exactly* the requested dimensions: the source is scaled to
/// cover the target and center-cropped, never letterboxed.
pub trait ImageBackend {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Crop-resize the source to every requested size.
    fn crop_resize_batch(
        &self,
        source: &Path,
        sizes: &[Size],
    ) -> Result<Vec<DynamicImage>, BackendError>;
}
