//! Filesystem variant cache.
//!
//! The path convention *is* the cache key: the 800×450 variant of
//! `albums/photo.jpg` lives at `albums/thumbs/800x450/photo.jpg`, and its
//! existence at that path is the only validity check. There is no manifest,
//! no checksum, and no regeneration of a file that exists — the layout stays
//! human-navigable, and external tooling may prune or warm it freely.
//!
//! Two concurrent renders that both find a key missing may both generate it.
//! That is accepted: generation is deterministic and writes are whole-file,
//! so the last writer wins with identical bytes.
//!
//! [`VariantStore`] is the capability seam; [`partition`] is the cache
//! policy, which splits a variant plan into cache hits and work. Policy
//! tests run against the in-memory fake store at the bottom of this module.

use crate::breakpoints::Size;
use crate::render::Candidate;
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Cache directory name, created beside the source image.
const THUMBS_DIR: &str = "thumbs";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Quality setting for lossy (JPEG) encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Output codec selected from a source file extension. Unrecognized
/// extensions fall back to JPEG.
pub fn format_for_extension(ext: &str) -> ImageFormat {
    match ext.to_ascii_lowercase().as_str() {
        "webp" => ImageFormat::WebP,
        "png" => ImageFormat::Png,
        "gif" => ImageFormat::Gif,
        _ => ImageFormat::Jpeg,
    }
}

/// Storage capability for one source image's variants.
///
/// Keyed by [`Size`] alone; the implementation decides where bytes live and
/// what public URL a variant gets.
pub trait VariantStore {
    fn exists(&self, size: Size) -> bool;
    fn put(&self, size: Size, image: &DynamicImage) -> Result<(), StoreError>;
    fn url(&self, size: Size) -> String;
}

/// The production store: `<sourceDir>/thumbs/<WxH>/<basename>.<ext>`.
///
/// The thumbnail's extension and codec always match the source's, so a
/// `photo.webp` source yields `thumbs/<WxH>/photo.webp` variants.
pub struct FsVariantStore {
    thumbs_dir: PathBuf,
    thumbs_url: String,
    stem: String,
    ext: String,
    format: ImageFormat,
    quality: Quality,
}

impl FsVariantStore {
    /// Build the store for a source image. `public_dir_url` is the public
    /// URL of the directory containing the source.
    pub fn for_source(source: &Path, public_dir_url: &str, quality: Quality) -> Self {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = source
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_else(|| "jpg".to_string());
        Self {
            thumbs_dir: source.parent().unwrap_or(Path::new("")).join(THUMBS_DIR),
            thumbs_url: format!("{}/{}", public_dir_url.trim_end_matches('/'), THUMBS_DIR),
            format: format_for_extension(&ext),
            stem,
            ext,
            quality,
        }
    }

    /// Conventional on-disk path for a variant.
    pub fn variant_path(&self, size: Size) -> PathBuf {
        self.thumbs_dir
            .join(size.to_string())
            .join(format!("{}.{}", self.stem, self.ext))
    }
}

impl VariantStore for FsVariantStore {
    fn exists(&self, size: Size) -> bool {
        self.variant_path(size).exists()
    }

    fn put(&self, size: Size, image: &DynamicImage) -> Result<(), StoreError> {
        let path = self.variant_path(size);
        if let Some(dir) = path.parent() {
            // create_dir_all succeeds on an existing directory
            fs::create_dir_all(dir)?;
        }

        match self.format {
            ImageFormat::Jpeg => {
                let file = fs::File::create(&path)?;
                let writer = io::BufWriter::new(file);
                let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                    writer,
                    self.quality.value() as u8,
                );
                image.write_with_encoder(encoder)?;
            }
            format => image.save_with_format(&path, format)?,
        }
        Ok(())
    }

    fn url(&self, size: Size) -> String {
        format!("{}/{}/{}.{}", self.thumbs_url, size, self.stem, self.ext)
    }
}

/// Split a variant plan into (already satisfied, must generate).
///
/// Sizes at or above the source width are dropped entirely — no upscaling
/// and no generation attempt. Cache hits report the *requested* width from
/// the plan; freshly generated variants later report the generated image's
/// width (see [`thumbs`](crate::thumbs)).
pub fn partition(
    store: &impl VariantStore,
    plan: &[Size],
    source_width: u32,
) -> (Vec<Candidate>, Vec<Size>) {
    let mut satisfied = Vec::new();
    let mut to_generate = Vec::new();

    for &size in plan {
        if source_width <= size.w {
            continue;
        }
        if store.exists(size) {
            debug!(size = %size, url = %store.url(size), "variant cache hit");
            satisfied.push(Candidate {
                url: store.url(size),
                width: size.w,
            });
        } else {
            to_generate.push(size);
        }
    }

    (satisfied, to_generate)
}
