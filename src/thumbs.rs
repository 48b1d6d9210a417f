//! Thumbnail generation for the missing part of a variant plan.
//!
//! Failure policy, from least to most local:
//!
//! - The whole crop-resize batch failing (unreadable source, decoder error)
//!   degrades to "no new variants" — the caller still assembles a usable
//!   descriptor from the original image and any cache hits.
//! - One size failing to persist (directory creation, encode, write) skips
//!   that size only; the remaining sizes are still written.
//!
//! Nothing is retried here. A failed size is simply attempted again on the
//! next render pass that plans it.

use crate::breakpoints::Size;
use crate::imaging::ImageBackend;
use crate::render::Candidate;
use crate::store::VariantStore;
use std::path::Path;
use tracing::warn;

/// Generate and persist the given sizes, returning a candidate per variant
/// that made it to storage.
///
/// The reported width is read back from the generated image rather than the
/// requested size. Crop-resize produces exact dimensions, so the two agree,
/// but if a backend ever snaps dimensions the descriptor stays truthful.
pub fn generate(
    backend: &impl ImageBackend,
    store: &impl VariantStore,
    source: &Path,
    sizes: &[Size],
) -> Vec<Candidate> {
    if sizes.is_empty() {
        return Vec::new();
    }

    let images = match backend.crop_resize_batch(source, sizes) {
        Ok(images) => images,
        Err(error) => {
            warn!(
                source = %source.display(),
                %error,
                "crop-resize batch failed, descriptor will omit {} sizes",
                sizes.len()
            );
            return Vec::new();
        }
    };

    sizes
        .iter()
        .zip(images)
        .filter_map(|(&size, image)| match store.put(size, &image) {
            Ok(()) => Some(Candidate {
                url: store.url(size),
                width: image.width(),
            }),
            Err(error) => {
                warn!(%size, %error, "failed to persist variant, skipping");
                None
            }
        })
        .collect()
}
