//! Inline placeholder synthesis.
//!
//! The placeholder is a fully transparent bitmap whose pixel dimensions are
//! literally the reduced ratio numbers — a `16x9` image gets a 16×9-pixel
//! GIF. That keeps the payload to a few dozen bytes while still reserving
//! the correct layout box in the browser before the real candidate list is
//! fetched.

use crate::ratio::Ratio;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::codecs::gif::GifEncoder;
use image::{Frame, RgbaImage};

/// Build the placeholder `srcset` entry for a ratio: a `data:` URI holding
/// a transparent single-frame GIF, annotated with the ratio width as its
/// width descriptor.
pub fn srcset_entry(ratio: Ratio) -> Result<String, image::ImageError> {
    // A zeroed RGBA buffer is already fully transparent
    let canvas = RgbaImage::new(ratio.w, ratio.h);

    let mut bytes = Vec::new();
    GifEncoder::new(&mut bytes).encode_frame(Frame::new(canvas))?;

    Ok(format!(
        "data:image/gif;base64,{} {}w",
        STANDARD.encode(&bytes),
        ratio.w
    ))
}
