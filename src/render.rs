//! Descriptor assembly and tag markup.
//!
//! The pipeline for one `<img>` tag: classify the ratio, plan breakpoints,
//! split the plan against the variant cache, generate what's missing, then
//! merge everything into a [`Descriptor`] — original image first, cache hits
//! next, fresh generations last — and serialize the tag.
//!
//! The emitted markup defers real loading to a browser-side consumer: the
//! live `srcset` holds only the inline placeholder, and the real candidate
//! list rides in `data-srcset` (`data-src` for frames). The consumer
//! observes the element entering the viewport, copies `data-src`/
//! `data-srcset` into the live attributes, and marks the element
//! `data-loaded="true"` — a second trigger on a loaded element is a no-op.
//! `data-placeholder-background`, when passed through, gives it a background
//! color to paint before the swap. That consumer is not part of this crate.
//!
//! Markup is composed with [maud]. The two tag forms carry dynamic `data-*`
//! attribute names, which the `html!` macro cannot express, so they
//! implement [`maud::Render`] directly and escape through [`maud::Escaper`]
//! — maud's extension point for custom markup.

use crate::attrs::{self, AttributeSet, DataAttr, IFRAME_ATTRS, IMG_ATTRS};
use crate::breakpoints::{self, Size};
use crate::config::EngineConfig;
use crate::imaging::{BackendError, ImageBackend};
use crate::placeholder;
use crate::ratio::{Ratio, RatioError};
use crate::store::{self, FsVariantStore, Quality};
use crate::thumbs;
use maud::{Escaper, Markup, Render, html};
use serde::Serialize;
use std::fmt;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fixed canvas for embedded frames; no resizing pipeline applies to them.
const IFRAME_WIDTH: u32 = 3200;
const IFRAME_HEIGHT: u32 = 1800;

/// Failures that abort one tag's processing. Never more than one tag:
/// callers render other tags regardless.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Ratio(#[from] RatioError),
    #[error("failed to identify source image: {0}")]
    Identify(#[from] BackendError),
    #[error("placeholder encoding failed: {0}")]
    Placeholder(#[from] image::ImageError),
    /// Only produced by [`inspect`]; rendering recovers from a missing
    /// source with an inline fragment instead.
    #[error("source image not found: {}", .0.display())]
    SourceNotFound(PathBuf),
}

/// One `srcset` candidate: a public URL and its width descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub url: String,
    pub width: u32,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}w", self.url, self.width)
    }
}

/// Ordered candidate list. The original full-size image always leads;
/// cache hits and fresh generations follow in resolution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Descriptor(pub Vec<Candidate>);

impl Descriptor {
    /// Comma-joined `"url Ww"` form for a `srcset`-shaped attribute.
    pub fn srcset(&self) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Render the responsive form of an image tag.
///
/// A missing source file is a content error, not a fault: the return is
/// `Ok` with an inline fragment naming the attempted path, and page
/// rendering continues.
pub fn render_image(
    cfg: &EngineConfig,
    backend: &impl ImageBackend,
    src: &str,
    attrs: &AttributeSet,
) -> Result<Markup, RenderError> {
    let path = cfg.resolve_source(src);
    if !path.exists() {
        return Ok(missing_source(&path));
    }

    let dims = backend.identify(&path)?;
    let ratio = Ratio::of(dims.width, dims.height)?;

    let public_dir = cfg.public_url(path.parent().unwrap_or(Path::new("")));
    let store = FsVariantStore::for_source(&path, &public_dir, Quality::new(cfg.quality));

    let plan = breakpoints::plan(ratio, dims.width);
    let (satisfied, to_generate) = store::partition(&store, &plan, dims.width);
    let generated = thumbs::generate(backend, &store, &path, &to_generate);

    let mut candidates = Vec::with_capacity(1 + satisfied.len() + generated.len());
    candidates.push(Candidate {
        url: cfg.public_url(&path),
        width: dims.width,
    });
    candidates.extend(satisfied);
    candidates.extend(generated);

    let tag = ImageTag {
        width: dims.width,
        height: dims.height,
        src: cfg.public_url(&path),
        placeholder: placeholder::srcset_entry(ratio)?,
        data_srcset: Descriptor(candidates).srcset(),
        attrs,
    };
    Ok(tag.render())
}

/// Render the embedded-frame form. Fixed canvas, no filesystem effects.
pub fn render_iframe(src: &str, attrs: &AttributeSet) -> Markup {
    IframeTag {
        src: src.trim_start_matches('/'),
        attrs,
    }
    .render()
}

/// Tag-level entry point: rewrite a raw `<img>` tag, honoring the image
/// feature flag. Tags without a usable `src` pass through untouched.
pub fn rewrite_image_tag(
    cfg: &EngineConfig,
    backend: &impl ImageBackend,
    tag: &str,
) -> Result<String, RenderError> {
    if !cfg.process_images {
        return Ok(tag.to_string());
    }
    let map = attrs::extract(tag, IMG_ATTRS);
    let Some(src) = map.get("src").filter(|s| !s.is_empty()).cloned() else {
        return Ok(tag.to_string());
    };
    let attrs = AttributeSet::from_mapping(&map);
    Ok(render_image(cfg, backend, &src, &attrs)?.into_string())
}

/// Tag-level entry point: rewrite a raw `<iframe>` tag, honoring the frame
/// feature flag.
pub fn rewrite_iframe_tag(cfg: &EngineConfig, tag: &str) -> String {
    if !cfg.process_iframes {
        return tag.to_string();
    }
    let map = attrs::extract(tag, IFRAME_ATTRS);
    let Some(src) = map.get("src").filter(|s| !s.is_empty()).cloned() else {
        return tag.to_string();
    };
    let attrs = AttributeSet::from_mapping(&map);
    render_iframe(&src, &attrs).into_string()
}

/// What one image's pipeline would do, without generating anything.
/// Inspection surface for the CLI `plan` subcommand.
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub source: String,
    pub width: u32,
    pub height: u32,
    pub ratio: String,
    pub cached: Vec<Candidate>,
    pub to_generate: Vec<Size>,
}

pub fn inspect(
    cfg: &EngineConfig,
    backend: &impl ImageBackend,
    src: &str,
) -> Result<PlanReport, RenderError> {
    let path = cfg.resolve_source(src);
    if !path.exists() {
        return Err(RenderError::SourceNotFound(path));
    }

    let dims = backend.identify(&path)?;
    let ratio = Ratio::of(dims.width, dims.height)?;

    let public_dir = cfg.public_url(path.parent().unwrap_or(Path::new("")));
    let store = FsVariantStore::for_source(&path, &public_dir, Quality::new(cfg.quality));
    let plan = breakpoints::plan(ratio, dims.width);
    let (cached, to_generate) = store::partition(&store, &plan, dims.width);

    Ok(PlanReport {
        source: path.display().to_string(),
        width: dims.width,
        height: dims.height,
        ratio: ratio.to_string(),
        cached,
        to_generate,
    })
}

/// Inline fragment for a source path that does not exist on disk.
fn missing_source(path: &Path) -> Markup {
    let attempted = path.display().to_string();
    html! {
        br;
        "[Image could not be loaded]"
        br;
        "[" (attempted) "]"
        br;
    }
}

struct ImageTag<'a> {
    width: u32,
    height: u32,
    src: String,
    placeholder: String,
    data_srcset: String,
    attrs: &'a AttributeSet,
}

impl Render for ImageTag<'_> {
    fn render_to(&self, buf: &mut String) {
        buf.push_str("<img");
        push_attr(buf, "width", &self.width.to_string());
        push_attr(buf, "height", &self.height.to_string());
        push_attr(buf, "src", &self.src);
        // Non-JS agents see only the placeholder until the consumer swaps
        // data-srcset in
        push_attr(buf, "srcset", &self.placeholder);
        push_attr(buf, "alt", &self.attrs.alt);
        if let Some(class) = &self.attrs.class {
            push_attr(buf, "class", class);
        }
        push_attr(buf, "sizes", self.attrs.sizes_or_default());
        push_data_attrs(buf, &self.attrs.data);
        push_attr(buf, "data-srcset", &self.data_srcset);
        push_attr(buf, "decoding", "async");
        push_attr(buf, "itemprop", "image");
        buf.push('>');
    }
}

struct IframeTag<'a> {
    src: &'a str,
    attrs: &'a AttributeSet,
}

impl Render for IframeTag<'_> {
    fn render_to(&self, buf: &mut String) {
        // Bare src: nothing loads until the consumer copies data-src in
        buf.push_str("<iframe src");
        push_attr(buf, "width", &IFRAME_WIDTH.to_string());
        push_attr(buf, "height", &IFRAME_HEIGHT.to_string());
        if let Some(title) = &self.attrs.title {
            push_attr(buf, "title", title);
        }
        if let Some(class) = &self.attrs.class {
            push_attr(buf, "class", class);
        }
        push_data_attrs(buf, &self.attrs.data);
        push_attr(buf, "data-src", self.src);
        buf.push_str(" allowfullscreen></iframe>");
    }
}

fn push_attr(buf: &mut String, name: &str, value: &str) {
    buf.push(' ');
    buf.push_str(name);
    buf.push_str("=\"");
    let _ = Escaper::new(buf).write_str(value);
    buf.push('"');
}

/// Passthrough data attributes. Names are constrained to
/// `data-[a-zA-Z0-9-]+` by extraction, so they are written unescaped;
/// values go through the escaper like any other attribute.
fn push_data_attrs(buf: &mut String, data: &[DataAttr]) {
    for attr in data {
        match &attr.value {
            Some(value) => push_attr(buf, &attr.name, value),
            None => {
                buf.push(' ');
                buf.push_str(&attr.name);
            }
        }
    }
}
