//! # respimg
//!
//! Responsive image markup generation with a filesystem thumbnail cache.
//! Given a source raster image and its declared attributes, respimg plans a
//! ladder of resized variants for the image's aspect ratio, reuses any
//! variant already on disk, generates the rest with an exact crop-resize,
//! and serializes everything into a width-annotated candidate list plus a
//! tiny inline placeholder.
//!
//! # Pipeline
//!
//! One `<img>` tag flows through five stages:
//!
//! ```text
//! classify  (w, h)      →  reduced ratio "16x9"
//! plan      ratio       →  ordered WxH targets below the source width
//! partition plan        →  (cache hits, sizes to generate)
//! generate  misses      →  crop-resize + persist, tolerating failure
//! assemble  everything  →  <img … data-srcset="url Ww, …">
//! ```
//!
//! `<iframe>` tags skip the pipeline entirely: fixed 3200×1800 canvas,
//! `data-src` passthrough, no filesystem effects.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`ratio`] | Reduced aspect-ratio classification |
//! | [`breakpoints`] | Curated size tables, width ladder, variant planning |
//! | [`store`] | Variant cache: path-convention keyed filesystem store |
//! | [`imaging`] | Backend seam: identify + batched crop-resize |
//! | [`thumbs`] | Generation of missing variants with partial-failure policy |
//! | [`placeholder`] | Transparent ratio-sized inline GIF |
//! | [`attrs`] | Attribute extraction from raw tag text, passthrough set |
//! | [`render`] | Descriptor assembly and tag markup |
//! | [`config`] | Site root / base path / feature flags / quality |
//!
//! # Design Decisions
//!
//! ## The Filesystem Is the Cache
//!
//! A variant of `photo.jpg` at 800×450 lives at `thumbs/800x450/photo.jpg`
//! next to its source, and its existence there is the entire cache
//! contract — no manifest, no checksums, no invalidation. A file that
//! exists is never regenerated or verified. The layout is deliberately
//! human-navigable so external tooling can prune or pre-warm it.
//!
//! ## Degrade, Don't Fail
//!
//! Every failure past "the source file exists" is local: a failed
//! crop-resize batch shrinks the candidate list, a failed write skips one
//! size, and a missing source renders an inline notice instead of a tag.
//! Recoveries are logged through `tracing` rather than surfaced as errors,
//! because a page with a less complete `srcset` beats no page.
//!
//! ## Maud Over Template Engines
//!
//! Markup goes through [Maud](https://maud.lambda.xyz/): compile-time
//! checked, auto-escaped, no template files to ship. The two tag forms
//! carry caller-supplied `data-*` attribute *names*, which no template
//! macro can express statically, so they implement `maud::Render` directly
//! against maud's `Escaper`.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, crop-resizing (Lanczos3 via `resize_to_fill`) and encoding all
//! come from the `image` crate — no ImageMagick, no system libraries. The
//! output codec always matches the source extension (webp/png/gif, default
//! jpeg), so a cached variant sits beside its source with the same suffix.
//!
//! ## Synchronous by Design
//!
//! One invocation renders one tag, inline, with blocking I/O. Hosts that
//! want parallel rendering run invocations on their own workers; two
//! concurrent cold-cache renders of the same variant may both generate it,
//! which is wasteful but correct — writes are whole-file and deterministic.

pub mod attrs;
pub mod breakpoints;
pub mod config;
pub mod imaging;
pub mod placeholder;
pub mod ratio;
pub mod render;
pub mod store;
pub mod thumbs;
