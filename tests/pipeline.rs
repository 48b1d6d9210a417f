//! End-to-end pipeline tests against real files.
//!
//! These run the full render path — identify, plan, cache partition,
//! crop-resize generation, markup — with the production backend and
//! synthetic images in temp directories. Sources are kept small so the
//! Lanczos3 resizes stay fast in debug builds.

use image::{ImageEncoder, RgbImage};
use respimg::attrs::AttributeSet;
use respimg::config::EngineConfig;
use respimg::imaging::RustBackend;
use respimg::render;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn create_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

fn create_png(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 64])
    });
    img.save(path).unwrap();
}

fn cfg_rooted(root: &Path) -> EngineConfig {
    EngineConfig {
        site_root: root.to_path_buf(),
        ..EngineConfig::default()
    }
}

fn render_markup(cfg: &EngineConfig, src: &str) -> String {
    render::render_image(cfg, &RustBackend::new(), src, &AttributeSet::default())
        .unwrap()
        .into_string()
}

#[test]
fn sixteen_nine_source_generates_curated_variant() {
    let tmp = TempDir::new().unwrap();
    create_jpeg(&tmp.path().join("source.jpg"), 400, 225);
    let cfg = cfg_rooted(tmp.path());

    let html = render_markup(&cfg, "/source.jpg");

    // Only the 320x180 curated entry is below the 400px source width
    assert!(html.contains("data-srcset=\"/source.jpg 400w, /thumbs/320x180/source.jpg 320w\""));

    let variant = image::open(tmp.path().join("thumbs/320x180/source.jpg")).unwrap();
    assert_eq!((variant.width(), variant.height()), (320, 180));
}

#[test]
fn second_render_is_identical_and_reuses_the_cache() {
    let tmp = TempDir::new().unwrap();
    create_jpeg(&tmp.path().join("source.jpg"), 400, 225);
    let cfg = cfg_rooted(tmp.path());

    let first = render_markup(&cfg, "/source.jpg");

    // Replace the variant with sentinel bytes; a cache hit must leave them
    // alone, since existence at the conventional path is the whole contract.
    let variant_path = tmp.path().join("thumbs/320x180/source.jpg");
    fs::write(&variant_path, b"sentinel").unwrap();

    let second = render_markup(&cfg, "/source.jpg");

    assert_eq!(first, second);
    assert_eq!(fs::read(&variant_path).unwrap(), b"sentinel");
}

#[test]
fn partial_cache_generates_only_the_missing_sizes() {
    let tmp = TempDir::new().unwrap();
    create_jpeg(&tmp.path().join("source.jpg"), 500, 500);
    let cfg = cfg_rooted(tmp.path());

    // Plan for a 500px 1x1 source: 400x400, 200x200, 100x100.
    // Pre-seed one of the three.
    fs::create_dir_all(tmp.path().join("thumbs/200x200")).unwrap();
    fs::write(tmp.path().join("thumbs/200x200/source.jpg"), b"seeded").unwrap();

    let html = render_markup(&cfg, "/source.jpg");

    // The seeded size was not regenerated
    assert_eq!(
        fs::read(tmp.path().join("thumbs/200x200/source.jpg")).unwrap(),
        b"seeded"
    );
    // The other two were
    for size in ["400x400", "100x100"] {
        let variant = image::open(tmp.path().join(format!("thumbs/{size}/source.jpg"))).unwrap();
        let expected: u32 = size.split('x').next().unwrap().parse().unwrap();
        assert_eq!(variant.width(), expected);
    }

    // All four candidates present: original + 1 cached + 2 generated,
    // cache hits ahead of fresh generations
    let srcset = html
        .split("data-srcset=\"")
        .nth(1)
        .unwrap()
        .split('"')
        .next()
        .unwrap();
    assert_eq!(
        srcset,
        "/source.jpg 500w, /thumbs/200x200/source.jpg 200w, \
         /thumbs/400x400/source.jpg 400w, /thumbs/100x100/source.jpg 100w"
    );
}

#[test]
fn non_curated_ratio_takes_the_width_ladder() {
    let tmp = TempDir::new().unwrap();
    // 7x5 has no curated entry; 350px source keeps ladder widths 300/200/100
    create_jpeg(&tmp.path().join("source.jpg"), 350, 250);
    let cfg = cfg_rooted(tmp.path());

    render_markup(&cfg, "/source.jpg");

    for (size, w, h) in [("300x210", 300, 210), ("200x140", 200, 140), ("100x70", 100, 70)] {
        let variant = image::open(tmp.path().join(format!("thumbs/{size}/source.jpg"))).unwrap();
        assert_eq!((variant.width(), variant.height()), (w, h), "variant {size}");
    }
}

#[test]
fn png_source_keeps_extension_and_codec() {
    let tmp = TempDir::new().unwrap();
    create_png(&tmp.path().join("diagram.png"), 400, 225);
    let cfg = cfg_rooted(tmp.path());

    let html = render_markup(&cfg, "/diagram.png");

    assert!(html.contains("/thumbs/320x180/diagram.png 320w"));
    let path = tmp.path().join("thumbs/320x180/diagram.png");
    let variant = image::ImageReader::open(&path)
        .unwrap()
        .with_guessed_format()
        .unwrap();
    // Codec follows the source extension, verified from the magic bytes
    assert_eq!(variant.format(), Some(image::ImageFormat::Png));
}

#[test]
fn missing_source_renders_inline_fragment_without_side_effects() {
    let tmp = TempDir::new().unwrap();
    let cfg = cfg_rooted(tmp.path());

    let html = render_markup(&cfg, "/absent.jpg");

    assert!(html.contains("Image could not be loaded"));
    assert!(html.contains(&tmp.path().join("absent.jpg").display().to_string()));
    assert!(!tmp.path().join("thumbs").exists());
}

#[test]
fn iframe_rewrite_has_no_filesystem_effects() {
    let tmp = TempDir::new().unwrap();
    let cfg = cfg_rooted(tmp.path());

    let html = render::rewrite_iframe_tag(
        &cfg,
        r#"<iframe src="embed/video123" title="Clip"></iframe>"#,
    );

    assert!(html.contains("width=\"3200\""));
    assert!(html.contains("height=\"1800\""));
    assert!(html.contains("data-src=\"embed/video123\""));
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn full_tag_rewrite_round_trip() {
    let tmp = TempDir::new().unwrap();
    create_jpeg(&tmp.path().join("hero.jpg"), 400, 225);
    let cfg = cfg_rooted(tmp.path());

    let html = render::rewrite_image_tag(
        &cfg,
        &RustBackend::new(),
        r##"<img src="/hero.jpg" alt="Dawn" class="wide" data-placeholder-background="#222">"##,
    )
    .unwrap();

    assert!(html.starts_with("<img width=\"400\" height=\"225\" src=\"/hero.jpg\""));
    assert!(html.contains("alt=\"Dawn\""));
    assert!(html.contains("class=\"wide\""));
    assert!(html.contains("data-placeholder-background=\"#222\""));
    assert!(html.contains("data-srcset=\"/hero.jpg 400w, /thumbs/320x180/hero.jpg 320w\""));
}
