use clap::{Parser, Subcommand};
use respimg::attrs::{AttributeSet, DataAttr};
use respimg::config::EngineConfig;
use respimg::imaging::RustBackend;
use respimg::render;
use std::io::Read as _;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "respimg")]
#[command(version)]
#[command(about = "Responsive image markup generator with a filesystem thumbnail cache")]
#[command(long_about = "\
Responsive image markup generator with a filesystem thumbnail cache

Given a source image, respimg plans resized variants for the image's aspect
ratio, reuses variants already on disk, generates the missing ones with an
exact crop-resize, and prints lazy-loading-ready markup: the real candidate
list rides in data-srcset and the live srcset holds only a tiny transparent
placeholder.

Cache layout (next to each source image):

  albums/
  ├── dawn.jpg                    # source
  └── thumbs/
      ├── 2816x1584/dawn.jpg      # one directory per variant size
      ├── 1600x900/dawn.jpg
      └── ...

A variant that exists at its conventional path is reused as-is and never
regenerated. Logging goes to stderr; tune it with RUST_LOG (e.g.
RUST_LOG=respimg=debug to see cache hits).")]
struct Cli {
    /// Optional TOML config file; the flags below override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Filesystem root that public URLs resolve against
    #[arg(long, global = true)]
    site_root: Option<PathBuf>,

    /// Public URL prefix of the site root (e.g. "/sub")
    #[arg(long, global = true)]
    base_path: Option<String>,

    /// JPEG quality for generated variants (1-100)
    #[arg(long, global = true)]
    quality: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render responsive <img> markup for a source image
    Render {
        /// Public URL of the source image, resolved against --site-root
        src: String,

        #[arg(long, default_value = "")]
        alt: String,

        #[arg(long)]
        class: Option<String>,

        #[arg(long)]
        sizes: Option<String>,

        /// Passthrough data attribute, NAME or NAME=VALUE; repeatable
        #[arg(long = "data", value_name = "NAME[=VALUE]")]
        data: Vec<String>,
    },
    /// Render lazy-loading <iframe> markup for an embed URL
    Iframe {
        src: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        class: Option<String>,
    },
    /// Rewrite a single raw tag (from the argument or stdin)
    Rewrite {
        /// Raw tag text; read from stdin when omitted
        tag: Option<String>,

        /// Treat the input as an <iframe> tag
        #[arg(long)]
        iframe: bool,
    },
    /// Show the variant plan and cache state without generating anything
    Plan {
        src: String,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(site_root) = cli.site_root {
        cfg.site_root = site_root;
    }
    if let Some(base_path) = cli.base_path {
        cfg.base_path = base_path;
    }
    if let Some(quality) = cli.quality {
        cfg.quality = quality;
    }

    let backend = RustBackend::new();

    match cli.command {
        Command::Render {
            src,
            alt,
            class,
            sizes,
            data,
        } => {
            let attrs = AttributeSet {
                alt,
                class,
                sizes,
                title: None,
                data: data.iter().map(|raw| parse_data_flag(raw)).collect(),
            };
            let markup = render::render_image(&cfg, &backend, &src, &attrs)?;
            println!("{}", markup.into_string());
        }
        Command::Iframe { src, title, class } => {
            let attrs = AttributeSet {
                title,
                class,
                ..AttributeSet::default()
            };
            println!("{}", render::render_iframe(&src, &attrs).into_string());
        }
        Command::Rewrite { tag, iframe } => {
            let tag = match tag {
                Some(tag) => tag,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let tag = tag.trim();
            if iframe {
                println!("{}", render::rewrite_iframe_tag(&cfg, tag));
            } else {
                println!("{}", render::rewrite_image_tag(&cfg, &backend, tag)?);
            }
        }
        Command::Plan { src, json } => {
            let report = render::inspect(&cfg, &backend, &src)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{} ({}x{}, ratio {})",
                    report.source, report.width, report.height, report.ratio
                );
                for hit in &report.cached {
                    println!("  cached       {} ({}w)", hit.url, hit.width);
                }
                for size in &report.to_generate {
                    println!("  to generate  {size}");
                }
                if report.cached.is_empty() && report.to_generate.is_empty() {
                    println!("  (source smaller than every breakpoint; original only)");
                }
            }
        }
    }

    Ok(())
}

/// Parse a `--data` flag value: `NAME` or `NAME=VALUE`. The `data-` prefix
/// may be omitted on the command line.
fn parse_data_flag(raw: &str) -> DataAttr {
    match raw.split_once('=') {
        Some((name, value)) => DataAttr {
            name: with_data_prefix(name),
            value: Some(value.to_string()),
        },
        None => DataAttr {
            name: with_data_prefix(raw),
            value: None,
        },
    }
}

fn with_data_prefix(name: &str) -> String {
    if name.starts_with("data-") {
        name.to_string()
    } else {
        format!("data-{name}")
    }
}
