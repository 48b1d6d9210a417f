//! Engine configuration.
//!
//! One flat struct covering the knobs a host needs: where the site lives on
//! disk, what URL prefix it is served under, which tag kinds get processed,
//! and the JPEG quality for generated variants. Loadable from a TOML file;
//! every field has a sensible default so a missing file just means
//! [`EngineConfig::default`].
//!
//! The config also owns URL ↔ path resolution: tag `src` values are public
//! URLs, the pipeline works on filesystem paths, and the emitted markup
//! goes back to public URLs.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Filesystem root that public URLs resolve against.
    pub site_root: PathBuf,
    /// Public URL prefix of the site root. Empty when serving from the
    /// domain root; `"/sub"` when the site lives under a subpath.
    pub base_path: String,
    /// Process `<img>` tags. When false, image tags pass through untouched.
    pub process_images: bool,
    /// Process `<iframe>` tags. When false, frame tags pass through untouched.
    pub process_iframes: bool,
    /// JPEG encode quality for generated variants (1-100).
    pub quality: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            site_root: PathBuf::from("."),
            base_path: String::new(),
            process_images: true,
            process_iframes: true,
            quality: 90,
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file. Unknown keys are rejected to catch typos.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve a public URL (a tag's `src`) to a filesystem path under the
    /// site root.
    pub fn resolve_source(&self, src: &str) -> PathBuf {
        let path = src.strip_prefix(&self.base_path).unwrap_or(src);
        self.site_root.join(path.trim_start_matches('/'))
    }

    /// Map a filesystem path under the site root back to its public URL.
    pub fn public_url(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.site_root).unwrap_or(path);
        let rel = rel.to_string_lossy();
        format!(
            "{}/{}",
            self.base_path.trim_end_matches('/'),
            rel.trim_start_matches('/')
        )
    }
}
