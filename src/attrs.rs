//! Attribute extraction and passthrough.
//!
//! The renderer never scans documents — a front end hands it the raw text
//! of a single tag. This module is the one place that text is interpreted:
//! [`extract`] pulls the wanted attributes out of a tag string, and
//! [`AttributeSet`] is the typed result the renderer consumes, with the
//! documented defaults applied at render time.
//!
//! `data-*` attributes are passed through to the output tag so they reach
//! the lazy-load consumer (`data-placeholder-background` in particular
//! keeps its value). The engine-owned names `data-src`, `data-srcset` and
//! `data-loaded` are never passed through — the first two are rewritten by
//! the engine itself and the last belongs to the consumer.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Default `sizes` attribute when the source tag carries none.
pub const DEFAULT_SIZES: &str = "(max-width: 1200px) 100vw, 3200px";

/// Attributes the engine cares about on an `<img>` tag. `"data"` is a
/// pseudo-name expanding to every `data-*` attribute present.
pub const IMG_ATTRS: &[&str] = &["src", "alt", "class", "sizes", "data"];

/// Attributes the engine cares about on an `<iframe>` tag.
pub const IFRAME_ATTRS: &[&str] = &["src", "title", "class", "data"];

/// Engine-owned attribute names, excluded from passthrough.
const RESERVED_DATA: &[&str] = &["data-src", "data-srcset", "data-loaded"];

static PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([a-zA-Z][a-zA-Z0-9-]*)\s*=\s*"([^"]*)""#).unwrap());

static DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(data-[a-zA-Z0-9-]+)(?:\s*=\s*"([^"]*)")?"#).unwrap());

/// Extract the wanted attributes from a single tag's raw text.
///
/// Returns a name → value mapping. The pseudo-name `"data"` expands to
/// every `data-*` attribute found (reserved names excluded), with bare
/// attributes mapping to the empty string. `alt` is always present in the
/// result, defaulting to empty — it must be emitted even when blank.
pub fn extract(tag: &str, wanted: &[&str]) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();

    for &name in wanted {
        if name == "data" {
            for caps in DATA_RE.captures_iter(tag) {
                let attr = &caps[1];
                if RESERVED_DATA.contains(&attr) {
                    continue;
                }
                let value = caps.get(2).map(|m| m.as_str()).unwrap_or("");
                map.insert(attr.to_string(), value.to_string());
            }
        } else if let Some(value) = find_attr(tag, name) {
            map.insert(name.to_string(), value);
        } else if name == "alt" {
            map.insert("alt".to_string(), String::new());
        }
    }

    map
}

/// Value of a single `name="value"` attribute, case-insensitive on name.
fn find_attr(tag: &str, name: &str) -> Option<String> {
    PAIR_RE
        .captures_iter(tag)
        .find(|caps| caps[1].eq_ignore_ascii_case(name))
        .map(|caps| caps[2].to_string())
}

/// A passthrough `data-*` attribute. `value: None` renders as a bare
/// attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataAttr {
    pub name: String,
    pub value: Option<String>,
}

/// Rendering attributes passed through to the output tag.
///
/// Defaults: `alt` is always emitted (empty by default), `class` and
/// `title` are omitted when absent or empty, `sizes` falls back to
/// [`DEFAULT_SIZES`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    pub alt: String,
    pub class: Option<String>,
    pub sizes: Option<String>,
    pub title: Option<String>,
    pub data: Vec<DataAttr>,
}

impl AttributeSet {
    /// Build from an [`extract`]ed mapping.
    pub fn from_mapping(map: &BTreeMap<String, String>) -> Self {
        let non_empty = |key: &str| map.get(key).filter(|v| !v.is_empty()).cloned();

        Self {
            alt: map.get("alt").cloned().unwrap_or_default(),
            class: non_empty("class"),
            sizes: non_empty("sizes"),
            title: non_empty("title"),
            data: map
                .iter()
                .filter(|(name, _)| name.starts_with("data-"))
                .map(|(name, value)| DataAttr {
                    name: name.clone(),
                    value: (!value.is_empty()).then(|| value.clone()),
                })
                .collect(),
        }
    }

    /// Convenience: extract + type in one step.
    pub fn from_tag(tag: &str, wanted: &[&str]) -> Self {
        Self::from_mapping(&extract(tag, wanted))
    }

    /// Effective `sizes` attribute with the documented default applied.
    pub fn sizes_or_default(&self) -> &str {
        self.sizes.as_deref().unwrap_or(DEFAULT_SIZES)
    }
}
