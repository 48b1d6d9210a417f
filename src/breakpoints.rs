//! Breakpoint planning: which resized variants should exist for an image.
//!
//! Two sources of truth, tried in order:
//!
//! 1. [`SIZE_TABLE`] — a curated per-ratio matrix of `WxH` targets, widest
//!    first, for the ratios photographers and CMS themes actually use.
//! 2. [`WIDTH_LADDER`] — a generic descending width ladder for everything
//!    else. Heights are derived from the ratio and a candidate is kept only
//!    when the derived height is a multiple of 10, which filters out
//!    odd/sub-pixel thumbnail dimensions.
//!
//! Either way the plan is filtered to widths strictly below the source
//! width — variants are never upscaled.

use crate::ratio::Ratio;
use serde::Serialize;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// A single `WxH` variant target. `Display`/`FromStr` round-trip through the
/// `"WxH"` form used in cache directory names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

#[derive(Error, Debug)]
pub enum ParseSizeError {
    #[error("expected WxH, got {0:?}")]
    Malformed(String),
    #[error("invalid number in size: {0}")]
    BadNumber(#[from] ParseIntError),
}

impl FromStr for Size {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once('x')
            .ok_or_else(|| ParseSizeError::Malformed(s.to_string()))?;
        Ok(Self {
            w: w.parse()?,
            h: h.parse()?,
        })
    }
}

const fn sz(w: u32, h: u32) -> Size {
    Size::new(w, h)
}

/// Curated variant targets per reduced ratio, widest first.
pub static SIZE_TABLE: &[(&str, &[Size])] = &[
    (
        "1x1",
        &[
            sz(3200, 3200),
            sz(2800, 2800),
            sz(2400, 2400),
            sz(2000, 2000),
            sz(1600, 1600),
            sz(1200, 1200),
            sz(1000, 1000),
            sz(800, 800),
            sz(600, 600),
            sz(400, 400),
            sz(200, 200),
            sz(100, 100),
        ],
    ),
    (
        "1x2",
        &[
            sz(1600, 3200),
            sz(1400, 2800),
            sz(1200, 2400),
            sz(1000, 2000),
            sz(800, 1600),
            sz(600, 1200),
            sz(500, 1000),
            sz(400, 800),
            sz(300, 600),
            sz(200, 400),
            sz(100, 200),
        ],
    ),
    (
        "2x1",
        &[
            sz(3200, 1600),
            sz(2800, 1400),
            sz(2400, 1200),
            sz(2000, 1000),
            sz(1600, 800),
            sz(1200, 600),
            sz(1000, 500),
            sz(800, 400),
            sz(600, 300),
            sz(400, 200),
            sz(200, 100),
        ],
    ),
    (
        "1x3",
        &[
            sz(1000, 3000),
            sz(900, 2700),
            sz(800, 2400),
            sz(700, 2100),
            sz(600, 1800),
            sz(500, 1500),
            sz(400, 1200),
            sz(300, 900),
            sz(250, 750),
            sz(125, 375),
        ],
    ),
    (
        "3x1",
        &[
            sz(3000, 1000),
            sz(2700, 900),
            sz(2400, 800),
            sz(2100, 700),
            sz(1800, 600),
            sz(1500, 500),
            sz(1200, 400),
            sz(900, 300),
            sz(750, 250),
            sz(375, 125),
        ],
    ),
    (
        "2x3",
        &[
            sz(2000, 3000),
            sz(1800, 2700),
            sz(1600, 2400),
            sz(1200, 1800),
            sz(1000, 1500),
            sz(800, 1200),
            sz(600, 900),
            sz(500, 750),
            sz(400, 600),
            sz(200, 300),
        ],
    ),
    (
        "3x2",
        &[
            sz(3000, 2000),
            sz(2700, 1800),
            sz(2400, 1600),
            sz(1800, 1200),
            sz(1500, 1000),
            sz(1200, 800),
            sz(900, 600),
            sz(750, 500),
            sz(600, 400),
            sz(300, 200),
        ],
    ),
    (
        "1x4",
        &[
            sz(1000, 4000),
            sz(900, 3600),
            sz(800, 3200),
            sz(700, 2800),
            sz(600, 2400),
            sz(500, 2000),
            sz(400, 1600),
            sz(300, 1200),
            sz(200, 800),
            sz(100, 400),
        ],
    ),
    (
        "4x1",
        &[
            sz(4000, 1000),
            sz(3600, 900),
            sz(3200, 800),
            sz(2800, 700),
            sz(2400, 600),
            sz(2000, 500),
            sz(1600, 400),
            sz(1200, 300),
            sz(800, 200),
            sz(400, 100),
        ],
    ),
    (
        "3x4",
        &[
            sz(2400, 3200),
            sz(2100, 2800),
            sz(1800, 2400),
            sz(1500, 2000),
            sz(1200, 1600),
            sz(900, 1200),
            sz(750, 1000),
            sz(600, 800),
            sz(450, 600),
            sz(300, 400),
            sz(150, 200),
        ],
    ),
    (
        "4x3",
        &[
            sz(3200, 2400),
            sz(2800, 2100),
            sz(2400, 1800),
            sz(2000, 1500),
            sz(1600, 1200),
            sz(1200, 900),
            sz(1000, 750),
            sz(800, 600),
            sz(600, 450),
            sz(400, 300),
            sz(200, 150),
        ],
    ),
    (
        "16x9",
        &[
            sz(3200, 1800),
            sz(2816, 1584),
            sz(2560, 1440),
            sz(2048, 1152),
            sz(1600, 900),
            sz(1280, 720),
            sz(960, 540),
            sz(800, 450),
            sz(640, 360),
            sz(400, 225),
            sz(320, 180),
        ],
    ),
    (
        "9x16",
        &[
            sz(1800, 3200),
            sz(1584, 2816),
            sz(1440, 2560),
            sz(1152, 2048),
            sz(900, 1600),
            sz(720, 1280),
            sz(540, 960),
            sz(450, 800),
            sz(360, 640),
            sz(225, 400),
            sz(180, 320),
        ],
    ),
    (
        "25x10",
        &[
            sz(3200, 1280),
            sz(2800, 1120),
            sz(2500, 1000),
            sz(2000, 800),
            sz(1600, 640),
            sz(1250, 500),
            sz(800, 320),
            sz(625, 250),
            sz(400, 160),
            sz(200, 80),
        ],
    ),
    (
        "10x25",
        &[
            sz(1280, 3200),
            sz(1120, 2800),
            sz(1000, 2500),
            sz(800, 2000),
            sz(640, 1600),
            sz(500, 1250),
            sz(320, 800),
            sz(250, 625),
            sz(160, 400),
            sz(80, 200),
        ],
    ),
];

/// Candidate widths for ratios without a curated entry, strictly descending.
pub static WIDTH_LADDER: &[u32] = &[
    4000, 3600, 3200, 2800, 2400, 2000, 1600, 1200, 800, 600, 400, 300, 200, 100,
];

/// Look up the curated size list for a canonical ratio key.
pub fn curated(ratio_key: &str) -> Option<&'static [Size]> {
    SIZE_TABLE
        .iter()
        .find(|(key, _)| *key == ratio_key)
        .map(|(_, sizes)| *sizes)
}

/// Plan the ordered list of variant targets for an image.
///
/// Curated ratios get their table entries; anything else gets ladder widths
/// with heights derived by integer division (`w / ratio.w * ratio.h`), kept
/// only when the height lands on a multiple of 10. Both paths keep only
/// widths strictly below `source_width`, so a source narrower than every
/// target yields an empty plan and the descriptor falls back to the
/// original image alone.
pub fn plan(ratio: Ratio, source_width: u32) -> Vec<Size> {
    if let Some(sizes) = curated(&ratio.to_string()) {
        return sizes
            .iter()
            .copied()
            .filter(|size| size.w < source_width)
            .collect();
    }

    WIDTH_LADDER
        .iter()
        .copied()
        .filter(|&w| w < source_width)
        .filter_map(|w| {
            let h = w / ratio.w * ratio.h;
            (h % 10 == 0).then_some(Size::new(w, h))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(w: u32, h: u32) -> Ratio {
        Ratio::of(w, h).unwrap()
    }

    // =========================================================================
    // Table integrity
    // =========================================================================

    #[test]
    fn table_entries_match_their_ratio() {
        for (key, sizes) in SIZE_TABLE {
            let bucket: Size = key.parse().unwrap();
            for size in *sizes {
                assert_eq!(
                    Ratio::of(size.w, size.h).unwrap(),
                    Ratio::of(bucket.w, bucket.h).unwrap(),
                    "{size} does not have ratio {key}"
                );
            }
        }
    }

    #[test]
    fn table_entries_are_width_descending() {
        for (key, sizes) in SIZE_TABLE {
            for pair in sizes.windows(2) {
                assert!(pair[0].w > pair[1].w, "{key} is not widest-first");
            }
        }
    }

    #[test]
    fn ladder_is_strictly_descending() {
        for pair in WIDTH_LADDER.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    // =========================================================================
    // Size parsing
    // =========================================================================

    #[test]
    fn size_display_round_trips() {
        let size = Size::new(2816, 1584);
        assert_eq!(size.to_string(), "2816x1584");
        assert_eq!("2816x1584".parse::<Size>().unwrap(), size);
    }

    #[test]
    fn size_parse_rejects_garbage() {
        assert!("wide".parse::<Size>().is_err());
        assert!("100x".parse::<Size>().is_err());
        assert!("x100".parse::<Size>().is_err());
    }

    // =========================================================================
    // Curated planning
    // =========================================================================

    #[test]
    fn curated_plan_filters_to_below_source_width() {
        // 3200x1800 source: the 3200-wide entry equals the source width and
        // is excluded; the first included entry is 2816x1584.
        let plan = plan(ratio(3200, 1800), 3200);
        assert_eq!(plan.first(), Some(&Size::new(2816, 1584)));
        assert!(plan.iter().all(|s| s.w < 3200));
        assert_eq!(plan.len(), 10);
    }

    #[test]
    fn curated_plan_preserves_table_order() {
        let plan = plan(ratio(2000, 2000), 1300);
        assert_eq!(
            plan,
            vec![
                Size::new(1200, 1200),
                Size::new(1000, 1000),
                Size::new(800, 800),
                Size::new(600, 600),
                Size::new(400, 400),
                Size::new(200, 200),
                Size::new(100, 100),
            ]
        );
    }

    #[test]
    fn tiny_source_yields_empty_plan() {
        assert!(plan(ratio(96, 54), 96).is_empty());
    }

    // =========================================================================
    // Ladder planning (non-curated ratios)
    // =========================================================================

    #[test]
    fn ladder_plan_derives_heights_by_integer_division() {
        // 7x5 has no curated entry. For each ladder width under the source,
        // h = w / 7 * 5 (integer division), kept only when h % 10 == 0.
        let plan = plan(ratio(1050, 750), 1050);
        assert_eq!(
            plan,
            vec![
                Size::new(800, 570), // 800/7 = 114, *5 = 570
                Size::new(300, 210),
                Size::new(200, 140),
                Size::new(100, 70),
            ]
        );
    }

    #[test]
    fn ladder_plan_respects_source_width() {
        let plan = plan(ratio(7000, 5000), 2500);
        assert!(plan.iter().all(|s| s.w < 2500));
    }

    #[test]
    fn ladder_plan_drops_heights_not_divisible_by_ten() {
        // 3x7 portrait: 4000/3*7 = 9331 → dropped; 600/3*7 = 1400 → kept.
        let plan = plan(ratio(300, 700), 5000);
        assert!(plan.contains(&Size::new(600, 1400)));
        assert!(plan.iter().all(|s| s.h % 10 == 0));
    }
}
