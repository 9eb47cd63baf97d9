use serde::Deserialize;

use crate::error::UnmarkError;

/// Pixels with every channel at or above this value are treated as paper.
pub const WHITE_THRESHOLD: u8 = 235;

/// Minimum `(R + G) / (B + 1)` for a pixel to count as marker ink.
pub const YELLOW_RATIO_THRESHOLD: f64 = 2.2;

/// Red channel must be strictly above this for a highlight.
pub const MIN_HIGHLIGHT_RED: u8 = 120;

/// Green channel must be strictly above this for a highlight.
pub const MIN_HIGHLIGHT_GREEN: u8 = 120;

/// Blue channel must be strictly below this for a highlight.
pub const MAX_HIGHLIGHT_BLUE: u8 = 150;

/// Highlight pixels brighter than this are erased to white; the rest become gray.
pub const ERASE_BRIGHTNESS_THRESHOLD: u8 = 180;

/// Luminance weights for R, G and B, in tenths (0.3, 0.6, 0.1).
pub const LUMA_WEIGHTS_TENTHS: [u32; 3] = [3, 6, 1];

/// Tunable classification thresholds.
///
/// `Default` yields the named constants above. Values can be overridden from
/// the `thresholds` section of `settings.yaml`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub white: u8,
    pub yellow_ratio: f64,
    pub min_red: u8,
    pub min_green: u8,
    pub max_blue: u8,
    pub erase_brightness: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            white: WHITE_THRESHOLD,
            yellow_ratio: YELLOW_RATIO_THRESHOLD,
            min_red: MIN_HIGHLIGHT_RED,
            min_green: MIN_HIGHLIGHT_GREEN,
            max_blue: MAX_HIGHLIGHT_BLUE,
            erase_brightness: ERASE_BRIGHTNESS_THRESHOLD,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.yellow_ratio.is_finite() || self.yellow_ratio < 0.0 {
            return Err(UnmarkError::config(format!(
                "thresholds.yellow_ratio must be a finite non-negative number, got {}",
                self.yellow_ratio
            )));
        }
        Ok(())
    }
}
