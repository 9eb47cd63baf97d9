// Per-pixel highlight classification: RGB bitmap -> highlight-free RGB bitmap
//
// Each pixel is classified on its own, without looking at neighbors. Overlapping
// marker and ink is approximated by a single-pixel luminance, never de-blended,
// so former highlight borders can stay hard-edged.

use image::{Rgb, RgbImage};
use rayon::prelude::*;

use super::thresholds::{LUMA_WEIGHTS_TENTHS, Thresholds};

/// Below this many pixels an image is swept on the calling thread.
const PARALLEL_MIN_PIXELS: u64 = 200_000;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// The three mutually exclusive pixel classes, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelClass {
    /// Paper or near-paper; forced to pure white.
    White,
    /// Yellow/orange marker; erased or flattened to gray.
    Highlight,
    /// Ink and any non-marker content; left untouched.
    Other,
}

/// How many pixels of an image fell into each class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub white: u64,
    /// Highlight pixels bright enough to be erased to white.
    pub highlight_erased: u64,
    /// Highlight pixels over ink, flattened to gray.
    pub highlight_grayed: u64,
    pub other: u64,
}

impl ClassCounts {
    pub fn highlight(&self) -> u64 {
        self.highlight_erased + self.highlight_grayed
    }

    pub fn total(&self) -> u64 {
        self.white + self.highlight() + self.other
    }

    /// Share of highlight pixels in percent (0.0 for an empty image).
    pub fn highlight_percent(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.highlight() as f64 / total as f64 * 100.0
    }

    pub fn merge(self, other: ClassCounts) -> ClassCounts {
        ClassCounts {
            white: self.white + other.white,
            highlight_erased: self.highlight_erased + other.highlight_erased,
            highlight_grayed: self.highlight_grayed + other.highlight_grayed,
            other: self.other + other.other,
        }
    }
}

/// Classify a single pixel. White wins over Highlight, Highlight over Other.
pub fn classify_pixel(pixel: Rgb<u8>, thresholds: &Thresholds) -> PixelClass {
    let [r, g, b] = pixel.0;

    if r >= thresholds.white && g >= thresholds.white && b >= thresholds.white {
        return PixelClass::White;
    }

    // +1 keeps the ratio defined for B = 0.
    let yellow_ratio = (f64::from(r) + f64::from(g)) / (f64::from(b) + 1.0);
    if yellow_ratio > thresholds.yellow_ratio
        && r > thresholds.min_red
        && g > thresholds.min_green
        && b < thresholds.max_blue
    {
        return PixelClass::Highlight;
    }

    PixelClass::Other
}

/// Luminance-weighted brightness `0.3 R + 0.6 G + 0.1 B`, scaled by 10.
///
/// Integer arithmetic keeps `floor` and the erase comparison exact.
fn weighted_brightness_x10(pixel: Rgb<u8>) -> u32 {
    let [r, g, b] = pixel.0;
    LUMA_WEIGHTS_TENTHS[0] * u32::from(r)
        + LUMA_WEIGHTS_TENTHS[1] * u32::from(g)
        + LUMA_WEIGHTS_TENTHS[2] * u32::from(b)
}

/// Map a highlight pixel to white (marker over paper) or to a neutral gray of
/// its own brightness (marker over ink).
fn remap_highlight(pixel: Rgb<u8>, thresholds: &Thresholds) -> Rgb<u8> {
    let brightness_x10 = weighted_brightness_x10(pixel);
    if brightness_x10 > u32::from(thresholds.erase_brightness) * 10 {
        WHITE
    } else {
        // brightness_x10 <= 2550, so the floor always fits in a u8.
        let gray = (brightness_x10 / 10) as u8;
        Rgb([gray, gray, gray])
    }
}

/// Return the replacement for one pixel.
pub fn remap_pixel(pixel: Rgb<u8>, thresholds: &Thresholds) -> Rgb<u8> {
    match classify_pixel(pixel, thresholds) {
        PixelClass::White => WHITE,
        PixelClass::Highlight => remap_highlight(pixel, thresholds),
        PixelClass::Other => pixel,
    }
}

fn remap_row(row: &mut [u8], thresholds: &Thresholds) -> ClassCounts {
    let mut counts = ClassCounts::default();
    for px in row.chunks_exact_mut(3) {
        let pixel = Rgb([px[0], px[1], px[2]]);
        let replacement = match classify_pixel(pixel, thresholds) {
            PixelClass::White => {
                counts.white += 1;
                WHITE
            }
            PixelClass::Highlight => {
                let mapped = remap_highlight(pixel, thresholds);
                if mapped == WHITE {
                    counts.highlight_erased += 1;
                } else {
                    counts.highlight_grayed += 1;
                }
                mapped
            }
            PixelClass::Other => {
                counts.other += 1;
                continue;
            }
        };
        px.copy_from_slice(&replacement.0);
    }
    counts
}

/// Remove highlights from an owned image buffer, row-parallel for large pages.
pub fn remove_highlights_in_place(image: &mut RgbImage, thresholds: &Thresholds) -> ClassCounts {
    let row_len = image.width() as usize * 3;
    if row_len == 0 || image.height() == 0 {
        return ClassCounts::default();
    }

    let total_pixels = u64::from(image.width()) * u64::from(image.height());
    let height = image.height() as usize;
    let buf: &mut [u8] = image;
    // A raw buffer may be longer than the image; only touch the pixel rows.
    let buf = &mut buf[..row_len * height];

    if total_pixels < PARALLEL_MIN_PIXELS {
        return buf
            .chunks_exact_mut(row_len)
            .map(|row| remap_row(row, thresholds))
            .fold(ClassCounts::default(), ClassCounts::merge);
    }

    buf.par_chunks_mut(row_len)
        .map(|row| remap_row(row, thresholds))
        .reduce(ClassCounts::default, ClassCounts::merge)
}

/// Return a copy of `image` with highlights removed using custom thresholds.
pub fn remove_highlights_with(image: &RgbImage, thresholds: &Thresholds) -> RgbImage {
    let mut filtered = image.clone();
    remove_highlights_in_place(&mut filtered, thresholds);
    filtered
}

/// Return a copy of `image` with yellow/orange marker highlights removed.
pub fn remove_highlights(image: &RgbImage) -> RgbImage {
    remove_highlights_with(image, &Thresholds::default())
}
