// Per-page processing: rasterized bitmap -> filtered bitmap + class counts

use image::RgbImage;

use crate::filter::{ClassCounts, Thresholds, remove_highlights_in_place};

/// Single page processing result.
pub struct ProcessedPage {
    pub page_index: u32,
    pub image: RgbImage,
    pub counts: ClassCounts,
}

/// Remove highlights from a page bitmap this worker exclusively owns.
///
/// Never fails: classification is total over 8-bit RGB.
pub fn process_page(
    page_index: u32,
    mut bitmap: RgbImage,
    thresholds: &Thresholds,
) -> ProcessedPage {
    let counts = remove_highlights_in_place(&mut bitmap, thresholds);
    ProcessedPage {
        page_index,
        image: bitmap,
        counts,
    }
}
