pub mod classifier;
pub mod thresholds;

pub use classifier::{
    ClassCounts, PixelClass, classify_pixel, remap_pixel, remove_highlights,
    remove_highlights_in_place, remove_highlights_with,
};
pub use thresholds::Thresholds;
