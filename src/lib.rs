//! Remove yellow/orange marker highlights from PDF pages.
//!
//! Pages are rasterized, every pixel is reclassified as paper, marker or
//! other content, and the filtered bitmaps are reassembled into an
//! image-only PDF.

pub mod config;
pub mod error;
pub mod filter;
pub mod paths;
pub mod pdf;
pub mod pipeline;
pub mod render;

pub use error::{Result, UnmarkError};
