#[cfg(feature = "pdfium")]
pub mod pdfium;

use image::RgbImage;

/// A paginated document that can be rasterized one page at a time.
///
/// Implementations are used from a single thread; the pipeline only hands the
/// resulting bitmaps to worker threads. Closing the document is `Drop`.
pub trait PageSource {
    /// Number of pages, fixed when the document was opened.
    fn page_count(&self) -> u32;

    /// Render the 0-indexed page scaled by `scale_x` / `scale_y` relative to
    /// 72 DPI (1 point per pixel at scale 1.0).
    ///
    /// # Errors
    /// Returns `UnmarkError::Rasterization` for a bad scale, an out-of-range
    /// page, or page content that cannot be rendered.
    fn rasterize(
        &self,
        page_index: u32,
        scale_x: f32,
        scale_y: f32,
    ) -> crate::error::Result<RgbImage>;
}

/// Check a scale factor pair before handing it to a renderer.
pub(crate) fn validate_scale(
    page_index: u32,
    scale_x: f32,
    scale_y: f32,
) -> crate::error::Result<()> {
    let valid = |s: f32| s.is_finite() && s > 0.0;
    if valid(scale_x) && valid(scale_y) {
        Ok(())
    } else {
        Err(crate::error::UnmarkError::rasterization(
            page_index,
            format!("invalid scale {scale_x}x{scale_y}: must be positive and finite"),
        ))
    }
}
