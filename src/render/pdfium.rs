// pdfium-render wrapper: page -> RgbImage (in-memory only)

use std::path::{Path, PathBuf};

use image::RgbImage;
use pdfium_render::prelude::*;

use super::{PageSource, validate_scale};
use crate::error::UnmarkError;

/// Resolves the path to the pdfium shared library.
///
/// Search order:
/// 1. `PDFIUM_DYNAMIC_LIB_PATH` environment variable
/// 2. `vendor/pdfium/lib/` relative to the project root (for development)
///
/// `Ok(None)` means neither is present and the system library should be used.
fn resolve_pdfium_lib_path() -> crate::error::Result<Option<PathBuf>> {
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(Some(p));
        }
        return Err(UnmarkError::render(format!(
            "PDFIUM_DYNAMIC_LIB_PATH is set to '{}' but the path does not exist",
            path
        )));
    }

    // In development, CARGO_MANIFEST_DIR points to the project root.
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let vendor_path = PathBuf::from(&manifest_dir).join("vendor/pdfium/lib");
        if vendor_path.exists() {
            return Ok(Some(vendor_path));
        }
    }

    Ok(None)
}

/// Creates a new Pdfium instance by dynamically loading the shared library.
pub fn create_pdfium() -> crate::error::Result<Pdfium> {
    let bindings = match resolve_pdfium_lib_path()? {
        Some(lib_path) => {
            let lib_path_str = lib_path.to_str().ok_or_else(|| {
                UnmarkError::render("pdfium library path contains non-UTF-8 characters")
            })?;
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(lib_path_str))
                .map_err(|e| UnmarkError::render(e.to_string()))?
        }
        None => Pdfium::bind_to_system_library().map_err(|e| {
            UnmarkError::render(format!(
                "pdfium library not found: set PDFIUM_DYNAMIC_LIB_PATH or place libpdfium.so in vendor/pdfium/lib/ ({e})"
            ))
        })?,
    };
    Ok(Pdfium::new(bindings))
}

/// An open PDF document backed by pdfium.
pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
    page_count: u32,
}

impl<'a> PdfiumDocument<'a> {
    /// Open `path` with no password.
    ///
    /// # Errors
    /// Returns `UnmarkError::DocumentOpen` for unreadable, corrupt or
    /// password-protected files.
    pub fn open(pdfium: &'a Pdfium, path: &Path) -> crate::error::Result<Self> {
        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| UnmarkError::DocumentOpen {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
        let page_count = document.pages().len() as u32;
        Ok(Self {
            document,
            page_count,
        })
    }
}

impl PageSource for PdfiumDocument<'_> {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn rasterize(
        &self,
        page_index: u32,
        scale_x: f32,
        scale_y: f32,
    ) -> crate::error::Result<RgbImage> {
        validate_scale(page_index, scale_x, scale_y)?;

        if page_index >= self.page_count {
            return Err(UnmarkError::rasterization(
                page_index,
                format!(
                    "page index out of range (document has {} pages)",
                    self.page_count
                ),
            ));
        }

        let page_index_u16 = u16::try_from(page_index)
            .map_err(|_| UnmarkError::rasterization(page_index, "page index exceeds u16 range"))?;

        let page = self
            .document
            .pages()
            .get(page_index_u16)
            .map_err(|e| UnmarkError::rasterization(page_index, e.to_string()))?;

        // PDF default user unit: 1 point = 1/72 inch, so scale 1.0 is 72 DPI.
        let width_px = (page.width().value * scale_x).round() as i32;
        let height_px = (page.height().value * scale_y).round() as i32;
        if width_px <= 0 || height_px <= 0 {
            return Err(UnmarkError::rasterization(
                page_index,
                format!("page renders to an empty {width_px}x{height_px} bitmap"),
            ));
        }

        let config = PdfRenderConfig::new()
            .set_target_width(width_px)
            .set_target_height(height_px);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| UnmarkError::rasterization(page_index, e.to_string()))?;

        Ok(bitmap.as_image().to_rgb8())
    }
}
