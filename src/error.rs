use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnmarkError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Input file is not a PDF: {}", .0.display())]
    InvalidInputType(PathBuf),

    #[error("Document has no pages")]
    EmptyDocument,

    #[error("Failed to open document {}: {detail}", .path.display())]
    DocumentOpen { path: PathBuf, detail: String },

    /// `page` is 1-based.
    #[error("Rasterization failed for page {page}: {detail}")]
    Rasterization { page: u32, detail: String },

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`UnmarkError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl UnmarkError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create an output encoding error.
    encoding => EncodingError,
    /// Create a configuration error.
    config => ConfigError,
    /// Create a render (pdfium binding) error.
    render => RenderError,
}

impl UnmarkError {
    /// Create a rasterization error for a 0-indexed page.
    pub fn rasterization(page_index: u32, detail: impl Into<String>) -> Self {
        Self::Rasterization {
            page: page_index + 1,
            detail: detail.into(),
        }
    }
}

impl From<lopdf::Error> for UnmarkError {
    fn from(e: lopdf::Error) -> Self {
        Self::EncodingError(e.to_string())
    }
}

impl From<serde_yml::Error> for UnmarkError {
    fn from(e: serde_yml::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

#[cfg(feature = "pdfium")]
impl From<pdfium_render::prelude::PdfiumError> for UnmarkError {
    fn from(e: pdfium_render::prelude::PdfiumError) -> Self {
        Self::RenderError(e.to_string())
    }
}

impl From<image::ImageError> for UnmarkError {
    fn from(e: image::ImageError) -> Self {
        Self::EncodingError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UnmarkError>;
