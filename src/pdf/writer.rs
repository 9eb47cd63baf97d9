// Output assembly: ordered page images -> one image-only PDF

use std::path::Path;

use image::RgbImage;
use lopdf::{Document, Object, Stream, dictionary};
use rayon::prelude::*;

use super::image_xobject::{EncodedImage, encode_page_image};
use crate::config::settings::OutputEncoding;
use crate::error::UnmarkError;

/// XObject resource name used on every page.
const PAGE_IMAGE_NAME: &str = "Im0";

/// Builds a PDF where each page is a single full-page image.
pub struct ImagePdfWriter {
    doc: Document,
    pages_id: lopdf::ObjectId,
    page_ids: Vec<lopdf::ObjectId>,
    dpi: u32,
}

impl ImagePdfWriter {
    /// `dpi` maps image pixels to page points (`points = pixels * 72 / dpi`).
    pub fn new(dpi: u32) -> crate::error::Result<Self> {
        if dpi == 0 {
            return Err(UnmarkError::encoding("output DPI must be greater than 0"));
        }
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Ok(Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            dpi,
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Page size in points for an image of `width` x `height` pixels.
    pub fn page_size_pts(&self, width: u32, height: u32) -> (f32, f32) {
        let dpi = self.dpi as f32;
        (width as f32 * 72.0 / dpi, height as f32 * 72.0 / dpi)
    }

    /// Content stream drawing `name` across a `width` x `height` point page:
    /// `q <width> 0 0 <height> 0 0 cm /<name> Do Q`
    pub fn build_image_content_stream(name: &str, width: f32, height: f32) -> Vec<u8> {
        format!("q {width} 0 0 {height} 0 0 cm /{name} Do Q").into_bytes()
    }

    /// Append one page showing `image`. Returns the page object ID.
    pub fn add_image_page(&mut self, image: &EncodedImage) -> lopdf::ObjectId {
        let (width_pts, height_pts) = self.page_size_pts(image.width, image.height);

        let image_id = self.doc.add_object(Object::Stream(image.to_xobject()));

        let mut xobject_dict = lopdf::Dictionary::new();
        xobject_dict.set(PAGE_IMAGE_NAME, Object::Reference(image_id));
        let resources_id = self.doc.add_object(dictionary! {
            "XObject" => Object::Dictionary(xobject_dict),
        });

        let content_bytes =
            Self::build_image_content_stream(PAGE_IMAGE_NAME, width_pts, height_pts);
        let content_id = self
            .doc
            .add_object(Object::Stream(Stream::new(dictionary! {}, content_bytes)));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width_pts),
                Object::Real(height_pts),
            ],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        self.page_ids.push(page_id);
        page_id
    }

    /// Write the page tree and catalog, then serialize the document.
    pub fn save_to_bytes(mut self) -> crate::error::Result<Vec<u8>> {
        if self.page_ids.is_empty() {
            return Err(UnmarkError::encoding("cannot write a PDF with no pages"));
        }

        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        self.doc
            .save_to(&mut buf)
            .map_err(|e| UnmarkError::encoding(e.to_string()))?;
        Ok(buf)
    }
}

/// Encode `images` and write them, in order, as one PDF at `destination`.
///
/// Nothing is written unless every page encodes successfully.
///
/// # Errors
/// Returns `UnmarkError::EncodingError` if `images` is empty, `dpi` is zero,
/// a page fails to encode, or `destination` cannot be written.
pub fn write_image_pdf(
    images: &[RgbImage],
    destination: &Path,
    dpi: u32,
    encoding: OutputEncoding,
    jpeg_quality: u8,
) -> crate::error::Result<()> {
    if images.is_empty() {
        return Err(UnmarkError::encoding("no page images to write"));
    }

    let mut writer = ImagePdfWriter::new(dpi)?;

    let encoded: Vec<EncodedImage> = images
        .par_iter()
        .map(|img| encode_page_image(img, encoding, jpeg_quality))
        .collect::<crate::error::Result<_>>()?;

    for page in &encoded {
        writer.add_image_page(page);
    }

    let pdf_bytes = writer.save_to_bytes()?;
    std::fs::write(destination, pdf_bytes).map_err(|e| {
        UnmarkError::encoding(format!("failed to write {}: {e}", destination.display()))
    })?;

    tracing::debug!(
        pages = encoded.len(),
        path = %destination.display(),
        "wrote output PDF"
    );
    Ok(())
}
