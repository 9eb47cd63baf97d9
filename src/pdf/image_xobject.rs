// Page image encoding: RgbImage -> compressed image XObject payload

use std::io::{Cursor, Write};

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::RgbImage;
use lopdf::{Stream, dictionary};

use crate::config::settings::OutputEncoding;
use crate::error::UnmarkError;

/// A page image compressed and ready to embed as an image XObject.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// PDF filter name: `DCTDecode` or `FlateDecode`.
    pub filter: &'static str,
}

impl EncodedImage {
    /// Build the DeviceRGB image XObject stream for this payload.
    pub fn to_xobject(&self) -> Stream {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => self.filter,
        };
        Stream::new(dict, self.data.clone())
    }
}

/// Encode an RGB image to JPEG bytes at the given quality (1-100).
pub fn encode_rgb_to_jpeg(rgb: &RgbImage, quality: u8) -> crate::error::Result<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(UnmarkError::encoding(format!(
            "JPEG quality must be 1-100, got {}",
            quality
        )));
    }

    let mut buf = Cursor::new(Vec::new());
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
    rgb.write_with_encoder(encoder)?;

    Ok(buf.into_inner())
}

/// zlib-compress raw bytes for a FlateDecode stream.
pub fn flate_encode(data: &[u8]) -> crate::error::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| UnmarkError::encoding(format!("Flate encode error: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| UnmarkError::encoding(format!("Flate encode error: {}", e)))
}

/// Compress one page image with the configured encoding.
pub fn encode_page_image(
    rgb: &RgbImage,
    encoding: OutputEncoding,
    jpeg_quality: u8,
) -> crate::error::Result<EncodedImage> {
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(UnmarkError::encoding(format!(
            "cannot encode an empty {width}x{height} image"
        )));
    }

    let (data, filter) = match encoding {
        OutputEncoding::Jpeg => (encode_rgb_to_jpeg(rgb, jpeg_quality)?, "DCTDecode"),
        OutputEncoding::Flate => (flate_encode(rgb.as_raw())?, "FlateDecode"),
    };

    Ok(EncodedImage {
        data,
        width,
        height,
        filter,
    })
}
