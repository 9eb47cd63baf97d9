use std::path::Path;

use serde::Deserialize;

use crate::error::UnmarkError;
use crate::filter::Thresholds;

/// Page rasterization factor in both axes. Higher values give sharper text at
/// the cost of processing time and memory.
pub const DEFAULT_RENDER_SCALE: f32 = 2.0;

/// Resolution recorded for the output page images.
pub const DEFAULT_OUTPUT_DPI: u32 = 150;

pub const DEFAULT_JPEG_QUALITY: u8 = 75;

pub const DEFAULT_OUTPUT_DIR_NAME: &str = "exams with answers removed";

/// How filtered page images are compressed inside the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputEncoding {
    /// DCTDecode at `jpeg_quality`.
    #[default]
    Jpeg,
    /// Lossless zlib-compressed raw RGB (FlateDecode).
    Flate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub render_scale: f32,
    pub output_dpi: u32,
    pub output_encoding: OutputEncoding,
    pub jpeg_quality: u8,
    /// Worker threads for page filtering; 0 uses one per CPU.
    pub parallel_workers: usize,
    pub output_dir_name: String,
    pub thresholds: Thresholds,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            render_scale: DEFAULT_RENDER_SCALE,
            output_dpi: DEFAULT_OUTPUT_DPI,
            output_encoding: OutputEncoding::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            parallel_workers: 0,
            output_dir_name: DEFAULT_OUTPUT_DIR_NAME.to_string(),
            thresholds: Thresholds::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings. An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Settings::default());
        }
        let settings: Settings = serde_yml::from_str(yaml).map_err(|e| {
            UnmarkError::config(format!("Failed to parse settings YAML: {e}"))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.render_scale.is_finite() || self.render_scale <= 0.0 {
            return Err(UnmarkError::config(format!(
                "render_scale must be a positive number, got {}",
                self.render_scale
            )));
        }

        if self.output_dpi == 0 {
            return Err(UnmarkError::config("output_dpi must be greater than 0"));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(UnmarkError::config(format!(
                "jpeg_quality must be 1-100, got {}",
                self.jpeg_quality
            )));
        }

        let dir_name = self.output_dir_name.trim();
        if dir_name.is_empty() || dir_name.contains(['/', '\\']) || dir_name == ".." {
            return Err(UnmarkError::config(format!(
                "output_dir_name must be a single directory name, got '{}'",
                self.output_dir_name
            )));
        }

        self.thresholds.validate()
    }
}
