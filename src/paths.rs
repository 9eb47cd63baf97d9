// Filesystem boundary: input validation and output path derivation

use std::path::{Path, PathBuf};

use crate::error::UnmarkError;

pub const OUTPUT_FILE_SUFFIX: &str = " answers removed.pdf";

/// Check that `input_path` exists and has a `.pdf` extension (any case).
pub fn validate_input(input_path: &Path) -> crate::error::Result<()> {
    if !input_path.exists() {
        return Err(UnmarkError::InputNotFound(input_path.to_path_buf()));
    }

    let is_pdf = input_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(UnmarkError::InvalidInputType(input_path.to_path_buf()));
    }

    Ok(())
}

/// Directory next to the input that receives processed output.
pub fn output_dir_for(input_path: &Path, output_dir_name: &str) -> PathBuf {
    let parent = input_path.parent().unwrap_or_else(|| Path::new(""));
    parent.join(output_dir_name)
}

/// `{parent}/{output_dir_name}/{stem} answers removed.pdf`
pub fn output_path_for(input_path: &Path, output_dir_name: &str) -> PathBuf {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir_for(input_path, output_dir_name).join(format!("{stem}{OUTPUT_FILE_SUFFIX}"))
}

/// Create `dir` (and missing parents). Succeeds if it already exists.
pub fn ensure_output_dir(dir: &Path) -> crate::error::Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}
