pub mod settings;

use settings::Settings;
use std::path::Path;

pub const SETTINGS_FILE_NAME: &str = "settings.yaml";

/// Load `settings.yaml` from the directory of the input PDF.
///
/// Falls back to the default settings when no such file exists.
pub fn load_settings_for_input(input_path: &Path) -> crate::error::Result<Settings> {
    let dir = match input_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let settings_path = dir.join(SETTINGS_FILE_NAME);

    if settings_path.exists() {
        tracing::debug!(path = %settings_path.display(), "loading settings");
        Settings::from_file(&settings_path)
    } else {
        Ok(Settings::default())
    }
}
