use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FlaskifyError, Result};

/// Conversion settings loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Appended to the source folder name to name the working copy
    /// (e.g. `site` + `_flask` -> `site_flask`).
    pub flask_folder_suffix: String,

    /// Write a Flask entry point listing every converted page.
    #[serde(default)]
    pub export_template_code: bool,

    /// File name of the generated entry point, relative to the working copy.
    #[serde(default = "default_entry_point_file")]
    pub entry_point_file: String,
}

fn default_entry_point_file() -> String {
    "template_main.py".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            flask_folder_suffix: "_flask".to_string(),
            export_template_code: false,
            entry_point_file: default_entry_point_file(),
        }
    }
}

/// Load settings from a TOML file.
///
/// A missing file is reported as [`FlaskifyError::ConfigNotFound`]; callers treat it as fatal.
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.is_file() {
        return Err(FlaskifyError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| FlaskifyError::Io {
        context: format!("reading config {}", path.display()),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| FlaskifyError::ConfigParse { source: e })
}
