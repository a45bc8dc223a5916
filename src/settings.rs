//! Program settings, read from `settings.toml` in the user's config folder.
use crate::get_migration_map_config_dir;
use crate::input::read_toml;
use crate::log::DEFAULT_LOG_LEVEL;
use anyhow::Result;
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

const DEFAULT_SETTINGS_FILE_HEADER: &str = "# Program settings for migration-map.
# Every setting is commented out and shown with its default value.
";

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    get_migration_map_config_dir().join(SETTINGS_FILE_NAME)
}

/// Program settings from config file
#[derive(Debug, DocumentedFields, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// The default program log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Whether to overwrite existing output folders by default
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            overwrite: false,
        }
    }
}

impl Settings {
    /// Read the program settings file, if there is one.
    ///
    /// Settings missing from the file (or all settings, if there is no file) take their default
    /// values.
    pub fn load() -> Result<Settings> {
        Self::load_from_path(&get_settings_file_path())
    }

    fn load_from_path(file_path: &Path) -> Result<Settings> {
        if file_path.is_file() {
            read_toml(file_path)
        } else {
            Ok(Settings::default())
        }
    }

    /// The contents of a placeholder settings file.
    ///
    /// Each setting appears commented out with its default value, preceded by its documentation.
    pub fn default_file_contents() -> String {
        let defaults = toml::Value::try_from(Settings::default())
            .expect("Could not convert settings to TOML");
        let defaults = defaults.as_table().expect("Settings should be a TOML table");

        let mut out = DEFAULT_SETTINGS_FILE_HEADER.to_string();
        for (field, value) in defaults {
            let docs = Settings::get_field_docs(field).expect("Missing doc comment for field");
            out.push('\n');
            for line in docs.lines() {
                out.push_str(&format!("# # {}\n", line.trim()));
            }
            out.push_str(&format!("# {field} = {value}\n"));
        }

        out
    }
}
