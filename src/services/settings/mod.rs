// Settings service
// Loads and saves grid settings as TOML

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use log::warn;

use crate::models::settings::GridSettings;

pub struct SettingsService;

impl SettingsService {
    /// Path of the user's grid settings file, if a config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "Daygrid", "Daygrid")
            .map(|dirs| dirs.config_dir().join("grid.toml"))
    }

    /// Load settings from a TOML file.
    pub fn load_from(path: &Path) -> Result<GridSettings> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings: GridSettings =
            toml::from_str(&contents).context("Failed to parse grid settings")?;
        settings.validate().map_err(|e| anyhow!(e))?;
        Ok(settings)
    }

    /// Load settings from the default location, falling back to defaults if
    /// the file is missing or unreadable.
    pub fn load() -> GridSettings {
        let Some(path) = Self::default_path() else {
            return GridSettings::default();
        };
        if !path.exists() {
            return GridSettings::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("Using default grid settings: {:#}", err);
                GridSettings::default()
            }
        }
    }

    /// Save settings to a TOML file, creating parent directories as needed.
    pub fn save_to(settings: &GridSettings, path: &Path) -> Result<()> {
        settings.validate().map_err(|e| anyhow!(e))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        Ok(())
    }
}
