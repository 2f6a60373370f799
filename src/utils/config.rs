use crate::utils::path::locate_config;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const HOST_VERSION_ENV: &str = "QGISMETA_HOST_VERSION";
pub const PLUGINS_DIR_ENV: &str = "QGISMETA_PLUGINS_DIR";
pub const STRICT_ENV: &str = "QGISMETA_STRICT";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// QGIS version descriptors are checked against by `lint`.
    pub host_version: Option<String>,
    /// Directory `list` scans when none is given.
    pub plugins_dir: Option<PathBuf>,
    /// Treat lint warnings as failures.
    pub strict: bool,
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| format!("Invalid configuration: {}", e))
    }

    /// Loads the first configuration file found from `start`, then applies
    /// environment overrides.
    pub fn load(start: &Path) -> Result<Self, String> {
        let mut settings = match locate_config(start) {
            Some(path) => {
                let text = fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read {}: {}", path.to_string_lossy(), e))?;
                let mut s = Self::from_toml_str(&text)
                    .map_err(|e| format!("{} ({})", e, path.to_string_lossy()))?;
                s.source = Some(path);
                s
            }
            None => Settings::default(),
        };
        settings.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(HOST_VERSION_ENV).filter(|v| !v.trim().is_empty()) {
            self.host_version = Some(v.trim().to_string());
        }
        if let Some(v) = lookup(PLUGINS_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.plugins_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup(STRICT_ENV) {
            self.strict = match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "" | "0" | "false" | "no" | "off" => false,
                other => return Err(format!("{} must be a boolean, got '{}'", STRICT_ENV, other)),
            };
        }
        Ok(())
    }
}
