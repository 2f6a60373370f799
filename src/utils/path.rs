use std::{
    env,
    path::{Path, PathBuf},
};

pub const PROJECT_CONFIG: &str = ".qgismeta.toml";
pub const CONFIG_ENV: &str = "QGISMETA_CONFIG";

/// Returns the current working directory, falling back to `.`.
pub fn get_cwd() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Walks upward from `start` to the first directory holding `.qgismeta.toml`.
pub fn find_project_config_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG))
        .find(|candidate| candidate.is_file())
}

/// `<user config dir>/qgismeta/config.toml`, whether or not it exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("qgismeta").join("config.toml"))
}

/// Picks the configuration file to load:
/// 1. `QGISMETA_CONFIG`
/// 2. `.qgismeta.toml` in `start` or any ancestor
/// 3. the per-user config file
pub fn locate_config(start: &Path) -> Option<PathBuf> {
    if let Ok(p) = env::var(CONFIG_ENV) {
        if !p.trim().is_empty() {
            return Some(PathBuf::from(p));
        }
    }

    if let Some(p) = find_project_config_from(start) {
        return Some(p);
    }

    user_config_path().filter(|p| p.is_file())
}
