use crate::descriptor::render::render_descriptor;
use crate::types::descriptor::PluginDescriptor;
use crate::utils::fs::DESCRIPTOR_FILE;
use crate::utils::logger::{LogLevel, Logger};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes `d` as `<dir>/metadata.txt`, creating `dir` when needed.
pub fn scaffold_descriptor(dir: &Path, d: &PluginDescriptor, force: bool) -> Result<PathBuf, String> {
    let target = dir.join(DESCRIPTOR_FILE);
    if target.exists() && !force {
        Logger::new().log_message(
            LogLevel::Error,
            &format!("{} already exists, aborting.", target.to_string_lossy()),
        );
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            target.to_string_lossy()
        ));
    }

    fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create plugin directory: {}", e))?;

    let text = render_descriptor(d).map_err(|e| e.to_string())?;
    fs::write(&target, text)
        .map_err(|e| format!("Failed to write {}: {}", target.to_string_lossy(), e))?;

    Ok(target)
}
