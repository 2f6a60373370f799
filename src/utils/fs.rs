use std::fs;
use std::path::{Path, PathBuf};

pub const DESCRIPTOR_FILE: &str = "metadata.txt";

/// Accepts either a descriptor file or a plugin directory holding one.
pub fn resolve_descriptor_path(path: &Path) -> Result<PathBuf, String> {
    if path.is_dir() {
        let candidate = path.join(DESCRIPTOR_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
        return Err(format!(
            "{} not found in {}",
            DESCRIPTOR_FILE,
            path.to_string_lossy()
        ));
    }
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    Err(format!("No such file or directory: {}", path.to_string_lossy()))
}

/// Finds `<root>/metadata.txt` and `<root>/<plugin>/metadata.txt`, the layout
/// of a QGIS profile's `python/plugins` directory.
pub fn discover_descriptors(root: &Path) -> Result<Vec<PathBuf>, String> {
    let mut found = Vec::new();

    let own = root.join(DESCRIPTOR_FILE);
    if own.is_file() {
        found.push(own);
    }

    let rd = fs::read_dir(root)
        .map_err(|e| format!("Failed to list {}: {}", root.to_string_lossy(), e))?;
    for entry in rd.flatten() {
        let p = entry.path();
        if !p.is_dir() {
            continue;
        }
        let skip = p
            .file_name()
            .and_then(|n| n.to_str())
            .map(is_ignored_component)
            .unwrap_or(true);
        if skip {
            continue;
        }
        let candidate = p.join(DESCRIPTOR_FILE);
        if candidate.is_file() {
            found.push(candidate);
        }
    }

    found.sort();
    Ok(found)
}

pub fn is_ignored_component(name: &str) -> bool {
    name.starts_with('.') || matches!(name, "__pycache__" | "node_modules" | "target")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_plugins_one_level_deep() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        for name in ["b_plugin", "a_plugin", ".hidden", "__pycache__"] {
            fs::create_dir_all(root.join(name)).unwrap();
            fs::write(root.join(name).join(DESCRIPTOR_FILE), "[general]\n").unwrap();
        }
        fs::create_dir_all(root.join("no_meta")).unwrap();
        fs::create_dir_all(root.join("a_plugin/nested")).unwrap();
        fs::write(root.join("a_plugin/nested").join(DESCRIPTOR_FILE), "").unwrap();

        let found = discover_descriptors(root).unwrap();
        assert_eq!(
            found,
            vec![
                root.join("a_plugin").join(DESCRIPTOR_FILE),
                root.join("b_plugin").join(DESCRIPTOR_FILE),
            ]
        );
    }

    #[test]
    fn resolves_directory_to_its_descriptor() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(resolve_descriptor_path(tmp.path()).is_err());
        fs::write(tmp.path().join(DESCRIPTOR_FILE), "").unwrap();
        assert_eq!(
            resolve_descriptor_path(tmp.path()).unwrap(),
            tmp.path().join(DESCRIPTOR_FILE)
        );
        assert!(resolve_descriptor_path(&tmp.path().join("missing.txt")).is_err());
    }
}
