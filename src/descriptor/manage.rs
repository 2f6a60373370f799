use crate::descriptor::error::DescriptorError;
use crate::descriptor::ini::{is_comment, section_header, split_assignment};
use crate::descriptor::parse::load_descriptor;
use crate::types::descriptor::{GENERAL_SECTION, PluginDescriptor};
use crate::utils::{
    fs::{discover_descriptors, resolve_descriptor_path},
    logger::{LogLevel, Logger},
    semver,
};
use std::fs;
use std::path::{Path, PathBuf};

pub type Discovered = (PathBuf, Result<PluginDescriptor, DescriptorError>);

/// Parses every descriptor found under `dir`, keeping failures alongside.
pub fn collect_descriptors(dir: &Path) -> Result<Vec<Discovered>, String> {
    if !dir.is_dir() {
        return Err(format!("Plugins directory not found: {}", dir.to_string_lossy()));
    }
    let paths = discover_descriptors(dir)?;
    Ok(paths
        .into_iter()
        .map(|p| {
            let parsed = load_descriptor(&p);
            (p, parsed)
        })
        .collect())
}

/// Lists the plugins under `dir`; returns how many failed to parse.
pub fn list_descriptors(dir: &Path) -> Result<usize, String> {
    let logger = Logger::new();
    let found = collect_descriptors(dir)?;
    if found.is_empty() {
        logger.log_message(
            LogLevel::Info,
            &format!("No plugins found in {}", dir.to_string_lossy()),
        );
        return Ok(0);
    }

    let mut failures = 0;
    for (path, parsed) in &found {
        let folder = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or("");
        match parsed {
            Ok(d) => {
                let mut flags = Vec::new();
                if d.experimental {
                    flags.push("experimental");
                }
                if d.deprecated {
                    flags.push("deprecated");
                }
                let flags = if flags.is_empty() {
                    String::new()
                } else {
                    format!("  [{}]", flags.join(", "))
                };
                logger.log_message(
                    LogLevel::Info,
                    &format!(
                        "- {}  v{}  ({})  QGIS >= {}{}",
                        d.name, d.version, folder, d.qgis_minimum_version, flags
                    ),
                );
            }
            Err(e) => {
                failures += 1;
                logger.log_message_with_trace(
                    LogLevel::Error,
                    &format!("- {} is not a valid descriptor", folder),
                    &[path.to_string_lossy().to_string(), e.to_string()],
                );
            }
        }
    }
    Ok(failures)
}

/// Bumps the `version` key of the descriptor at `path` in place.
pub fn bump_version(path: &Path, bump: &str) -> Result<(String, String), String> {
    let path = resolve_descriptor_path(path)?;
    let current = load_descriptor(&path).map_err(|e| e.to_string())?.version;
    let new_version = semver::compute_bump(&current, bump)?;

    let content = fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read {}: {}", path.to_string_lossy(), e))?;
    let updated = set_field_in_general(&content, "version", &new_version)?;
    fs::write(&path, updated)
        .map_err(|e| format!("Failed to write {}: {}", path.to_string_lossy(), e))?;

    Ok((current, new_version))
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Rewrites (or appends) one single-line key inside `[general]`, leaving
/// every other line of the file untouched.
pub fn set_field_in_general(original: &str, key: &str, value: &str) -> Result<String, String> {
    if value.contains('\n') {
        return Err(format!("Value for `{}` must be a single line", key));
    }

    let mut lines: Vec<String> = original.lines().map(|s| s.to_string()).collect();
    let start = lines
        .iter()
        .position(|l| section_header(l.trim()) == Some(GENERAL_SECTION))
        .ok_or_else(|| format!("[{}] section not found", GENERAL_SECTION))?;

    let mut end = lines.len();
    let mut target: Option<(usize, usize)> = None;
    let mut last_entry_end = start + 1;
    let mut key_indent: Option<usize> = None;
    let mut i = start + 1;
    while i < lines.len() {
        let raw = &lines[i];
        let t = raw.trim();
        if t.is_empty() || is_comment(t) {
            i += 1;
            continue;
        }
        let indent = indent_of(raw);
        if key_indent.is_some_and(|k| indent > k) {
            // continuation of the previous key
            if let Some((_, span_end)) = target.as_mut() {
                if *span_end == i {
                    *span_end = i + 1;
                }
            }
            last_entry_end = i + 1;
            i += 1;
            continue;
        }
        if section_header(t).is_some() {
            end = i;
            break;
        }
        key_indent = Some(indent);
        last_entry_end = i + 1;
        if target.is_none() {
            if let Some((k, _)) = split_assignment(t) {
                if k.eq_ignore_ascii_case(key) {
                    target = Some((i, i + 1));
                }
            }
        }
        i += 1;
    }

    let new_line = format!("{}={}", key, value);
    match target {
        Some((line_idx, span_end)) => {
            let indent: String = lines[line_idx]
                .chars()
                .take_while(|c| c.is_whitespace())
                .collect();
            let existing_key = split_assignment(lines[line_idx].trim())
                .map(|(k, _)| k.to_string())
                .unwrap_or_else(|| key.to_string());
            lines[line_idx] = format!("{}{}={}", indent, existing_key, value);
            lines.drain(line_idx + 1..span_end);
        }
        None => {
            lines.insert(last_entry_end.min(end), new_line);
        }
    }

    let mut out = lines.join("\n");
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}
