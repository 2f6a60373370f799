use crate::descriptor::error::DescriptorError;
use crate::descriptor::ini::is_comment;
use crate::types::descriptor::{
    FLAG_KEYS, GENERAL_SECTION, MANDATORY_KEYS, OPTIONAL_TEXT_KEYS, PluginDescriptor,
};

const CONTINUATION_INDENT: &str = "    ";

fn write_value(out: &mut String, key: &str, value: &str) -> Result<(), DescriptorError> {
    let unrepresentable = || DescriptorError::Unrepresentable {
        key: key.to_string(),
    };

    let mut lines = value.split('\n');
    let first = lines.next().unwrap_or_default();
    let rest: Vec<&str> = lines.collect();
    if first.trim().is_empty() && !rest.is_empty() {
        return Err(unrepresentable());
    }

    out.push_str(key);
    out.push('=');
    out.push_str(first.trim());
    out.push('\n');

    for line in rest {
        let line = line.trim();
        if line.is_empty() {
            out.push('\n');
            continue;
        }
        // an indented comment would vanish on the next read
        if is_comment(line) {
            return Err(unrepresentable());
        }
        out.push_str(CONTINUATION_INDENT);
        out.push_str(line);
        out.push('\n');
    }
    Ok(())
}

fn flag_text(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Writes `d` as a `metadata.txt` document with keys in canonical order.
pub fn render_descriptor(d: &PluginDescriptor) -> Result<String, DescriptorError> {
    let mut out = format!("[{}]\n", GENERAL_SECTION);

    for key in MANDATORY_KEYS {
        write_value(&mut out, key, d.mandatory_text(key).unwrap_or_default())?;
    }

    for key in OPTIONAL_TEXT_KEYS {
        if key == "tags" {
            if !d.tags.is_empty() {
                write_value(&mut out, key, &d.tags.join(", "))?;
            }
            continue;
        }
        if let Some(value) = d.optional_text(key) {
            write_value(&mut out, key, value)?;
        }
    }

    for key in FLAG_KEYS {
        let value = d.flag(key).unwrap_or(false);
        // the host reads these two on every plugin, so they are always spelled out
        if value || key == "experimental" || key == "deprecated" {
            write_value(&mut out, key, flag_text(value))?;
        }
    }

    for (key, value) in &d.extra {
        if key.is_empty() || key.contains(['=', ':', '[']) {
            return Err(DescriptorError::Unrepresentable { key: key.clone() });
        }
        write_value(&mut out, key, value)?;
    }

    Ok(out)
}
