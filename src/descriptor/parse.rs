use crate::descriptor::error::DescriptorError;
use crate::descriptor::ini::{Section, read_document};
use crate::types::descriptor::{GENERAL_SECTION, PluginDescriptor, canonical_key};
use std::fs;
use std::path::Path;

/// Reads and parses the descriptor at `path`.
pub fn load_descriptor(path: &Path) -> Result<PluginDescriptor, DescriptorError> {
    let text = fs::read_to_string(path).map_err(|source| DescriptorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_descriptor(&text)
}

pub fn parse_descriptor(text: &str) -> Result<PluginDescriptor, DescriptorError> {
    let doc = read_document(text)?;
    let general = doc
        .section(GENERAL_SECTION)
        .ok_or_else(|| DescriptorError::MissingSection(GENERAL_SECTION.to_string()))?;
    descriptor_from_section(general)
}

fn text_value(section: &Section, key: &str) -> Option<String> {
    section
        .get(key)
        .map(|e| e.value.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn mandatory(section: &Section, key: &'static str) -> Result<String, DescriptorError> {
    text_value(section, key).ok_or(DescriptorError::MissingField(key))
}

pub fn parse_flag(key: &'static str, raw: &str) -> Result<bool, DescriptorError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "" | "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(DescriptorError::InvalidFlag {
            key,
            value: raw.trim().to_string(),
        }),
    }
}

fn flag(section: &Section, key: &'static str) -> Result<bool, DescriptorError> {
    match section.get(key) {
        Some(entry) => parse_flag(key, &entry.value),
        None => Ok(false),
    }
}

/// Splits the comma-separated `tags` value, dropping blanks and repeats.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

fn descriptor_from_section(section: &Section) -> Result<PluginDescriptor, DescriptorError> {
    // Field initialisers run in source order, so the first absent key in
    // MANDATORY_KEYS order is the one reported.
    let mut d = PluginDescriptor {
        name: mandatory(section, "name")?,
        qgis_minimum_version: mandatory(section, "qgisMinimumVersion")?,
        qgis_maximum_version: text_value(section, "qgisMaximumVersion"),
        description: mandatory(section, "description")?,
        version: mandatory(section, "version")?,
        author: mandatory(section, "author")?,
        email: mandatory(section, "email")?,
        about: text_value(section, "about"),
        changelog: text_value(section, "changelog"),
        tags: text_value(section, "tags")
            .map(|t| parse_tags(&t))
            .unwrap_or_default(),
        homepage: text_value(section, "homepage"),
        tracker: text_value(section, "tracker"),
        repository: text_value(section, "repository"),
        icon: text_value(section, "icon"),
        category: text_value(section, "category"),
        experimental: flag(section, "experimental")?,
        deprecated: flag(section, "deprecated")?,
        has_processing_provider: flag(section, "hasProcessingProvider")?,
        server: flag(section, "server")?,
        ..Default::default()
    };

    for entry in &section.entries {
        if canonical_key(&entry.key).is_none() {
            d.extra.insert(entry.key.clone(), entry.value.clone());
        }
    }

    Ok(d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::descriptor::MANDATORY_KEYS;

    const MINIMAL: &str = "[general]\nname=Demo\nqgisMinimumVersion=3.0\ndescription=Demo plugin\nversion=0.1\nauthor=Jane Doe\nemail=jane@example.org\n";

    #[test]
    fn each_absent_mandatory_key_is_reported() {
        for key in MANDATORY_KEYS {
            let text: String = MINIMAL
                .lines()
                .filter(|l| !l.to_ascii_lowercase().starts_with(&format!("{}=", key.to_ascii_lowercase())))
                .map(|l| format!("{}\n", l))
                .collect();
            match parse_descriptor(&text) {
                Err(DescriptorError::MissingField(k)) => assert_eq!(k, key),
                other => panic!("expected missing `{}`, got {:?}", key, other),
            }
        }
    }

    #[test]
    fn blank_mandatory_value_counts_as_missing() {
        let text = MINIMAL.replace("author=Jane Doe", "author=   ");
        let err = parse_descriptor(&text).unwrap_err();
        assert!(matches!(err, DescriptorError::MissingField("author")));
        assert_eq!(err.to_string(), "missing mandatory field `author` in [general]");
    }

    #[test]
    fn missing_general_section_is_an_error() {
        let err = parse_descriptor("[plugin]\nname=Demo\n").unwrap_err();
        assert!(matches!(err, DescriptorError::MissingSection(ref s) if s == "general"));
    }

    #[test]
    fn flags_parse_case_insensitively() {
        let text = format!("{}experimental=True\ndeprecated=False\nserver=YES\n", MINIMAL);
        let d = parse_descriptor(&text).unwrap();
        assert!(d.experimental);
        assert!(!d.deprecated);
        assert!(d.server);
        assert!(!d.has_processing_provider);

        let text = format!("{}EXPERIMENTAL=tRuE\n", MINIMAL);
        assert!(parse_descriptor(&text).unwrap().experimental);
    }

    #[test]
    fn absent_flags_default_to_false() {
        let d = parse_descriptor(MINIMAL).unwrap();
        assert!(!d.experimental);
        assert!(!d.deprecated);
    }

    #[test]
    fn garbage_flag_is_rejected() {
        let text = format!("{}deprecated=sometimes\n", MINIMAL);
        assert!(matches!(
            parse_descriptor(&text),
            Err(DescriptorError::InvalidFlag { key: "deprecated", .. })
        ));
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        assert_eq!(
            parse_tags(" raster , time series,,raster, vector "),
            vec!["raster", "time series", "vector"]
        );
    }

    #[test]
    fn reads_the_tstools_descriptor() {
        let d = parse_descriptor(include_str!("../../tests/fixtures/tstools/metadata.txt")).unwrap();
        assert_eq!(d.name, "TSTools");
        assert_eq!(d.version, "1.1");
        assert_eq!(d.author, "Chris Holden");
        assert_eq!(d.qgis_minimum_version, "2.0");
        let tags: std::collections::HashSet<&str> = d.tags.iter().map(String::as_str).collect();
        assert_eq!(
            tags,
            ["remote sensing", "time series", "visualization", "structural change"]
                .into_iter()
                .collect()
        );
        assert!(d.experimental);
        assert!(!d.deprecated);
        assert_eq!(d.icon.as_deref(), Some("media/tstools_icon.png"));
        assert!(d.changelog.as_deref().unwrap().starts_with("1.1:\n* Add series exporter"));
        assert!(d.extra.is_empty());
    }

    #[test]
    fn tstools_descriptor_survives_render_and_reparse() {
        let d = parse_descriptor(include_str!("../../tests/fixtures/tstools/metadata.txt")).unwrap();
        let text = crate::descriptor::render::render_descriptor(&d).unwrap();
        assert_eq!(parse_descriptor(&text).unwrap(), d);
    }

    #[test]
    fn unknown_keys_are_preserved() {
        let text = format!("{}supportsQt6=True\nplugin_dependencies=numpy\n", MINIMAL);
        let d = parse_descriptor(&text).unwrap();
        assert_eq!(d.extra.get("supportsqt6").map(String::as_str), Some("True"));
        assert_eq!(d.extra.get("plugin_dependencies").map(String::as_str), Some("numpy"));
    }
}
