//! Reader for the INI dialect QGIS uses for `metadata.txt`.
//!
//! Keys are case-insensitive and stored lowercased, `=` and `:` both act as
//! delimiters, and a line indented deeper than its key line continues the
//! previous value. Full-line `#`/`;` comments are skipped everywhere.

use crate::descriptor::error::DescriptorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub entries: Vec<Entry>,
}

impl Section {
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key.eq_ignore_ascii_case(key))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub sections: Vec<Section>,
}

impl Document {
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }
}

struct OpenValue {
    indent: usize,
    lines: Vec<String>,
    pending_blanks: usize,
}

pub fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with('#') || trimmed.starts_with(';')
}

/// Name of a `[section]` header line, trimmed inside the brackets.
pub fn section_header(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

/// Splits an assignment at its first `=` or `:`.
pub fn split_assignment(trimmed: &str) -> Option<(&str, &str)> {
    let pos = trimmed.find(['=', ':'])?;
    let key = trimmed[..pos].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, trimmed[pos + 1..].trim()))
}

fn close_value(doc: &mut Document, open: Option<OpenValue>) {
    let Some(open) = open else {
        return;
    };
    if let Some(entry) = doc
        .sections
        .last_mut()
        .and_then(|s| s.entries.last_mut())
    {
        entry.value = open.lines.join("\n").trim().to_string();
    }
}

pub fn read_document(text: &str) -> Result<Document, DescriptorError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut doc = Document::default();
    let mut open: Option<OpenValue> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            if let Some(o) = open.as_mut() {
                o.pending_blanks += 1;
            }
            continue;
        }
        if is_comment(trimmed) {
            continue;
        }

        let indent = raw.len() - raw.trim_start().len();
        if let Some(o) = open.as_mut() {
            if indent > o.indent {
                for _ in 0..o.pending_blanks {
                    o.lines.push(String::new());
                }
                o.pending_blanks = 0;
                o.lines.push(trimmed.to_string());
                continue;
            }
        }
        close_value(&mut doc, open.take());

        if let Some(name) = section_header(trimmed) {
            let name = name.to_string();
            if doc.section(&name).is_some() {
                return Err(DescriptorError::DuplicateSection {
                    line,
                    section: name,
                });
            }
            doc.sections.push(Section {
                name,
                entries: Vec::new(),
            });
            continue;
        }

        let Some(section) = doc.sections.last_mut() else {
            return Err(DescriptorError::MissingSectionHeader { line });
        };
        let Some((key, value)) = split_assignment(trimmed) else {
            return Err(DescriptorError::MalformedLine {
                line,
                content: trimmed.to_string(),
            });
        };
        let key = key.to_ascii_lowercase();
        if section.get(&key).is_some() {
            return Err(DescriptorError::DuplicateKey {
                line,
                section: section.name.clone(),
                key,
            });
        }
        section.entries.push(Entry {
            key,
            value: value.to_string(),
            line,
        });
        open = Some(OpenValue {
            indent,
            lines: vec![value.to_string()],
            pending_blanks: 0,
        });
    }
    close_value(&mut doc, open.take());

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn general(text: &str) -> Section {
        read_document(text)
            .unwrap()
            .section("general")
            .cloned()
            .unwrap()
    }

    #[test]
    fn lowercases_keys_and_accepts_both_delimiters() {
        let s = general("[general]\nQgisMinimumVersion = 2.0\nauthor: Chris Holden\n");
        assert_eq!(s.get("qgisminimumversion").unwrap().value, "2.0");
        assert_eq!(s.get("author").unwrap().value, "Chris Holden");
        assert_eq!(s.get("author").unwrap().line, 3);
    }

    #[test]
    fn first_delimiter_wins() {
        let s = general("[general]\nhomepage=https://example.org:8080/a=b\n");
        assert_eq!(s.get("homepage").unwrap().value, "https://example.org:8080/a=b");
    }

    #[test]
    fn joins_indented_continuation_lines() {
        let s = general(
            "[general]\nchangelog=1.1:\n    * fix export\n\n    1.0:\n      * first release\n\nicon=icon.png\n",
        );
        assert_eq!(
            s.get("changelog").unwrap().value,
            "1.1:\n* fix export\n\n1.0:\n* first release"
        );
        assert_eq!(s.get("icon").unwrap().value, "icon.png");
    }

    #[test]
    fn empty_first_line_is_trimmed_away() {
        let s = general("[general]\nabout=\n  Line one\n  Line two\n");
        assert_eq!(s.get("about").unwrap().value, "Line one\nLine two");
    }

    #[test]
    fn skips_comments_inside_and_outside_values() {
        let s = general("# header\n[general]\n; note\nname=A\n  # not part of value\n  more\n");
        assert_eq!(s.get("name").unwrap().value, "A\nmore");
    }

    #[test]
    fn accepts_bom_and_crlf() {
        let s = general("\u{feff}[general]\r\nname=TSTools\r\nversion=1.1\r\n");
        assert_eq!(s.get("name").unwrap().value, "TSTools");
        assert_eq!(s.get("version").unwrap().value, "1.1");
    }

    #[test]
    fn reports_structural_errors_with_line_numbers() {
        assert!(matches!(
            read_document("name=A\n"),
            Err(DescriptorError::MissingSectionHeader { line: 1 })
        ));
        assert!(matches!(
            read_document("[general]\njust words\n"),
            Err(DescriptorError::MalformedLine { line: 2, .. })
        ));
        assert!(matches!(
            read_document("[general]\n=value\n"),
            Err(DescriptorError::MalformedLine { line: 2, .. })
        ));
        assert!(matches!(
            read_document("[general]\nname=A\nNAME=B\n"),
            Err(DescriptorError::DuplicateKey { line: 3, .. })
        ));
        assert!(matches!(
            read_document("[general]\n[general]\n"),
            Err(DescriptorError::DuplicateSection { line: 2, .. })
        ));
    }

    #[test]
    fn keeps_other_sections_apart() {
        let doc = read_document("[ general ]\nname=A\n[extra]\nname=B\n").unwrap();
        assert_eq!(doc.section("general").unwrap().get("name").unwrap().value, "A");
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.section("extra").unwrap().get("name").unwrap().value, "B");
    }
}
