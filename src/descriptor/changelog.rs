use crate::utils::semver::LooseVersion;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^v?(?P<ver>\d+(?:\.\d+)*(?:-?(?:alpha|beta|rc|dev)\d*)?)(?:\s*\([^)]*\))?(?:\s*[:\-]\s*|\s+|$)(?P<rest>.*)$",
    )
    .expect("changelog heading pattern")
});

static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[*\-+•]\s+").expect("changelog bullet pattern"));

/// Notes recorded under one version heading of a changelog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
    pub version: Option<String>,
    pub notes: Vec<String>,
}

fn note_text(line: &str) -> String {
    BULLET.replace(line.trim(), "").trim().to_string()
}

/// Splits free-form changelog text into per-version entries.
pub fn parse_changelog(text: &str) -> Vec<ChangelogEntry> {
    let mut entries: Vec<ChangelogEntry> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = HEADING.captures(line) {
            let mut notes = Vec::new();
            if let Some(rest) = caps.name("rest").map(|m| note_text(m.as_str())) {
                if !rest.is_empty() {
                    notes.push(rest);
                }
            }
            entries.push(ChangelogEntry {
                version: Some(caps["ver"].to_string()),
                notes,
            });
            continue;
        }

        let note = note_text(line);
        if note.is_empty() {
            continue;
        }
        match entries.last_mut() {
            Some(entry) => entry.notes.push(note),
            None => entries.push(ChangelogEntry {
                version: None,
                notes: vec![note],
            }),
        }
    }

    entries
}

pub fn entry_for<'a>(entries: &'a [ChangelogEntry], version: &str) -> Option<&'a ChangelogEntry> {
    let wanted = LooseVersion::parse(version).ok()?;
    entries.iter().find(|e| {
        e.version
            .as_deref()
            .and_then(|v| LooseVersion::parse(v).ok())
            .is_some_and(|v| v == wanted)
    })
}
