use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const GENERAL_SECTION: &str = "general";

/// Keys the host refuses to load a plugin without, in reporting order.
pub const MANDATORY_KEYS: [&str; 6] = [
    "name",
    "qgisMinimumVersion",
    "description",
    "version",
    "author",
    "email",
];

pub const OPTIONAL_TEXT_KEYS: [&str; 9] = [
    "qgisMaximumVersion",
    "about",
    "changelog",
    "tags",
    "homepage",
    "tracker",
    "repository",
    "icon",
    "category",
];

pub const FLAG_KEYS: [&str; 4] = ["experimental", "deprecated", "hasProcessingProvider", "server"];

/// Matches a key read from the file (already lowercased) to its canonical
/// spelling.
pub fn canonical_key(lowercase: &str) -> Option<&'static str> {
    MANDATORY_KEYS
        .iter()
        .chain(OPTIONAL_TEXT_KEYS.iter())
        .chain(FLAG_KEYS.iter())
        .copied()
        .find(|k| k.eq_ignore_ascii_case(lowercase))
}

/// The `[general]` section of a plugin's `metadata.txt`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDescriptor {
    pub name: String,
    pub qgis_minimum_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qgis_maximum_version: Option<String>,
    pub description: String,
    pub version: String,
    pub author: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub experimental: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub has_processing_provider: bool,
    #[serde(default)]
    pub server: bool,
    /// Keys the host does not define, kept verbatim (lowercased key).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl PluginDescriptor {
    /// Value of an optional text key by canonical name.
    pub fn optional_text(&self, key: &str) -> Option<&str> {
        let v = match key {
            "qgisMaximumVersion" => &self.qgis_maximum_version,
            "about" => &self.about,
            "changelog" => &self.changelog,
            "homepage" => &self.homepage,
            "tracker" => &self.tracker,
            "repository" => &self.repository,
            "icon" => &self.icon,
            "category" => &self.category,
            _ => return None,
        };
        v.as_deref()
    }

    pub fn mandatory_text(&self, key: &str) -> Option<&str> {
        match key {
            "name" => Some(&self.name),
            "qgisMinimumVersion" => Some(&self.qgis_minimum_version),
            "description" => Some(&self.description),
            "version" => Some(&self.version),
            "author" => Some(&self.author),
            "email" => Some(&self.email),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match key {
            "experimental" => Some(self.experimental),
            "deprecated" => Some(self.deprecated),
            "hasProcessingProvider" => Some(self.has_processing_provider),
            "server" => Some(self.server),
            _ => None,
        }
    }
}
