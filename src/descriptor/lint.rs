use crate::descriptor::changelog::{entry_for, parse_changelog};
use crate::types::descriptor::PluginDescriptor;
use crate::utils::semver::{LooseVersion, default_maximum, is_compatible};
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern")
});

const MAX_DESCRIPTION_LEN: usize = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub level: Severity,
    pub field: Option<String>,
    pub message: String,
}

impl Finding {
    fn warning(field: &str, message: impl Into<String>) -> Self {
        Finding {
            level: Severity::Warning,
            field: Some(field.to_string()),
            message: message.into(),
        }
    }

    fn error(field: &str, message: impl Into<String>) -> Self {
        Finding {
            level: Severity::Error,
            field: Some(field.to_string()),
            message: message.into(),
        }
    }
}

pub fn has_errors(findings: &[Finding]) -> bool {
    findings.iter().any(|f| f.level == Severity::Error)
}

fn check_url(findings: &mut Vec<Finding>, key: &str, value: Option<&str>, required: bool) {
    match value {
        Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
            findings.push(Finding::warning(
                key,
                format!("`{}` should be an http(s) URL, got `{}`", key, url),
            ));
        }
        Some(_) => {}
        None if required => findings.push(Finding::warning(
            key,
            format!("`{}` is required to publish on plugins.qgis.org", key),
        )),
        None => {}
    }
}

/// Checks a parsed descriptor for problems the host or the public plugin
/// repository would complain about. `base_dir` is the plugin directory used
/// to resolve `icon`; `host` enables the compatibility check.
pub fn lint_descriptor(
    d: &PluginDescriptor,
    base_dir: Option<&Path>,
    host: Option<&LooseVersion>,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    if !EMAIL.is_match(&d.email) {
        findings.push(Finding::warning(
            "email",
            format!("`{}` does not look like an e-mail address", d.email),
        ));
    }

    if d.description.chars().count() > MAX_DESCRIPTION_LEN || d.description.contains('\n') {
        findings.push(Finding::warning(
            "description",
            "description should be one short line; move details to `about`",
        ));
    }

    if d.about.is_none() {
        findings.push(Finding::warning(
            "about",
            "`about` is required to publish on plugins.qgis.org",
        ));
    }

    check_url(&mut findings, "homepage", d.homepage.as_deref(), false);
    check_url(&mut findings, "tracker", d.tracker.as_deref(), true);
    check_url(&mut findings, "repository", d.repository.as_deref(), true);

    if LooseVersion::parse(&d.version).is_err() {
        findings.push(Finding::warning(
            "version",
            format!("`{}` is not a dotted version number", d.version),
        ));
    }

    let min = match LooseVersion::parse(&d.qgis_minimum_version) {
        Ok(v) => Some(v),
        Err(e) => {
            findings.push(Finding::error("qgisMinimumVersion", e));
            None
        }
    };
    let max = match d.qgis_maximum_version.as_deref().map(LooseVersion::parse) {
        Some(Ok(v)) => Some(v),
        Some(Err(e)) => {
            findings.push(Finding::error("qgisMaximumVersion", e));
            None
        }
        None => None,
    };

    if let (Some(min), Some(max)) = (&min, &max) {
        if max < min {
            findings.push(Finding::error(
                "qgisMaximumVersion",
                format!("maximum version {} is lower than minimum {}", max, min),
            ));
        }
    }

    if let (Some(min), Some(host)) = (&min, host) {
        if !is_compatible(min, max.as_ref(), host) {
            let ceiling = max.clone().unwrap_or_else(|| default_maximum(min));
            findings.push(Finding::error(
                "qgisMinimumVersion",
                format!(
                    "QGIS {} is outside the supported range {} - {}",
                    host, min, ceiling
                ),
            ));
        }
    }

    if let (Some(icon), Some(base)) = (d.icon.as_deref(), base_dir) {
        if !base.join(icon).is_file() {
            findings.push(Finding::warning(
                "icon",
                format!("icon `{}` not found in {}", icon, base.display()),
            ));
        }
    }

    if let Some(changelog) = d.changelog.as_deref() {
        let entries = parse_changelog(changelog);
        if entries.iter().any(|e| e.version.is_some()) && entry_for(&entries, &d.version).is_none() {
            findings.push(Finding::warning(
                "changelog",
                format!("changelog has no entry for version {}", d.version),
            ));
        }
    }

    if d.experimental && d.deprecated {
        findings.push(Finding::warning(
            "deprecated",
            "plugin is flagged both experimental and deprecated",
        ));
    }

    for key in d.extra.keys() {
        findings.push(Finding::warning(key, format!("unknown key `{}`", key)));
    }

    findings
}
