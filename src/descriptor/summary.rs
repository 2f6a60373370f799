use crate::descriptor::changelog::parse_changelog;
use crate::descriptor::lint::{Finding, Severity};
use crate::types::descriptor::PluginDescriptor;
use crate::utils::logger::{LogLevel, Logger};

pub fn print_descriptor_summary(d: &PluginDescriptor, with_changelog: bool) {
    let logger = Logger::new();

    logger.log_message(LogLevel::Info, &format!("{} v{}", d.name, d.version));
    logger.log_message_with_trace(
        LogLevel::Info,
        "Identity",
        &[
            format!("Description : {}", d.description),
            format!("Author      : {} <{}>", d.author, d.email),
            format!(
                "QGIS        : >= {}{}",
                d.qgis_minimum_version,
                d.qgis_maximum_version
                    .as_deref()
                    .map(|m| format!(", <= {}", m))
                    .unwrap_or_default()
            ),
        ],
    );

    if !d.tags.is_empty() {
        logger.log_message_with_trace(LogLevel::Info, "Tags", &d.tags);
    }

    let links: Vec<String> = [
        ("Homepage", &d.homepage),
        ("Tracker", &d.tracker),
        ("Repository", &d.repository),
    ]
    .iter()
    .filter_map(|(label, v)| v.as_deref().map(|u| format!("{:<10} : {}", label, u)))
    .collect();
    if !links.is_empty() {
        logger.log_message_with_trace(LogLevel::Info, "Links", &links);
    }

    let mut flags = Vec::new();
    if d.experimental {
        flags.push("experimental");
    }
    if d.deprecated {
        flags.push("deprecated");
    }
    if d.has_processing_provider {
        flags.push("processing provider");
    }
    if d.server {
        flags.push("server");
    }
    if !flags.is_empty() {
        logger.log_message(LogLevel::Warning, &format!("Flags: {}", flags.join(", ")));
    }

    if with_changelog {
        match d.changelog.as_deref() {
            Some(text) => {
                for entry in parse_changelog(text) {
                    let heading = entry
                        .version
                        .as_deref()
                        .map(|v| format!("Changelog {}", v))
                        .unwrap_or_else(|| "Changelog".to_string());
                    logger.log_message_with_trace(LogLevel::Info, &heading, &entry.notes);
                }
            }
            None => logger.log_message(LogLevel::Info, "Changelog • None"),
        }
    }
}

pub fn print_findings(findings: &[Finding]) {
    let logger = Logger::new();
    for f in findings {
        let level = match f.level {
            Severity::Warning => LogLevel::Warning,
            Severity::Error => LogLevel::Error,
        };
        match f.field.as_deref() {
            Some(field) => logger.log_message(level, &format!("{}: {}", field, f.message)),
            None => logger.log_message(level, &f.message),
        }
    }
}
