use crate::descriptor::parse::parse_tags;
use crate::descriptor::scaffold::scaffold_descriptor;
use crate::types::descriptor::PluginDescriptor;
use crate::utils::logger::{LogLevel, Logger};
use std::path::Path;

/// Field values given on the command line; anything left `None` is asked for.
#[derive(Debug, Clone, Default)]
pub struct InitAnswers {
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub author: Option<String>,
    pub email: Option<String>,
    pub qgis_min: Option<String>,
    pub tags: Option<String>,
}

fn ask(given: Option<String>, label: &str, default: Option<&str>) -> Result<String, String> {
    if let Some(v) = given.filter(|v| !v.trim().is_empty()) {
        return Ok(v.trim().to_string());
    }

    let mut prompt = inquire::Text::new(label);
    if let Some(d) = default {
        prompt = prompt.with_default(d);
    }
    let answer = prompt
        .prompt()
        .map_err(|e| format!("Failed to prompt for {}: {}", label.trim_end_matches(':'), e))?;
    if answer.trim().is_empty() {
        return Err(format!("{} cannot be empty", label.trim_end_matches(':')));
    }
    Ok(answer.trim().to_string())
}

/// Fills in every mandatory field, prompting only for the missing ones.
pub fn collect_descriptor(answers: InitAnswers, dir: &Path) -> Result<PluginDescriptor, String> {
    let folder = dir.file_name().and_then(|n| n.to_str());

    Ok(PluginDescriptor {
        name: ask(answers.name, "Plugin name:", folder)?,
        qgis_minimum_version: ask(answers.qgis_min, "Minimum QGIS version:", Some("3.0"))?,
        description: ask(answers.description, "Short description:", None)?,
        version: ask(answers.version, "Plugin version:", Some("0.1"))?,
        author: ask(answers.author, "Author:", None)?,
        email: ask(answers.email, "Author e-mail:", None)?,
        tags: answers.tags.as_deref().map(parse_tags).unwrap_or_default(),
        ..Default::default()
    })
}

pub fn prompt_init_descriptor(
    dir: &Path,
    answers: InitAnswers,
    assume_yes: bool,
    force: bool,
) -> Result<(), String> {
    let logger = Logger::new();
    let descriptor = collect_descriptor(answers, dir)?;

    logger.log_message_with_trace(
        LogLevel::Info,
        "New descriptor",
        &[
            format!("Name        : {}", descriptor.name),
            format!("Version     : {}", descriptor.version),
            format!("QGIS        : >= {}", descriptor.qgis_minimum_version),
            format!("Author      : {} <{}>", descriptor.author, descriptor.email),
            format!("Description : {}", descriptor.description),
        ],
    );

    if !assume_yes {
        let confirmed = inquire::Confirm::new("Are these details correct ?")
            .with_default(true)
            .prompt()
            .unwrap_or(false);
        if !confirmed {
            logger.log_message(LogLevel::Warning, "Aborting descriptor scaffolding.");
            return Err("aborted by user".into());
        }
    }

    let path = scaffold_descriptor(dir, &descriptor, force)?;
    logger.log_message(
        LogLevel::Success,
        &format!("Descriptor written: {}", path.to_string_lossy()),
    );
    Ok(())
}
