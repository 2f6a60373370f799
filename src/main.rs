use crate::{
    descriptor::{
        lint::{Severity, has_errors, lint_descriptor},
        manage,
        parse::load_descriptor,
        prompt::{InitAnswers, prompt_init_descriptor},
        render::render_descriptor,
        summary::{print_descriptor_summary, print_findings},
    },
    utils::{
        config::Settings,
        fs::resolve_descriptor_path,
        logger::{LogLevel, Logger},
        path::get_cwd,
        semver::LooseVersion,
        signature::get_signature,
        spinner,
        version::get_version,
    },
};
use clap::CommandFactory;
use clap::FromArgMatches;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io;

mod descriptor;
mod types;
mod utils;

#[derive(Parser)]
#[command(name = "qgismeta")]
#[command(author = "Labscend Studios")]
#[command(about = "Read, validate and maintain QGIS plugin metadata.txt descriptors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a parsed descriptor
    Show {
        /// metadata.txt or the plugin directory holding it
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        /// Print the descriptor as JSON
        json: bool,
        #[arg(long, default_value_t = false)]
        /// Include changelog entries
        changelog: bool,
    },

    /// Check a descriptor for problems
    Lint {
        /// metadata.txt or the plugin directory holding it
        path: PathBuf,
        #[arg(long)]
        /// QGIS version the plugin must load in
        host: Option<String>,
        #[arg(long, default_value_t = false)]
        /// Fail on warnings too
        strict: bool,
        #[arg(long, default_value_t = false)]
        /// Print findings as JSON
        json: bool,
    },

    /// List the plugins of a plugins directory
    List {
        /// Directory holding one folder per plugin
        dir: Option<PathBuf>,
    },

    /// Bump the plugin version in place
    Bump {
        /// metadata.txt or the plugin directory holding it
        path: PathBuf,
        /// Bump type: major | minor | patch
        bump: String,
    },

    /// Print a descriptor in canonical form
    Render {
        /// metadata.txt or the plugin directory holding it
        path: PathBuf,
    },

    /// Scaffold a new metadata.txt
    Init {
        /// Plugin directory (defaults to the current directory)
        dir: Option<PathBuf>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "plugin-version")]
        plugin_version: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        qgis_min: Option<String>,
        #[arg(long)]
        /// Comma-separated tags
        tags: Option<String>,
        #[arg(short, long, default_value_t = false)]
        /// Skip the confirmation prompt
        yes: bool,
        #[arg(long, default_value_t = false)]
        /// Overwrite an existing metadata.txt
        force: bool,
    },
}

fn fail(message: String) -> io::Error {
    Logger::new().log_message(LogLevel::Error, &message);
    io::Error::other(message)
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let version = get_version();
    let signature = get_signature(&version);

    let version_static: &'static str = Box::leak(format!("v{}", version).into_boxed_str());
    let signature_static: &'static str = Box::leak(signature.into_boxed_str());

    let mut cmd = Cli::command();
    cmd = cmd.version(version_static).before_help(signature_static);

    let matches = cmd.get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let cwd = get_cwd();
    let settings = Settings::load(&cwd).map_err(fail)?;
    if let Some(source) = &settings.source {
        Logger::new().debug(&format!("Using configuration {}", source.display()));
    }

    match cli.command {
        Commands::Show {
            path,
            json,
            changelog,
        } => {
            let path = resolve_descriptor_path(&path).map_err(fail)?;
            let d = load_descriptor(&path).map_err(|e| fail(e.to_string()))?;
            if json {
                let text = serde_json::to_string_pretty(&d)
                    .map_err(|e| fail(format!("Failed to encode JSON: {}", e)))?;
                println!("{}", text);
            } else {
                print_descriptor_summary(&d, changelog);
            }
            Ok(())
        }

        Commands::Lint {
            path,
            host,
            strict,
            json,
        } => {
            let path = resolve_descriptor_path(&path).map_err(fail)?;
            let d = load_descriptor(&path).map_err(|e| fail(e.to_string()))?;

            let host = match host.or(settings.host_version.clone()) {
                Some(h) => Some(LooseVersion::parse(&h).map_err(fail)?),
                None => None,
            };
            let findings = lint_descriptor(&d, path.parent(), host.as_ref());

            if json {
                let text = serde_json::to_string_pretty(&findings)
                    .map_err(|e| fail(format!("Failed to encode JSON: {}", e)))?;
                println!("{}", text);
            } else {
                print_findings(&findings);
            }

            let warnings = findings
                .iter()
                .filter(|f| f.level == Severity::Warning)
                .count();
            if has_errors(&findings) {
                return Err(fail(format!(
                    "{} failed lint with {} error(s)",
                    path.to_string_lossy(),
                    findings.len() - warnings
                )));
            }
            if warnings > 0 && (strict || settings.strict) {
                return Err(fail(format!(
                    "{} failed lint with {} warning(s) in strict mode",
                    path.to_string_lossy(),
                    warnings
                )));
            }
            if !json {
                Logger::new().log_message(
                    LogLevel::Success,
                    &format!("{} {} v{} is valid", path.to_string_lossy(), d.name, d.version),
                );
            }
            Ok(())
        }

        Commands::List { dir } => {
            let dir = dir.or(settings.plugins_dir.clone()).unwrap_or(cwd);
            let failures = tokio::task::spawn_blocking(move || manage::list_descriptors(&dir))
                .await
                .map_err(|e| io::Error::other(format!("Join error: {}", e)))?
                .map_err(fail)?;
            if failures > 0 {
                return Err(fail(format!("{} descriptor(s) failed to parse", failures)));
            }
            Ok(())
        }

        Commands::Bump { path, bump } => {
            spinner::run_step(
                &format!("Bumping version of {}", path.to_string_lossy()),
                |(old, new): &(String, String)| format!("{} -> {}", old, new),
                || manage::bump_version(&path, &bump),
            )
            .map_err(io::Error::other)?;
            Ok(())
        }

        Commands::Render { path } => {
            let path = resolve_descriptor_path(&path).map_err(fail)?;
            let d = load_descriptor(&path).map_err(|e| fail(e.to_string()))?;
            let text = render_descriptor(&d).map_err(|e| fail(e.to_string()))?;
            print!("{}", text);
            Ok(())
        }

        Commands::Init {
            dir,
            name,
            description,
            plugin_version,
            author,
            email,
            qgis_min,
            tags,
            yes,
            force,
        } => {
            let dir = dir.unwrap_or(cwd);
            let answers = InitAnswers {
                name,
                description,
                version: plugin_version,
                author,
                email,
                qgis_min,
                tags,
            };
            prompt_init_descriptor(&dir, answers, yes, force).map_err(fail)
        }
    }
}
