use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading or writing a plugin descriptor.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("line {line}: key defined before any [section] header")]
    MissingSectionHeader { line: usize },

    #[error("line {line}: expected `key = value`, found `{content}`")]
    MalformedLine { line: usize, content: String },

    #[error("line {line}: key `{key}` already defined in [{section}]")]
    DuplicateKey {
        line: usize,
        section: String,
        key: String,
    },

    #[error("line {line}: section [{section}] already defined")]
    DuplicateSection { line: usize, section: String },

    #[error("missing [{0}] section")]
    MissingSection(String),

    #[error("missing mandatory field `{0}` in [general]")]
    MissingField(&'static str),

    #[error("`{key}` must be a boolean (True/False), got `{value}`")]
    InvalidFlag { key: &'static str, value: String },

    #[error("value of `{key}` cannot be written as metadata.txt text")]
    Unrepresentable { key: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
