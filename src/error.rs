use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
#[error("Invalid TOML syntax in '{file}'")]
#[diagnostic(
    code(roundabout::toml_parse_error),
    help("Check the TOML syntax near the highlighted position")
)]
pub struct TomlParseError {
    pub file: String,
    #[source_code]
    pub source_code: NamedSource<String>,
    #[label("syntax error here")]
    pub span: Option<SourceSpan>,
    #[source]
    pub source: toml::de::Error,
}

#[derive(Error, Debug, Diagnostic)]
pub enum RoundaboutError {
    #[error("Failed to read file '{path}'")]
    #[diagnostic(
        code(roundabout::io_error),
        help("Check if the file exists and you have read permissions")
    )]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Entry file '{path}' cannot be read")]
    #[diagnostic(
        code(roundabout::entry_file_error),
        help("Every entry file must exist and be readable before analysis can start")
    )]
    EntryFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    TomlParseError(Box<TomlParseError>),

    #[error("Malformed alias pattern '{prefix}': {reason}")]
    #[diagnostic(
        code(roundabout::alias_error),
        help("Aliases look like `@app/` = `src/app/` or `@/*` = `src/*`; only a trailing `*` is allowed")
    )]
    InvalidAliasPattern { prefix: String, reason: String },

    #[error("Invalid path pattern '{pattern}'")]
    #[diagnostic(
        code(roundabout::pattern_error),
        help("Path patterns use glob syntax, e.g. `src/services/**`")
    )]
    InvalidPathPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("JSON serialization error")]
    #[diagnostic(
        code(roundabout::json_error),
        help("This is likely an internal error - please report it")
    )]
    Json(#[from] serde_json::Error),

    #[error("String formatting error")]
    #[diagnostic(
        code(roundabout::fmt_error),
        help("This is likely an internal error - please report it")
    )]
    Fmt(#[from] std::fmt::Error),

    #[error("IO error")]
    #[diagnostic(
        code(roundabout::io_error),
        help("Check file permissions and disk space")
    )]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(roundabout::config_error),
        help("Check your command arguments and configuration")
    )]
    ConfigurationError { message: String },

    #[error("Analysis was cancelled")]
    #[diagnostic(
        code(roundabout::cancelled),
        help("No report is produced for a cancelled analysis")
    )]
    Cancelled,
}
