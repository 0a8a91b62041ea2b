//! # Reference Extraction
//!
//! Produces the ordered list of module references found in one source file.
//! Everything downstream depends only on the [`ReferenceExtractor`] trait, so
//! the bundled tree-sitter [`ScriptExtractor`] can be swapped for another
//! parser without touching graph construction or cycle detection.

mod script;

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

pub use script::ScriptExtractor;

use crate::core::{ModuleId, Reference};

/// Reasons a module's references could not be extracted
///
/// Never fatal: the module is treated as having no out-edges.
#[derive(Error, Debug, Diagnostic)]
pub enum ExtractionError {
    #[error("Failed to read '{path}'")]
    #[diagnostic(code(roundabout::extractor::read_failed))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' is not valid UTF-8")]
    #[diagnostic(code(roundabout::extractor::invalid_encoding))]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Failed to parse '{path}': {reason}")]
    #[diagnostic(code(roundabout::extractor::parse_failed))]
    Parse { path: PathBuf, reason: String },
}

/// Source of the raw references for a module
pub trait ReferenceExtractor: Send + Sync {
    /// Return the module's references in source order
    fn extract(&self, module: &ModuleId) -> Result<Vec<Reference>, ExtractionError>;
}
