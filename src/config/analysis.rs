//! Analysis engine configuration
//!
//! [`AnalysisConfig`] carries every option the engine recognizes. It can be
//! loaded from a `roundabout.toml` file (camelCase keys) and then overridden
//! field by field through [`AnalysisConfigBuilder`].

use std::path::{Path, PathBuf};

use miette::{NamedSource, SourceSpan};
use serde::Deserialize;

use crate::constants::analysis::{
    DEFAULT_CANDIDATE_SUFFIXES, DEFAULT_IGNORE_PATTERNS, DEFAULT_MAX_DEPTH, DEFAULT_MAX_MODULES,
};
use crate::error::{RoundaboutError, TomlParseError};

/// One `(prefix, replacement)` alias substitution
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AliasPatternConfig {
    pub prefix: String,
    pub replacement: String,
}

impl AliasPatternConfig {
    pub fn new(prefix: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            replacement: replacement.into(),
        }
    }

    /// Parse the `PREFIX=REPLACEMENT` form used on the command line
    pub fn parse_pair(value: &str) -> Result<Self, RoundaboutError> {
        match value.split_once('=') {
            Some((prefix, replacement)) => Ok(Self::new(prefix.trim(), replacement.trim())),
            None => Err(RoundaboutError::InvalidAliasPattern {
                prefix: value.to_string(),
                reason: "expected PREFIX=REPLACEMENT".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Project root; alias replacements and pattern matching are relative to it
    pub root: PathBuf,
    /// Maximum number of modules on a single traversal path
    pub max_depth: usize,
    /// Maximum number of modules discovered from the entry files
    pub max_modules: usize,
    pub alias_patterns: Vec<AliasPatternConfig>,
    pub candidate_suffixes: Vec<String>,
    pub infrastructure_path_patterns: Vec<String>,
    pub ignore_path_patterns: Vec<String>,
    pub entry_files: Vec<PathBuf>,
    /// Treat `import type` references as graph edges
    pub include_type_imports: bool,
    /// Treat `import('...')` references as graph edges
    pub include_dynamic_imports: bool,
    /// Worker threads for cycle detection (None = one per core)
    pub jobs: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            max_depth: DEFAULT_MAX_DEPTH,
            max_modules: DEFAULT_MAX_MODULES,
            alias_patterns: Vec::new(),
            candidate_suffixes: DEFAULT_CANDIDATE_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            infrastructure_path_patterns: Vec::new(),
            ignore_path_patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            entry_files: Vec::new(),
            include_type_imports: false,
            include_dynamic_imports: false,
            jobs: None,
        }
    }
}

impl AnalysisConfig {
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::new()
    }

    /// Load a configuration file
    ///
    /// A relative `root` inside the file is taken relative to the file's own
    /// directory.
    pub fn from_toml_file(path: &Path) -> Result<Self, RoundaboutError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| RoundaboutError::FileReadError {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut config = Self::from_toml_str(&content).map_err(|e| {
            let span = e
                .span()
                .map(|span| SourceSpan::new(span.start.into(), span.end - span.start));

            RoundaboutError::TomlParseError(Box::new(TomlParseError {
                file: path.display().to_string(),
                source_code: NamedSource::new(path.display().to_string(), content.clone()),
                span,
                source: e,
            }))
        })?;

        if config.root.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.root = base.join(&config.root);
        }

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Check the numeric limits and list options
    ///
    /// Alias and glob syntax are checked where they are compiled, by the
    /// resolver and the path matchers.
    pub fn validate(&self) -> Result<(), RoundaboutError> {
        if self.max_depth == 0 {
            return Err(RoundaboutError::ConfigurationError {
                message: "maxDepth must be at least 1".to_string(),
            });
        }
        if self.max_modules == 0 {
            return Err(RoundaboutError::ConfigurationError {
                message: "maxModules must be at least 1".to_string(),
            });
        }
        if self.candidate_suffixes.is_empty() {
            return Err(RoundaboutError::ConfigurationError {
                message: "candidateSuffixes must contain at least one entry".to_string(),
            });
        }
        if self.jobs == Some(0) {
            return Err(RoundaboutError::ConfigurationError {
                message: "jobs must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Entry file paths made absolute against the root
    pub fn absolute_entry_files(&self) -> Vec<PathBuf> {
        self.entry_files
            .iter()
            .map(|entry| {
                if entry.is_absolute() {
                    entry.clone()
                } else {
                    self.root.join(entry)
                }
            })
            .collect()
    }
}

/// Field-by-field overrides on top of a base configuration
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl Default for AnalysisConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    pub fn from_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn with_max_modules(mut self, max_modules: usize) -> Self {
        self.config.max_modules = max_modules;
        self
    }

    pub fn with_alias(mut self, prefix: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.config
            .alias_patterns
            .push(AliasPatternConfig::new(prefix, replacement));
        self
    }

    pub fn with_alias_patterns(mut self, aliases: Vec<AliasPatternConfig>) -> Self {
        self.config.alias_patterns = aliases;
        self
    }

    pub fn with_candidate_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.config.candidate_suffixes = suffixes;
        self
    }

    pub fn with_infrastructure_patterns(mut self, patterns: Vec<String>) -> Self {
        self.config.infrastructure_path_patterns = patterns;
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.config.ignore_path_patterns = patterns;
        self
    }

    pub fn with_entry_files(mut self, entries: Vec<PathBuf>) -> Self {
        self.config.entry_files = entries;
        self
    }

    pub fn with_include_type_imports(mut self, include: bool) -> Self {
        self.config.include_type_imports = include;
        self
    }

    pub fn with_include_dynamic_imports(mut self, include: bool) -> Self {
        self.config.include_dynamic_imports = include;
        self
    }

    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.config.jobs = jobs;
        self
    }
}

impl crate::common::ConfigBuilder for AnalysisConfigBuilder {
    type Config = AnalysisConfig;

    fn build(self) -> Result<Self::Config, RoundaboutError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
