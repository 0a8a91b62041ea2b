use std::ffi::OsString;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use tracing::trace;

use super::alias::AliasPattern;
use crate::config::{AliasPatternConfig, AnalysisConfig};
use crate::core::ModuleId;
use crate::error::RoundaboutError;
use crate::patterns::PathPatternSet;

/// Outcome of resolving one raw reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A file inside the analyzed set
    Resolved(ModuleId),
    /// A bare package specifier; never part of the graph
    External,
    /// A file that exists but matches an ignore pattern
    Ignored(ModuleId),
    /// A relative or aliased reference with no file behind it
    Unresolvable { candidate: PathBuf },
}

/// Maps raw reference strings to canonical module identities
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    root: PathBuf,
    aliases: Vec<AliasPattern>,
    candidate_suffixes: Vec<String>,
    ignore: PathPatternSet,
}

impl ModuleResolver {
    pub fn new(
        root: &Path,
        aliases: &[AliasPatternConfig],
        candidate_suffixes: Vec<String>,
        ignore: PathPatternSet,
    ) -> Result<Self, RoundaboutError> {
        let aliases = aliases
            .iter()
            .map(AliasPattern::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            root: root.to_path_buf(),
            aliases,
            candidate_suffixes,
            ignore,
        })
    }

    /// Build a resolver for `config`, rooted at the already-normalized `root`
    pub fn from_config(config: &AnalysisConfig, root: &Path) -> Result<Self, RoundaboutError> {
        let ignore = PathPatternSet::new(root, &config.ignore_path_patterns)?;
        Self::new(
            root,
            &config.alias_patterns,
            config.candidate_suffixes.clone(),
            ignore,
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignore.matches(path)
    }

    /// Resolve `raw` as referenced from `origin`
    ///
    /// Order: first matching alias, then a relative join against the origin's
    /// directory, then candidate suffixes probed in configured order. The first
    /// existing file wins.
    pub fn resolve(&self, raw: &str, origin: &ModuleId) -> Resolution {
        let base = if let Some(substituted) = self.aliases.iter().find_map(|a| a.apply(raw)) {
            let substituted = Path::new(&substituted);
            if substituted.is_absolute() {
                substituted.to_path_buf()
            } else {
                self.root.join(substituted)
            }
        } else if is_relative_specifier(raw) {
            origin.dir().join(raw)
        } else if raw.starts_with('/') {
            PathBuf::from(raw)
        } else {
            return Resolution::External;
        };

        let base = base.clean();

        for suffix in &self.candidate_suffixes {
            let candidate = with_suffix(&base, suffix);
            if candidate.is_file() {
                let module = ModuleId::new(&candidate);
                trace!(raw, resolved = %module, "resolved reference");
                if self.ignore.matches(module.path()) {
                    return Resolution::Ignored(module);
                }
                return Resolution::Resolved(module);
            }
        }

        Resolution::Unresolvable { candidate: base }
    }
}

fn is_relative_specifier(raw: &str) -> bool {
    raw == "." || raw == ".." || raw.starts_with("./") || raw.starts_with("../")
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut joined = OsString::from(base.as_os_str());
    joined.push(suffix);
    PathBuf::from(joined)
}
