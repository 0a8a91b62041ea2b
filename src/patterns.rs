//! Glob-style path predicates
//!
//! Used for `ignorePathPatterns`, `infrastructurePathPatterns`, and entry
//! discovery. A path matches when its root-relative form (with `/`
//! separators) or its absolute form matches any pattern.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::core::to_slash;
use crate::error::RoundaboutError;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
pub struct PathPatternSet {
    root: PathBuf,
    patterns: Vec<Pattern>,
}

impl PathPatternSet {
    /// Compile `patterns`; a malformed pattern is a configuration error
    pub fn new(root: &Path, patterns: &[String]) -> Result<Self, RoundaboutError> {
        let patterns = patterns
            .iter()
            .map(|raw| {
                Pattern::new(raw).map_err(|source| RoundaboutError::InvalidPathPattern {
                    pattern: raw.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            root: root.to_path_buf(),
            patterns,
        })
    }

    pub fn empty(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            patterns: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let absolute = to_slash(path);
        let relative = path.strip_prefix(&self.root).ok().map(to_slash);

        self.patterns.iter().any(|pattern| {
            relative
                .as_deref()
                .is_some_and(|rel| pattern.matches_with(rel, MATCH_OPTIONS))
                || pattern.matches_with(&absolute, MATCH_OPTIONS)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(patterns: &[&str]) -> PathPatternSet {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        PathPatternSet::new(Path::new("/repo"), &patterns).unwrap()
    }

    #[test]
    fn test_relative_double_star() {
        let infra = set(&["services/**"]);
        assert!(infra.matches(Path::new("/repo/services/logger.ts")));
        assert!(infra.matches(Path::new("/repo/services/deep/nested/x.ts")));
        assert!(!infra.matches(Path::new("/repo/utils/config.ts")));
    }

    #[test]
    fn test_single_star_does_not_cross_directories() {
        let infra = set(&["src/*.ts"]);
        assert!(infra.matches(Path::new("/repo/src/main.ts")));
        assert!(!infra.matches(Path::new("/repo/src/nested/main.ts")));
    }

    #[test]
    fn test_node_modules_anywhere() {
        let ignore = set(&["**/node_modules/**"]);
        assert!(ignore.matches(Path::new("/repo/node_modules/react/index.js")));
        assert!(ignore.matches(Path::new("/repo/packages/a/node_modules/x/y.js")));
        assert!(!ignore.matches(Path::new("/repo/src/node.js")));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        assert!(!PathPatternSet::empty(Path::new("/repo")).matches(Path::new("/repo/a.ts")));
    }

    #[test]
    fn test_invalid_pattern_is_configuration_error() {
        let err = PathPatternSet::new(Path::new("/repo"), &["src/[".to_string()]).unwrap_err();
        assert!(matches!(err, RoundaboutError::InvalidPathPattern { .. }));
    }
}
