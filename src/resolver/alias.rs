//! Alias prefix substitution (e.g. `@/components` → `src/components`)

use crate::config::AliasPatternConfig;
use crate::error::RoundaboutError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasPattern {
    prefix: String,
    replacement: String,
    wildcard: bool,
}

impl AliasPattern {
    /// Validate and compile one alias
    ///
    /// A trailing `*` on both sides (`@/*` → `src/*`) marks a wildcard alias;
    /// a `*` anywhere else is rejected.
    pub fn parse(config: &AliasPatternConfig) -> Result<Self, RoundaboutError> {
        let invalid = |reason: &str| RoundaboutError::InvalidAliasPattern {
            prefix: config.prefix.clone(),
            reason: reason.to_string(),
        };

        let prefix = config.prefix.as_str();
        let replacement = config.replacement.as_str();

        if prefix.is_empty() || prefix == "*" {
            return Err(invalid("prefix must not be empty"));
        }

        let prefix_stars = prefix.matches('*').count();
        let replacement_stars = replacement.matches('*').count();

        if prefix_stars > 1 || (prefix_stars == 1 && !prefix.ends_with('*')) {
            return Err(invalid("wildcard must be the last character"));
        }
        if replacement_stars > 1 || (replacement_stars == 1 && !replacement.ends_with('*')) {
            return Err(invalid("replacement wildcard must be the last character"));
        }
        if prefix_stars != replacement_stars {
            return Err(invalid("prefix and replacement must both end in `*` or neither"));
        }

        let wildcard = prefix_stars == 1;
        Ok(Self {
            prefix: prefix.trim_end_matches('*').to_string(),
            replacement: replacement.trim_end_matches('*').to_string(),
            wildcard,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Substitute the alias in `specifier`, or `None` when it does not apply
    ///
    /// A non-wildcard prefix only matches on a path boundary, so `@app`
    /// covers `@app/x` but not `@apple`.
    pub fn apply(&self, specifier: &str) -> Option<String> {
        let rest = specifier.strip_prefix(&self.prefix)?;

        if self.wildcard {
            return Some(format!("{}{}", self.replacement, rest));
        }

        if rest.is_empty() {
            return Some(self.replacement.clone());
        }

        if self.prefix.ends_with('/') || rest.starts_with('/') {
            let base = self.replacement.trim_end_matches('/');
            let rest = rest.trim_start_matches('/');
            if base.is_empty() {
                return Some(rest.to_string());
            }
            return Some(format!("{base}/{rest}"));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alias(prefix: &str, replacement: &str) -> AliasPattern {
        AliasPattern::parse(&AliasPatternConfig::new(prefix, replacement)).unwrap()
    }

    #[test]
    fn test_wildcard_alias() {
        let a = alias("@/*", "src/*");
        assert_eq!(a.apply("@/utils/config").as_deref(), Some("src/utils/config"));
        assert_eq!(a.apply("lodash"), None);
    }

    #[test]
    fn test_prefix_alias_respects_boundaries() {
        let a = alias("@app", "src/app");
        assert_eq!(a.apply("@app").as_deref(), Some("src/app"));
        assert_eq!(a.apply("@app/button").as_deref(), Some("src/app/button"));
        assert_eq!(a.apply("@apple/x"), None);
    }

    #[test]
    fn test_trailing_slash_prefix() {
        let a = alias("~/", "./src/");
        assert_eq!(a.apply("~/a/b").as_deref(), Some("./src/a/b"));
    }

    #[test]
    fn test_malformed_aliases() {
        for (prefix, replacement) in [
            ("", "src"),
            ("*", "src/*"),
            ("@/*/x", "src/*"),
            ("@/*", "src"),
            ("@/", "src/*"),
            ("@/**", "src/**"),
        ] {
            let result = AliasPattern::parse(&AliasPatternConfig::new(prefix, replacement));
            assert!(
                matches!(result, Err(RoundaboutError::InvalidAliasPattern { .. })),
                "expected '{prefix}' -> '{replacement}' to be rejected"
            );
        }
    }
}
