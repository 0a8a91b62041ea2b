//! Core type definitions
//!
//! This module contains the basic data structures used throughout the
//! analyzer, with minimal logic - focusing on data representation.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use path_clean::PathClean;
use serde::Serialize;

/// Canonical identity of one analyzable module
///
/// In practice this is a normalized absolute path. Two references that denote
/// the same file must produce equal ids, so every constructor funnels through
/// the same normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(Arc<PathBuf>);

impl ModuleId {
    /// Build an id from a path on disk
    ///
    /// The path is made absolute against the current directory, lexically
    /// cleaned, and canonicalized when the file exists (resolving symlinks).
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        };
        let cleaned = absolute.clean();
        let canonical = cleaned.canonicalize().unwrap_or(cleaned);
        Self(Arc::new(canonical))
    }

    /// Build an id from a path that is already normalized, without touching
    /// the file system
    pub fn from_normalized(path: impl Into<PathBuf>) -> Self {
        Self(Arc::new(path.into()))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Directory containing the module
    pub fn dir(&self) -> &Path {
        self.0.parent().unwrap_or_else(|| Path::new("/"))
    }

    /// Path relative to `root` with forward slashes, or the full path when the
    /// module lives outside `root`
    pub fn display_relative(&self, root: &Path) -> String {
        let relative = self.0.strip_prefix(root).unwrap_or(&self.0);
        to_slash(relative)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Render a path with `/` separators regardless of platform
pub fn to_slash(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => out.push('/'),
            Component::Prefix(prefix) => out.push_str(&prefix.as_os_str().to_string_lossy()),
            other => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    out
}

/// Location of a reference in its source file (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Syntactic role of a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceKind {
    /// `import x from '...'` or `import '...'`
    Import,
    /// `export ... from '...'`, a pure forward of another module
    ReExport,
    /// `import type ... from '...'`
    TypeOnly,
    /// `export type ... from '...'`, a forward erased at compile time
    TypeReExport,
    /// `import('...')`
    Dynamic,
    /// `require('...')`
    Require,
}

impl ReferenceKind {
    /// Whether this reference only forwards another module's exports
    pub fn is_forward(&self) -> bool {
        matches!(self, ReferenceKind::ReExport | ReferenceKind::TypeReExport)
    }

    /// Whether the reference disappears once types are erased
    pub fn is_type_only(&self) -> bool {
        matches!(self, ReferenceKind::TypeOnly | ReferenceKind::TypeReExport)
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Import => write!(f, "import"),
            ReferenceKind::ReExport => write!(f, "re-export"),
            ReferenceKind::TypeOnly => write!(f, "type-only"),
            ReferenceKind::TypeReExport => write!(f, "type-re-export"),
            ReferenceKind::Dynamic => write!(f, "dynamic"),
            ReferenceKind::Require => write!(f, "require"),
        }
    }
}

/// One module reference statement found in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub raw: String,
    pub origin: ModuleId,
    pub position: Position,
    pub kind: ReferenceKind,
    /// Names bound by the statement (`{ a, b as c }` yields `a`, `b`)
    pub specifiers: Vec<String>,
}

/// A closed chain of modules, stored in canonical rotation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cycle {
    modules: Vec<ModuleId>,
}

impl Cycle {
    /// Create a cycle from a closed path, rotating it into canonical form
    pub fn new(modules: Vec<ModuleId>) -> Self {
        Self {
            modules: Self::canonicalize(modules),
        }
    }

    /// Rotate so the smallest module comes first
    pub fn canonicalize(mut modules: Vec<ModuleId>) -> Vec<ModuleId> {
        if let Some(start) = modules
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.cmp(b))
            .map(|(i, _)| i)
        {
            modules.rotate_left(start);
        }
        modules
    }

    pub fn modules(&self) -> &[ModuleId] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn contains(&self, module: &ModuleId) -> bool {
        self.modules.contains(module)
    }

    /// Edges of the cycle in order, including the closing edge back to the
    /// first module
    pub fn edges(&self) -> impl Iterator<Item = (&ModuleId, &ModuleId)> {
        let n = self.modules.len();
        (0..n).map(move |i| (&self.modules[i], &self.modules[(i + 1) % n]))
    }
}

/// Severity of a detected cycle, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Standard,
    Aggregator,
    Infrastructure,
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityTier::Standard => write!(f, "standard"),
            SeverityTier::Aggregator => write!(f, "aggregator"),
            SeverityTier::Infrastructure => write!(f, "infrastructure"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemediationKind {
    ExtractShared,
    UseDirectImport,
}

impl fmt::Display for RemediationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemediationKind::ExtractShared => write!(f, "extract-shared"),
            RemediationKind::UseDirectImport => write!(f, "use-direct-import"),
        }
    }
}

/// Structured fix suggestion for one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemediationHint {
    pub kind: RemediationKind,
    pub target_module: Option<ModuleId>,
    pub suggested_new_module: Option<PathBuf>,
    /// Edge recommended for removal, as `(from, to)`
    pub remove_edge: (ModuleId, ModuleId),
    /// Symbols carried by the edge, when the import names them
    pub symbols: Vec<String>,
    /// Every aggregator module in the cycle
    pub aggregators: Vec<ModuleId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedCycle {
    pub cycle: Cycle,
    pub severity: SeverityTier,
    pub remediation: RemediationHint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    UnresolvableReference,
    ExtractionFailed,
    AnalysisTruncated,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnresolvableReference => write!(f, "unresolvable-reference"),
            DiagnosticKind::ExtractionFailed => write!(f, "extraction-failed"),
            DiagnosticKind::AnalysisTruncated => write!(f, "analysis-truncated"),
        }
    }
}

/// Non-fatal condition surfaced alongside the cycle report
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDiagnostic {
    pub kind: DiagnosticKind,
    pub module_or_reference: String,
    pub detail: String,
}

impl AnalysisDiagnostic {
    pub fn unresolvable(reference: &Reference) -> Self {
        Self {
            kind: DiagnosticKind::UnresolvableReference,
            module_or_reference: reference.raw.clone(),
            detail: format!(
                "'{}' imported from {}:{} does not match any file",
                reference.raw, reference.origin, reference.position
            ),
        }
    }

    pub fn extraction_failed(module: &ModuleId, detail: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::ExtractionFailed,
            module_or_reference: module.to_string(),
            detail: detail.into(),
        }
    }

    pub fn truncated(module_or_reference: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::AnalysisTruncated,
            module_or_reference: module_or_reference.into(),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> ModuleId {
        ModuleId::from_normalized(format!("/repo/{name}"))
    }

    #[test]
    fn test_canonical_form_starts_at_smallest() {
        let cycle = Cycle::new(vec![id("c.js"), id("a.js"), id("b.js")]);
        assert_eq!(cycle.modules(), &[id("a.js"), id("b.js"), id("c.js")]);
    }

    #[test]
    fn test_canonical_form_is_rotation_invariant() {
        let base = vec![id("d.js"), id("b.js"), id("e.js"), id("a.js")];
        let expected = Cycle::new(base.clone());
        for k in 0..base.len() {
            let mut rotated = base.clone();
            rotated.rotate_left(k);
            assert_eq!(Cycle::new(rotated), expected);
        }
    }

    #[test]
    fn test_cycle_edges_close() {
        let cycle = Cycle::new(vec![id("a.js"), id("b.js")]);
        let edges: Vec<_> = cycle.edges().collect();
        assert_eq!(edges, vec![(&id("a.js"), &id("b.js")), (&id("b.js"), &id("a.js"))]);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(SeverityTier::Infrastructure > SeverityTier::Aggregator);
        assert!(SeverityTier::Aggregator > SeverityTier::Standard);
    }

    #[test]
    fn test_display_relative() {
        let module = id("src/services/logger.ts");
        assert_eq!(
            module.display_relative(Path::new("/repo")),
            "src/services/logger.ts"
        );
        assert_eq!(
            module.display_relative(Path::new("/elsewhere")),
            "/repo/src/services/logger.ts"
        );
    }

    #[test]
    fn test_module_id_normalizes_dot_segments() {
        let a = ModuleId::new("/nonexistent/x/../y/./z.js");
        let b = ModuleId::new("/nonexistent/y/z.js");
        assert_eq!(a, b);
    }

    #[test]
    fn test_diagnostic_kind_serialization() {
        let diag = AnalysisDiagnostic::truncated("a.js", "depth");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["kind"], "analysis-truncated");
        assert_eq!(json["moduleOrReference"], "a.js");
    }
}
