//! Reference filtering functionality

use crate::config::AnalysisConfig;
use crate::core::ReferenceKind;

/// Decides which reference kinds become graph edges
///
/// Type-only and dynamic references do not load the target module eagerly,
/// so they are left out of the graph unless explicitly requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceFilter {
    include_type_imports: bool,
    include_dynamic_imports: bool,
}

impl ReferenceFilter {
    /// Create a new reference filter
    pub fn new(include_type_imports: bool, include_dynamic_imports: bool) -> Self {
        Self {
            include_type_imports,
            include_dynamic_imports,
        }
    }

    /// Check if type-only references should be included
    pub fn include_type_imports(&self) -> bool {
        self.include_type_imports
    }

    /// Check if dynamic imports should be included
    pub fn include_dynamic_imports(&self) -> bool {
        self.include_dynamic_imports
    }

    /// Check if a reference of this kind should become an edge
    pub fn should_include(&self, kind: ReferenceKind) -> bool {
        match kind {
            ReferenceKind::Import | ReferenceKind::ReExport | ReferenceKind::Require => true,
            ReferenceKind::TypeOnly | ReferenceKind::TypeReExport => self.include_type_imports,
            ReferenceKind::Dynamic => self.include_dynamic_imports,
        }
    }
}

impl From<&AnalysisConfig> for ReferenceFilter {
    fn from(config: &AnalysisConfig) -> Self {
        Self::new(config.include_type_imports, config.include_dynamic_imports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_excludes_lazy_references() {
        let filter = ReferenceFilter::default();
        assert!(filter.should_include(ReferenceKind::Import));
        assert!(filter.should_include(ReferenceKind::ReExport));
        assert!(filter.should_include(ReferenceKind::Require));
        assert!(!filter.should_include(ReferenceKind::TypeOnly));
        assert!(!filter.should_include(ReferenceKind::TypeReExport));
        assert!(!filter.should_include(ReferenceKind::Dynamic));
    }

    #[test]
    fn test_opt_in() {
        let filter = ReferenceFilter::new(true, true);
        assert!(filter.should_include(ReferenceKind::TypeOnly));
        assert!(filter.should_include(ReferenceKind::TypeReExport));
        assert!(filter.should_include(ReferenceKind::Dynamic));
    }
}
