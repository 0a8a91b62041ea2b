use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use petgraph::graph::DiGraph;
use tracing::{debug, info, warn};

use crate::cache::DependencyCache;
use crate::classifier::CycleClassifier;
use crate::config::AnalysisConfig;
use crate::core::{AnalysisDiagnostic, ClassifiedCycle, DiagnosticKind, ModuleId, SeverityTier};
use crate::detector::{CancellationToken, CycleDetector};
use crate::error::RoundaboutError;
use crate::extractor::{ReferenceExtractor, ScriptExtractor};
use crate::graph::ModuleGraph;
use crate::patterns::PathPatternSet;
use crate::progress::ProgressReporter;
use crate::reference_filter::ReferenceFilter;
use crate::resolver::ModuleResolver;

/// Result of one complete analysis run
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    root: PathBuf,
    cycles: Vec<ClassifiedCycle>,
    diagnostics: Vec<AnalysisDiagnostic>,
    modules: Vec<ModuleId>,
}

impl AnalysisReport {
    pub fn new(
        root: PathBuf,
        cycles: Vec<ClassifiedCycle>,
        mut diagnostics: Vec<AnalysisDiagnostic>,
        modules: Vec<ModuleId>,
    ) -> Self {
        diagnostics.sort();
        diagnostics.dedup();
        Self {
            root,
            cycles,
            diagnostics,
            modules,
        }
    }

    /// Normalized project root, used to shorten paths in reports
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Classified cycles, sorted by canonical form
    pub fn cycles(&self) -> &[ClassifiedCycle] {
        &self.cycles
    }

    pub fn diagnostics(&self) -> &[AnalysisDiagnostic] {
        &self.diagnostics
    }

    /// Every module reached from the entry files
    pub fn modules(&self) -> &[ModuleId] {
        &self.modules
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    pub fn cycle_count(&self) -> usize {
        self.cycles.len()
    }

    /// Highest severity among the reported cycles
    pub fn max_severity(&self) -> Option<SeverityTier> {
        self.cycles.iter().map(|c| c.severity).max()
    }

    pub fn count_by_severity(&self) -> BTreeMap<SeverityTier, usize> {
        let mut counts = BTreeMap::new();
        for cycle in &self.cycles {
            *counts.entry(cycle.severity).or_insert(0) += 1;
        }
        counts
    }

    /// Relative display path of `module`
    pub fn display(&self, module: &ModuleId) -> String {
        module.display_relative(&self.root)
    }

    /// Cycles with a member whose root-relative path contains `fragment`
    pub fn cycles_involving(&self, fragment: &str) -> Vec<&ClassifiedCycle> {
        self.cycles
            .iter()
            .filter(|c| {
                c.cycle
                    .modules()
                    .iter()
                    .any(|m| self.display(m).contains(fragment))
            })
            .collect()
    }

    /// A copy of this report keeping only cycles that involve `fragment`
    pub fn focused_on(&self, fragment: &str) -> AnalysisReport {
        AnalysisReport {
            root: self.root.clone(),
            cycles: self.cycles_involving(fragment).into_iter().cloned().collect(),
            diagnostics: self.diagnostics.clone(),
            modules: self.modules.clone(),
        }
    }
}

/// Runs the full pipeline: resolve, build the graph, detect, classify
pub struct ModuleAnalyzer {
    config: AnalysisConfig,
    extractor: Arc<dyn ReferenceExtractor>,
    cache: Option<Arc<DependencyCache>>,
    cancel: CancellationToken,
}

impl ModuleAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            extractor: Arc::new(ScriptExtractor::new()),
            cache: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn ReferenceExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Reuse a cache across runs; its resolver settings take precedence over
    /// this analyzer's alias and suffix options
    ///
    /// Each run re-checks every record once: changed files are re-extracted
    /// and references whose target appeared or vanished are re-linked.
    pub fn with_cache(mut self, cache: Arc<DependencyCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Normalized absolute project root
    pub fn root(&self) -> PathBuf {
        ModuleId::new(&self.config.root).path().to_path_buf()
    }

    /// Build a fresh cache from this analyzer's configuration
    pub fn build_cache(&self) -> Result<Arc<DependencyCache>, RoundaboutError> {
        let root = self.root();
        let resolver = ModuleResolver::from_config(&self.config, &root)?;
        Ok(Arc::new(DependencyCache::new(
            Arc::clone(&self.extractor),
            resolver,
            ReferenceFilter::from(&self.config),
        )))
    }

    pub fn analyze(
        &self,
        progress: Option<&mut ProgressReporter>,
    ) -> Result<AnalysisReport, RoundaboutError> {
        self.run(progress).map(|(report, _)| report)
    }

    /// Analyze and also materialize the module graph for rendering
    pub fn analyze_graph(
        &self,
        progress: Option<&mut ProgressReporter>,
    ) -> Result<(AnalysisReport, DiGraph<ModuleId, ()>), RoundaboutError> {
        let (report, graph) = self.run(progress)?;
        let rendered = graph.to_petgraph(report.modules());
        Ok((report, rendered))
    }

    fn run(
        &self,
        mut progress: Option<&mut ProgressReporter>,
    ) -> Result<(AnalysisReport, ModuleGraph), RoundaboutError> {
        self.config.validate()?;

        let root = self.root();
        let infrastructure =
            PathPatternSet::new(&root, &self.config.infrastructure_path_patterns)?;
        let cache = match &self.cache {
            Some(cache) => Arc::clone(cache),
            None => self.build_cache()?,
        };
        let _pass = cache.begin_pass();
        let entries = self.entry_modules()?;

        info!(
            root = %root.display(),
            entries = entries.len(),
            max_depth = self.config.max_depth,
            max_modules = self.config.max_modules,
            "starting analysis"
        );

        if let Some(p) = progress.as_mut() {
            p.start_module_scan();
        }
        let graph = ModuleGraph::new(Arc::clone(&cache), entries, self.config.max_modules);
        let known = graph.all_known_modules();
        if let Some(p) = progress.as_mut() {
            p.finish_module_scan(known.len());
        }

        let mut detector = CycleDetector::new(self.config.max_depth)
            .with_cancellation(self.cancel.clone());
        if let Some(jobs) = self.config.jobs {
            detector = detector.with_jobs(jobs)?;
        }
        if let Some(p) = progress.as_mut() {
            detector = detector.with_progress(p.start_cycle_detection(known.len()));
        }

        let outcome = detector.detect_cycles(&graph, known.modules())?;

        if let Some(p) = progress.as_mut() {
            p.finish_cycle_detection(outcome.cycle_count());
        }

        let classifier = CycleClassifier::new(infrastructure, cache.as_ref());
        let classified = classifier.classify_all(outcome.cycles());

        let modules = known.modules().to_vec();
        let (_, detector_diagnostics) = outcome.into_parts();
        let mut diagnostics = known.into_diagnostics();
        diagnostics.extend(detector_diagnostics);

        let report = AnalysisReport::new(root, classified, diagnostics, modules);
        log_summary(&report);

        debug!(
            cached_modules = cache.len(),
            computations = cache.computations(),
            hits = cache.hits(),
            "dependency cache statistics"
        );

        Ok((report, graph))
    }

    /// Entry files as module ids; each must be a readable regular file
    fn entry_modules(&self) -> Result<Vec<ModuleId>, RoundaboutError> {
        self.config
            .absolute_entry_files()
            .into_iter()
            .map(|path| {
                let unreadable = |source| RoundaboutError::EntryFileUnreadable {
                    path: path.clone(),
                    source,
                };
                let metadata = std::fs::metadata(&path).map_err(unreadable)?;
                if !metadata.is_file() {
                    return Err(unreadable(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "not a regular file",
                    )));
                }
                std::fs::File::open(&path).map_err(unreadable)?;
                Ok(ModuleId::new(&path))
            })
            .collect()
    }
}

fn log_summary(report: &AnalysisReport) {
    info!(
        modules = report.module_count(),
        cycles = report.cycle_count(),
        diagnostics = report.diagnostics().len(),
        "analysis complete"
    );

    let mut by_kind: BTreeMap<DiagnosticKind, usize> = BTreeMap::new();
    for diagnostic in report.diagnostics() {
        *by_kind.entry(diagnostic.kind).or_insert(0) += 1;
    }
    for (kind, count) in by_kind {
        warn!(%kind, count, "analysis produced diagnostics");
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::common::ConfigBuilder;
    use crate::core::RemediationKind;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn config(dir: &TempDir, entries: &[&str]) -> AnalysisConfig {
        AnalysisConfig::builder()
            .with_root(dir.path())
            .with_entry_files(entries.iter().map(PathBuf::from).collect())
            .build()
            .unwrap()
    }

    #[test]
    fn test_direct_cycle_is_reported_once() {
        let dir = project(&[
            ("a.ts", "import { b } from './b';"),
            ("b.ts", "import { a } from './a';"),
        ]);

        let report = ModuleAnalyzer::new(config(&dir, &["a.ts", "b.ts"]))
            .analyze(None)
            .unwrap();

        assert_eq!(report.cycle_count(), 1);
        assert_eq!(report.cycles()[0].severity, SeverityTier::Standard);
        assert_eq!(
            report.cycles()[0].remediation.kind,
            RemediationKind::ExtractShared
        );
        assert_eq!(report.module_count(), 2);
    }

    #[test]
    fn test_unreadable_entry_is_fatal() {
        let dir = project(&[("a.ts", "")]);

        let result = ModuleAnalyzer::new(config(&dir, &["missing.ts"])).analyze(None);

        assert!(matches!(
            result,
            Err(RoundaboutError::EntryFileUnreadable { .. })
        ));
    }

    #[test]
    fn test_directory_entry_is_fatal() {
        let dir = project(&[("src/a.ts", "")]);

        let result = ModuleAnalyzer::new(config(&dir, &["src"])).analyze(None);

        assert!(matches!(
            result,
            Err(RoundaboutError::EntryFileUnreadable { .. })
        ));
    }

    #[test]
    fn test_malformed_alias_is_fatal() {
        let dir = project(&[("a.ts", "")]);
        let mut cfg = config(&dir, &["a.ts"]);
        cfg.alias_patterns = vec![crate::config::AliasPatternConfig::new("@/*/x", "src/*")];

        let result = ModuleAnalyzer::new(cfg).analyze(None);

        assert!(matches!(
            result,
            Err(RoundaboutError::InvalidAliasPattern { .. })
        ));
    }

    #[test]
    fn test_shared_cache_is_reused_between_runs() {
        let dir = project(&[("a.ts", "import './b';"), ("b.ts", "import './a';")]);
        let analyzer = ModuleAnalyzer::new(config(&dir, &["a.ts"]));
        let cache = analyzer.build_cache().unwrap();
        let analyzer = analyzer.with_cache(Arc::clone(&cache));

        let first = analyzer.analyze(None).unwrap();
        let computed = cache.computations();
        let second = analyzer.analyze(None).unwrap();

        assert_eq!(first.cycles(), second.cycles());
        assert_eq!(cache.computations(), computed);
    }

    #[test]
    fn test_shared_cache_sees_files_created_between_runs() {
        let dir = project(&[("a.ts", "import './b';")]);
        let analyzer = ModuleAnalyzer::new(config(&dir, &["a.ts"]));
        let cache = analyzer.build_cache().unwrap();
        let analyzer = analyzer.with_cache(Arc::clone(&cache));

        let before = analyzer.analyze(None).unwrap();
        assert!(!before.has_cycles());
        assert_eq!(before.diagnostics().len(), 1);

        fs::write(dir.path().join("b.ts"), "import './a';").unwrap();

        let after = analyzer.analyze(None).unwrap();
        assert_eq!(after.cycles().len(), 1);
        assert!(after.diagnostics().is_empty());
    }

    #[test]
    fn test_focus_filters_by_path_fragment() {
        let dir = project(&[
            ("a.ts", "import './b';\nimport './c';"),
            ("b.ts", "import './a';"),
            ("c.ts", "import './d';"),
            ("d.ts", "import './c';"),
        ]);

        let report = ModuleAnalyzer::new(config(&dir, &["a.ts"]))
            .analyze(None)
            .unwrap();

        assert_eq!(report.cycle_count(), 2);
        assert_eq!(report.focused_on("d.ts").cycle_count(), 1);
        assert_eq!(report.cycles_involving("nothing").len(), 0);
    }

    #[test]
    fn test_zero_depth_is_rejected() {
        let dir = project(&[("a.ts", "")]);
        let mut cfg = config(&dir, &["a.ts"]);
        cfg.max_depth = 0;

        assert!(matches!(
            ModuleAnalyzer::new(cfg).analyze(None),
            Err(RoundaboutError::ConfigurationError { .. })
        ));
    }
}
