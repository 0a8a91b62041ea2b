use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::core::{AnalysisDiagnostic, ModuleId, Reference};
use crate::extractor::ReferenceExtractor;
use crate::reference_filter::ReferenceFilter;
use crate::resolver::{ModuleResolver, Resolution};

/// Snapshot of a file's identity on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fingerprint {
    Present {
        modified: Option<SystemTime>,
        len: u64,
    },
    Missing,
}

impl Fingerprint {
    pub fn of(path: &Path) -> Self {
        match std::fs::metadata(path) {
            Ok(meta) => Fingerprint::Present {
                modified: meta.modified().ok(),
                len: meta.len(),
            },
            Err(_) => Fingerprint::Missing,
        }
    }
}

/// Resolved out-edges of one module at one fingerprint
#[derive(Debug, Clone)]
pub struct DependencyRecord {
    module: ModuleId,
    edges: Vec<ModuleId>,
    edge_symbols: BTreeMap<ModuleId, Vec<String>>,
    fingerprint: Fingerprint,
    is_aggregator: bool,
    diagnostics: Vec<AnalysisDiagnostic>,
    /// Every extracted reference, kept so edges can be re-linked without
    /// extracting again
    references: Vec<Reference>,
    /// Outcome of each reference that passed the filter
    links: Vec<(String, Resolution)>,
    extraction_failure: Option<AnalysisDiagnostic>,
}

impl DependencyRecord {
    pub fn module(&self) -> &ModuleId {
        &self.module
    }

    /// Direct dependencies in source order, without duplicates
    pub fn edges(&self) -> &[ModuleId] {
        &self.edges
    }

    /// Names imported over the edge to `target`
    pub fn symbols_for(&self, target: &ModuleId) -> &[String] {
        self.edge_symbols
            .get(target)
            .map(|symbols| symbols.as_slice())
            .unwrap_or(&[])
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn is_aggregator(&self) -> bool {
        self.is_aggregator
    }

    /// Unresolvable references and extraction failures found for this module
    pub fn diagnostics(&self) -> &[AnalysisDiagnostic] {
        &self.diagnostics
    }
}

struct Entry {
    record: Arc<DependencyRecord>,
    /// Pass in which the record was last checked against the disk
    verified_in: u64,
}

type Slot = Mutex<Option<Entry>>;

/// Marks an analysis pass over a [`DependencyCache`]
///
/// While a pass is open, a record checked against the disk once is trusted
/// for the rest of the pass. Dropping the guard ends the pass.
pub struct CachePass<'a> {
    cache: &'a DependencyCache,
}

impl Drop for CachePass<'_> {
    fn drop(&mut self) {
        self.cache.pass.store(NO_PASS, Ordering::Release);
    }
}

const NO_PASS: u64 = 0;

/// Memoizes each module's resolved dependencies
///
/// A record is re-extracted when the file's fingerprint changes and re-linked
/// when any of its references now resolves differently, for example because
/// the target file was created or deleted. Each module has its own slot lock,
/// so concurrent callers for the same module wait for a single computation
/// while other modules proceed independently.
pub struct DependencyCache {
    extractor: Arc<dyn ReferenceExtractor>,
    resolver: ModuleResolver,
    filter: ReferenceFilter,
    slots: Mutex<HashMap<ModuleId, Arc<Slot>>>,
    hits: AtomicUsize,
    computations: AtomicUsize,
    pass: AtomicU64,
    passes_started: AtomicU64,
}

impl DependencyCache {
    pub fn new(
        extractor: Arc<dyn ReferenceExtractor>,
        resolver: ModuleResolver,
        filter: ReferenceFilter,
    ) -> Self {
        Self {
            extractor,
            resolver,
            filter,
            slots: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            computations: AtomicUsize::new(0),
            pass: AtomicU64::new(NO_PASS),
            passes_started: AtomicU64::new(0),
        }
    }

    pub fn resolver(&self) -> &ModuleResolver {
        &self.resolver
    }

    /// Open an analysis pass; see [`CachePass`]
    pub fn begin_pass(&self) -> CachePass<'_> {
        let id = self.passes_started.fetch_add(1, Ordering::Relaxed) + 1;
        self.pass.store(id, Ordering::Release);
        CachePass { cache: self }
    }

    /// Current record for `module`, recomputing it if the file changed
    pub fn record(&self, module: &ModuleId) -> Arc<DependencyRecord> {
        let pass = self.pass.load(Ordering::Acquire);

        let slot = {
            let mut slots = lock(&self.slots);
            Arc::clone(slots.entry(module.clone()).or_default())
        };

        let mut entry = lock(&slot);
        if let Some(cached) = entry.as_ref()
            && pass != NO_PASS
            && cached.verified_in == pass
        {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(&cached.record);
        }

        let fingerprint = Fingerprint::of(module.path());
        if let Some(cached) = entry.as_mut()
            && cached.record.fingerprint == fingerprint
        {
            if self.links_are_current(&cached.record) {
                self.hits.fetch_add(1, Ordering::Relaxed);
            } else {
                debug!(module = %module, "reference targets changed, re-linking dependencies");
                cached.record = Arc::new(self.relink(&cached.record));
            }
            cached.verified_in = pass;
            return Arc::clone(&cached.record);
        }

        if entry.is_some() {
            debug!(module = %module, "fingerprint changed, recomputing dependencies");
        }

        let record = Arc::new(self.compute(module, fingerprint));
        *entry = Some(Entry {
            record: Arc::clone(&record),
            verified_in: pass,
        });
        record
    }

    /// Direct dependencies of `module`
    pub fn get_edges(&self, module: &ModuleId) -> Vec<ModuleId> {
        self.record(module).edges.clone()
    }

    /// Whether `module` consists only of re-export forwards
    pub fn is_aggregator(&self, module: &ModuleId) -> bool {
        self.record(module).is_aggregator
    }

    /// Number of modules with a slot in the cache
    pub fn len(&self) -> usize {
        lock(&self.slots).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Times a record was served without recomputation
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    /// Times references were actually extracted from a file
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::Relaxed)
    }

    fn compute(&self, module: &ModuleId, fingerprint: Fingerprint) -> DependencyRecord {
        self.computations.fetch_add(1, Ordering::Relaxed);

        let extracted = self.extractor.extract(module).map_err(|e| {
            warn!(module = %module, error = %e, "reference extraction failed");
            AnalysisDiagnostic::extraction_failed(module, e.to_string())
        });

        self.link(module, fingerprint, extracted)
    }

    /// Resolve the stored references again without re-extracting them
    fn relink(&self, record: &DependencyRecord) -> DependencyRecord {
        let extracted = match &record.extraction_failure {
            Some(diagnostic) => Err(diagnostic.clone()),
            None => Ok(record.references.clone()),
        };
        self.link(&record.module, record.fingerprint, extracted)
    }

    fn links_are_current(&self, record: &DependencyRecord) -> bool {
        record
            .links
            .iter()
            .all(|(raw, outcome)| self.resolver.resolve(raw, &record.module) == *outcome)
    }

    fn link(
        &self,
        module: &ModuleId,
        fingerprint: Fingerprint,
        extracted: Result<Vec<Reference>, AnalysisDiagnostic>,
    ) -> DependencyRecord {
        let mut record = DependencyRecord {
            module: module.clone(),
            edges: Vec::new(),
            edge_symbols: BTreeMap::new(),
            fingerprint,
            is_aggregator: false,
            diagnostics: Vec::new(),
            references: Vec::new(),
            links: Vec::new(),
            extraction_failure: None,
        };

        let references = match extracted {
            Ok(references) => references,
            Err(diagnostic) => {
                record.diagnostics.push(diagnostic.clone());
                record.extraction_failure = Some(diagnostic);
                return record;
            }
        };

        record.is_aggregator =
            !references.is_empty() && references.iter().all(|r| r.kind.is_forward());

        for reference in &references {
            if !self.filter.should_include(reference.kind) {
                continue;
            }

            let resolution = self.resolver.resolve(&reference.raw, module);
            match &resolution {
                Resolution::Resolved(target) => {
                    if !record.edges.contains(target) {
                        record.edges.push(target.clone());
                    }
                    let symbols = record.edge_symbols.entry(target.clone()).or_default();
                    for name in &reference.specifiers {
                        if !symbols.contains(name) {
                            symbols.push(name.clone());
                        }
                    }
                }
                Resolution::External | Resolution::Ignored(_) => {}
                Resolution::Unresolvable { .. } => {
                    record
                        .diagnostics
                        .push(AnalysisDiagnostic::unresolvable(reference));
                }
            }
            record.links.push((reference.raw.clone(), resolution));
        }
        record.references = references;

        debug!(
            module = %module,
            edges = record.edges.len(),
            aggregator = record.is_aggregator,
            "computed dependencies"
        );

        record
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::constants::analysis::DEFAULT_CANDIDATE_SUFFIXES;
    use crate::core::DiagnosticKind;
    use crate::extractor::{ExtractionError, ScriptExtractor};
    use crate::patterns::PathPatternSet;

    /// Wraps the script extractor and counts invocations
    struct CountingExtractor {
        inner: ScriptExtractor,
        calls: AtomicUsize,
        delay: Duration,
    }

    impl CountingExtractor {
        fn new(delay: Duration) -> Self {
            Self {
                inner: ScriptExtractor::new(),
                calls: AtomicUsize::new(0),
                delay,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ReferenceExtractor for CountingExtractor {
        fn extract(&self, module: &ModuleId) -> Result<Vec<Reference>, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            self.inner.extract(module)
        }
    }

    struct Fixture {
        _dir: TempDir,
        root: PathBuf,
    }

    impl Fixture {
        fn new(files: &[(&str, &str)]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = dir.path().canonicalize().unwrap();
            let fx = Self { _dir: dir, root };
            for (name, content) in files {
                fx.write(name, content);
            }
            fx
        }

        fn write(&self, name: &str, content: &str) {
            let path = self.root.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        fn module(&self, name: &str) -> ModuleId {
            ModuleId::new(self.root.join(name))
        }

        fn cache(&self, extractor: Arc<dyn ReferenceExtractor>) -> DependencyCache {
            let resolver = ModuleResolver::new(
                &self.root,
                &[],
                DEFAULT_CANDIDATE_SUFFIXES
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                PathPatternSet::empty(&self.root),
            )
            .unwrap();
            DependencyCache::new(extractor, resolver, ReferenceFilter::default())
        }
    }

    #[test]
    fn test_edges_are_resolved_in_source_order() {
        let fx = Fixture::new(&[
            ("a.ts", "import c from './c';\nimport b from './b';\nimport x from 'pkg';"),
            ("b.ts", ""),
            ("c.ts", ""),
        ]);
        let cache = fx.cache(Arc::new(ScriptExtractor::new()));

        assert_eq!(
            cache.get_edges(&fx.module("a.ts")),
            vec![fx.module("c.ts"), fx.module("b.ts")]
        );
    }

    #[test]
    fn test_repeated_queries_hit_the_cache() {
        let fx = Fixture::new(&[("a.ts", "import b from './b';"), ("b.ts", "")]);
        let extractor = Arc::new(CountingExtractor::new(Duration::ZERO));
        let cache = fx.cache(extractor.clone());

        let first = cache.get_edges(&fx.module("a.ts"));
        let second = cache.get_edges(&fx.module("a.ts"));

        assert_eq!(first, second);
        assert_eq!(extractor.calls(), 1);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_fingerprint_change_recomputes() {
        let fx = Fixture::new(&[
            ("a.ts", "import b from './b';"),
            ("b.ts", ""),
            ("c.ts", ""),
        ]);
        let extractor = Arc::new(CountingExtractor::new(Duration::ZERO));
        let cache = fx.cache(extractor.clone());

        assert_eq!(cache.get_edges(&fx.module("a.ts")), vec![fx.module("b.ts")]);

        fx.write("a.ts", "import b from './b';\nimport c from './c';");

        assert_eq!(
            cache.get_edges(&fx.module("a.ts")),
            vec![fx.module("b.ts"), fx.module("c.ts")]
        );
        assert_eq!(extractor.calls(), 2);
    }

    #[test]
    fn test_concurrent_queries_compute_once() {
        let fx = Fixture::new(&[("a.ts", "import b from './b';"), ("b.ts", "")]);
        let extractor = Arc::new(CountingExtractor::new(Duration::from_millis(50)));
        let cache = fx.cache(extractor.clone());
        let module = fx.module("a.ts");

        let results: Vec<Vec<ModuleId>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| cache.get_edges(&module)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(extractor.calls(), 1);
        assert!(results.iter().all(|edges| edges == &vec![fx.module("b.ts")]));
    }

    #[test]
    fn test_aggregator_detection() {
        let fx = Fixture::new(&[
            ("index.ts", "export * from './button';\nexport { Modal } from './modal';"),
            ("button.ts", ""),
            ("modal.ts", ""),
            ("empty.ts", "export const x = 1;"),
        ]);
        let cache = fx.cache(Arc::new(ScriptExtractor::new()));

        assert!(cache.is_aggregator(&fx.module("index.ts")));
        assert!(!cache.is_aggregator(&fx.module("empty.ts")));

        fx.write(
            "index.ts",
            "export * from './button';\nexport { Modal } from './modal';\nimport './button';",
        );
        assert!(!cache.is_aggregator(&fx.module("index.ts")));
    }

    #[test]
    fn test_unresolvable_references_become_diagnostics() {
        let fx = Fixture::new(&[("a.ts", "import gone from './gone';")]);
        let cache = fx.cache(Arc::new(ScriptExtractor::new()));

        let record = cache.record(&fx.module("a.ts"));
        assert!(record.edges().is_empty());
        assert_eq!(record.diagnostics().len(), 1);
        assert_eq!(
            record.diagnostics()[0].kind,
            DiagnosticKind::UnresolvableReference
        );
        assert_eq!(record.diagnostics()[0].module_or_reference, "./gone");
    }

    #[test]
    fn test_extraction_failure_yields_no_edges() {
        let fx = Fixture::new(&[("a.ts", "")]);
        fs::write(fx.root.join("bad.ts"), [0xff, 0xfe, 0x00]).unwrap();
        let cache = fx.cache(Arc::new(ScriptExtractor::new()));

        let record = cache.record(&fx.module("bad.ts"));
        assert!(record.edges().is_empty());
        assert_eq!(record.diagnostics()[0].kind, DiagnosticKind::ExtractionFailed);
    }

    #[test]
    fn test_symbols_are_tracked_per_edge() {
        let fx = Fixture::new(&[
            ("a.ts", "import { x, y } from './b';\nimport { y, z } from './b';"),
            ("b.ts", ""),
        ]);
        let cache = fx.cache(Arc::new(ScriptExtractor::new()));

        let record = cache.record(&fx.module("a.ts"));
        assert_eq!(record.edges(), &[fx.module("b.ts")]);
        assert_eq!(record.symbols_for(&fx.module("b.ts")), &["x", "y", "z"]);
    }

    #[test]
    fn test_records_are_trusted_within_a_pass() {
        let fx = Fixture::new(&[("a.ts", "import b from './b';"), ("b.ts", ""), ("c.ts", "")]);
        let extractor = Arc::new(CountingExtractor::new(Duration::ZERO));
        let cache = fx.cache(extractor.clone());

        {
            let _pass = cache.begin_pass();
            assert_eq!(cache.get_edges(&fx.module("a.ts")), vec![fx.module("b.ts")]);
            fx.write("a.ts", "import b from './b';\nimport c from './c';");
            assert_eq!(cache.get_edges(&fx.module("a.ts")), vec![fx.module("b.ts")]);
            assert_eq!(extractor.calls(), 1);
        }

        assert_eq!(
            cache.get_edges(&fx.module("a.ts")),
            vec![fx.module("b.ts"), fx.module("c.ts")]
        );
        assert_eq!(extractor.calls(), 2);
    }

    #[test]
    fn test_created_target_is_linked_without_re_extraction() {
        let fx = Fixture::new(&[("a.ts", "import b from './b';")]);
        let extractor = Arc::new(CountingExtractor::new(Duration::ZERO));
        let cache = fx.cache(extractor.clone());

        let before = cache.record(&fx.module("a.ts"));
        assert!(before.edges().is_empty());
        assert_eq!(before.diagnostics().len(), 1);

        fx.write("b.ts", "export const b = 1;");

        let after = cache.record(&fx.module("a.ts"));
        assert_eq!(after.edges(), &[fx.module("b.ts")]);
        assert!(after.diagnostics().is_empty());
        assert_eq!(extractor.calls(), 1);
    }

    #[test]
    fn test_deleted_target_is_unlinked() {
        let fx = Fixture::new(&[("a.ts", "import b from './b';"), ("b.ts", "")]);
        let cache = fx.cache(Arc::new(ScriptExtractor::new()));

        assert_eq!(cache.get_edges(&fx.module("a.ts")), vec![fx.module("b.ts")]);

        fs::remove_file(fx.root.join("b.ts")).unwrap();

        let record = cache.record(&fx.module("a.ts"));
        assert!(record.edges().is_empty());
        assert_eq!(
            record.diagnostics()[0].kind,
            DiagnosticKind::UnresolvableReference
        );
    }

    #[test]
    fn test_type_re_exports_keep_a_barrel_an_aggregator() {
        let fx = Fixture::new(&[
            ("index.ts", "export * from './modal';\nexport type { Props } from './types';"),
            ("modal.ts", ""),
            ("types.ts", "export type Props = {};"),
        ]);
        let cache = fx.cache(Arc::new(ScriptExtractor::new()));

        let record = cache.record(&fx.module("index.ts"));
        assert!(record.is_aggregator());
        assert_eq!(record.edges(), &[fx.module("modal.ts")]);
    }
}
