use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::core::{AnalysisDiagnostic, Cycle, ModuleId};
use crate::error::RoundaboutError;
use crate::graph::DependencyGraph;

/// Shared flag used to stop an analysis between traversals
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Cycles found by one detection run
#[derive(Debug, Clone, Default)]
pub struct DetectionOutcome {
    cycles: Vec<Cycle>,
    diagnostics: Vec<AnalysisDiagnostic>,
}

impl DetectionOutcome {
    /// Unique cycles in canonical form, sorted
    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    /// One truncation notice per abandoned branch, sorted
    pub fn diagnostics(&self) -> &[AnalysisDiagnostic] {
        &self.diagnostics
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    pub fn cycle_count(&self) -> usize {
        self.cycles.len()
    }

    pub fn into_parts(self) -> (Vec<Cycle>, Vec<AnalysisDiagnostic>) {
        (self.cycles, self.diagnostics)
    }
}

/// Enumerates every elementary cycle up to a path-length bound
///
/// Each known module starts its own depth-first traversal. A traversal from
/// `m` never enters a module ordered before `m`, because any cycle through
/// such a module is found from that module's own traversal. Traversals are
/// independent and run on a rayon pool; the only shared state is the set of
/// cycles already seen.
pub struct CycleDetector {
    max_depth: usize,
    pool: Option<rayon::ThreadPool>,
    cancel: CancellationToken,
    progress: Option<ProgressBar>,
}

impl CycleDetector {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            pool: None,
            cancel: CancellationToken::new(),
            progress: None,
        }
    }

    /// Run traversals on a dedicated pool of `jobs` threads
    pub fn with_jobs(mut self, jobs: usize) -> Result<Self, RoundaboutError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|i| format!("roundabout-detector-{i}"))
            .build()
            .map_err(|e| RoundaboutError::ConfigurationError {
                message: format!("Failed to start {jobs} worker threads: {e}"),
            })?;
        self.pool = Some(pool);
        Ok(self)
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Find all cycles among `modules`
    ///
    /// Edges leading outside `modules` are not followed.
    pub fn detect_cycles<G: DependencyGraph>(
        &self,
        graph: &G,
        modules: &[ModuleId],
    ) -> Result<DetectionOutcome, RoundaboutError> {
        let known: HashSet<&ModuleId> = modules.iter().collect();
        let seen: Mutex<BTreeSet<Cycle>> = Mutex::new(BTreeSet::new());

        let run = || -> Vec<AnalysisDiagnostic> {
            modules
                .par_iter()
                .flat_map_iter(|start| {
                    if self.cancel.is_cancelled() {
                        return Vec::new();
                    }
                    let diagnostics = self.traverse(graph, start, &known, &seen);
                    if let Some(pb) = &self.progress {
                        pb.inc(1);
                    }
                    diagnostics
                })
                .collect()
        };

        let mut diagnostics = match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        };

        if self.cancel.is_cancelled() {
            return Err(RoundaboutError::Cancelled);
        }

        diagnostics.sort();
        diagnostics.dedup();

        let cycles: Vec<Cycle> = seen
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_iter()
            .collect();

        info!(
            cycles = cycles.len(),
            truncated_branches = diagnostics.len(),
            "cycle detection complete"
        );

        Ok(DetectionOutcome {
            cycles,
            diagnostics,
        })
    }

    fn traverse<G: DependencyGraph>(
        &self,
        graph: &G,
        start: &ModuleId,
        known: &HashSet<&ModuleId>,
        seen: &Mutex<BTreeSet<Cycle>>,
    ) -> Vec<AnalysisDiagnostic> {
        struct Frame {
            edges: Vec<ModuleId>,
            next: usize,
        }

        let mut diagnostics = Vec::new();
        let mut path: Vec<ModuleId> = vec![start.clone()];
        let mut on_path: HashMap<ModuleId, usize> = HashMap::from([(start.clone(), 0)]);
        let mut frames = vec![Frame {
            edges: graph.edges(start),
            next: 0,
        }];

        while let Some(frame) = frames.last_mut() {
            let Some(target) = frame.edges.get(frame.next).cloned() else {
                frames.pop();
                if let Some(done) = path.pop() {
                    on_path.remove(&done);
                }
                continue;
            };
            frame.next += 1;

            if target < *start || !known.contains(&target) {
                continue;
            }

            if let Some(&index) = on_path.get(&target) {
                let cycle = Cycle::new(path[index..].to_vec());
                let inserted = seen
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(cycle);
                if inserted {
                    debug!(start = %start, length = path.len() - index, "found cycle");
                }
                continue;
            }

            if path.len() >= self.max_depth {
                let chain = path
                    .iter()
                    .chain(std::iter::once(&target))
                    .map(|m| m.to_string())
                    .collect::<Vec<_>>()
                    .join(" -> ");
                diagnostics.push(AnalysisDiagnostic::truncated(
                    target.to_string(),
                    format!(
                        "traversal exceeded maxDepth of {} along {}",
                        self.max_depth, chain
                    ),
                ));
                continue;
            }

            on_path.insert(target.clone(), path.len());
            frames.push(Frame {
                edges: graph.edges(&target),
                next: 0,
            });
            path.push(target);
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::DiagnosticKind;

    fn id(name: &str) -> ModuleId {
        ModuleId::from_normalized(format!("/repo/{name}"))
    }

    fn graph(edges: &[(&str, &[&str])]) -> (BTreeMap<ModuleId, Vec<ModuleId>>, Vec<ModuleId>) {
        let mut map = BTreeMap::new();
        for (from, tos) in edges {
            map.insert(id(from), tos.iter().map(|t| id(t)).collect());
            for to in tos.iter() {
                map.entry(id(to)).or_insert_with(Vec::new);
            }
        }
        let modules = map.keys().cloned().collect();
        (map, modules)
    }

    fn cycle(names: &[&str]) -> Cycle {
        Cycle::new(names.iter().map(|n| id(n)).collect())
    }

    #[test]
    fn test_direct_cycle() {
        let (g, modules) = graph(&[("a", &["b"]), ("b", &["a"])]);
        let outcome = CycleDetector::new(10).detect_cycles(&g, &modules).unwrap();

        assert_eq!(outcome.cycles(), &[cycle(&["a", "b"])]);
        assert!(outcome.diagnostics().is_empty());
    }

    #[test]
    fn test_acyclic_graph_has_no_cycles() {
        let (g, modules) = graph(&[("a", &["b", "c"]), ("b", &["c"]), ("c", &[])]);
        let outcome = CycleDetector::new(10).detect_cycles(&g, &modules).unwrap();

        assert!(!outcome.has_cycles());
    }

    #[test]
    fn test_self_loop() {
        let (g, modules) = graph(&[("a", &["a"])]);
        let outcome = CycleDetector::new(10).detect_cycles(&g, &modules).unwrap();

        assert_eq!(outcome.cycles(), &[cycle(&["a"])]);
    }

    #[test]
    fn test_all_elementary_cycles_are_found() {
        // a -> b -> c -> a and a -> c -> a share the a/c edge
        let (g, modules) = graph(&[("a", &["b", "c"]), ("b", &["c"]), ("c", &["a"])]);
        let outcome = CycleDetector::new(10).detect_cycles(&g, &modules).unwrap();

        assert_eq!(
            outcome.cycles(),
            &[cycle(&["a", "b", "c"]), cycle(&["a", "c"])]
        );
    }

    #[test]
    fn test_cycle_not_containing_smallest_start() {
        let (g, modules) = graph(&[("a", &["c"]), ("c", &["d"]), ("d", &["c"])]);
        let outcome = CycleDetector::new(10).detect_cycles(&g, &modules).unwrap();

        assert_eq!(outcome.cycles(), &[cycle(&["c", "d"])]);
    }

    #[test]
    fn test_output_is_stable_across_runs_and_pools() {
        let (g, modules) = graph(&[
            ("a", &["b", "d"]),
            ("b", &["c", "a"]),
            ("c", &["a", "d"]),
            ("d", &["b"]),
        ]);

        let serial = CycleDetector::new(10).detect_cycles(&g, &modules).unwrap();
        let parallel = CycleDetector::new(10)
            .with_jobs(4)
            .unwrap()
            .detect_cycles(&g, &modules)
            .unwrap();

        assert_eq!(serial.cycles(), parallel.cycles());
        assert!(serial.cycle_count() >= 3);
    }

    #[test]
    fn test_every_reported_cycle_is_real() {
        let (g, modules) = graph(&[
            ("a", &["b", "c"]),
            ("b", &["c", "e"]),
            ("c", &["a", "d"]),
            ("d", &["b"]),
            ("e", &[]),
        ]);
        let outcome = CycleDetector::new(10).detect_cycles(&g, &modules).unwrap();

        for found in outcome.cycles() {
            for (from, to) in found.edges() {
                assert!(g[from].contains(to), "{from} -> {to} is not an edge");
            }
        }
    }

    #[test]
    fn test_depth_bound_truncates_each_branch() {
        let names: Vec<String> = (0..15).map(|i| format!("m{i:02}")).collect();
        let mut map = BTreeMap::new();
        for pair in names.windows(2) {
            map.insert(id(&pair[0]), vec![id(&pair[1])]);
        }
        map.insert(id(&names[14]), Vec::new());
        let modules: Vec<ModuleId> = map.keys().cloned().collect();

        let outcome = CycleDetector::new(10).detect_cycles(&map, &modules).unwrap();

        assert!(!outcome.has_cycles());
        assert_eq!(outcome.diagnostics().len(), 5);
        assert!(
            outcome
                .diagnostics()
                .iter()
                .all(|d| d.kind == DiagnosticKind::AnalysisTruncated)
        );
    }

    #[test]
    fn test_cycle_at_exact_depth_is_found() {
        let (g, modules) = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
        let outcome = CycleDetector::new(3).detect_cycles(&g, &modules).unwrap();

        assert_eq!(outcome.cycles(), &[cycle(&["a", "b", "c"])]);
        assert!(outcome.diagnostics().is_empty());
    }

    #[test]
    fn test_edges_outside_known_modules_are_ignored() {
        let (g, _) = graph(&[("a", &["b"]), ("b", &["a"])]);
        let outcome = CycleDetector::new(10)
            .detect_cycles(&g, &[id("a")])
            .unwrap();

        assert!(!outcome.has_cycles());
    }

    #[test]
    fn test_cancelled_detection_fails() {
        let (g, modules) = graph(&[("a", &["b"]), ("b", &["a"])]);
        let token = CancellationToken::new();
        token.cancel();

        let result = CycleDetector::new(10)
            .with_cancellation(token)
            .detect_cycles(&g, &modules);

        assert!(matches!(result, Err(RoundaboutError::Cancelled)));
    }
}
