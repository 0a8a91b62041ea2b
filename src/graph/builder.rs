use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{info, warn};

use crate::cache::DependencyCache;
use crate::core::{AnalysisDiagnostic, ModuleId};

/// Read-only view of module dependencies
///
/// The detector only needs out-edges, so anything that can answer that
/// question can be searched for cycles.
pub trait DependencyGraph: Sync {
    /// Direct dependencies of `module`, in a stable order
    fn edges(&self, module: &ModuleId) -> Vec<ModuleId>;
}

impl DependencyGraph for BTreeMap<ModuleId, Vec<ModuleId>> {
    fn edges(&self, module: &ModuleId) -> Vec<ModuleId> {
        self.get(module).cloned().unwrap_or_default()
    }
}

impl DependencyGraph for HashMap<ModuleId, Vec<ModuleId>> {
    fn edges(&self, module: &ModuleId) -> Vec<ModuleId> {
        self.get(module).cloned().unwrap_or_default()
    }
}

/// Modules reachable from the entry files
#[derive(Debug, Clone, Default)]
pub struct KnownModules {
    modules: Vec<ModuleId>,
    diagnostics: Vec<AnalysisDiagnostic>,
    truncated: bool,
}

impl KnownModules {
    /// Reachable modules, sorted
    pub fn modules(&self) -> &[ModuleId] {
        &self.modules
    }

    /// Diagnostics collected from every visited module, plus the cap notice
    pub fn diagnostics(&self) -> &[AnalysisDiagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<AnalysisDiagnostic> {
        self.diagnostics
    }

    /// Whether the module cap stopped discovery early
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn contains(&self, module: &ModuleId) -> bool {
        self.modules.binary_search(module).is_ok()
    }
}

/// The module graph rooted at a set of entry files
///
/// Nothing is materialized: edges come straight from the dependency cache, so
/// the graph always reflects the current file-system state.
pub struct ModuleGraph {
    cache: Arc<DependencyCache>,
    entries: Vec<ModuleId>,
    max_modules: usize,
}

impl ModuleGraph {
    pub fn new(cache: Arc<DependencyCache>, entries: Vec<ModuleId>, max_modules: usize) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.clone()))
            .collect();

        Self {
            cache,
            entries,
            max_modules,
        }
    }

    pub fn entries(&self) -> &[ModuleId] {
        &self.entries
    }

    pub fn cache(&self) -> &Arc<DependencyCache> {
        &self.cache
    }

    /// Breadth-first closure over the entry files, capped at `max_modules`
    pub fn all_known_modules(&self) -> KnownModules {
        let mut seen: HashSet<ModuleId> = HashSet::new();
        let mut queue: VecDeque<ModuleId> = VecDeque::new();
        let mut diagnostics = Vec::new();
        let mut truncated = false;

        for entry in &self.entries {
            if seen.len() >= self.max_modules {
                truncated = true;
                break;
            }
            if seen.insert(entry.clone()) {
                queue.push_back(entry.clone());
            }
        }

        while let Some(module) = queue.pop_front() {
            let record = self.cache.record(&module);
            diagnostics.extend(record.diagnostics().iter().cloned());

            for target in record.edges() {
                if seen.contains(target) {
                    continue;
                }
                if seen.len() >= self.max_modules {
                    truncated = true;
                    continue;
                }
                seen.insert(target.clone());
                queue.push_back(target.clone());
            }
        }

        if truncated {
            warn!(
                max_modules = self.max_modules,
                "module limit reached, graph discovery stopped early"
            );
            diagnostics.push(AnalysisDiagnostic::truncated(
                "maxModules",
                format!(
                    "stopped discovering modules after reaching the limit of {}",
                    self.max_modules
                ),
            ));
        }

        let mut modules: Vec<ModuleId> = seen.into_iter().collect();
        modules.sort();

        info!(modules = modules.len(), truncated, "module discovery complete");

        KnownModules {
            modules,
            diagnostics,
            truncated,
        }
    }

    /// Materialize the subgraph induced by `modules`
    pub fn to_petgraph(&self, modules: &[ModuleId]) -> DiGraph<ModuleId, ()> {
        let mut graph = DiGraph::new();
        let mut indices: HashMap<&ModuleId, NodeIndex> = HashMap::new();

        for module in modules {
            indices
                .entry(module)
                .or_insert_with(|| graph.add_node(module.clone()));
        }

        for module in modules {
            let from = indices[module];
            for target in self.cache.get_edges(module) {
                if let Some(&to) = indices.get(&target) {
                    graph.update_edge(from, to, ());
                }
            }
        }

        graph
    }
}

impl DependencyGraph for ModuleGraph {
    fn edges(&self, module: &ModuleId) -> Vec<ModuleId> {
        self.cache.get_edges(module)
    }
}
