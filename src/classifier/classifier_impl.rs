use std::path::PathBuf;

use rayon::prelude::*;
use tracing::debug;

use crate::cache::DependencyCache;
use crate::core::{
    ClassifiedCycle, Cycle, ModuleId, RemediationHint, RemediationKind, SeverityTier,
};
use crate::patterns::PathPatternSet;

/// Per-module facts the classifier depends on
pub trait ModuleFacts: Sync {
    fn is_aggregator(&self, module: &ModuleId) -> bool;

    /// Names `from` imports from `to`, in source order
    fn imported_symbols(&self, from: &ModuleId, to: &ModuleId) -> Vec<String>;
}

impl ModuleFacts for DependencyCache {
    fn is_aggregator(&self, module: &ModuleId) -> bool {
        DependencyCache::is_aggregator(self, module)
    }

    fn imported_symbols(&self, from: &ModuleId, to: &ModuleId) -> Vec<String> {
        self.record(from).symbols_for(to).to_vec()
    }
}

pub struct CycleClassifier<'a, F: ModuleFacts> {
    infrastructure: PathPatternSet,
    facts: &'a F,
}

impl<'a, F: ModuleFacts> CycleClassifier<'a, F> {
    pub fn new(infrastructure: PathPatternSet, facts: &'a F) -> Self {
        Self {
            infrastructure,
            facts,
        }
    }

    /// Classify every cycle, preserving input order
    pub fn classify_all(&self, cycles: &[Cycle]) -> Vec<ClassifiedCycle> {
        cycles.par_iter().map(|cycle| self.classify(cycle)).collect()
    }

    pub fn classify(&self, cycle: &Cycle) -> ClassifiedCycle {
        let aggregators: Vec<ModuleId> = cycle
            .modules()
            .iter()
            .filter(|m| self.facts.is_aggregator(m))
            .cloned()
            .collect();

        let in_infrastructure = cycle
            .modules()
            .iter()
            .any(|m| self.infrastructure.matches(m.path()));

        let severity = if in_infrastructure {
            SeverityTier::Infrastructure
        } else if !aggregators.is_empty() {
            SeverityTier::Aggregator
        } else {
            SeverityTier::Standard
        };

        let remediation = if aggregators.is_empty() {
            self.extract_shared(cycle)
        } else {
            self.direct_import(cycle, aggregators)
        };

        debug!(
            first = %cycle.modules()[0],
            length = cycle.len(),
            %severity,
            "classified cycle"
        );

        ClassifiedCycle {
            cycle: cycle.clone(),
            severity,
            remediation,
        }
    }

    fn extract_shared(&self, cycle: &Cycle) -> RemediationHint {
        let modules = cycle.modules();
        let from = &modules[0];
        let to = &modules[1 % modules.len()];

        RemediationHint {
            kind: RemediationKind::ExtractShared,
            target_module: Some(to.clone()),
            suggested_new_module: Some(shared_module_path(from, to)),
            remove_edge: (from.clone(), to.clone()),
            symbols: self.facts.imported_symbols(from, to),
            aggregators: Vec::new(),
        }
    }

    /// Skip the first aggregator: its predecessor should import the module
    /// the aggregator forwards to
    ///
    /// The concrete target is the first non-aggregator after the aggregator
    /// in cycle order. A cycle made only of aggregators has none.
    fn direct_import(&self, cycle: &Cycle, aggregators: Vec<ModuleId>) -> RemediationHint {
        let modules = cycle.modules();
        let n = modules.len();
        let index = modules
            .iter()
            .position(|m| m == &aggregators[0])
            .unwrap_or(0);
        let aggregator = &modules[index];
        let predecessor = &modules[(index + n - 1) % n];
        let concrete = (1..n)
            .map(|step| &modules[(index + step) % n])
            .find(|m| !aggregators.contains(m));

        RemediationHint {
            kind: RemediationKind::UseDirectImport,
            target_module: concrete.cloned(),
            suggested_new_module: None,
            remove_edge: (predecessor.clone(), aggregator.clone()),
            symbols: self.facts.imported_symbols(predecessor, aggregator),
            aggregators,
        }
    }
}

/// `<dir of from>/<from stem>-<to stem>-shared<ext of from>`
fn shared_module_path(from: &ModuleId, to: &ModuleId) -> PathBuf {
    let stem = |m: &ModuleId| {
        m.path()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "module".to_string())
    };
    let ext = from
        .path()
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    from.dir()
        .join(format!("{}-{}-shared{}", stem(from), stem(to), ext))
}
