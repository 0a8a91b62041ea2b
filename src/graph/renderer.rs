use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Write;

use miette::Result;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::analyzer::AnalysisReport;
use crate::core::{ModuleId, SeverityTier};
use crate::error::RoundaboutError;

// Blue-orange accessible palette, one accent per severity
mod colors {
    pub const NORMAL_NODE_FILL: &str = "#E3F2FD";
    pub const NORMAL_NODE_STROKE: &str = "#1976D2";
    pub const NORMAL_EDGE: &str = "#64B5F6";
    pub const AGGREGATOR_NODE_STROKE: &str = "#7B1FA2";

    pub const STANDARD_FILL: &str = "#FFF8E1";
    pub const STANDARD_STROKE: &str = "#FFA000";
    pub const AGGREGATOR_FILL: &str = "#FFF3E0";
    pub const AGGREGATOR_STROKE: &str = "#F57C00";
    pub const INFRASTRUCTURE_FILL: &str = "#FFEBEE";
    pub const INFRASTRUCTURE_STROKE: &str = "#D32F2F";
}

macro_rules! writeln_out {
    ($dst:expr) => {
        writeln!($dst).map_err(RoundaboutError::from)
    };
    ($dst:expr, $($arg:tt)*) => {
        writeln!($dst, $($arg)*).map_err(RoundaboutError::from)
    };
}

fn severity_colors(severity: SeverityTier) -> (&'static str, &'static str) {
    match severity {
        SeverityTier::Standard => (colors::STANDARD_FILL, colors::STANDARD_STROKE),
        SeverityTier::Aggregator => (colors::AGGREGATOR_FILL, colors::AGGREGATOR_STROKE),
        SeverityTier::Infrastructure => {
            (colors::INFRASTRUCTURE_FILL, colors::INFRASTRUCTURE_STROKE)
        }
    }
}

/// Cycle membership looked up while rendering
struct CycleIndex {
    node_severity: HashMap<ModuleId, SeverityTier>,
    edge_severity: HashMap<(ModuleId, ModuleId), SeverityTier>,
    aggregators: HashSet<ModuleId>,
}

impl CycleIndex {
    fn new(report: &AnalysisReport) -> Self {
        let mut node_severity: HashMap<ModuleId, SeverityTier> = HashMap::new();
        let mut edge_severity: HashMap<(ModuleId, ModuleId), SeverityTier> = HashMap::new();
        let mut aggregators = HashSet::new();

        for classified in report.cycles() {
            let severity = classified.severity;
            for module in classified.cycle.modules() {
                let entry = node_severity.entry(module.clone()).or_insert(severity);
                *entry = (*entry).max(severity);
            }
            for (from, to) in classified.cycle.edges() {
                let entry = edge_severity
                    .entry((from.clone(), to.clone()))
                    .or_insert(severity);
                *entry = (*entry).max(severity);
            }
            aggregators.extend(classified.remediation.aggregators.iter().cloned());
        }

        Self {
            node_severity,
            edge_severity,
            aggregators,
        }
    }

    fn node(&self, module: &ModuleId) -> Option<SeverityTier> {
        self.node_severity.get(module).copied()
    }

    fn edge(&self, from: &ModuleId, to: &ModuleId) -> Option<SeverityTier> {
        self.edge_severity.get(&(from.clone(), to.clone())).copied()
    }
}

pub struct GraphRenderer {
    highlight_cycles: bool,
    group_by_directory: bool,
}

impl GraphRenderer {
    pub fn new(highlight_cycles: bool, group_by_directory: bool) -> Self {
        Self {
            highlight_cycles,
            group_by_directory,
        }
    }

    pub fn render_ascii(
        &self,
        graph: &DiGraph<ModuleId, ()>,
        report: &AnalysisReport,
        output: &mut dyn Write,
    ) -> Result<()> {
        if graph.node_count() == 0 {
            writeln_out!(output, "No modules found to visualize")?;
            return Ok(());
        }

        let index = CycleIndex::new(report);
        writeln_out!(output, "\n📊 Module Dependency Graph\n")?;

        let mut nodes: Vec<NodeIndex> = graph.node_indices().collect();
        nodes.sort_by(|a, b| graph[*a].cmp(&graph[*b]));

        for node in nodes {
            let module = &graph[node];
            let name = report.display(module);

            match index.node(module) {
                Some(severity) if self.highlight_cycles => {
                    writeln_out!(output, "{} ⚠️  IN {} CYCLE", name, severity)?;
                }
                _ => writeln_out!(output, "{}", name)?,
            }

            let mut targets: Vec<&ModuleId> =
                graph.edges(node).map(|edge| &graph[edge.target()]).collect();
            targets.sort();

            if targets.is_empty() {
                writeln_out!(output, "  └── (no local imports)")?;
            }
            for (i, target) in targets.iter().enumerate() {
                let prefix = if i == targets.len() - 1 {
                    "└──"
                } else {
                    "├──"
                };
                let marker = match index.edge(module, target) {
                    Some(_) if self.highlight_cycles => " ⚠️  [CYCLE]",
                    _ => "",
                };
                writeln_out!(output, "  {} → {}{}", prefix, report.display(target), marker)?;
            }

            writeln_out!(output)?;
        }

        if report.has_cycles() && self.highlight_cycles {
            writeln_out!(output, "⚠️  = Part of a dependency cycle")?;
        }

        Ok(())
    }

    pub fn render_mermaid(
        &self,
        graph: &DiGraph<ModuleId, ()>,
        report: &AnalysisReport,
        output: &mut dyn Write,
    ) -> Result<()> {
        let index = CycleIndex::new(report);
        let ids = self.node_ids(graph);

        writeln_out!(output, "graph TD")?;

        let groups = if self.group_by_directory {
            self.group_by_directory(graph, report)
        } else {
            BTreeMap::new()
        };
        let mut grouped: HashSet<NodeIndex> = HashSet::new();

        for (directory, nodes) in &groups {
            writeln_out!(output)?;
            writeln_out!(
                output,
                "    subgraph {}[\"{}\"]",
                mermaid_id(&format!("dir_{directory}")),
                directory
            )?;
            for &node in nodes {
                self.mermaid_node(graph, report, &index, &ids, node, "        ", output)?;
                grouped.insert(node);
            }
            writeln_out!(output, "    end")?;
        }

        let mut rest: Vec<NodeIndex> = graph
            .node_indices()
            .filter(|n| !grouped.contains(n))
            .collect();
        rest.sort_by(|a, b| graph[*a].cmp(&graph[*b]));
        if !rest.is_empty() {
            writeln_out!(output)?;
        }
        for node in rest {
            self.mermaid_node(graph, report, &index, &ids, node, "    ", output)?;
        }

        writeln_out!(output)?;

        let mut cycle_links = Vec::new();
        for (link, edge) in sorted_edges(graph).into_iter().enumerate() {
            let (from, to) = edge;
            let severity = index.edge(&graph[from], &graph[to]);
            match severity {
                Some(_) if self.highlight_cycles => {
                    writeln_out!(output, "    {} ==> {}", ids[&from], ids[&to])?;
                    cycle_links.push((link, severity));
                }
                _ => writeln_out!(output, "    {} --> {}", ids[&from], ids[&to])?,
            }
        }

        for (link, severity) in cycle_links {
            if let Some(severity) = severity {
                let (_, stroke) = severity_colors(severity);
                writeln_out!(
                    output,
                    "    linkStyle {} stroke:{},stroke-width:3px",
                    link,
                    stroke
                )?;
            }
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn mermaid_node(
        &self,
        graph: &DiGraph<ModuleId, ()>,
        report: &AnalysisReport,
        index: &CycleIndex,
        ids: &HashMap<NodeIndex, String>,
        node: NodeIndex,
        indent: &str,
        output: &mut dyn Write,
    ) -> Result<()> {
        let module = &graph[node];
        let id = &ids[&node];
        let label = report.display(module);

        let shape = if index.aggregators.contains(module) {
            format!("{id}{{{{\"{label}\"}}}}")
        } else if index.node(module).is_some() && self.highlight_cycles {
            format!("{id}((\"{label}\"))")
        } else {
            format!("{id}[\"{label}\"]")
        };
        writeln_out!(output, "{}{}", indent, shape)?;

        let (fill, stroke, width) = match index.node(module) {
            Some(severity) if self.highlight_cycles => {
                let (fill, stroke) = severity_colors(severity);
                (fill, stroke, 3)
            }
            _ if index.aggregators.contains(module) => {
                (colors::NORMAL_NODE_FILL, colors::AGGREGATOR_NODE_STROKE, 2)
            }
            _ => (colors::NORMAL_NODE_FILL, colors::NORMAL_NODE_STROKE, 2),
        };
        writeln_out!(
            output,
            "{}style {} fill:{},stroke:{},stroke-width:{}px",
            indent,
            id,
            fill,
            stroke,
            width
        )?;

        Ok(())
    }

    pub fn render_dot(
        &self,
        graph: &DiGraph<ModuleId, ()>,
        report: &AnalysisReport,
        output: &mut dyn Write,
    ) -> Result<()> {
        let index = CycleIndex::new(report);

        writeln_out!(output, "digraph module_dependencies {{")?;
        writeln_out!(output, "    rankdir=LR;")?;
        writeln_out!(output, "    node [shape=box, style=rounded];")?;
        writeln_out!(output)?;

        let mut nodes: Vec<NodeIndex> = graph.node_indices().collect();
        nodes.sort_by(|a, b| graph[*a].cmp(&graph[*b]));

        for node in nodes {
            let module = &graph[node];
            let (fill, stroke) = match index.node(module) {
                Some(severity) if self.highlight_cycles => severity_colors(severity),
                _ => (colors::NORMAL_NODE_FILL, colors::NORMAL_NODE_STROKE),
            };
            let shape = if index.aggregators.contains(module) {
                "hexagon"
            } else {
                "box"
            };

            writeln_out!(
                output,
                r#"    "{}" [shape={}, style="rounded,filled", fillcolor="{}", color="{}", penwidth=2];"#,
                report.display(module),
                shape,
                fill,
                stroke
            )?;
        }

        writeln_out!(output)?;

        for (from, to) in sorted_edges(graph) {
            let source = &graph[from];
            let target = &graph[to];
            match index.edge(source, target) {
                Some(severity) if self.highlight_cycles => {
                    let (_, stroke) = severity_colors(severity);
                    writeln_out!(
                        output,
                        r#"    "{}" -> "{}" [color="{}", penwidth=3, label="{}"];"#,
                        report.display(source),
                        report.display(target),
                        stroke,
                        severity
                    )?;
                }
                _ => {
                    writeln_out!(
                        output,
                        r#"    "{}" -> "{}" [color="{}"];"#,
                        report.display(source),
                        report.display(target),
                        colors::NORMAL_EDGE
                    )?;
                }
            }
        }

        writeln_out!(output, "}}")?;
        Ok(())
    }

    fn node_ids(&self, graph: &DiGraph<ModuleId, ()>) -> HashMap<NodeIndex, String> {
        graph
            .node_indices()
            .map(|node| (node, format!("m{}", node.index())))
            .collect()
    }

    /// Nodes grouped by their parent directory, for directories holding more
    /// than one module
    fn group_by_directory(
        &self,
        graph: &DiGraph<ModuleId, ()>,
        report: &AnalysisReport,
    ) -> BTreeMap<String, Vec<NodeIndex>> {
        let mut groups: BTreeMap<String, Vec<NodeIndex>> = BTreeMap::new();

        for node in graph.node_indices() {
            let directory = ModuleId::from_normalized(graph[node].dir());
            let name = report.display(&directory);
            let name = if name.is_empty() { ".".to_string() } else { name };
            groups.entry(name).or_default().push(node);
        }

        groups.retain(|_, nodes| nodes.len() > 1);
        for nodes in groups.values_mut() {
            nodes.sort_by(|a, b| graph[*a].cmp(&graph[*b]));
        }
        groups
    }
}

fn mermaid_id(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Edges ordered by source then target, for stable output
fn sorted_edges(graph: &DiGraph<ModuleId, ()>) -> Vec<(NodeIndex, NodeIndex)> {
    let mut edges: Vec<(NodeIndex, NodeIndex)> = graph
        .edge_references()
        .map(|edge| (edge.source(), edge.target()))
        .collect();
    edges.sort_by(|a, b| (&graph[a.0], &graph[a.1]).cmp(&(&graph[b.0], &graph[b.1])));
    edges
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::core::{ClassifiedCycle, Cycle, RemediationHint, RemediationKind};

    fn id(name: &str) -> ModuleId {
        ModuleId::from_normalized(format!("/repo/{name}"))
    }

    fn fixture(severity: SeverityTier) -> (DiGraph<ModuleId, ()>, AnalysisReport) {
        let mut graph = DiGraph::new();
        let a = graph.add_node(id("src/a.ts"));
        let b = graph.add_node(id("src/b.ts"));
        let c = graph.add_node(id("lib/c.ts"));
        graph.add_edge(a, b, ());
        graph.add_edge(b, a, ());
        graph.add_edge(b, c, ());

        let cycle = Cycle::new(vec![id("src/a.ts"), id("src/b.ts")]);
        let classified = ClassifiedCycle {
            cycle,
            severity,
            remediation: RemediationHint {
                kind: RemediationKind::ExtractShared,
                target_module: Some(id("src/b.ts")),
                suggested_new_module: None,
                remove_edge: (id("src/a.ts"), id("src/b.ts")),
                symbols: Vec::new(),
                aggregators: Vec::new(),
            },
        };
        let report = AnalysisReport::new(
            PathBuf::from("/repo"),
            vec![classified],
            Vec::new(),
            vec![id("lib/c.ts"), id("src/a.ts"), id("src/b.ts")],
        );
        (graph, report)
    }

    fn render(f: impl Fn(&GraphRenderer, &mut Vec<u8>) -> Result<()>) -> String {
        let renderer = GraphRenderer::new(true, true);
        let mut out = Vec::new();
        f(&renderer, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_dot_highlights_cycle_edges() {
        let (graph, report) = fixture(SeverityTier::Infrastructure);
        let dot = render(|r, out| r.render_dot(&graph, &report, out));

        assert!(dot.starts_with("digraph module_dependencies {"));
        assert!(dot.contains(r##""src/a.ts" -> "src/b.ts" [color="#D32F2F", penwidth=3"##));
        assert!(dot.contains(r##""src/b.ts" -> "lib/c.ts" [color="#64B5F6"]"##));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_mermaid_groups_and_styles() {
        let (graph, report) = fixture(SeverityTier::Standard);
        let mermaid = render(|r, out| r.render_mermaid(&graph, &report, out));

        assert!(mermaid.starts_with("graph TD"));
        assert!(mermaid.contains("subgraph dir_src[\"src\"]"));
        assert!(mermaid.contains("m0 ==> m1"));
        assert!(mermaid.contains("m1 --> m2"));
        assert!(mermaid.contains("linkStyle 0 stroke:#FFA000"));
    }

    #[test]
    fn test_ascii_marks_cycle_members() {
        let (graph, report) = fixture(SeverityTier::Standard);
        let ascii = render(|r, out| r.render_ascii(&graph, &report, out));

        assert!(ascii.contains("src/a.ts ⚠️  IN standard CYCLE"));
        assert!(ascii.contains("→ src/b.ts ⚠️  [CYCLE]"));
        assert!(ascii.contains("lib/c.ts\n  └── (no local imports)"));
    }

    #[test]
    fn test_empty_graph() {
        let graph = DiGraph::new();
        let report = AnalysisReport::default();
        let ascii = render(|r, out| r.render_ascii(&graph, &report, out));
        assert!(ascii.contains("No modules found"));
    }
}
