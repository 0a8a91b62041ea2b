//! JSON format report generation
//!
//! One record per classified cycle. Module paths are relative to the
//! analysis root so reports are stable across checkouts.

use serde::Serialize;

use super::ReportGenerator;
use crate::analyzer::AnalysisReport;
use crate::core::{AnalysisDiagnostic, ClassifiedCycle, RemediationKind, SeverityTier};
use crate::error::RoundaboutError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    has_cycles: bool,
    cycle_count: usize,
    module_count: usize,
    cycles: Vec<JsonCycle>,
    diagnostics: &'a [AnalysisDiagnostic],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonCycle {
    cycle_modules: Vec<String>,
    severity: SeverityTier,
    remediation: JsonRemediation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonRemediation {
    kind: RemediationKind,
    target_module: Option<String>,
    suggested_new_module: Option<String>,
    remove_edge: JsonEdge,
    symbols: Vec<String>,
    aggregators: Vec<String>,
}

#[derive(Serialize)]
struct JsonEdge {
    from: String,
    to: String,
}

pub struct JsonReportGenerator;

impl Default for JsonReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReportGenerator {
    pub fn new() -> Self {
        Self
    }

    fn cycle_record(report: &AnalysisReport, classified: &ClassifiedCycle) -> JsonCycle {
        let hint = &classified.remediation;
        JsonCycle {
            cycle_modules: classified
                .cycle
                .modules()
                .iter()
                .map(|m| report.display(m))
                .collect(),
            severity: classified.severity,
            remediation: JsonRemediation {
                kind: hint.kind,
                target_module: hint.target_module.as_ref().map(|m| report.display(m)),
                suggested_new_module: hint.suggested_new_module.as_ref().map(|path| {
                    crate::core::to_slash(path.strip_prefix(report.root()).unwrap_or(path))
                }),
                remove_edge: JsonEdge {
                    from: report.display(&hint.remove_edge.0),
                    to: report.display(&hint.remove_edge.1),
                },
                symbols: hint.symbols.clone(),
                aggregators: hint.aggregators.iter().map(|m| report.display(m)).collect(),
            },
        }
    }
}

impl ReportGenerator for JsonReportGenerator {
    fn generate_report(&self, report: &AnalysisReport) -> Result<String, RoundaboutError> {
        let json = JsonReport {
            has_cycles: report.has_cycles(),
            cycle_count: report.cycle_count(),
            module_count: report.module_count(),
            cycles: report
                .cycles()
                .iter()
                .map(|c| Self::cycle_record(report, c))
                .collect(),
            diagnostics: report.diagnostics(),
        };

        serde_json::to_string_pretty(&json).map_err(RoundaboutError::Json)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::reports::test_support::{empty_report, sample_report};

    fn render(report: &AnalysisReport) -> Value {
        let text = JsonReportGenerator::new().generate_report(report).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_json_report_no_cycles() {
        let json = render(&empty_report());

        assert_eq!(json["hasCycles"], false);
        assert_eq!(json["cycleCount"], 0);
        assert_eq!(json["moduleCount"], 1);
        assert_eq!(json["cycles"], json!([]));
    }

    #[test]
    fn test_json_cycle_record_shape() {
        let json = render(&sample_report());

        assert_eq!(
            json["cycles"][0],
            json!({
                "cycleModules": ["src/a.ts", "src/b.ts"],
                "severity": "standard",
                "remediation": {
                    "kind": "extract-shared",
                    "targetModule": "src/b.ts",
                    "suggestedNewModule": "src/a-b-shared.ts",
                    "removeEdge": { "from": "src/a.ts", "to": "src/b.ts" },
                    "symbols": ["helper"],
                    "aggregators": []
                }
            })
        );
        assert_eq!(json["cycles"][1]["severity"], "aggregator");
        assert_eq!(json["cycles"][1]["remediation"]["kind"], "use-direct-import");
        assert_eq!(json["cycles"][1]["remediation"]["targetModule"], "ui/Modal.tsx");
        assert_eq!(json["cycles"][1]["remediation"]["suggestedNewModule"], Value::Null);
    }

    #[test]
    fn test_json_diagnostics() {
        let json = render(&sample_report());

        assert_eq!(json["diagnostics"][0]["kind"], "extraction-failed");
        assert_eq!(json["diagnostics"][0]["moduleOrReference"], "/repo/src/bad.ts");
        assert_eq!(json["diagnostics"][0]["detail"], "invalid UTF-8");
    }

    #[test]
    fn test_json_report_pretty_formatting() {
        let report = JsonReportGenerator::new()
            .generate_report(&empty_report())
            .unwrap();
        assert!(report.contains('\n'));
        assert!(report.contains("  "));
    }
}
