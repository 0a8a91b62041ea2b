//! Report generation modules for different output formats
//!
//! This module contains report generators for various output formats:
//! - human: Human-readable console output
//! - json: JSON format for programmatic use
//! - junit: JUnit XML format for CI/CD integration
//! - github: GitHub Actions workflow annotations

pub mod github;
pub mod human;
pub mod json;
pub mod junit;

use crate::analyzer::AnalysisReport;
use crate::core::{RemediationHint, RemediationKind};
use crate::error::RoundaboutError;

/// Common trait for all report generators
pub trait ReportGenerator {
    /// Generate a report from analysis results
    fn generate_report(&self, report: &AnalysisReport) -> Result<String, RoundaboutError>;
}

pub use github::GitHubReportGenerator;
pub use human::HumanReportGenerator;
pub use json::JsonReportGenerator;
pub use junit::JunitReportGenerator;

/// One-sentence fix suggestion, with paths relative to the report root
pub(crate) fn describe_remediation(report: &AnalysisReport, hint: &RemediationHint) -> String {
    let (from, to) = &hint.remove_edge;
    let from = report.display(from);
    let to = report.display(to);

    match hint.kind {
        RemediationKind::ExtractShared => {
            let what = if hint.symbols.is_empty() {
                "the code".to_string()
            } else {
                format!("`{}`", hint.symbols.join("`, `"))
            };
            let destination = hint
                .suggested_new_module
                .as_ref()
                .map(|path| report.display(&crate::core::ModuleId::from_normalized(path)))
                .unwrap_or_else(|| "a new module".to_string());
            format!(
                "Move {what} that {from} imports from {to} into {destination}, then drop the \
                 import {from} → {to}"
            )
        }
        RemediationKind::UseDirectImport => match &hint.target_module {
            Some(target) => format!(
                "{from} imports through the re-export module {to}; import {} directly instead",
                report.display(target)
            ),
            None => format!(
                "{from} imports through the re-export module {to}, and every module in the \
                 cycle only re-exports; drop the import {from} → {to}"
            ),
        },
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_describe_extract_shared() {
        let report = sample_report();
        let text = describe_remediation(&report, &report.cycles()[0].remediation);
        assert_eq!(
            text,
            "Move `helper` that src/a.ts imports from src/b.ts into src/a-b-shared.ts, then drop \
             the import src/a.ts → src/b.ts"
        );
    }

    #[test]
    fn test_describe_direct_import() {
        let report = sample_report();
        let text = describe_remediation(&report, &report.cycles()[1].remediation);
        assert_eq!(
            text,
            "ui/Button.tsx imports through the re-export module ui/index.ts; import ui/Modal.tsx \
             directly instead"
        );
    }

    #[test]
    fn test_describe_direct_import_without_concrete_target() {
        let report = sample_report();
        let mut hint = report.cycles()[1].remediation.clone();
        hint.target_module = None;

        let text = describe_remediation(&report, &hint);
        assert!(text.ends_with("drop the import ui/Button.tsx → ui/index.ts"));
    }
}
