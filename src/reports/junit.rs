//! JUnit XML format report generation
//!
//! Each cycle becomes a failed test case so CI dashboards list them
//! individually.

use std::fmt::Write;

use super::{ReportGenerator, describe_remediation};
use crate::analyzer::AnalysisReport;
use crate::error::RoundaboutError;
use crate::utils::string::format_chain;

pub struct JunitReportGenerator;

impl Default for JunitReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl JunitReportGenerator {
    pub fn new() -> Self {
        Self
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl ReportGenerator for JunitReportGenerator {
    fn generate_report(&self, report: &AnalysisReport) -> Result<String, RoundaboutError> {
        let mut output = String::new();
        let tests = report.cycle_count().max(1);
        let failures = report.cycle_count();

        writeln!(output, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            output,
            r#"<testsuites name="roundabout" tests="{tests}" failures="{failures}">"#
        )?;
        writeln!(
            output,
            r#"  <testsuite name="module-cycles" tests="{tests}" failures="{failures}">"#
        )?;

        if !report.has_cycles() {
            writeln!(
                output,
                r#"    <testcase name="check-module-cycles" classname="roundabout" />"#
            )?;
        }

        for classified in report.cycles() {
            let names: Vec<String> = classified
                .cycle
                .modules()
                .iter()
                .map(|m| report.display(m))
                .collect();
            let chain = escape_xml(&format_chain(&names));

            writeln!(
                output,
                r#"    <testcase name="{chain}" classname="roundabout.{}">"#,
                classified.severity
            )?;
            writeln!(
                output,
                r#"      <failure message="{} dependency cycle" type="{}">"#,
                classified.severity, classified.remediation.kind
            )?;
            writeln!(output, "{chain}")?;
            writeln!(
                output,
                "{}",
                escape_xml(&describe_remediation(report, &classified.remediation))
            )?;
            writeln!(output, r#"      </failure>"#)?;
            writeln!(output, r#"    </testcase>"#)?;
        }

        if !report.diagnostics().is_empty() {
            writeln!(output, r#"    <system-err>"#)?;
            for diagnostic in report.diagnostics() {
                writeln!(
                    output,
                    "[{}] {}",
                    diagnostic.kind,
                    escape_xml(&diagnostic.detail)
                )?;
            }
            writeln!(output, r#"    </system-err>"#)?;
        }

        writeln!(output, r#"  </testsuite>"#)?;
        writeln!(output, r#"</testsuites>"#)?;

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use predicates::prelude::*;

    use super::*;
    use crate::reports::test_support::{empty_report, sample_report};

    #[test]
    fn test_junit_passing_suite() {
        let xml = JunitReportGenerator::new()
            .generate_report(&empty_report())
            .unwrap();

        assert!(predicate::str::contains(r#"tests="1" failures="0""#).eval(&xml));
        assert!(predicate::str::contains(r#"<testcase name="check-module-cycles""#).eval(&xml));
    }

    #[test]
    fn test_junit_case_per_cycle() {
        let xml = JunitReportGenerator::new()
            .generate_report(&sample_report())
            .unwrap();

        assert!(predicate::str::contains(r#"tests="2" failures="2""#).eval(&xml));
        assert!(predicate::str::contains(r#"classname="roundabout.standard""#).eval(&xml));
        assert!(predicate::str::contains(r#"type="use-direct-import""#).eval(&xml));
        assert!(predicate::str::contains("<system-err>").eval(&xml));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
    }
}
