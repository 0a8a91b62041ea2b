//! Graph command configuration

use std::path::PathBuf;

use crate::cli::GraphFormat;
use crate::config::common::CommonAnalysisConfig;
use crate::error::RoundaboutError;

#[derive(Debug, Clone)]
pub struct GraphOptions {
    pub analysis: CommonAnalysisConfig,
    pub format: GraphFormat,
    pub output: Option<PathBuf>,
    pub highlight_cycles: bool,
    pub group_by_directory: bool,
}

impl GraphOptions {
    pub fn builder() -> GraphOptionsBuilder {
        GraphOptionsBuilder::new()
    }
}

#[derive(Default)]
pub struct GraphOptionsBuilder {
    analysis: Option<CommonAnalysisConfig>,
    format: Option<GraphFormat>,
    output: Option<Option<PathBuf>>,
    highlight_cycles: Option<bool>,
    group_by_directory: Option<bool>,
}

impl GraphOptionsBuilder {
    pub fn new() -> Self {
        Self {
            analysis: None,
            format: None,
            output: None,
            highlight_cycles: None,
            group_by_directory: None,
        }
    }

    pub fn with_analysis(mut self, analysis: CommonAnalysisConfig) -> Self {
        self.analysis = Some(analysis);
        self
    }

    pub fn with_format(mut self, format: GraphFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_highlight_cycles(mut self, highlight_cycles: bool) -> Self {
        self.highlight_cycles = Some(highlight_cycles);
        self
    }

    pub fn with_group_by_directory(mut self, group_by_directory: bool) -> Self {
        self.group_by_directory = Some(group_by_directory);
        self
    }
}

impl crate::common::ConfigBuilder for GraphOptionsBuilder {
    type Config = GraphOptions;

    fn build(self) -> Result<Self::Config, RoundaboutError> {
        Ok(GraphOptions {
            analysis: self
                .analysis
                .ok_or_else(|| RoundaboutError::ConfigurationError {
                    message: "Missing required field: analysis".to_string(),
                })?,
            format: self
                .format
                .ok_or_else(|| RoundaboutError::ConfigurationError {
                    message: "Missing required field: format".to_string(),
                })?,
            output: self
                .output
                .ok_or_else(|| RoundaboutError::ConfigurationError {
                    message: "Missing required field: output".to_string(),
                })?,
            highlight_cycles: self.highlight_cycles.ok_or_else(|| {
                RoundaboutError::ConfigurationError {
                    message: "Missing required field: highlight_cycles".to_string(),
                }
            })?,
            group_by_directory: self.group_by_directory.unwrap_or(false),
        })
    }
}
