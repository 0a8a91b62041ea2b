//! Common configuration structures shared across commands

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::common::{CommonArgs, ConfigBuilder};
use crate::config::analysis::{AliasPatternConfig, AnalysisConfig};
use crate::constants::analysis::CONFIG_FILE_NAME;
use crate::discovery::EntryDiscovery;
use crate::error::RoundaboutError;
use crate::patterns::PathPatternSet;
use crate::progress::ProgressReporter;

/// Analysis settings plus the paths still to be scanned for entry files
///
/// Entry discovery is deferred to the executor so it can report progress.
#[derive(Debug, Clone)]
pub struct CommonAnalysisConfig {
    /// Files or directories to turn into entry files; empty when the
    /// configuration file already lists them
    pub scan_paths: Vec<PathBuf>,
    pub analysis: AnalysisConfig,
}

impl CommonAnalysisConfig {
    pub fn new(scan_paths: Vec<PathBuf>, analysis: AnalysisConfig) -> Self {
        Self {
            scan_paths,
            analysis,
        }
    }

    /// Merge the configuration file with command-line overrides
    ///
    /// The file is `--config` when given, otherwise `roundabout.toml` in the
    /// project root if one exists. Flags win over file values; list flags
    /// (aliases, patterns) are added in front of the file's entries.
    pub fn from_args(args: &CommonArgs) -> Result<Self, RoundaboutError> {
        let paths = args.get_paths();
        let inferred_root = args.root.clone().unwrap_or_else(|| infer_root(&paths));

        let config_file = match &args.config {
            Some(path) => Some(path.clone()),
            None => {
                let candidate = inferred_root.join(CONFIG_FILE_NAME);
                candidate.is_file().then_some(candidate)
            }
        };

        let base = match &config_file {
            Some(path) => {
                debug!(path = %path.display(), "loading configuration file");
                AnalysisConfig::from_toml_file(path)?
            }
            None => AnalysisConfig {
                root: inferred_root.clone(),
                ..AnalysisConfig::default()
            },
        };

        let mut aliases = args
            .aliases
            .iter()
            .map(|pair| AliasPatternConfig::parse_pair(pair))
            .collect::<Result<Vec<_>, _>>()?;
        aliases.extend(base.alias_patterns.iter().cloned());

        let infrastructure = prepend(&args.infrastructure, &base.infrastructure_path_patterns);
        let ignore = prepend(&args.ignore, &base.ignore_path_patterns);

        let root = args.root.clone().unwrap_or_else(|| base.root.clone());
        let max_depth = args.max_depth.unwrap_or(base.max_depth);
        let max_modules = args.max_modules.unwrap_or(base.max_modules);
        let include_type_imports = args.include_type_imports || base.include_type_imports;
        let include_dynamic_imports = args.include_dynamic_imports || base.include_dynamic_imports;
        let jobs = args.jobs.or(base.jobs);

        // Positional paths replace entry files listed in the config file
        let use_file_entries = args.paths.is_empty() && !base.entry_files.is_empty();
        let scan_paths = if use_file_entries { Vec::new() } else { paths };
        let entry_files = if use_file_entries {
            base.entry_files.clone()
        } else {
            Vec::new()
        };

        let analysis = AnalysisConfig::builder()
            .with_candidate_suffixes(base.candidate_suffixes.clone())
            .with_root(root)
            .with_max_depth(max_depth)
            .with_max_modules(max_modules)
            .with_alias_patterns(aliases)
            .with_infrastructure_patterns(infrastructure)
            .with_ignore_patterns(ignore)
            .with_entry_files(entry_files)
            .with_include_type_imports(include_type_imports)
            .with_include_dynamic_imports(include_dynamic_imports)
            .with_jobs(jobs)
            .build()?;

        Ok(Self::new(scan_paths, analysis))
    }

    /// Fill in entry files by walking `scan_paths`
    pub fn into_analysis_config(
        self,
        progress: Option<&mut ProgressReporter>,
    ) -> Result<AnalysisConfig, RoundaboutError> {
        let mut analysis = self.analysis;
        if self.scan_paths.is_empty() {
            return Ok(analysis);
        }

        let ignore = PathPatternSet::new(&analysis.root, &analysis.ignore_path_patterns)?;
        let discovery = EntryDiscovery::new(ignore, &analysis.candidate_suffixes);

        let entries = match progress {
            Some(p) => {
                p.start_discovery();
                let entries = discovery.discover_all(&self.scan_paths, Some(&*p));
                p.finish_discovery(entries.len());
                entries
            }
            None => discovery.discover_all(&self.scan_paths, None),
        };

        analysis.entry_files = entries;
        Ok(analysis)
    }
}

/// The first directory among `paths`, or the parent of the first file
fn infer_root(paths: &[PathBuf]) -> PathBuf {
    paths
        .iter()
        .find(|p| p.is_dir())
        .cloned()
        .or_else(|| {
            paths
                .first()
                .and_then(|p| p.parent())
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

fn prepend(front: &[String], back: &[String]) -> Vec<String> {
    front.iter().chain(back.iter()).cloned().collect()
}
