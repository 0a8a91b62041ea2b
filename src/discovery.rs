//! Entry file discovery
//!
//! Turns the positional paths given on the command line into a list of entry
//! files. Files are taken as-is; directories are walked and every file with a
//! source extension becomes an entry.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::constants::analysis::SKIPPED_DIRS;
use crate::patterns::PathPatternSet;
use crate::progress::ProgressReporter;

pub struct EntryDiscovery {
    ignore: PathPatternSet,
    extensions: Vec<String>,
}

impl EntryDiscovery {
    /// `candidate_suffixes` decides which files count as sources: every
    /// suffix of the form `.ext` is accepted
    pub fn new(ignore: PathPatternSet, candidate_suffixes: &[String]) -> Self {
        let extensions = candidate_suffixes
            .iter()
            .filter(|s| s.starts_with('.') && !s.contains('/'))
            .cloned()
            .collect();

        Self { ignore, extensions }
    }

    /// Collect entry files under `paths`, sorted and without duplicates
    ///
    /// A path that does not exist is passed through unchanged so the analyzer
    /// reports it as an unreadable entry file.
    pub fn discover_all(
        &self,
        paths: &[PathBuf],
        progress: Option<&ProgressReporter>,
    ) -> Vec<PathBuf> {
        let mut entries = BTreeSet::new();

        for path in paths {
            if path.is_dir() {
                if let Some(p) = progress {
                    p.checking_path(path);
                }
                self.discover_in_dir(path, &mut entries);
            } else {
                if !path.exists() {
                    warn!(path = %path.display(), "entry path does not exist");
                }
                entries.insert(path.clone());
            }
        }

        debug!(count = entries.len(), "collected entry files");
        entries.into_iter().collect()
    }

    fn discover_in_dir(&self, dir: &Path, entries: &mut BTreeSet<PathBuf>) {
        let walker = WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.depth() == 0 {
                    return true;
                }
                let skipped = e.file_type().is_dir()
                    && e.file_name()
                        .to_str()
                        .is_some_and(|name| SKIPPED_DIRS.contains(&name));
                !skipped && !self.ignore.matches(e.path())
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };

            if entry.file_type().is_file() && self.has_source_extension(entry.path()) {
                entries.insert(entry.into_path());
            }
        }
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.extensions.iter().any(|ext| name.ends_with(ext.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::constants::analysis::DEFAULT_CANDIDATE_SUFFIXES;

    fn suffixes() -> Vec<String> {
        DEFAULT_CANDIDATE_SUFFIXES
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_walks_directories_for_sources() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for file in [
            "src/a.ts",
            "src/nested/b.tsx",
            "src/readme.md",
            "node_modules/pkg/index.js",
            "target/out.js",
        ] {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }

        let discovery = EntryDiscovery::new(PathPatternSet::empty(root), &suffixes());
        let entries = discovery.discover_all(&[root.to_path_buf()], None);

        assert_eq!(
            entries,
            vec![root.join("src/a.ts"), root.join("src/nested/b.tsx")]
        );
    }

    #[test]
    fn test_ignore_patterns_prune_entries() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for file in ["src/a.ts", "src/generated/api.ts"] {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }

        let ignore = PathPatternSet::new(root, &["src/generated/**".to_string()]).unwrap();
        let entries = EntryDiscovery::new(ignore, &suffixes()).discover_all(&[root.to_path_buf()], None);

        assert_eq!(entries, vec![root.join("src/a.ts")]);
    }

    #[test]
    fn test_files_and_missing_paths_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("main.ts");
        fs::write(&file, "").unwrap();
        let missing = dir.path().join("missing.ts");

        let discovery = EntryDiscovery::new(PathPatternSet::empty(dir.path()), &suffixes());
        let entries = discovery.discover_all(&[missing.clone(), file.clone(), file.clone()], None);

        assert_eq!(entries, vec![file, missing]);
    }
}
