//! Document loader: walks category directories and reads files in parallel.
//!
//! Paths are collected single-threaded in sorted order, then read with
//! rayon. Results keep the collection order, so two loads of the same tree
//! produce identical document lists.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use globset::{Glob, GlobSet, GlobSetBuilder};
use preflight_core::config::ScanConfig;
use preflight_core::errors::LoadError;
use rayon::prelude::*;

use super::ignores::IgnorePatterns;
use super::types::{Category, Document, LoadFailure, LoadReport};

/// One category directory to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpec {
    pub category: Category,
    /// Directory relative to the load root
    pub subpath: PathBuf,
    /// Absence aborts the load with `LoadError::MissingCategory`
    pub required: bool,
}

impl CategorySpec {
    pub fn new(category: Category, subpath: impl Into<PathBuf>, required: bool) -> Self {
        Self {
            category,
            subpath: subpath.into(),
            required,
        }
    }

    pub fn optional(category: Category) -> Self {
        Self::new(category, category.name(), false)
    }

    pub fn required(category: Category) -> Self {
        Self::new(category, category.name(), true)
    }
}

enum Outcome {
    Loaded(Document),
    Skipped,
    Failed(LoadFailure),
}

/// Loads script files from a project root
pub struct DocumentLoader {
    root: PathBuf,
    ignores: IgnorePatterns,
    extensions: GlobSet,
    max_file_size: u64,
}

impl DocumentLoader {
    /// Create a loader accepting files with the given extensions (without dots).
    pub fn new(root: impl Into<PathBuf>, extensions: &[String]) -> Self {
        let root = root.into();
        let ignores = IgnorePatterns::new(&root, &[]);
        Self {
            extensions: build_extension_set(extensions),
            ignores,
            root,
            max_file_size: 5 * 1024 * 1024,
        }
    }

    pub fn from_config(root: impl Into<PathBuf>, config: &ScanConfig) -> Self {
        let root = root.into();
        let ignores = IgnorePatterns::new(&root, &config.extra_ignore);
        Self {
            extensions: build_extension_set(&config.effective_extensions()),
            ignores,
            root,
            max_file_size: config.effective_max_file_size(),
        }
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Category specs described by a scan config.
    pub fn specs_from_config(config: &ScanConfig) -> Vec<CategorySpec> {
        config
            .effective_categories()
            .iter()
            .map(|c| CategorySpec {
                category: Category::from_name(&c.name).unwrap_or(Category::Other),
                subpath: PathBuf::from(&c.path),
                required: c.required,
            })
            .collect()
    }

    /// Load every category directory in `specs`.
    ///
    /// Missing optional directories contribute no documents. Unreadable
    /// files are recorded in `LoadReport::failures` and skipped.
    pub fn load(&self, specs: &[CategorySpec]) -> Result<LoadReport, LoadError> {
        self.check_root()?;
        let start = Instant::now();

        let mut paths: Vec<(PathBuf, Category)> = Vec::new();
        let mut failures = Vec::new();

        for spec in specs {
            let dir = self.root.join(&spec.subpath);
            if !dir.is_dir() {
                if spec.required {
                    return Err(LoadError::MissingCategory {
                        category: spec.category.name().to_string(),
                        path: dir,
                    });
                }
                tracing::debug!(category = %spec.category, path = %dir.display(), "optional category absent");
                continue;
            }
            let mut found = Vec::new();
            self.walk_dir(&dir, &mut found, &mut failures);
            paths.extend(found.into_iter().map(|p| (p, spec.category)));
        }

        let report = self.read_all(paths, failures);
        tracing::info!(
            documents = report.documents.len(),
            failures = report.failures.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "loaded category directories"
        );
        Ok(report)
    }

    /// Load every matching file under the root, classifying each by the
    /// first path component that names a category.
    pub fn load_tree(&self) -> Result<LoadReport, LoadError> {
        self.check_root()?;
        let start = Instant::now();

        let mut found = Vec::new();
        let mut failures = Vec::new();
        self.walk_dir(&self.root, &mut found, &mut failures);

        let paths = found
            .into_iter()
            .map(|p| {
                let category = self.classify(&p);
                (p, category)
            })
            .collect();

        let report = self.read_all(paths, failures);
        tracing::info!(
            documents = report.documents.len(),
            failures = report.failures.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "loaded project tree"
        );
        Ok(report)
    }

    fn check_root(&self) -> Result<(), LoadError> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(LoadError::InvalidRoot {
                path: self.root.clone(),
            })
        }
    }

    fn classify(&self, path: &Path) -> Category {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .parent()
            .into_iter()
            .flat_map(|p| p.components())
            .filter_map(|c| c.as_os_str().to_str())
            .find_map(Category::from_name)
            .unwrap_or(Category::Other)
    }

    /// Recursively collect matching files, sorted by name at each level.
    fn walk_dir(&self, dir: &Path, files: &mut Vec<PathBuf>, failures: &mut Vec<LoadFailure>) {
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "cannot read directory");
                failures.push(LoadFailure {
                    path: self.relative(dir),
                    message: e.to_string(),
                });
                return;
            }
        };

        let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
        paths.sort();

        for path in paths {
            let relative = path.strip_prefix(&self.root).unwrap_or(&path);
            let hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'));

            if path.is_dir() {
                if !hidden && !self.ignores.is_ignored(relative, true) {
                    self.walk_dir(&path, files, failures);
                }
            } else if !self.ignores.is_ignored(relative, false) && self.matches_extension(&path) {
                // Dangling links fail their metadata read in `read_one`;
                // sockets and pipes are never opened.
                if path.is_file() || fs::metadata(&path).is_err() {
                    files.push(path);
                } else {
                    tracing::warn!(path = %path.display(), "skipping non-regular file");
                    failures.push(LoadFailure {
                        path: self.relative(&path),
                        message: "not a regular file".to_string(),
                    });
                }
            }
        }
    }

    fn matches_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.file_name()
            .is_some_and(|name| self.extensions.is_match(Path::new(name)))
    }

    fn read_all(&self, paths: Vec<(PathBuf, Category)>, mut failures: Vec<LoadFailure>) -> LoadReport {
        let outcomes: Vec<Outcome> = paths
            .par_iter()
            .map(|(path, category)| self.read_one(path, *category))
            .collect();

        let mut documents = Vec::new();
        let mut skipped = 0;
        for outcome in outcomes {
            match outcome {
                Outcome::Loaded(doc) => documents.push(doc),
                Outcome::Skipped => skipped += 1,
                Outcome::Failed(failure) => failures.push(failure),
            }
        }

        LoadReport {
            root: self.root.display().to_string(),
            documents,
            failures,
            skipped,
        }
    }

    fn read_one(&self, path: &Path, category: Category) -> Outcome {
        let relative = self.relative(path);
        let result = fs::metadata(path).and_then(|meta| {
            if meta.len() > self.max_file_size {
                return Ok(None);
            }
            fs::read(path).map(Some)
        });

        match result {
            Ok(Some(bytes)) => {
                let doc = Document::from_bytes(relative, category, &bytes);
                for warning in &doc.warnings {
                    tracing::debug!(path = %doc.path, warning = %warning.message(), "encoding warning");
                }
                Outcome::Loaded(doc)
            }
            Ok(None) => {
                tracing::debug!(path = %relative, max = self.max_file_size, "skipping oversized file");
                Outcome::Skipped
            }
            Err(source) => {
                let err = LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                };
                tracing::warn!(error = %err, "skipping unreadable file");
                Outcome::Failed(LoadFailure {
                    path: relative,
                    message: err.to_string(),
                })
            }
        }
    }

    fn relative(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn build_extension_set(extensions: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for ext in extensions {
        let ext = ext.trim_start_matches('.');
        match Glob::new(&format!("*.{ext}")) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => tracing::warn!(extension = %ext, error = %e, "invalid extension filter"),
        }
    }
    builder.build().unwrap_or_else(|_| GlobSet::empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_set_matches_file_names() {
        let set = build_extension_set(&["gs".to_string(), ".js".to_string()]);
        assert!(set.is_match(Path::new("Menu.gs")));
        assert!(set.is_match(Path::new("util.js")));
        assert!(!set.is_match(Path::new("notes.md")));
    }

    #[test]
    fn test_classify_by_first_category_component() {
        let loader = DocumentLoader::new("/project", &["gs".to_string()]);
        assert_eq!(loader.classify(Path::new("/project/table/server/A.gs")), Category::Server);
        assert_eq!(loader.classify(Path::new("/project/web/x/client/B.gs")), Category::Web);
        assert_eq!(loader.classify(Path::new("/project/Root.gs")), Category::Other);
    }
}
