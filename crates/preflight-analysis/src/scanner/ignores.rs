//! Ignore patterns for script project trees
//!
//! Skips dependency folders, VCS metadata, build output, and report
//! directories. Projects add their own rules through `.preflightignore`,
//! `.gitignore`, or `scan.extra_ignore`.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

/// Default directories and files to always ignore
pub const DEFAULT_IGNORES: &[&str] = &[
    "node_modules",
    "bower_components",
    ".git",
    ".svn",
    ".hg",
    ".idea",
    ".vscode",
    "dist",
    "coverage",
    "test-results",
    ".clasp.json",
    "*.min.js",
    "*.map",
];

/// Compiled ignore rules rooted at the load root
pub struct IgnorePatterns {
    gitignore: Gitignore,
}

impl IgnorePatterns {
    /// Create ignore patterns from defaults + custom patterns
    pub fn new(root: &Path, extra_patterns: &[String]) -> Self {
        let mut builder = GitignoreBuilder::new(root);

        for pattern in DEFAULT_IGNORES {
            let _ = builder.add_line(None, pattern);
        }

        for pattern in extra_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                tracing::warn!(pattern = %pattern, error = %e, "ignoring invalid ignore pattern");
            }
        }

        let preflightignore = root.join(".preflightignore");
        if preflightignore.exists() {
            let _ = builder.add(&preflightignore);
        }

        let gitignore = root.join(".gitignore");
        if gitignore.exists() {
            let _ = builder.add(&gitignore);
        }

        Self {
            gitignore: builder.build().unwrap_or_else(|_| Gitignore::empty()),
        }
    }

    /// Check if a root-relative path should be ignored
    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        self.gitignore.matched(path, is_dir).is_ignore()
    }
}
