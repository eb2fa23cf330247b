//! Document loader configuration.

use serde::{Deserialize, Serialize};

/// One category directory to load, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Category name: client, server, shared, tests, web, or other.
    pub name: String,
    /// Subdirectory holding the category's files.
    pub path: String,
    /// A missing required directory aborts the load.
    #[serde(default)]
    pub required: bool,
}

impl CategoryConfig {
    pub fn new(name: &str, path: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            required,
        }
    }
}

/// Configuration for the document loader.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// File extensions to load, without the dot. Default: ["gs"].
    pub extensions: Vec<String>,
    /// Category directories. Default: client (required), server, shared, tests, web.
    pub categories: Vec<CategoryConfig>,
    /// Additional gitignore-style patterns to skip.
    pub extra_ignore: Vec<String>,
    /// Maximum file size in bytes. Default: 5MB.
    pub max_file_size: Option<u64>,
}

impl ScanConfig {
    /// Returns the effective extension filter, defaulting to `gs`.
    pub fn effective_extensions(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            vec!["gs".to_string()]
        } else {
            self.extensions.clone()
        }
    }

    /// Returns the effective category layout.
    pub fn effective_categories(&self) -> Vec<CategoryConfig> {
        if !self.categories.is_empty() {
            return self.categories.clone();
        }
        vec![
            CategoryConfig::new("client", "client", true),
            CategoryConfig::new("server", "server", false),
            CategoryConfig::new("shared", "shared", false),
            CategoryConfig::new("tests", "tests", false),
            CategoryConfig::new("web", "web", false),
        ]
    }

    /// Returns the effective max file size, defaulting to 5MB.
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(5 * 1024 * 1024)
    }
}
