//! Scanner types - documents, categories, and load results

use std::fmt;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use super::encoding;

/// Grouping of a source file within the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Client,
    Server,
    Shared,
    Tests,
    Web,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Client,
        Category::Server,
        Category::Shared,
        Category::Tests,
        Category::Web,
        Category::Other,
    ];

    /// Parse a category from its configuration name.
    pub fn from_name(name: &str) -> Option<Category> {
        match name.to_ascii_lowercase().as_str() {
            "client" => Some(Category::Client),
            "server" => Some(Category::Server),
            "shared" => Some(Category::Shared),
            "tests" | "test" => Some(Category::Tests),
            "web" => Some(Category::Web),
            "other" => Some(Category::Other),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Client => "client",
            Category::Server => "server",
            Category::Shared => "shared",
            Category::Tests => "tests",
            Category::Web => "web",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A non-fatal encoding problem attached to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EncodingWarning {
    /// The file starts with a U+FEFF byte-order mark.
    ByteOrderMark,
    /// C0 control characters other than tab, LF, and CR.
    ControlCharacters { count: usize, first_line: u32 },
    /// The bytes were not valid UTF-8 and were decoded lossily.
    InvalidUtf8,
}

impl EncodingWarning {
    /// Line the warning points at.
    pub fn line(&self) -> u32 {
        match self {
            EncodingWarning::ControlCharacters { first_line, .. } => *first_line,
            _ => 1,
        }
    }

    pub fn message(&self) -> String {
        match self {
            EncodingWarning::ByteOrderMark => "file starts with a byte-order mark".to_string(),
            EncodingWarning::ControlCharacters { count, .. } => {
                format!("{count} invalid control character(s)")
            }
            EncodingWarning::InvalidUtf8 => {
                "file is not valid UTF-8; invalid bytes were replaced".to_string()
            }
        }
    }
}

/// One loaded source text file. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Path relative to the load root, `/`-separated
    pub path: String,
    pub category: Category,
    /// Raw content, byte-order mark included
    pub text: String,
    /// `body()` split on `\n` with any trailing `\r` removed
    pub lines: Vec<String>,
    /// xxh3 of the raw bytes
    pub hash: String,
    pub warnings: Vec<EncodingWarning>,
    /// Byte length of a leading byte-order mark, 0 when absent
    #[serde(skip)]
    body_start: usize,
    #[serde(skip)]
    line_starts: Vec<usize>,
}

impl Document {
    /// Build a document from already-decoded text.
    pub fn new(path: impl Into<String>, category: Category, text: impl Into<String>) -> Self {
        let text = text.into();
        let hash = format!("{:016x}", xxh3_64(text.as_bytes()));
        Self::build(path.into(), category, text, hash, Vec::new())
    }

    /// Build a document from raw file bytes, decoding lossily if needed.
    pub fn from_bytes(path: impl Into<String>, category: Category, bytes: &[u8]) -> Self {
        let hash = format!("{:016x}", xxh3_64(bytes));
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::build(path.into(), category, text.to_string(), hash, Vec::new()),
            Err(_) => {
                let text = String::from_utf8_lossy(bytes).into_owned();
                Self::build(
                    path.into(),
                    category,
                    text,
                    hash,
                    vec![EncodingWarning::InvalidUtf8],
                )
            }
        }
    }

    fn build(
        path: String,
        category: Category,
        text: String,
        hash: String,
        mut warnings: Vec<EncodingWarning>,
    ) -> Self {
        warnings.extend(encoding::inspect(&text));
        let body_start = if text.starts_with(encoding::BOM) {
            encoding::BOM.len_utf8()
        } else {
            0
        };
        let body = &text[body_start..];
        let lines = body
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
        let mut line_starts = vec![0];
        line_starts.extend(body.match_indices('\n').map(|(i, _)| i + 1));

        Self {
            path,
            category,
            text,
            lines,
            hash,
            warnings,
            body_start,
            line_starts,
        }
    }

    /// The text checks run on: `text` without its byte-order mark.
    pub fn body(&self) -> &str {
        &self.text[self.body_start..]
    }

    /// 1-based line number containing the byte `offset` of `body()`.
    pub fn line_of_offset(&self, offset: usize) -> u32 {
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        (idx + 1) as u32
    }

    /// The trimmed text of a 1-based line, or "" when out of range.
    pub fn snippet(&self, line: u32) -> &str {
        line.checked_sub(1)
            .and_then(|i| self.lines.get(i as usize))
            .map(|l| l.trim())
            .unwrap_or("")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// A file that could not be read. Fatal for that file only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadFailure {
    pub path: String,
    pub message: String,
}

/// Result of a load operation
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// Root directory that was loaded
    pub root: String,
    /// Documents in category order, then path order
    pub documents: Vec<Document>,
    /// Files that failed to read (non-fatal)
    pub failures: Vec<LoadFailure>,
    /// Files skipped for exceeding the size limit
    pub skipped: usize,
}

impl LoadReport {
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(move |d| d.category == category)
    }

    pub fn find(&self, path: &str) -> Option<&Document> {
        let wanted = path.trim_start_matches("./");
        self.documents.iter().find(|d| d.path == wanted)
    }
}
