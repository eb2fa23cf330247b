//! Per-category structure statistics.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::scanner::{Category, Document};

static RE_FUNCTION: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"function\s+\w+").ok());

/// Counts for one category (or the whole project).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub files: usize,
    /// Named `function` occurrences, nested ones included
    pub functions: usize,
    pub lines: usize,
}

impl CategoryStats {
    fn add(&mut self, other: CategoryStats) {
        self.files += other.files;
        self.functions += other.functions;
        self.lines += other.lines;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryEntry {
    pub category: Category,
    #[serde(flatten)]
    pub stats: CategoryStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructureReport {
    /// Categories with at least one document, in category order
    pub categories: Vec<CategoryEntry>,
    pub total: CategoryStats,
}

impl StructureReport {
    pub fn get(&self, category: Category) -> Option<&CategoryStats> {
        self.categories
            .iter()
            .find(|e| e.category == category)
            .map(|e| &e.stats)
    }
}

pub fn analyze_structure(docs: &[Document]) -> StructureReport {
    let mut by_category: BTreeMap<Category, CategoryStats> = BTreeMap::new();
    for doc in docs {
        let functions = RE_FUNCTION
            .as_ref()
            .map_or(0, |re| re.find_iter(doc.body()).count());
        by_category.entry(doc.category).or_default().add(CategoryStats {
            files: 1,
            functions,
            lines: doc.line_count(),
        });
    }

    let mut total = CategoryStats::default();
    let categories = by_category
        .into_iter()
        .map(|(category, stats)| {
            total.add(stats);
            CategoryEntry { category, stats }
        })
        .collect();

    StructureReport { categories, total }
}
