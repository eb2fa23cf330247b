//! Symbol graph types.

use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

/// Where a function is declared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DeclarationSite {
    pub file: String,
    pub line: u32,
}

/// A declared top-level function.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SymbolDeclaration {
    pub name: String,
    pub file: String,
    pub line: u32,
}

/// A binding entry mapping a display label to a target function name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolReference {
    pub label: String,
    pub name: String,
    pub file: String,
    pub line: u32,
}

/// Flat global namespace: name -> every site declaring it.
///
/// Same-named declarations in different files are kept side by side and
/// are not an error; existence is name membership.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    sites: FxHashMap<String, SmallVec<[DeclarationSite; 1]>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, declaration: SymbolDeclaration) {
        self.sites
            .entry(declaration.name)
            .or_default()
            .push(DeclarationSite {
                file: declaration.file,
                line: declaration.line,
            });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sites.contains_key(name)
    }

    /// Declaration sites for `name`, in insertion order.
    pub fn sites(&self, name: &str) -> &[DeclarationSite] {
        self.sites.get(name).map(|s| s.as_slice()).unwrap_or(&[])
    }

    /// Number of distinct declared names.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Declared names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sites.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Names declared more than once, sorted.
    pub fn redeclared(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .sites
            .iter()
            .filter(|(_, sites)| sites.len() > 1)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl FromIterator<SymbolDeclaration> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = SymbolDeclaration>>(iter: I) -> Self {
        let mut table = SymbolTable::new();
        for declaration in iter {
            table.insert(declaration);
        }
        table
    }
}

/// Serializable outcome of the declared-vs-referenced check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolReport {
    pub references_total: usize,
    pub resolved: usize,
    pub declared_count: usize,
    /// Bindings pointing at undeclared names, in binding order
    pub missing: Vec<SymbolReference>,
    /// Declared but never bound and not reserved, sorted by name
    pub unused: Vec<SymbolDeclaration>,
    /// Binding documents that were expected but not loaded
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_binding_documents: Vec<String>,
}

impl SymbolReport {
    pub fn has_missing(&self) -> bool {
        !self.missing.is_empty() || !self.missing_binding_documents.is_empty()
    }
}
