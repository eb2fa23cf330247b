//! Scanner module - the document loader
//!
//! Reads category directories (or a whole tree) into immutable `Document`s:
//! - `ignore` for gitignore-style skip rules
//! - `globset` for the extension filter
//! - `rayon` for parallel reads
//! - `xxhash` for content hashes

mod encoding;
mod ignores;
mod types;
mod walker;

pub use ignores::{IgnorePatterns, DEFAULT_IGNORES};
pub use types::{Category, Document, EncodingWarning, LoadFailure, LoadReport};
pub use walker::{CategorySpec, DocumentLoader};
