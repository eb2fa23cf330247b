//! Document loader errors.

use std::path::PathBuf;

use super::error_code::{self, PreflightErrorCode};

/// Errors raised while reading the document set.
///
/// `Io` is fatal only for the file it names; the loader records it and
/// keeps going. `MissingCategory` and `InvalidRoot` abort the load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Required category '{category}' not found at {path}")]
    MissingCategory { category: String, path: PathBuf },

    #[error("Root directory does not exist: {path}")]
    InvalidRoot { path: PathBuf },
}

impl PreflightErrorCode for LoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCategory { .. } => error_code::MISSING_CATEGORY,
            _ => error_code::LOAD_ERROR,
        }
    }
}
