//! Match history storage.
//!
//! Handles reading match history from the local filesystem:
//! - A single JSON document with a top-level `matches` array
//! - A JSONL file with one match per line
//! - The built-in sample history used when neither can be read

mod jsonl;
mod match_store;
mod sample;

pub use jsonl::*;
pub use match_store::*;
pub use sample::*;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// On-disk layout of a match history file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchFileFormat {
    /// `{"matches": [...]}`
    Document,
    /// One match object per line
    Lines,
}

impl MatchFileFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jsonl") || ext.eq_ignore_ascii_case("ndjson") => {
                MatchFileFormat::Lines
            }
            _ => MatchFileFormat::Document,
        }
    }
}
