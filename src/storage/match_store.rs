//! File-backed match store with a modification-time cache.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{sample_matches, JsonlReader, JsonlWriter, MatchFileFormat, StorageError};
use crate::models::MatchRecord;

/// JSON document layout of a match file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchFile {
    pub matches: Vec<MatchRecord>,
}

/// Document read with records left unparsed, so one bad record does not
/// discard the rest.
#[derive(Deserialize)]
struct RawMatchFile {
    matches: Vec<serde_json::Value>,
}

/// Where a loaded history came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum DataSource {
    File(PathBuf),
    Sample,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Sample => write!(f, "built-in sample"),
        }
    }
}

/// A loaded match history.
#[derive(Debug, Clone)]
pub struct MatchSet {
    pub source: DataSource,
    /// Matches, newest first
    pub matches: Vec<MatchRecord>,
    /// Records dropped while loading
    pub skipped: usize,
    pub loaded_at: DateTime<Utc>,
}

impl MatchSet {
    pub fn sample() -> Self {
        Self {
            source: DataSource::Sample,
            matches: sample_matches(),
            skipped: 0,
            loaded_at: Utc::now(),
        }
    }

    pub fn is_sample(&self) -> bool {
        self.source == DataSource::Sample
    }
}

/// Identity of a file's contents for cache validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

fn file_stamp(path: &Path) -> Option<FileStamp> {
    let meta = fs::metadata(path).ok()?;
    Some(FileStamp {
        modified: meta.modified().ok(),
        len: meta.len(),
    })
}

struct CachedMatches {
    stamp: Option<FileStamp>,
    set: Arc<MatchSet>,
}

/// Loads match history from a flat file, falling back to the built-in sample.
///
/// The parsed history is cached and reused until the file's modification
/// time or length changes.
pub struct MatchStore {
    path: PathBuf,
    field_size: u32,
    cache: Option<CachedMatches>,
}

impl MatchStore {
    pub fn new(path: impl Into<PathBuf>, field_size: u32) -> Self {
        Self {
            path: path.into(),
            field_size,
            cache: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop the cached history.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Load the history. Never fails: unreadable files yield the sample.
    pub fn load(&mut self) -> Arc<MatchSet> {
        let stamp = file_stamp(&self.path);

        if let Some(cached) = &self.cache {
            if cached.stamp == stamp {
                debug!("Match cache hit for {:?}", self.path);
                return Arc::clone(&cached.set);
            }
        }

        let set = match self.read_file() {
            Ok(set) => {
                info!(
                    "Loaded {} matches from {:?} ({} skipped)",
                    set.matches.len(),
                    self.path,
                    set.skipped
                );
                set
            }
            Err(StorageError::PathNotFound(path)) => {
                warn!("No match file at {:?}, using sample data", path);
                MatchSet::sample()
            }
            Err(e) => {
                warn!("Error loading {:?}: {}. Using sample data", self.path, e);
                MatchSet::sample()
            }
        };

        let set = Arc::new(set);
        self.cache = Some(CachedMatches {
            stamp,
            set: Arc::clone(&set),
        });
        set
    }

    fn read_file(&self) -> Result<MatchSet, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::PathNotFound(self.path.clone()));
        }

        let (records, mut skipped) = match MatchFileFormat::from_path(&self.path) {
            MatchFileFormat::Document => {
                let contents = fs::read_to_string(&self.path)?;
                let file: RawMatchFile = serde_json::from_str(&contents)?;
                let total = file.matches.len();

                let mut records = Vec::with_capacity(total);
                for (index, value) in file.matches.into_iter().enumerate() {
                    match serde_json::from_value::<MatchRecord>(value) {
                        Ok(record) => records.push(record),
                        Err(e) => warn!(
                            "Skipping match {} in {:?}: {}",
                            index + 1,
                            self.path,
                            e
                        ),
                    }
                }

                if records.is_empty() && total > 0 {
                    return Err(StorageError::InvalidRecord(format!(
                        "none of {} matches could be parsed",
                        total
                    )));
                }
                let skipped = total - records.len();
                (records, skipped)
            }
            MatchFileFormat::Lines => {
                let contents = JsonlReader::<MatchRecord>::new(self.path.clone()).read_all()?;
                if contents.entities.is_empty() && contents.skipped > 0 {
                    return Err(StorageError::InvalidRecord(format!(
                        "none of {} lines could be parsed",
                        contents.skipped
                    )));
                }
                (contents.entities, contents.skipped)
            }
        };

        let mut matches = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            if record.has_valid_placement(self.field_size) {
                matches.push(record);
            } else {
                skipped += 1;
                warn!(
                    "Skipping match {} in {:?}: placement {} outside 1..={}",
                    index + 1,
                    self.path,
                    record.placement,
                    self.field_size
                );
            }
        }

        Ok(MatchSet {
            source: DataSource::File(self.path.clone()),
            matches,
            skipped,
            loaded_at: Utc::now(),
        })
    }
}

/// Write matches to `path`, as JSONL or a JSON document depending on the extension.
pub fn write_match_file(path: &Path, matches: &[MatchRecord]) -> Result<usize, StorageError> {
    match MatchFileFormat::from_path(path) {
        MatchFileFormat::Lines => JsonlWriter::new(path.to_path_buf()).write_all(matches),
        MatchFileFormat::Document => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let file = MatchFile {
                matches: matches.to_vec(),
            };
            fs::write(path, serde_json::to_string_pretty(&file)?)?;
            info!("Wrote {} matches to {:?}", matches.len(), path);
            Ok(matches.len())
        }
    }
}
