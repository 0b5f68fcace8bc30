//! File-backed note storage.
//!
//! # Responsibility
//! - Hold the in-memory note index keyed by `NoteId`.
//! - Mirror the full index to `notes_index.json` after every mutation.
//! - Recover from unreadable or malformed index files at startup.
//!
//! # Invariants
//! - Mutations return only after the index file has been atomically replaced.
//! - A failed write leaves the in-memory index exactly as it was before the call.
//! - A malformed index file is never rewritten by `open`; only the next
//!   successful mutation supersedes it.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod index_file;
mod note_store;

pub use note_store::{NoteStore, NoteSummary};

/// File name of the index inside the storage directory.
pub const INDEX_FILE_NAME: &str = "notes_index.json";

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by store construction and mutations.
///
/// Not-found is never an error; lookups return `None`/`false` instead.
#[derive(Debug)]
pub enum StoreError {
    /// Storage directory could not be created.
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Index could not be serialized.
    Encode(serde_json::Error),
    /// Index file (or its temporary sibling) could not be written.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateDir { path, source } => write!(
                f,
                "failed to create notes directory `{}`: {source}",
                path.display()
            ),
            Self::Encode(err) => write!(f, "failed to encode notes index: {err}"),
            Self::Write { path, source } => write!(
                f,
                "failed to write notes index `{}`: {source}",
                path.display()
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            Self::Write { source, .. } => Some(source),
        }
    }
}

/// Outcome of reading the index file when the store was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// No index file existed; the store started empty.
    Missing,
    /// Index file was read; `notes` records are now in memory.
    Loaded { notes: usize },
    /// Index file was unreadable or malformed; the store started empty.
    Recovered { reason: String },
}

impl LoadStatus {
    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered { .. })
    }
}
