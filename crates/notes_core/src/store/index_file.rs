//! Whole-file read/write of the JSON notes index.
//!
//! # Responsibility
//! - Decode the index file into note records.
//! - Replace the index file atomically (temp file in the same directory,
//!   synced, then renamed into place).
//!
//! # Invariants
//! - Written records are sorted by `title` ascending, then `id`.
//! - A missing file is reported as `Ok(None)`, not as an error.

use super::{StoreError, StoreResult};
use crate::model::note::Note;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;
use std::time::Instant;
use tempfile::NamedTempFile;

/// Reasons an existing index file could not be used.
#[derive(Debug)]
pub(crate) enum IndexReadError {
    Io(std::io::Error),
    Decode(serde_json::Error),
}

impl Display for IndexReadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "unreadable index file: {err}"),
            Self::Decode(err) => write!(f, "malformed index file: {err}"),
        }
    }
}

impl Error for IndexReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Decode(err) => Some(err),
        }
    }
}

/// Reads every note record from `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub(crate) fn read_index(path: &Path) -> Result<Option<Vec<Note>>, IndexReadError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(IndexReadError::Io(err)),
    };
    serde_json::from_slice::<Vec<Note>>(&bytes)
        .map(Some)
        .map_err(IndexReadError::Decode)
}

/// Atomically replaces the index file at `path` with `notes`.
///
/// # Side effects
/// - Creates and removes a temporary file next to `path`.
/// - Emits `index_write` logging events with duration and status.
pub(crate) fn write_index<'a>(
    path: &Path,
    notes: impl IntoIterator<Item = &'a Note>,
) -> StoreResult<()> {
    let started_at = Instant::now();
    let mut sorted = notes.into_iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));

    match replace_file(path, &sorted) {
        Ok(()) => {
            info!(
                "event=index_write module=store status=ok notes={} duration_ms={}",
                sorted.len(),
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=index_write module=store status=error notes={} duration_ms={} error={}",
                sorted.len(),
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn replace_file(path: &Path, notes: &[&Note]) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_error = |source: std::io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(write_error)?;
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, notes).map_err(|err| {
            if err.is_io() {
                write_error(err.into())
            } else {
                StoreError::Encode(err)
            }
        })?;
        writer.flush().map_err(write_error)?;
    }
    staged.as_file().sync_all().map_err(write_error)?;
    staged.persist(path).map_err(|err| write_error(err.error))?;
    Ok(())
}
