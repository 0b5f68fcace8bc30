//! In-memory note index mirrored to a single JSON file.
//!
//! # Responsibility
//! - Provide the create/update, lookup, listing and delete operations the UI
//!   drives.
//! - Stamp creation/modification times.
//!
//! # Invariants
//! - Timestamps are whole seconds, matching what the index file can hold.
//! - Listing order is `modified_at DESC`, then save order within this store
//!   instance (latest first), then `id ASC`.
//! - Title-keyed lookups resolve to the first match in listing order. Titles
//!   are not unique, so these are compatibility shims over the id-keyed API.

use super::index_file::{read_index, write_index};
use super::{LoadStatus, StoreError, StoreResult, INDEX_FILE_NAME};
use crate::model::note::{Note, NoteId};
use chrono::{SubsecRound, Utc};
use log::{debug, error, info, warn};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// List projection returned by `NoteStore::list_all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    pub id: NoteId,
    pub title: String,
}

/// Single-writer note store backed by `notes_index.json`.
pub struct NoteStore {
    index_path: PathBuf,
    notes: BTreeMap<NoteId, Note>,
    load_status: LoadStatus,
    /// Save sequence per note, in memory only. Orders same-second saves.
    revisions: HashMap<NoteId, u64>,
    last_revision: u64,
}

impl NoteStore {
    /// Opens the store rooted at `data_dir`, creating the directory if needed.
    ///
    /// A missing index file yields an empty store. An unreadable or malformed
    /// index file also yields an empty store; the failure is logged and kept
    /// in `load_status()`, and the file is left untouched.
    ///
    /// # Errors
    /// - Returns `StoreError::CreateDir` when `data_dir` cannot be created.
    pub fn open(data_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let started_at = Instant::now();
        let data_dir = data_dir.as_ref();
        info!("event=store_open module=store status=start");

        if let Err(source) = std::fs::create_dir_all(data_dir) {
            error!(
                "event=store_open module=store status=error error_code=create_dir_failed error={}",
                source
            );
            return Err(StoreError::CreateDir {
                path: data_dir.to_path_buf(),
                source,
            });
        }

        let index_path = data_dir.join(INDEX_FILE_NAME);
        let (notes, load_status) = match read_index(&index_path) {
            Ok(None) => (BTreeMap::new(), LoadStatus::Missing),
            Ok(Some(records)) => {
                let notes = index_by_id(records);
                let count = notes.len();
                (notes, LoadStatus::Loaded { notes: count })
            }
            Err(err) => {
                error!(
                    "event=store_open module=store status=recovered error_code=index_unusable error={}",
                    err
                );
                (
                    BTreeMap::new(),
                    LoadStatus::Recovered {
                        reason: err.to_string(),
                    },
                )
            }
        };

        info!(
            "event=store_open module=store status=ok notes={} duration_ms={}",
            notes.len(),
            started_at.elapsed().as_millis()
        );

        Ok(Self {
            index_path,
            notes,
            load_status,
            revisions: HashMap::new(),
            last_revision: 0,
        })
    }

    /// Creates a note, or updates the note with `id` when it exists.
    ///
    /// An `id` that does not resolve creates a new note with a fresh id.
    /// Returns the id of the saved note.
    ///
    /// # Errors
    /// - Returns an error when the index cannot be written; the in-memory
    ///   index is rolled back first.
    pub fn save(
        &mut self,
        id: Option<&NoteId>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> StoreResult<NoteId> {
        let now = Utc::now().trunc_subsecs(0);
        let note = match id.and_then(|id| self.notes.get(id)) {
            Some(existing) => existing.revised(title, content, now),
            None => {
                if let Some(id) = id {
                    debug!(
                        "event=note_save module=store status=not_found note_id={} action=create",
                        id
                    );
                }
                Note::new(title, content, now)
            }
        };

        let note_id = note.id.clone();
        let previous = self.notes.insert(note_id.clone(), note);
        if let Err(err) = self.persist() {
            match previous {
                Some(previous) => {
                    self.notes.insert(note_id, previous);
                }
                None => {
                    self.notes.remove(&note_id);
                }
            }
            return Err(err);
        }

        self.last_revision += 1;
        self.revisions.insert(note_id.clone(), self.last_revision);

        info!(
            "event=note_save module=store status=ok note_id={} action={}",
            note_id,
            if previous.is_some() { "update" } else { "create" }
        );
        Ok(note_id)
    }

    /// Returns the note with `id`, if any.
    pub fn load_by_id(&self, id: &NoteId) -> Option<&Note> {
        self.notes.get(id)
    }

    /// Returns the body of the first note titled `title`.
    pub fn load_by_title(&self, title: &str) -> Option<&str> {
        self.first_by_title(title).map(|note| note.content.as_str())
    }

    /// Lists id and title of every note, most recently modified first.
    pub fn list_all(&self) -> Vec<NoteSummary> {
        self.by_recency()
            .into_iter()
            .map(|note| NoteSummary {
                id: note.id.clone(),
                title: note.title.clone(),
            })
            .collect()
    }

    /// Lists titles in the same order as `list_all`.
    pub fn list_titles(&self) -> Vec<String> {
        self.by_recency()
            .into_iter()
            .map(|note| note.title.clone())
            .collect()
    }

    /// Removes the note with `id`.
    ///
    /// Returns `Ok(false)` without touching the disk when no such note exists.
    ///
    /// # Errors
    /// - Returns an error when the index cannot be written; the note is
    ///   restored in memory first.
    pub fn delete_by_id(&mut self, id: &NoteId) -> StoreResult<bool> {
        let Some(removed) = self.notes.remove(id) else {
            debug!(
                "event=note_delete module=store status=not_found note_id={}",
                id
            );
            return Ok(false);
        };

        if let Err(err) = self.persist() {
            self.notes.insert(id.clone(), removed);
            return Err(err);
        }

        self.revisions.remove(id);
        info!("event=note_delete module=store status=ok note_id={}", id);
        Ok(true)
    }

    /// Removes the first note titled `title`.
    pub fn delete_by_title(&mut self, title: &str) -> StoreResult<bool> {
        match self.find_id_by_title(title) {
            Some(id) => self.delete_by_id(&id),
            None => {
                debug!("event=note_delete module=store status=not_found key=title");
                Ok(false)
            }
        }
    }

    pub fn exists_by_id(&self, id: &NoteId) -> bool {
        self.notes.contains_key(id)
    }

    pub fn exists_by_title(&self, title: &str) -> bool {
        self.notes.values().any(|note| note.title == title)
    }

    /// Resolves the id of the first note titled `title`.
    pub fn find_id_by_title(&self, title: &str) -> Option<NoteId> {
        self.first_by_title(title).map(|note| note.id.clone())
    }

    /// Iterates every note in id order.
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    fn persist(&self) -> StoreResult<()> {
        write_index(&self.index_path, self.notes.values())
    }

    fn by_recency(&self) -> Vec<&Note> {
        let mut notes = self.notes.values().collect::<Vec<_>>();
        notes.sort_by(|a, b| self.recency_order(a, b));
        notes
    }

    fn first_by_title(&self, title: &str) -> Option<&Note> {
        let mut matches = 0usize;
        let mut first: Option<&Note> = None;
        for note in self.notes.values().filter(|note| note.title == title) {
            matches += 1;
            first = match first {
                Some(current) if self.recency_order(current, note) != Ordering::Greater => {
                    Some(current)
                }
                _ => Some(note),
            };
        }
        if matches > 1 {
            warn!(
                "event=title_lookup module=store status=ambiguous matches={}",
                matches
            );
        }
        first
    }

    // Notes loaded from disk and not saved since sort as revision 0.
    fn revision(&self, id: &NoteId) -> u64 {
        self.revisions.get(id).copied().unwrap_or(0)
    }

    fn recency_order(&self, a: &Note, b: &Note) -> Ordering {
        b.modified_at
            .cmp(&a.modified_at)
            .then_with(|| self.revision(&b.id).cmp(&self.revision(&a.id)))
            .then_with(|| a.id.cmp(&b.id))
    }
}

fn index_by_id(records: Vec<Note>) -> BTreeMap<NoteId, Note> {
    let mut notes = BTreeMap::new();
    for note in records {
        if let Some(replaced) = notes.insert(note.id.clone(), note) {
            warn!(
                "event=store_open module=store status=duplicate_id note_id={} action=keep_last",
                replaced.id
            );
        }
    }
    notes
}
