//! Editor session context for UI front-ends.
//!
//! # Responsibility
//! - Own the note store together with the "currently open" note selection.
//! - Map editor actions (new / select / save / delete) onto store operations.
//!
//! # Invariants
//! - The session is the only owner of its store; front-ends hold the session
//!   instead of process-wide state.
//! - Saving always leaves the saved note selected.
//! - A successful delete of the current note clears the selection.

use crate::config::StoreConfig;
use crate::model::note::{Note, NoteId};
use crate::store::{NoteStore, NoteSummary, StoreResult};
use log::debug;

/// Title shown for a freshly started, unsaved note.
pub const NEW_NOTE_TITLE: &str = "New Note";

/// Editor contents for a note that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub content: String,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            title: NEW_NOTE_TITLE.to_string(),
            content: String::new(),
        }
    }
}

/// Store plus current selection, driven by one UI.
pub struct NotesSession {
    store: NoteStore,
    current: Option<NoteId>,
}

impl NotesSession {
    pub fn new(store: NoteStore) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// Opens the store described by `config` and starts with no selection.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        NoteStore::open(config.data_dir()).map(Self::new)
    }

    /// Clears the selection and returns the blank draft to edit.
    pub fn new_note(&mut self) -> Draft {
        self.current = None;
        Draft::default()
    }

    /// Makes the note with `id` current and returns it.
    ///
    /// An unknown `id` leaves the selection unchanged.
    pub fn select(&mut self, id: &NoteId) -> Option<&Note> {
        if self.store.exists_by_id(id) {
            self.current = Some(id.clone());
        } else {
            debug!("event=note_select module=session status=not_found note_id={id}");
        }
        self.store.load_by_id(id)
    }

    /// Saves editor contents into the current note, or a new one when nothing
    /// is selected, and selects the result.
    pub fn save_current(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> StoreResult<NoteId> {
        let id = self.store.save(self.current.as_ref(), title, content)?;
        self.current = Some(id.clone());
        Ok(id)
    }

    /// Deletes the current note.
    ///
    /// Returns `Ok(false)` when nothing is selected or the note is gone.
    pub fn delete_current(&mut self) -> StoreResult<bool> {
        let Some(id) = self.current.clone() else {
            return Ok(false);
        };
        let deleted = self.store.delete_by_id(&id)?;
        if deleted {
            self.current = None;
        }
        Ok(deleted)
    }

    pub fn current(&self) -> Option<&NoteId> {
        self.current.as_ref()
    }

    /// Current listing; callers re-poll this after every mutation.
    pub fn entries(&self) -> Vec<NoteSummary> {
        self.store.list_all()
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut NoteStore {
        &mut self.store
    }
}
