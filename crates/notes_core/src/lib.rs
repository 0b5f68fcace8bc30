//! Core note storage for Notes Manager.
//! Front-ends drive notes exclusively through this crate.

pub mod config;
pub mod logging;
pub mod model;
pub mod session;
pub mod store;

pub use config::{default_log_dir, StoreConfig, DATA_DIR_ENV};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId};
pub use session::{Draft, NotesSession, NEW_NOTE_TITLE};
pub use store::{LoadStatus, NoteStore, NoteSummary, StoreError, StoreResult, INDEX_FILE_NAME};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
