//! Note domain model.
//!
//! # Responsibility
//! - Define the record persisted in `notes_index.json`.
//! - Provide creation and revision helpers that keep timestamps consistent.
//!
//! # Invariants
//! - `id` is generated once and never reused for another note.
//! - `created_at` never changes after creation.
//! - `modified_at >= created_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque, stable note identifier.
///
/// Stored as text so identifiers written by earlier versions round-trip
/// exactly, whatever their casing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generates a fresh random identifier (UUID v4, upper-case hyphenated).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One titled text document.
///
/// Serialized with camelCase field names to match the index file contract:
/// `id`, `title`, `content`, `createdAt`, `modifiedAt`. Timestamps are
/// whole-second UTC date-times (`2024-05-01T09:15:00Z`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    /// Display title. Not unique.
    pub title: String,
    /// Plain text body.
    pub content: String,
    #[serde(with = "whole_seconds")]
    pub created_at: DateTime<Utc>,
    /// Refreshed on every save, even when nothing changed.
    #[serde(with = "whole_seconds")]
    pub modified_at: DateTime<Utc>,
}

impl Note {
    /// Creates a new note with a generated id, stamped `now` for both timestamps.
    pub fn new(title: impl Into<String>, content: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: NoteId::generate(),
            title: title.into(),
            content: content.into(),
            created_at: now,
            modified_at: now,
        }
    }

    /// Returns a copy with replaced title/content and a refreshed `modified_at`.
    ///
    /// # Invariants
    /// - `id` and `created_at` are carried over unchanged.
    /// - `modified_at` is clamped so it never precedes `created_at`.
    pub fn revised(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: self.id.clone(),
            title: title.into(),
            content: content.into(),
            created_at: self.created_at,
            modified_at: now.max(self.created_at),
        }
    }
}

/// RFC 3339 timestamps without fractional seconds.
///
/// Older index readers reject fractional seconds, so writes drop them. Reads
/// accept any RFC 3339 form and truncate to the second, keeping a loaded
/// index identical to what the next write produces.
pub mod whole_seconds {
    use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc).trunc_subsecs(0))
            .map_err(serde::de::Error::custom)
    }
}
