//! Domain model for stored notes.
//!
//! # Responsibility
//! - Define the canonical note record mirrored to the on-disk index.
//! - Own identifier generation and the wire field naming.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard removal; there are no tombstones.

pub mod note;
