//! Domain types for the Recall corpus and its remote counterpart.
//!
//! Field maps use `IndexMap` so column order from the corpus header survives
//! all the way to the gateway payload. Tag sets are `BTreeSet` everywhere;
//! the space-joined string form exists only at the boundaries (see
//! [`crate::tags`]).

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// The author-chosen correlation key of a card. Empty means the record is
/// unidentifiable and invisible to reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity(pub String);

impl Identity {
    /// True when the identity is blank after trimming.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed deck name in the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeckName(pub String);

impl fmt::Display for DeckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for DeckName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DeckName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed note-model (note type) name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelName(pub String);

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ModelName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ModelName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Opaque numeric id assigned by the remote store. Not stable across note
/// recreation; rediscovered by query every run and never persisted locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteHandle(pub i64);

impl fmt::Display for NoteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Default deck for records whose `Deck` column is empty or absent.
pub const DEFAULT_DECK: &str = "Recall";

/// Default note model for records whose `NoteType` column is empty or absent.
pub const DEFAULT_MODEL: &str = "Recall::Basic";

/// A single desired card, read from one corpus CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    pub identity: Identity,
    pub deck: DeckName,
    pub model: ModelName,
    /// All content columns in header order, with the identity embedded as the
    /// `NoteID` field so it round-trips through the remote store.
    pub fields: IndexMap<String, String>,
    pub tags: BTreeSet<String>,
}

/// A card as observed in the remote collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCard {
    pub handle: NoteHandle,
    /// Read back out of the embedded `NoteID` field; used purely for
    /// correlation.
    pub identity: Identity,
    pub tags: BTreeSet<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
