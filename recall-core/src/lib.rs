//! Recall core library — domain types, tag vocabulary, corpus access.
//!
//! Public API surface:
//! - [`types`] — newtypes and record structs
//! - [`tags`] — managed/manual tag vocabulary and boundary forms
//! - [`corpus`] — CSV corpus loading
//! - [`fill`] — corpus column normalization pass
//! - [`error`] — [`CorpusError`]

pub mod corpus;
pub mod error;
pub mod fill;
pub mod tags;
pub mod types;

pub use error::CorpusError;
pub use types::{CardRecord, DeckName, Identity, ModelName, NoteHandle, RemoteCard};
