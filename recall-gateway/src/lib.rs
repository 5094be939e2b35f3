//! # recall-gateway
//!
//! The call contract to the remote study-card collection. Everything the
//! engine knows about the remote side goes through the [`Gateway`] trait;
//! [`HttpGateway`] is the production implementation speaking the
//! AnkiConnect JSON envelope over HTTP.
//!
//! Each call is an independent, blocking round trip. A call either
//! succeeds, fails with an explicit error payload from the gateway
//! ([`GatewayError::Protocol`]), or fails at the transport level. Tag sets
//! cross this boundary as space-joined strings; everywhere else in the
//! workspace they are real sets.

pub mod error;
pub mod http;

pub use error::GatewayError;
pub use http::{HttpGateway, DEFAULT_ENDPOINT};

use indexmap::IndexMap;

use recall_core::types::{DeckName, ModelName, NoteHandle};

/// A note to create, with its full tag list. Manual tags are included
/// as-is: there is no prior remote state to preserve on create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub deck: DeckName,
    pub model: ModelName,
    pub fields: IndexMap<String, String>,
    pub tags: Vec<String>,
}

/// Full detail of an observed remote note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteInfo {
    pub handle: NoteHandle,
    pub fields: IndexMap<String, String>,
    pub tags: Vec<String>,
}

/// One card template of a note model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTemplate {
    pub name: String,
    pub front: String,
    pub back: String,
}

/// A note model to create on first contact. Never used to migrate an
/// existing model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub name: ModelName,
    pub fields: Vec<String>,
    pub css: String,
    pub templates: Vec<CardTemplate>,
}

/// The remote collection's call contract.
///
/// Implemented by [`HttpGateway`] in production and by in-memory fakes in
/// tests of the sync layer.
pub trait Gateway {
    /// Names of all note models present in the collection.
    fn model_names(&self) -> Result<Vec<String>, GatewayError>;

    /// Create a note model. Callers check existence first; this is not a
    /// no-op on conflict.
    fn create_model(&self, spec: &ModelSpec) -> Result<(), GatewayError>;

    /// Create a deck. Idempotent on the remote side.
    fn create_deck(&self, deck: &DeckName) -> Result<(), GatewayError>;

    /// Handles of all notes matching a collection query.
    fn find_notes(&self, query: &str) -> Result<Vec<NoteHandle>, GatewayError>;

    /// Full detail for the given handles.
    fn notes_info(&self, handles: &[NoteHandle]) -> Result<Vec<NoteInfo>, GatewayError>;

    /// Batch-create notes. The result aligns with the input; `None` marks a
    /// note the remote side rejected.
    fn add_notes(&self, notes: &[NewNote]) -> Result<Vec<Option<NoteHandle>>, GatewayError>;

    /// Overwrite all fields of one note.
    fn update_note_fields(
        &self,
        handle: NoteHandle,
        fields: &IndexMap<String, String>,
    ) -> Result<(), GatewayError>;

    /// Add space-joined tags to the given notes.
    fn add_tags(&self, handles: &[NoteHandle], tags: &str) -> Result<(), GatewayError>;

    /// Remove space-joined tags from the given notes.
    fn remove_tags(&self, handles: &[NoteHandle], tags: &str) -> Result<(), GatewayError>;

    /// Batch-delete notes.
    fn delete_notes(&self, handles: &[NoteHandle]) -> Result<(), GatewayError>;
}
