//! AnkiConnect-style HTTP gateway.
//!
//! Wire format: POST `{"action", "version": 6, "params"}` to the endpoint,
//! receive `{"result", "error"}`. A non-null `error` is a protocol
//! failure for that call; everything else that goes wrong is transport.

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use recall_core::types::{DeckName, NoteHandle};

use crate::error::GatewayError;
use crate::{Gateway, ModelSpec, NewNote, NoteInfo};

/// Default gateway endpoint on the local host.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8765";

/// Envelope protocol version.
const PROTOCOL_VERSION: u8 = 6;

/// Bound on each blocking round trip. Expiry surfaces as
/// [`GatewayError::Transport`].
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP implementation of [`Gateway`].
pub struct HttpGateway {
    agent: ureq::Agent,
    endpoint: String,
}

#[derive(Serialize)]
struct GatewayRequest<'a> {
    action: &'a str,
    version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

#[derive(Deserialize)]
struct GatewayEnvelope {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

impl HttpGateway {
    /// Gateway at `endpoint` with the default 30 s per-call timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            endpoint: endpoint.into(),
        }
    }

    fn invoke<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        params: Option<Value>,
    ) -> Result<T, GatewayError> {
        tracing::debug!("gateway call: {action}");
        let request = GatewayRequest {
            action,
            version: PROTOCOL_VERSION,
            params,
        };
        let response = self.agent.post(&self.endpoint).send_json(&request)?;
        let envelope: GatewayEnvelope =
            response.into_json().map_err(|e| GatewayError::Malformed {
                action: action.to_owned(),
                source: e,
            })?;
        if let Some(message) = envelope.error {
            return Err(GatewayError::Protocol {
                action: action.to_owned(),
                message,
            });
        }
        serde_json::from_value(envelope.result).map_err(|e| GatewayError::Decode {
            action: action.to_owned(),
            source: e,
        })
    }

    /// Invoke an action whose result payload is irrelevant (null on the
    /// wire for all mutating actions).
    fn invoke_unit(&self, action: &str, params: Option<Value>) -> Result<(), GatewayError> {
        self.invoke::<Value>(action, params).map(|_| ())
    }
}

impl Gateway for HttpGateway {
    fn model_names(&self) -> Result<Vec<String>, GatewayError> {
        self.invoke("modelNames", None)
    }

    fn create_model(&self, spec: &ModelSpec) -> Result<(), GatewayError> {
        self.invoke_unit("createModel", Some(model_params(spec)))
    }

    fn create_deck(&self, deck: &DeckName) -> Result<(), GatewayError> {
        self.invoke_unit("createDeck", Some(json!({ "deck": deck.0 })))
    }

    fn find_notes(&self, query: &str) -> Result<Vec<NoteHandle>, GatewayError> {
        let ids: Vec<i64> = self.invoke("findNotes", Some(json!({ "query": query })))?;
        Ok(ids.into_iter().map(NoteHandle).collect())
    }

    fn notes_info(&self, handles: &[NoteHandle]) -> Result<Vec<NoteInfo>, GatewayError> {
        let raw: Vec<RawNoteInfo> =
            self.invoke("notesInfo", Some(json!({ "notes": handle_ids(handles) })))?;
        Ok(raw.into_iter().map(NoteInfo::from).collect())
    }

    fn add_notes(&self, notes: &[NewNote]) -> Result<Vec<Option<NoteHandle>>, GatewayError> {
        let payload: Vec<Value> = notes.iter().map(note_params).collect();
        let ids: Vec<Option<i64>> =
            self.invoke("addNotes", Some(json!({ "notes": payload })))?;
        Ok(ids.into_iter().map(|id| id.map(NoteHandle)).collect())
    }

    fn update_note_fields(
        &self,
        handle: NoteHandle,
        fields: &IndexMap<String, String>,
    ) -> Result<(), GatewayError> {
        self.invoke_unit(
            "updateNoteFields",
            Some(json!({ "note": { "id": handle.0, "fields": fields } })),
        )
    }

    fn add_tags(&self, handles: &[NoteHandle], tags: &str) -> Result<(), GatewayError> {
        self.invoke_unit(
            "addTags",
            Some(json!({ "notes": handle_ids(handles), "tags": tags })),
        )
    }

    fn remove_tags(&self, handles: &[NoteHandle], tags: &str) -> Result<(), GatewayError> {
        self.invoke_unit(
            "removeTags",
            Some(json!({ "notes": handle_ids(handles), "tags": tags })),
        )
    }

    fn delete_notes(&self, handles: &[NoteHandle]) -> Result<(), GatewayError> {
        self.invoke_unit("deleteNotes", Some(json!({ "notes": handle_ids(handles) })))
    }
}

fn handle_ids(handles: &[NoteHandle]) -> Vec<i64> {
    handles.iter().map(|h| h.0).collect()
}

fn note_params(note: &NewNote) -> Value {
    json!({
        "deckName": note.deck.0,
        "modelName": note.model.0,
        "fields": note.fields,
        "tags": note.tags,
    })
}

fn model_params(spec: &ModelSpec) -> Value {
    let templates: Vec<Value> = spec
        .templates
        .iter()
        .map(|t| {
            json!({
                "Name": t.name,
                "Front": t.front,
                "Back": t.back,
            })
        })
        .collect();
    json!({
        "modelName": spec.name.0,
        "inOrderFields": spec.fields,
        "css": spec.css,
        "isCloze": false,
        "cardTemplates": templates,
    })
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RawFieldValue {
    value: String,
}

#[derive(Deserialize)]
struct RawNoteInfo {
    #[serde(rename = "noteId")]
    note_id: i64,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    fields: IndexMap<String, RawFieldValue>,
}

impl From<RawNoteInfo> for NoteInfo {
    fn from(raw: RawNoteInfo) -> Self {
        NoteInfo {
            handle: NoteHandle(raw.note_id),
            fields: raw
                .fields
                .into_iter()
                .map(|(name, f)| (name, f.value))
                .collect(),
            tags: raw.tags,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
