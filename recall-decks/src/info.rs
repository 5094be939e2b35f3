//! Practice description notes.
//!
//! One note per practice in a dedicated deck, so the search behind each
//! filtered view is visible while studying. Upserts are keyed on the
//! slugged practice identity, not on note handles.

use indexmap::IndexMap;

use recall_core::tags::MANAGED_TAG;
use recall_core::types::{DeckName, ModelName};
use recall_gateway::{CardTemplate, Gateway, GatewayError, ModelSpec, NewNote};

use crate::error::DeckError;
use crate::practice::Practice;

/// Deck holding the description notes.
pub const PRACTICE_INFO_DECK: &str = "Recall::Practice::Info";

/// Note model for description notes.
pub const PRACTICE_MODEL: &str = "Recall::PracticeDescription";

/// Extra tag on every description note.
pub const PRACTICE_INFO_TAG: &str = "practice::info";

/// Aggregate outcome of a description-note build.
#[derive(Debug, Default)]
pub struct InfoReport {
    /// Practice names upserted, in input order.
    pub upserted: Vec<String>,
    /// Per-practice failures, with the reason.
    pub failures: Vec<(String, String)>,
}

impl InfoReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

fn practice_model_spec() -> ModelSpec {
    ModelSpec {
        name: ModelName::from(PRACTICE_MODEL),
        fields: ["NoteID", "Name", "Search", "Description"]
            .iter()
            .map(|f| (*f).to_owned())
            .collect(),
        css: ".card { font-family: arial; font-size: 18px; text-align: left; }".to_owned(),
        templates: vec![CardTemplate {
            name: "Info".to_owned(),
            front: "{{Name}}".to_owned(),
            back: "<b>Search</b><br><pre>{{Search}}</pre><hr>\
                   <b>Description</b><br>{{Description}}"
                .to_owned(),
        }],
    }
}

/// Create the description model if absent. Returns true when created.
pub fn ensure_practice_model(gateway: &dyn Gateway) -> Result<bool, DeckError> {
    let names = gateway.model_names()?;
    if names.iter().any(|n| n == PRACTICE_MODEL) {
        return Ok(false);
    }
    gateway.create_model(&practice_model_spec())?;
    Ok(true)
}

/// Upsert one description note per practice.
///
/// Model and deck bootstrap failures abort (nothing per-item happened
/// yet); failures inside the loop are aggregated per practice and the
/// remaining practices still build.
pub fn build_infos(gateway: &dyn Gateway, practices: &[Practice]) -> Result<InfoReport, DeckError> {
    ensure_practice_model(gateway)?;
    gateway.create_deck(&DeckName::from(PRACTICE_INFO_DECK))?;

    let mut report = InfoReport::default();
    for practice in practices {
        match upsert_info_note(gateway, practice) {
            Ok(()) => report.upserted.push(practice.name.clone()),
            Err(err) => {
                tracing::warn!("practice '{}' failed: {err}", practice.name);
                report.failures.push((practice.name.clone(), err.to_string()));
            }
        }
    }
    Ok(report)
}

fn upsert_info_note(gateway: &dyn Gateway, practice: &Practice) -> Result<(), GatewayError> {
    let identity = format!("practice:{}", practice.slug());
    let query = format!("deck:\"{PRACTICE_INFO_DECK}\" \"{identity}\"");
    let existing = gateway.find_notes(&query)?;

    let mut fields = IndexMap::new();
    fields.insert("NoteID".to_owned(), identity);
    fields.insert("Name".to_owned(), practice.name.clone());
    fields.insert("Search".to_owned(), practice.search.clone());
    fields.insert("Description".to_owned(), practice.description.clone());

    if let Some(handle) = existing.first() {
        return gateway.update_note_fields(*handle, &fields);
    }

    let note = NewNote {
        deck: DeckName::from(PRACTICE_INFO_DECK),
        model: ModelName::from(PRACTICE_MODEL),
        fields,
        tags: vec![MANAGED_TAG.to_owned(), PRACTICE_INFO_TAG.to_owned()],
    };
    let handles = gateway.add_notes(std::slice::from_ref(&note))?;
    match handles.first() {
        Some(Some(_)) => Ok(()),
        _ => Err(GatewayError::Protocol {
            action: "addNotes".to_owned(),
            message: "description note rejected".to_owned(),
        }),
    }
}
