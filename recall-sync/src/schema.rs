//! First-contact note-model bootstrap.
//!
//! Creates the default model when the collection has never seen it.
//! Existing models are left exactly as they are; there is no migration.

use recall_core::types::{ModelName, DEFAULT_MODEL};
use recall_gateway::{CardTemplate, Gateway, ModelSpec};

use crate::error::SyncError;

/// Canonical field list of the default model. The identity field comes
/// first so it is the note's sort field in the collection.
pub const MODEL_FIELDS: [&str; 8] = [
    "NoteID",
    "Front",
    "Back",
    "Extra",
    "SourceFile",
    "Level",
    "Difficulty",
    "UpdatedAt",
];

/// The default model definition sent on first creation.
pub fn basic_model_spec() -> ModelSpec {
    ModelSpec {
        name: ModelName::from(DEFAULT_MODEL),
        fields: MODEL_FIELDS.iter().map(|f| (*f).to_owned()).collect(),
        css: ".card { font-family: arial; font-size: 20px; text-align: left; }".to_owned(),
        templates: vec![CardTemplate {
            name: "Card 1".to_owned(),
            front: "{{Front}}".to_owned(),
            back: "{{FrontSide}}<hr id=answer>{{Back}}<br><br>{{Extra}}".to_owned(),
        }],
    }
}

/// Create the default model if absent. Returns true when it was created.
pub fn ensure_model(gateway: &dyn Gateway) -> Result<bool, SyncError> {
    let names = gateway.model_names()?;
    if names.iter().any(|n| n == DEFAULT_MODEL) {
        return Ok(false);
    }
    tracing::info!("creating note model '{DEFAULT_MODEL}'");
    gateway.create_model(&basic_model_spec())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use indexmap::IndexMap;
    use recall_core::types::{DeckName, NoteHandle};
    use recall_gateway::{GatewayError, NewNote, NoteInfo};

    /// Gateway stub that only understands model calls.
    #[derive(Default)]
    struct ModelGateway {
        models: RefCell<Vec<String>>,
        created: RefCell<Vec<ModelSpec>>,
    }

    impl Gateway for ModelGateway {
        fn model_names(&self) -> Result<Vec<String>, GatewayError> {
            Ok(self.models.borrow().clone())
        }

        fn create_model(&self, spec: &ModelSpec) -> Result<(), GatewayError> {
            self.models.borrow_mut().push(spec.name.0.clone());
            self.created.borrow_mut().push(spec.clone());
            Ok(())
        }

        fn create_deck(&self, _deck: &DeckName) -> Result<(), GatewayError> {
            unimplemented!()
        }

        fn find_notes(&self, _query: &str) -> Result<Vec<NoteHandle>, GatewayError> {
            unimplemented!()
        }

        fn notes_info(&self, _handles: &[NoteHandle]) -> Result<Vec<NoteInfo>, GatewayError> {
            unimplemented!()
        }

        fn add_notes(
            &self,
            _notes: &[NewNote],
        ) -> Result<Vec<Option<NoteHandle>>, GatewayError> {
            unimplemented!()
        }

        fn update_note_fields(
            &self,
            _handle: NoteHandle,
            _fields: &IndexMap<String, String>,
        ) -> Result<(), GatewayError> {
            unimplemented!()
        }

        fn add_tags(&self, _handles: &[NoteHandle], _tags: &str) -> Result<(), GatewayError> {
            unimplemented!()
        }

        fn remove_tags(&self, _handles: &[NoteHandle], _tags: &str) -> Result<(), GatewayError> {
            unimplemented!()
        }

        fn delete_notes(&self, _handles: &[NoteHandle]) -> Result<(), GatewayError> {
            unimplemented!()
        }
    }

    #[test]
    fn creates_model_when_absent() {
        let gateway = ModelGateway::default();
        let created = ensure_model(&gateway).unwrap();
        assert!(created);
        assert_eq!(gateway.created.borrow().len(), 1);
        assert_eq!(gateway.created.borrow()[0].fields[0], "NoteID");
    }

    #[test]
    fn no_op_when_model_exists() {
        let gateway = ModelGateway::default();
        gateway.models.borrow_mut().push(DEFAULT_MODEL.to_owned());

        let created = ensure_model(&gateway).unwrap();
        assert!(!created);
        assert!(gateway.created.borrow().is_empty());
    }

    #[test]
    fn second_call_is_idempotent() {
        let gateway = ModelGateway::default();
        assert!(ensure_model(&gateway).unwrap());
        assert!(!ensure_model(&gateway).unwrap());
        assert_eq!(gateway.created.borrow().len(), 1);
    }
}
