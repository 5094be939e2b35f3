//! End-to-end reconciliation against an in-memory collection.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use tempfile::TempDir;

use recall_core::tags::MANAGED_TAG;
use recall_core::types::{DeckName, NoteHandle};
use recall_gateway::{Gateway, GatewayError, ModelSpec, NewNote, NoteInfo};
use recall_sync::{pipeline, DuplicateIdentity};

// ---------------------------------------------------------------------------
// In-memory collection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct Note {
    deck: String,
    model: String,
    fields: IndexMap<String, String>,
    tags: BTreeSet<String>,
}

/// Gateway fake backed by a real mutable note store, so applied operations
/// feed back into the next fetch exactly like the live collection.
#[derive(Default)]
struct MemoryCollection {
    notes: RefCell<BTreeMap<i64, Note>>,
    models: RefCell<Vec<String>>,
    next_handle: Cell<i64>,
}

impl MemoryCollection {
    fn seed_note(&self, deck: &str, fields: &[(&str, &str)], tags: &[&str]) -> NoteHandle {
        let handle = self.next_handle.get() + 1;
        self.next_handle.set(handle);
        self.notes.borrow_mut().insert(
            handle,
            Note {
                deck: deck.to_owned(),
                model: "Recall::Basic".to_owned(),
                fields: fields
                    .iter()
                    .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                    .collect(),
                tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            },
        );
        NoteHandle(handle)
    }

    fn snapshot(&self) -> BTreeMap<i64, Note> {
        self.notes.borrow().clone()
    }

    fn tags_of(&self, handle: NoteHandle) -> BTreeSet<String> {
        self.notes.borrow()[&handle.0].tags.clone()
    }
}

impl Gateway for MemoryCollection {
    fn model_names(&self) -> Result<Vec<String>, GatewayError> {
        Ok(self.models.borrow().clone())
    }

    fn create_model(&self, spec: &ModelSpec) -> Result<(), GatewayError> {
        self.models.borrow_mut().push(spec.name.0.clone());
        Ok(())
    }

    fn create_deck(&self, _deck: &DeckName) -> Result<(), GatewayError> {
        Ok(())
    }

    fn find_notes(&self, query: &str) -> Result<Vec<NoteHandle>, GatewayError> {
        let tag = query.strip_prefix("tag:").ok_or_else(|| GatewayError::Protocol {
            action: "findNotes".to_owned(),
            message: format!("unsupported query: {query}"),
        })?;
        Ok(self
            .notes
            .borrow()
            .iter()
            .filter(|(_, note)| note.tags.contains(tag))
            .map(|(handle, _)| NoteHandle(*handle))
            .collect())
    }

    fn notes_info(&self, handles: &[NoteHandle]) -> Result<Vec<NoteInfo>, GatewayError> {
        let notes = self.notes.borrow();
        Ok(handles
            .iter()
            .filter_map(|h| {
                notes.get(&h.0).map(|note| NoteInfo {
                    handle: *h,
                    fields: note.fields.clone(),
                    tags: note.tags.iter().cloned().collect(),
                })
            })
            .collect())
    }

    fn add_notes(&self, new_notes: &[NewNote]) -> Result<Vec<Option<NoteHandle>>, GatewayError> {
        let mut out = Vec::new();
        for note in new_notes {
            let handle = self.next_handle.get() + 1;
            self.next_handle.set(handle);
            self.notes.borrow_mut().insert(
                handle,
                Note {
                    deck: note.deck.0.clone(),
                    model: note.model.0.clone(),
                    fields: note.fields.clone(),
                    tags: note.tags.iter().cloned().collect(),
                },
            );
            out.push(Some(NoteHandle(handle)));
        }
        Ok(out)
    }

    fn update_note_fields(
        &self,
        handle: NoteHandle,
        fields: &IndexMap<String, String>,
    ) -> Result<(), GatewayError> {
        let mut notes = self.notes.borrow_mut();
        let note = notes.get_mut(&handle.0).ok_or_else(|| GatewayError::Protocol {
            action: "updateNoteFields".to_owned(),
            message: format!("note not found: {handle}"),
        })?;
        note.fields = fields.clone();
        Ok(())
    }

    fn add_tags(&self, handles: &[NoteHandle], tags: &str) -> Result<(), GatewayError> {
        let mut notes = self.notes.borrow_mut();
        for handle in handles {
            if let Some(note) = notes.get_mut(&handle.0) {
                note.tags.extend(tags.split_whitespace().map(str::to_owned));
            }
        }
        Ok(())
    }

    fn remove_tags(&self, handles: &[NoteHandle], tags: &str) -> Result<(), GatewayError> {
        let mut notes = self.notes.borrow_mut();
        for handle in handles {
            if let Some(note) = notes.get_mut(&handle.0) {
                for tag in tags.split_whitespace() {
                    note.tags.remove(tag);
                }
            }
        }
        Ok(())
    }

    fn delete_notes(&self, handles: &[NoteHandle]) -> Result<(), GatewayError> {
        let mut notes = self.notes.borrow_mut();
        for handle in handles {
            notes.remove(&handle.0);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn write_cards(root: &Path, rel: &str, content: &str) {
    let path = root.join("cards").join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn run(root: &Path, collection: &MemoryCollection) -> recall_sync::SyncReport {
    pipeline::run(root, collection, false, |_| {}).expect("sync run")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn first_run_creates_model_and_notes() {
    let root = TempDir::new().unwrap();
    write_cards(
        root.path(),
        "unit1.csv",
        "NoteID,Deck,NoteType,Tags,Front,Back\n\
         card-1,,,source::unit1,ciao,hello\n\
         card-2,,,source::unit1,grazie,thanks\n",
    );

    let collection = MemoryCollection::default();
    let report = run(root.path(), &collection);

    assert!(report.model_created);
    assert_eq!((report.added, report.updated, report.deleted), (2, 0, 0));
    assert!(report.is_clean());

    let notes = collection.snapshot();
    assert_eq!(notes.len(), 2);
    for note in notes.values() {
        assert!(note.tags.contains(MANAGED_TAG), "every created note is marked");
    }
}

#[test]
fn second_run_converges_with_no_visible_change() {
    let root = TempDir::new().unwrap();
    write_cards(
        root.path(),
        "unit1.csv",
        "NoteID,Tags,Front\ncard-1,source::unit1,ciao\n",
    );

    let collection = MemoryCollection::default();
    run(root.path(), &collection);
    let before = collection.snapshot();

    let report = run(root.path(), &collection);
    assert_eq!(report.added, 0);
    assert_eq!(report.deleted, 0);
    assert_eq!(report.updated, 1, "updates are unconditional by design");
    assert!(!report.model_created);
    assert_eq!(collection.snapshot(), before, "converged state must not drift");
}

#[test]
fn removed_local_record_is_deleted_remotely() {
    let root = TempDir::new().unwrap();
    write_cards(
        root.path(),
        "unit1.csv",
        "NoteID,Front\ncard-1,ciao\ncard-2,grazie\n",
    );

    let collection = MemoryCollection::default();
    run(root.path(), &collection);
    assert_eq!(collection.snapshot().len(), 2);

    write_cards(root.path(), "unit1.csv", "NoteID,Front\ncard-1,ciao\n");
    let report = run(root.path(), &collection);

    assert_eq!(report.deleted, 1);
    let notes = collection.snapshot();
    assert_eq!(notes.len(), 1);
    let survivor = notes.values().next().unwrap();
    assert_eq!(survivor.fields.get("NoteID").map(String::as_str), Some("card-1"));
}

#[test]
fn manual_tags_survive_managed_tag_swap() {
    let root = TempDir::new().unwrap();
    write_cards(
        root.path(),
        "unit1.csv",
        "NoteID,Tags,Front\ncard-1,source::foo,ciao\n",
    );

    let collection = MemoryCollection::default();
    run(root.path(), &collection);

    // A human stars the note directly in the collection.
    let handle = *collection.snapshot().keys().next().unwrap();
    collection
        .add_tags(&[NoteHandle(handle)], "my::starred")
        .unwrap();

    // The corpus moves the note to a different source facet.
    write_cards(
        root.path(),
        "unit1.csv",
        "NoteID,Tags,Front\ncard-1,source::bar,ciao\n",
    );
    run(root.path(), &collection);

    let tags = collection.tags_of(NoteHandle(handle));
    assert!(tags.contains("my::starred"), "manual tag must survive");
    assert!(tags.contains(MANAGED_TAG));
    assert!(tags.contains("source::bar"));
    assert!(!tags.contains("source::foo"));
}

#[test]
fn unmarked_remote_note_is_invisible() {
    let root = TempDir::new().unwrap();
    write_cards(root.path(), "unit1.csv", "NoteID,Front\ncard-1,ciao\n");

    let collection = MemoryCollection::default();
    // Same identity, but the note does not carry the managed marker.
    let foreign = collection.seed_note(
        "Personal",
        &[("NoteID", "card-1"), ("Front", "mine")],
        &["hand::made"],
    );

    let report = run(root.path(), &collection);

    // The engine cannot see the foreign note: it creates its own.
    assert_eq!(report.added, 1);
    let notes = collection.snapshot();
    assert_eq!(notes.len(), 2);
    assert_eq!(
        notes[&foreign.0].fields.get("Front").map(String::as_str),
        Some("mine"),
        "unmarked note must never be updated"
    );

    // Emptying the corpus must not delete it either.
    write_cards(root.path(), "unit1.csv", "NoteID,Front\n");
    let report = run(root.path(), &collection);
    assert_eq!(report.deleted, 1, "only the managed note goes away");
    assert!(collection.snapshot().contains_key(&foreign.0));
}

#[test]
fn blank_identity_records_are_inert_on_both_sides() {
    let root = TempDir::new().unwrap();
    write_cards(
        root.path(),
        "unit1.csv",
        "NoteID,Front\ncard-1,ciao\n,orphan row\n",
    );

    let collection = MemoryCollection::default();
    // A managed remote note whose identity field is blank cannot be
    // correlated, and therefore cannot be deleted.
    let blank = collection.seed_note("Recall", &[("NoteID", ""), ("Front", "x")], &[MANAGED_TAG]);

    let report = run(root.path(), &collection);
    assert_eq!(report.added, 1);
    assert_eq!(report.skipped_blank, 1);
    assert_eq!(report.deleted, 0);
    assert!(collection.snapshot().contains_key(&blank.0));
}

#[test]
fn duplicate_identity_later_record_wins() {
    let root = TempDir::new().unwrap();
    write_cards(
        root.path(),
        "unit1.csv",
        "NoteID,Front\ncard-1,first\ncard-1,second\n",
    );

    let collection = MemoryCollection::default();
    let mut collisions: Vec<DuplicateIdentity> = Vec::new();
    let report = pipeline::run(root.path(), &collection, false, |c| collisions.push(c)).unwrap();

    assert_eq!(report.added, 1);
    assert_eq!(collisions.len(), 1);
    assert_eq!(collisions[0].identity.0, "card-1");

    let notes = collection.snapshot();
    let note = notes.values().next().unwrap();
    assert_eq!(note.fields.get("Front").map(String::as_str), Some("second"));
}

#[test]
fn dry_run_reads_but_never_writes() {
    let root = TempDir::new().unwrap();
    write_cards(root.path(), "unit1.csv", "NoteID,Front\ncard-1,ciao\n");

    let collection = MemoryCollection::default();
    let stale = collection.seed_note("Recall", &[("NoteID", "gone")], &[MANAGED_TAG]);

    let report = pipeline::run(root.path(), &collection, true, |_| {}).unwrap();
    assert_eq!((report.added, report.updated, report.deleted), (1, 0, 1));
    assert!(!report.model_created);

    let notes = collection.snapshot();
    assert_eq!(notes.len(), 1, "dry-run must not create notes");
    assert!(notes.contains_key(&stale.0), "dry-run must not delete notes");
    assert!(collection.models.borrow().is_empty(), "dry-run must not create the model");
}

#[test]
fn missing_corpus_aborts_before_any_gateway_call() {
    let root = TempDir::new().unwrap();
    let collection = MemoryCollection::default();

    let err = pipeline::run(root.path(), &collection, false, |_| {}).unwrap_err();
    assert!(matches!(err, recall_sync::SyncError::Corpus(_)));
    assert!(collection.snapshot().is_empty());
    assert!(collection.models.borrow().is_empty());
}

#[test]
fn corpus_rename_moves_note_content_not_handle() {
    // An update keeps the handle; identity is the correlation key even
    // though every field changes.
    let root = TempDir::new().unwrap();
    write_cards(root.path(), "unit1.csv", "NoteID,Front,Back\ncard-1,ciao,hello\n");

    let collection = MemoryCollection::default();
    run(root.path(), &collection);
    let handle_before = *collection.snapshot().keys().next().unwrap();

    write_cards(root.path(), "unit1.csv", "NoteID,Front,Back\ncard-1,salve,hi there\n");
    run(root.path(), &collection);

    let notes = collection.snapshot();
    assert_eq!(notes.len(), 1);
    let (handle_after, note) = notes.iter().next().unwrap();
    assert_eq!(*handle_after, handle_before, "update must reuse the handle");
    assert_eq!(note.fields.get("Front").map(String::as_str), Some("salve"));
}
