//! # recall-decks
//!
//! Practice definitions: JSON files under `<root>/practices/` describing
//! filtered study views. The gateway has no call for creating filtered
//! decks, so this crate does two things instead:
//! - export `build/filtered_decks.json` for the host add-on that builds
//!   the actual filtered decks;
//! - upsert one description note per practice into the collection, so the
//!   practice is discoverable while studying.
//!
//! Per-item failures (an unparsable practice file, a rejected upsert) are
//! aggregated and reported collectively; one bad practice never aborts the
//! batch.

pub mod error;
pub mod export;
pub mod info;
pub mod practice;

pub use error::DeckError;
pub use export::export_specs_at;
pub use info::{build_infos, InfoReport};
pub use practice::{load_practices_at, Practice, PracticeLoad};
