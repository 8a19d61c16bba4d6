//! Project persistence for the Scallop Playground.
//!
//! A [`Project`] record holds everything a saved editing session needs:
//! title, optional description, the program source text, the serialized
//! input/output relation collections, a published flag, an author reference,
//! and the creation timestamp. The relation collections travel as JSON
//! strings (the [`transform`] module owns that contract), so a relation's
//! argument schema is always reconstructed from the same record that holds
//! its facts, never re-inferred from data.
//!
//! [`store::ProjectStore`] is the asynchronous persistence interface;
//! [`store::JsonFileStore`] backs it with a single JSON file. [`export`]
//! writes/reads plain `.scl` source files (program text only).

pub mod error;
pub mod export;
pub mod project;
pub mod store;
pub mod transform;

pub use error::StoreError;
pub use project::{Project, ProjectPatch};
pub use store::{JsonFileStore, ProjectStore};
