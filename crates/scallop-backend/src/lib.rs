//! Reasoning backend client for the Scallop Playground.
//!
//! The playground performs no parsing or evaluation itself; running a
//! program means POSTing the source text plus fully type-coerced input
//! relations to an external reasoning backend and decoding the output
//! relations it returns. This crate owns that contract:
//!
//! - [`wire`]: the request/response JSON shapes, the all-or-nothing
//!   request builder, and validate-then-commit result ingestion.
//! - [`client`]: the [`ScallopBackend`] trait with an HTTP implementation
//!   and a canned mock for tests.
//! - [`session`]: [`EditorSession`], the single owner of the editing state
//!   (program source + relation index), exposing the mutation operations
//!   the model defines and orchestrating runs, saves, and loads.

pub mod client;
pub mod error;
pub mod session;
pub mod wire;

pub use client::{HttpBackend, MockBackend, ScallopBackend};
pub use error::BackendError;
pub use session::EditorSession;
pub use wire::{build_run_request, ingest_run_results, InputRelation, OutputRelation, RunRequest, RunResponse, WireArg};
