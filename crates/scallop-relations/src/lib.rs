//! Scallop Playground relation model
//!
//! The canonical representation of a program's input/output relations and the
//! rules that keep them well-formed:
//!
//! - [`types`]: the closed registry of argument data types and their per-type
//!   cell validation and coercion rules.
//! - [`relation`]: [`Relation`], [`Argument`], and [`Fact`], plus the mutation
//!   operations that preserve the arity invariant (every fact holds exactly
//!   one cell per argument, positionally aligned).
//! - [`index`]: [`RelationIndex`], the single name → relation map. Direction
//!   (input vs. output) is carried on the relation itself, never inferred by
//!   probing two collections.
//! - [`validate`]: the identifier rule shared by relation and argument names.
//! - [`codec`]: conversion between the editable row form (weight + raw string
//!   cells) and the typed wire tuples the reasoning backend consumes.
//!
//! Every mutating operation validates first and only commits on success, so
//! no error leaves a relation partially updated.

pub mod codec;
pub mod error;
pub mod index;
pub mod relation;
pub mod types;
pub mod validate;

pub use codec::{TypedValue, WireFact};
pub use error::RelationError;
pub use index::RelationIndex;
pub use relation::{Argument, Direction, Fact, Relation};
pub use types::ArgumentType;
