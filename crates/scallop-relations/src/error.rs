use thiserror::Error;

use crate::types::ArgumentType;

/// Errors produced by the relation model, validator, and codec.
///
/// Cell-scoped failures (`InvalidValue`) never abort sibling cells; the
/// encode/decode paths are all-or-nothing per relation and report
/// `SchemaValidation` tagged with the relation name.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RelationError {
    #[error("invalid name {name:?}: expected a letter followed by letters, digits, or underscores")]
    InvalidName { name: String },

    #[error("a relation named {name:?} already exists")]
    DuplicateName { name: String },

    #[error("no relation named {name:?}")]
    UnknownRelation { name: String },

    #[error("invalid {expected} value {raw:?} at row {row}, column {column}")]
    InvalidValue {
        row: usize,
        column: usize,
        raw: String,
        expected: ArgumentType,
    },

    #[error("index {index} out of range ({len} entries)")]
    InvalidIndex { index: usize, len: usize },

    #[error("a relation must declare at least one argument")]
    EmptyArgs,

    #[error("relation {name:?} is an output relation; its facts come from runs, not edits")]
    ReadOnly { name: String },

    #[error("relation {name:?} has no probability column; fact weights are fixed at 1")]
    ProbabilityDisabled { name: String },

    #[error("relation {relation:?} failed schema validation: {detail}")]
    SchemaValidation { relation: String, detail: String },
}
