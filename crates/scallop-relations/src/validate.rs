//! Name and cell validation.
//!
//! Relation and argument names share one identifier rule: an ASCII letter
//! followed by letters, digits, or underscores (`^[A-Za-z][A-Za-z0-9_]*$`).
//! Underscore-led names are rejected.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::RelationError;
use crate::types::ArgumentType;

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("identifier regex"))
}

/// Whether `name` satisfies the identifier rule.
pub fn is_valid_name(name: &str) -> bool {
    identifier_re().is_match(name)
}

/// Validate a relation or argument name, rejecting the empty string.
pub fn validate_name(name: &str) -> Result<(), RelationError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(RelationError::InvalidName {
            name: name.to_string(),
        })
    }
}

/// Validate a raw cell value against an argument type.
///
/// The row/column coordinates only feed the error; callers gate edits on the
/// result and leave the committed cell untouched on failure.
pub fn validate_cell(
    raw: &str,
    ty: ArgumentType,
    row: usize,
    column: usize,
) -> Result<(), RelationError> {
    if ty.is_valid_cell(raw) {
        Ok(())
    } else {
        Err(RelationError::InvalidValue {
            row,
            column,
            raw: raw.to_string(),
            expected: ty,
        })
    }
}
