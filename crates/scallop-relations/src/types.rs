//! The closed registry of argument data types.
//!
//! Each type carries a validation predicate over a raw string cell and a
//! default cell value for freshly inserted rows/columns. The coercion to
//! typed wire values lives in [`crate::codec`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// The Scallop argument types the playground supports.
///
/// Serialized with these exact names (`"String"`, `"Integer"`, ...) in both
/// the wire protocol and stored projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArgumentType {
    String,
    Integer,
    Float,
    Boolean,
}

impl ArgumentType {
    /// All supported types, in UI presentation order.
    pub const ALL: [ArgumentType; 4] = [
        ArgumentType::String,
        ArgumentType::Integer,
        ArgumentType::Float,
        ArgumentType::Boolean,
    ];

    /// Whether `raw` is an acceptable cell value for this type.
    ///
    /// - `String`: symbolic atoms only — no leading digit, ASCII
    ///   alphanumerics throughout. The empty string is acceptable (cells
    ///   start empty).
    /// - `Integer`: parses as a finite number whose value is a mathematical
    ///   integer representable in `i64`.
    /// - `Float`: parses as a finite number.
    /// - `Boolean`: exactly `"true"` or `"false"`, lowercase.
    pub fn is_valid_cell(self, raw: &str) -> bool {
        match self {
            ArgumentType::String => {
                !raw.starts_with(|c: char| c.is_ascii_digit())
                    && raw.chars().all(|c| c.is_ascii_alphanumeric())
            }
            ArgumentType::Integer => parse_integer(raw).is_some(),
            ArgumentType::Float => matches!(raw.parse::<f64>(), Ok(f) if f.is_finite()),
            ArgumentType::Boolean => raw == "true" || raw == "false",
        }
    }

    /// The raw cell value a new row (or newly added column) starts with.
    pub fn default_cell(self) -> String {
        match self {
            ArgumentType::Boolean => "false".to_string(),
            _ => String::new(),
        }
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgumentType::String => "String",
            ArgumentType::Integer => "Integer",
            ArgumentType::Float => "Float",
            ArgumentType::Boolean => "Boolean",
        };
        f.write_str(name)
    }
}

/// Parse a raw cell as a mathematical integer.
///
/// Accepts plain integer literals and numeric forms that happen to be
/// integral (`"1e3"`), mirroring the editor's number handling. Fractional or
/// out-of-range values are rejected.
pub(crate) fn parse_integer(raw: &str) -> Option<i64> {
    if let Ok(i) = raw.parse::<i64>() {
        return Some(i);
    }
    let f = raw.parse::<f64>().ok()?;
    integral_f64(f)
}

/// An `f64` as `i64`, if it is finite, integral, and in range.
pub(crate) fn integral_f64(f: f64) -> Option<i64> {
    if !f.is_finite() || f.fract() != 0.0 {
        return None;
    }
    // i64::MAX itself is not exactly representable as f64.
    if f >= -(2f64.powi(63)) && f < 2f64.powi(63) {
        Some(f as i64)
    } else {
        None
    }
}
