//! The fact tuple codec.
//!
//! Converts between the editable row form (weight plus ordered raw string
//! cells) and the canonical wire tuple `[weight, [typed values...]]` that the
//! reasoning backend and stored run results use. Encoding and decoding are
//! all-or-nothing per relation: the first bad cell aborts with a
//! `SchemaValidation` error naming the relation, row, and column.

use serde::{Deserialize, Serialize};

use crate::error::RelationError;
use crate::relation::{Fact, Relation};
use crate::types::{self, ArgumentType};

/// A typed wire value. Serializes to a plain JSON scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypedValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// One wire fact: `[weight, [typed values...]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFact(pub f64, pub Vec<TypedValue>);

impl WireFact {
    pub fn weight(&self) -> f64 {
        self.0
    }

    pub fn values(&self) -> &[TypedValue] {
        &self.1
    }
}

/// Coerce one raw cell to its typed wire value.
pub fn coerce_cell(raw: &str, ty: ArgumentType) -> Option<TypedValue> {
    match ty {
        ArgumentType::String => ty.is_valid_cell(raw).then(|| TypedValue::String(raw.to_string())),
        ArgumentType::Integer => types::parse_integer(raw).map(TypedValue::Integer),
        ArgumentType::Float => match raw.parse::<f64>() {
            Ok(f) if f.is_finite() => Some(TypedValue::Float(f)),
            _ => None,
        },
        ArgumentType::Boolean => match raw {
            "true" => Some(TypedValue::Boolean(true)),
            "false" => Some(TypedValue::Boolean(false)),
            _ => None,
        },
    }
}

/// Render one typed wire value back to its raw cell form, checked against
/// the declared column type.
///
/// Backends may return an integral number where a `Float` column is declared
/// (`2` for `2.0`); that is accepted. A number in an `Integer` column is
/// accepted only when mathematically integral. Booleans always render as the
/// lowercase literals.
pub fn decode_cell(value: &TypedValue, ty: ArgumentType) -> Option<String> {
    match (ty, value) {
        (ArgumentType::String, TypedValue::String(s)) => Some(s.clone()),
        (ArgumentType::Integer, TypedValue::Integer(i)) => Some(i.to_string()),
        (ArgumentType::Integer, TypedValue::Float(f)) => {
            types::integral_f64(*f).map(|i| i.to_string())
        }
        (ArgumentType::Float, TypedValue::Float(f)) => Some(f.to_string()),
        (ArgumentType::Float, TypedValue::Integer(i)) => Some(i.to_string()),
        (ArgumentType::Boolean, TypedValue::Boolean(b)) => Some(b.to_string()),
        _ => None,
    }
}

/// Encode a relation's entire fact list for submission or storage.
///
/// When the relation has no probability column, every weight is pinned to 1
/// regardless of what the rows carry.
pub fn encode_relation(relation: &Relation) -> Result<Vec<WireFact>, RelationError> {
    let mut out = Vec::with_capacity(relation.facts.len());
    for (row, fact) in relation.facts.iter().enumerate() {
        if fact.values.len() != relation.args.len() {
            return Err(schema_error(
                relation,
                format!(
                    "row {row} has {} cell(s) for {} argument(s)",
                    fact.values.len(),
                    relation.args.len()
                ),
            ));
        }
        let mut values = Vec::with_capacity(fact.values.len());
        for (column, (raw, arg)) in fact.values.iter().zip(&relation.args).enumerate() {
            let value = coerce_cell(raw, arg.ty).ok_or_else(|| {
                schema_error(
                    relation,
                    format!("row {row}, column {column}: invalid {} value {raw:?}", arg.ty),
                )
            })?;
            values.push(value);
        }
        let weight = if relation.has_probability {
            fact.weight
        } else {
            1.0
        };
        out.push(WireFact(weight, values));
    }
    Ok(out)
}

/// Decode wire tuples back into editable facts using the relation's own
/// argument schema. All-or-nothing: any arity or type mismatch fails the
/// whole relation.
pub fn decode_relation_facts(
    tuples: &[WireFact],
    relation: &Relation,
) -> Result<Vec<Fact>, RelationError> {
    let mut out = Vec::with_capacity(tuples.len());
    for (row, tuple) in tuples.iter().enumerate() {
        if tuple.values().len() != relation.args.len() {
            return Err(schema_error(
                relation,
                format!(
                    "row {row} has arity {} but {} argument(s) are declared",
                    tuple.values().len(),
                    relation.args.len()
                ),
            ));
        }
        let mut values = Vec::with_capacity(tuple.values().len());
        for (column, (value, arg)) in tuple.values().iter().zip(&relation.args).enumerate() {
            let raw = decode_cell(value, arg.ty).ok_or_else(|| {
                schema_error(
                    relation,
                    format!("row {row}, column {column}: {value:?} is not a {}", arg.ty),
                )
            })?;
            values.push(raw);
        }
        out.push(Fact::new(tuple.weight(), values));
    }
    Ok(out)
}

fn schema_error(relation: &Relation, detail: String) -> RelationError {
    RelationError::SchemaValidation {
        relation: relation.name.clone(),
        detail,
    }
}
