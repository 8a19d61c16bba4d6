//! The relation entity model.
//!
//! A [`Relation`] is a named, typed table of weighted facts. Input relations
//! are user-editable fact sources; output relations are read-only and receive
//! their facts wholesale from run results. Every mutation below preserves the
//! arity invariant: `fact.values.len() == args.len()` for all facts.
//!
//! The serde form matches the stored-project shape the web editor used:
//! direction under `"type"`, the probability flag under `"probability"`, and
//! facts as `{ "tag": weight, "tuple": [raw cells...] }`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RelationError;
use crate::types::ArgumentType;
use crate::validate;

/// Whether a relation feeds the program or is populated by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

/// One typed, optionally-named column of a relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    /// Opaque identity, assigned at creation and never reused.
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: ArgumentType,
}

impl Argument {
    /// An anonymous column of the given type.
    pub fn new(ty: ArgumentType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            ty,
        }
    }

    /// A named column; the name must satisfy the identifier rule.
    pub fn named(name: &str, ty: ArgumentType) -> Result<Self, RelationError> {
        validate::validate_name(name)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: Some(name.to_string()),
            ty,
        })
    }

    /// Header label in the `name: Type` form the table header renders.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{name}: {}", self.ty),
            None => self.ty.to_string(),
        }
    }
}

/// One weighted row of raw string cells, positionally aligned with the
/// relation's arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    #[serde(rename = "tag", default = "default_weight")]
    pub weight: f64,
    #[serde(rename = "tuple")]
    pub values: Vec<String>,
}

fn default_weight() -> f64 {
    1.0
}

impl Fact {
    pub fn new(weight: f64, values: Vec<String>) -> Self {
        Self { weight, values }
    }
}

/// A named table of facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub name: String,
    #[serde(rename = "type")]
    pub direction: Direction,
    pub args: Vec<Argument>,
    #[serde(rename = "probability")]
    pub has_probability: bool,
    pub facts: Vec<Fact>,
}

impl Relation {
    /// Create a relation with an empty fact list.
    ///
    /// Fails with `InvalidName` if the name breaks the identifier rule and
    /// with `EmptyArgs` if no arguments are given. Cross-collection name
    /// uniqueness is enforced by [`crate::RelationIndex::insert`].
    pub fn new(
        direction: Direction,
        name: &str,
        args: Vec<Argument>,
        has_probability: bool,
    ) -> Result<Self, RelationError> {
        validate::validate_name(name)?;
        if args.is_empty() {
            return Err(RelationError::EmptyArgs);
        }
        Ok(Self {
            name: name.to_string(),
            direction,
            args,
            has_probability,
            facts: Vec::new(),
        })
    }

    pub fn is_input(&self) -> bool {
        self.direction == Direction::Input
    }

    /// Append an anonymous `String`-typed column, giving every existing fact
    /// that type's default cell.
    pub fn add_argument(&mut self) {
        let arg = Argument::new(ArgumentType::String);
        let default = arg.ty.default_cell();
        self.args.push(arg);
        for fact in &mut self.facts {
            fact.values.push(default.clone());
        }
    }

    /// Remove the column at `index` and the corresponding cell from every
    /// fact. Removing the last remaining column is blocked.
    pub fn remove_argument(&mut self, index: usize) -> Result<Argument, RelationError> {
        if index >= self.args.len() {
            return Err(RelationError::InvalidIndex {
                index,
                len: self.args.len(),
            });
        }
        if self.args.len() == 1 {
            return Err(RelationError::InvalidIndex {
                index,
                len: self.args.len(),
            });
        }
        let arg = self.args.remove(index);
        for fact in &mut self.facts {
            fact.values.remove(index);
        }
        Ok(arg)
    }

    /// Rename the column at `index`; `None` clears the name.
    pub fn rename_argument(
        &mut self,
        index: usize,
        name: Option<&str>,
    ) -> Result<(), RelationError> {
        let len = self.args.len();
        let arg = self
            .args
            .get_mut(index)
            .ok_or(RelationError::InvalidIndex { index, len })?;
        match name {
            Some(name) => {
                validate::validate_name(name)?;
                arg.name = Some(name.to_string());
            }
            None => arg.name = None,
        }
        Ok(())
    }

    /// Change the column's type in place.
    ///
    /// Existing cells are not revalidated or migrated; stale values may be
    /// invalid until re-edited, and encoding will report them.
    pub fn change_argument_type(
        &mut self,
        index: usize,
        ty: ArgumentType,
    ) -> Result<(), RelationError> {
        let len = self.args.len();
        let arg = self
            .args
            .get_mut(index)
            .ok_or(RelationError::InvalidIndex { index, len })?;
        arg.ty = ty;
        Ok(())
    }

    /// Append a fact row with weight 1 and per-type default cells.
    pub fn add_fact_row(&mut self) -> Result<usize, RelationError> {
        self.require_editable()?;
        let values = self.args.iter().map(|arg| arg.ty.default_cell()).collect();
        self.facts.push(Fact::new(1.0, values));
        Ok(self.facts.len() - 1)
    }

    /// Remove the fact row at `row`.
    pub fn remove_fact_row(&mut self, row: usize) -> Result<Fact, RelationError> {
        self.require_editable()?;
        if row >= self.facts.len() {
            return Err(RelationError::InvalidIndex {
                index: row,
                len: self.facts.len(),
            });
        }
        Ok(self.facts.remove(row))
    }

    /// Commit a raw cell value, validating it against the column type first.
    /// On failure the committed cell is left untouched.
    pub fn set_cell(&mut self, row: usize, column: usize, raw: &str) -> Result<(), RelationError> {
        self.require_editable()?;
        let ty = self
            .args
            .get(column)
            .ok_or(RelationError::InvalidIndex {
                index: column,
                len: self.args.len(),
            })?
            .ty;
        let facts_len = self.facts.len();
        let fact = self
            .facts
            .get_mut(row)
            .ok_or(RelationError::InvalidIndex {
                index: row,
                len: facts_len,
            })?;
        validate::validate_cell(raw, ty, row, column)?;
        fact.values[column] = raw.to_string();
        Ok(())
    }

    /// Assign a custom weight to a fact row; only meaningful when the
    /// relation declares a probability column.
    pub fn set_weight(&mut self, row: usize, weight: f64) -> Result<(), RelationError> {
        self.require_editable()?;
        if !self.has_probability {
            return Err(RelationError::ProbabilityDisabled {
                name: self.name.clone(),
            });
        }
        let facts_len = self.facts.len();
        let fact = self
            .facts
            .get_mut(row)
            .ok_or(RelationError::InvalidIndex {
                index: row,
                len: facts_len,
            })?;
        fact.weight = weight;
        Ok(())
    }

    /// Replace the fact list wholesale, as run-result ingestion does for
    /// output relations. The arity invariant is still enforced.
    pub fn replace_facts(&mut self, facts: Vec<Fact>) -> Result<(), RelationError> {
        if let Some(bad) = facts.iter().find(|f| f.values.len() != self.args.len()) {
            return Err(RelationError::SchemaValidation {
                relation: self.name.clone(),
                detail: format!(
                    "fact arity {} does not match {} declared argument(s)",
                    bad.values.len(),
                    self.args.len()
                ),
            });
        }
        self.facts = facts;
        Ok(())
    }

    fn require_editable(&self) -> Result<(), RelationError> {
        if self.is_input() {
            Ok(())
        } else {
            Err(RelationError::ReadOnly {
                name: self.name.clone(),
            })
        }
    }
}
