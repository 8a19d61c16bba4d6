//! The single name → relation index.
//!
//! Relation names are unique across inputs and outputs combined, so one map
//! holds both and each relation carries its own direction. Lookups never
//! probe an "inputs" collection and fall back to "outputs".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RelationError;
use crate::relation::{Direction, Relation};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationIndex {
    relations: BTreeMap<String, Relation>,
}

impl RelationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a relation, enforcing cross-collection name uniqueness.
    pub fn insert(&mut self, relation: Relation) -> Result<(), RelationError> {
        if self.relations.contains_key(&relation.name) {
            return Err(RelationError::DuplicateName {
                name: relation.name.clone(),
            });
        }
        self.relations.insert(relation.name.clone(), relation);
        Ok(())
    }

    /// Remove a relation from whichever direction currently holds it.
    pub fn remove(&mut self, name: &str) -> Result<Relation, RelationError> {
        self.relations
            .remove(name)
            .ok_or_else(|| RelationError::UnknownRelation {
                name: name.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Relation> {
        self.relations.get_mut(name)
    }

    /// Like [`get_mut`](Self::get_mut) but failing with `UnknownRelation`.
    pub fn require_mut(&mut self, name: &str) -> Result<&mut Relation, RelationError> {
        self.relations
            .get_mut(name)
            .ok_or_else(|| RelationError::UnknownRelation {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Relation> {
        self.relations
            .values()
            .filter(|r| r.direction == Direction::Input)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Relation> {
        self.relations
            .values()
            .filter(|r| r.direction == Direction::Output)
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Build an index from a sequence of relations, failing with
    /// `DuplicateName` on the first name collision.
    pub fn try_from_iter<I: IntoIterator<Item = Relation>>(
        iter: I,
    ) -> Result<Self, RelationError> {
        let mut index = RelationIndex::new();
        for relation in iter {
            index.insert(relation)?;
        }
        Ok(index)
    }
}
