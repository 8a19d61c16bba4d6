//! The persistence transform: relation collections ↔ stored JSON strings.
//!
//! Serialization embeds each relation record (name, direction, argument
//! schema, probability flag, raw-string facts) in the stored column, so the
//! schema is always derivable from the record itself on load. Legacy records
//! stored an empty string for an empty collection; that is read as empty.

use scallop_relations::{Direction, Relation, RelationIndex};

use crate::error::StoreError;

/// Serialize a sequence of relations to the stored string form.
pub fn serialize_relations<'a, I>(relations: I) -> Result<String, StoreError>
where
    I: IntoIterator<Item = &'a Relation>,
{
    let records: Vec<&Relation> = relations.into_iter().collect();
    Ok(serde_json::to_string(&records)?)
}

/// Parse a stored relation collection back into typed relations.
pub fn deserialize_relations(stored: &str) -> Result<Vec<Relation>, StoreError> {
    if stored.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(stored)?)
}

/// Split an index into its stored `(inputs, outputs)` columns.
pub fn store_index(index: &RelationIndex) -> Result<(String, String), StoreError> {
    Ok((
        serialize_relations(index.inputs())?,
        serialize_relations(index.outputs())?,
    ))
}

/// Rebuild the typed model from the stored columns, re-checking that the
/// two collections carry their declared directions and disjoint names.
pub fn load_index(inputs: &str, outputs: &str) -> Result<RelationIndex, StoreError> {
    let mut index = RelationIndex::new();
    for (stored, direction) in [(inputs, Direction::Input), (outputs, Direction::Output)] {
        for relation in deserialize_relations(stored)? {
            if relation.direction != direction {
                tracing::warn!(
                    relation = %relation.name,
                    stored_direction = ?relation.direction,
                    column_direction = ?direction,
                    "stored relation direction disagrees with its column; keeping the stored one"
                );
            }
            index.insert(relation)?;
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scallop_relations::{Argument, ArgumentType, RelationError};

    fn rel(name: &str, direction: Direction) -> Relation {
        let mut rel = Relation::new(
            direction,
            name,
            vec![
                Argument::named("a", ArgumentType::String).unwrap(),
                Argument::new(ArgumentType::Integer),
            ],
            false,
        )
        .unwrap();
        if direction == Direction::Input {
            rel.add_fact_row().unwrap();
            rel.set_cell(0, 0, "Alice").unwrap();
            rel.set_cell(0, 1, "42").unwrap();
        }
        rel
    }

    #[test]
    fn stored_columns_round_trip_the_full_model() {
        let mut index = RelationIndex::new();
        index.insert(rel("parent", Direction::Input)).unwrap();
        index.insert(rel("grandparent", Direction::Output)).unwrap();

        let (inputs, outputs) = store_index(&index).unwrap();
        let back = load_index(&inputs, &outputs).unwrap();
        assert_eq!(back, index);
    }

    #[test]
    fn schema_travels_with_the_record() {
        let index = RelationIndex::try_from_iter([rel("parent", Direction::Input)]).unwrap();
        let (inputs, _) = store_index(&index).unwrap();

        let relations = deserialize_relations(&inputs).unwrap();
        assert_eq!(relations[0].args.len(), 2);
        assert_eq!(relations[0].args[0].ty, ArgumentType::String);
        assert_eq!(relations[0].args[1].ty, ArgumentType::Integer);
        assert_eq!(relations[0].facts[0].values, vec!["Alice", "42"]);
    }

    #[test]
    fn legacy_empty_columns_load_as_empty() {
        let index = load_index("", "").unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn colliding_names_across_columns_fail_to_load() {
        let (inputs, _) =
            store_index(&RelationIndex::try_from_iter([rel("x", Direction::Input)]).unwrap())
                .unwrap();
        let (_, outputs) =
            store_index(&RelationIndex::try_from_iter([rel("x", Direction::Output)]).unwrap())
                .unwrap();
        let err = load_index(&inputs, &outputs).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Relation(RelationError::DuplicateName { .. })
        ));
    }
}
