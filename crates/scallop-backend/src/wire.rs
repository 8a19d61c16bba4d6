//! The run request/response wire shapes.
//!
//! Request body:
//!
//! ```json
//! {
//!   "program": "rel grandparent(a, c) = parent(a, b), parent(b, c)",
//!   "inputs":  [{"name": "parent", "args": [{"name": "a", "type": "String"}, ...],
//!                "facts": [[1.0, ["Alice", "Bob"]]]}],
//!   "outputs": [{"name": "grandparent", "args": [...]}]
//! }
//! ```
//!
//! Response: an object mapping each requested output relation name to its
//! `[weight, [typed values...]]` tuples.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use scallop_relations::{codec, Argument, RelationError, RelationIndex, WireFact};

/// One argument as the backend sees it: name and type, no editor identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireArg {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: scallop_relations::ArgumentType,
}

impl From<&Argument> for WireArg {
    fn from(arg: &Argument) -> Self {
        Self {
            name: arg.name.clone(),
            ty: arg.ty,
        }
    }
}

/// An input relation with its fully coerced fact tuples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRelation {
    pub name: String,
    pub args: Vec<WireArg>,
    pub facts: Vec<WireFact>,
}

/// A declared output relation: schema only, facts come back in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRelation {
    pub name: String,
    pub args: Vec<WireArg>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    pub program: String,
    pub inputs: Vec<InputRelation>,
    pub outputs: Vec<OutputRelation>,
}

/// Output relation name → wire fact tuples.
pub type RunResponse = BTreeMap<String, Vec<WireFact>>;

/// Build the run request, encoding every input relation.
///
/// All-or-nothing: the first input relation that fails coercion aborts the
/// build with a `SchemaValidation` error naming it, and the run is blocked.
pub fn build_run_request(
    program: &str,
    relations: &RelationIndex,
) -> Result<RunRequest, RelationError> {
    let mut inputs = Vec::new();
    for relation in relations.inputs() {
        let facts = codec::encode_relation(relation)?;
        inputs.push(InputRelation {
            name: relation.name.clone(),
            args: relation.args.iter().map(WireArg::from).collect(),
            facts,
        });
    }
    let outputs = relations
        .outputs()
        .map(|relation| OutputRelation {
            name: relation.name.clone(),
            args: relation.args.iter().map(WireArg::from).collect(),
        })
        .collect();
    Ok(RunRequest {
        program: program.to_string(),
        inputs,
        outputs,
    })
}

/// Validate a run response against the declared output schemas, then
/// replace every output relation's facts wholesale.
///
/// Decoding happens for the entire response before anything is committed,
/// so a schema mismatch leaves the previous outputs fully intact. A
/// response entry for an undeclared relation is an error, not a silent
/// drop; a declared output missing from the response decodes as empty.
pub fn ingest_run_results(
    response: &RunResponse,
    relations: &mut RelationIndex,
) -> Result<(), RelationError> {
    for name in response.keys() {
        match relations.get(name) {
            Some(relation) if !relation.is_input() => {}
            _ => {
                return Err(RelationError::SchemaValidation {
                    relation: name.clone(),
                    detail: "response names a relation that is not a declared output".to_string(),
                });
            }
        }
    }

    let empty: Vec<WireFact> = Vec::new();
    let mut decoded = Vec::new();
    for relation in relations.outputs() {
        let tuples = response.get(&relation.name).unwrap_or(&empty);
        let facts = codec::decode_relation_facts(tuples, relation)?;
        decoded.push((relation.name.clone(), facts));
    }

    for (name, facts) in decoded {
        if let Some(relation) = relations.get_mut(&name) {
            relation.replace_facts(facts)?;
        }
    }
    Ok(())
}
