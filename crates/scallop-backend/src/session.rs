//! The editor session: single owner of the editing state.
//!
//! All relation mutations flow through these methods (which delegate to the
//! entity model), so UI layers never reach into shared mutable state. The
//! session also orchestrates the asynchronous operations: a run encodes the
//! inputs, awaits the backend, and only commits outputs on confirmed
//! success; a save snapshots whatever state existed when it was triggered.

use uuid::Uuid;

use scallop_relations::{
    Argument, ArgumentType, Direction, Relation, RelationError, RelationIndex,
};
use scallop_store::{transform, Project, ProjectPatch, ProjectStore, StoreError};

use crate::client::ScallopBackend;
use crate::error::BackendError;
use crate::wire;

#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    pub title: String,
    pub description: Option<String>,
    pub published: bool,
    program: String,
    relations: RelationIndex,
}

impl EditorSession {
    /// A fresh playground session: empty program, no relations.
    pub fn new() -> Self {
        Self {
            title: "Playground".to_string(),
            ..Default::default()
        }
    }

    /// Reconstruct a session from a stored project.
    pub fn from_project(project: &Project) -> Result<Self, StoreError> {
        Ok(Self {
            title: project.title.clone(),
            description: project.description.clone(),
            published: project.published,
            program: project.program.clone(),
            relations: transform::load_index(&project.inputs, &project.outputs)?,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn set_program(&mut self, program: impl Into<String>) {
        self.program = program.into();
    }

    pub fn relations(&self) -> &RelationIndex {
        &self.relations
    }

    // ------------------------------------------------------------------
    // Relation mutations
    // ------------------------------------------------------------------

    /// Create and register a relation; name uniqueness is checked across
    /// inputs and outputs combined.
    pub fn create_relation(
        &mut self,
        direction: Direction,
        name: &str,
        args: Vec<Argument>,
        has_probability: bool,
    ) -> Result<(), RelationError> {
        let relation = Relation::new(direction, name, args, has_probability)?;
        self.relations.insert(relation)
    }

    /// Delete a relation from whichever collection holds it.
    pub fn delete_relation(&mut self, name: &str) -> Result<Relation, RelationError> {
        self.relations.remove(name)
    }

    pub fn add_argument(&mut self, relation: &str) -> Result<(), RelationError> {
        self.relations.require_mut(relation)?.add_argument();
        Ok(())
    }

    pub fn remove_argument(&mut self, relation: &str, index: usize) -> Result<(), RelationError> {
        self.relations.require_mut(relation)?.remove_argument(index)?;
        Ok(())
    }

    pub fn rename_argument(
        &mut self,
        relation: &str,
        index: usize,
        name: Option<&str>,
    ) -> Result<(), RelationError> {
        self.relations
            .require_mut(relation)?
            .rename_argument(index, name)
    }

    pub fn change_argument_type(
        &mut self,
        relation: &str,
        index: usize,
        ty: ArgumentType,
    ) -> Result<(), RelationError> {
        self.relations
            .require_mut(relation)?
            .change_argument_type(index, ty)
    }

    pub fn add_fact_row(&mut self, relation: &str) -> Result<usize, RelationError> {
        self.relations.require_mut(relation)?.add_fact_row()
    }

    pub fn remove_fact_row(&mut self, relation: &str, row: usize) -> Result<(), RelationError> {
        self.relations.require_mut(relation)?.remove_fact_row(row)?;
        Ok(())
    }

    pub fn set_cell(
        &mut self,
        relation: &str,
        row: usize,
        column: usize,
        raw: &str,
    ) -> Result<(), RelationError> {
        self.relations.require_mut(relation)?.set_cell(row, column, raw)
    }

    pub fn set_weight(
        &mut self,
        relation: &str,
        row: usize,
        weight: f64,
    ) -> Result<(), RelationError> {
        self.relations.require_mut(relation)?.set_weight(row, weight)
    }

    // ------------------------------------------------------------------
    // Asynchronous operations
    // ------------------------------------------------------------------

    /// Run the program against the backend and ingest the outputs.
    ///
    /// Inputs are fully encoded before anything is sent (a coercion failure
    /// blocks the run naming the relation), and outputs are replaced only
    /// after the whole response validates, so any failure leaves the
    /// pre-run state intact. Overlapping runs through separate sessions are
    /// not serialized; the last response to arrive wins.
    pub async fn run(&mut self, backend: &dyn ScallopBackend) -> Result<(), BackendError> {
        let request = wire::build_run_request(&self.program, &self.relations)?;
        let response = backend.run(&request).await?;
        wire::ingest_run_results(&response, &mut self.relations)?;
        tracing::debug!(outputs = response.len(), "run completed");
        Ok(())
    }

    /// Persist the session into an existing project record. The snapshot is
    /// taken when this is called; later edits are not reflected.
    pub async fn save_into(
        &self,
        store: &dyn ProjectStore,
        id: Uuid,
    ) -> Result<Project, StoreError> {
        let (inputs, outputs) = transform::store_index(&self.relations)?;
        store
            .update(
                id,
                ProjectPatch {
                    title: Some(self.title.clone()),
                    description: self.description.clone(),
                    program: Some(self.program.clone()),
                    inputs: Some(inputs),
                    outputs: Some(outputs),
                    published: Some(self.published),
                },
            )
            .await
    }

    /// Load a stored project into a new session.
    pub async fn load(store: &dyn ProjectStore, id: Uuid) -> Result<Self, StoreError> {
        let project = store.get(id).await?;
        Self::from_project(&project)
    }
}
