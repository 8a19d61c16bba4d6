use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use scallop_relations::RelationError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no project with id {id}")]
    NotFound { id: Uuid },

    #[error("not a .scl file: {path}")]
    NotSclFile { path: PathBuf },

    #[error(transparent)]
    Relation(#[from] RelationError),

    #[error("failed to (de)serialize project data: {0}")]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
