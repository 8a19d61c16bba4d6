use thiserror::Error;

use scallop_relations::RelationError;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend is unreachable or the transport failed. Never retried
    /// automatically; the user re-triggers the run.
    #[error("reasoning backend unreachable: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status and an error message.
    #[error("reasoning backend returned {status}: {message}")]
    Remote { status: u16, message: String },

    /// Encoding the inputs or decoding the response failed schema
    /// validation; the run is reported failed and editor state is untouched.
    #[error(transparent)]
    Schema(#[from] RelationError),

    /// The backend's response body was not the expected JSON shape.
    #[error("malformed backend response: {0}")]
    InvalidResponse(String),
}
