//! Backend client implementations.
//!
//! [`ScallopBackend`] abstracts over the reasoning service so the editor
//! session and tests do not care whether a run crosses the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::BackendError;
use crate::wire::{RunRequest, RunResponse};

/// Env var overriding the HTTP request timeout, in seconds.
pub const SCALLOP_BACKEND_TIMEOUT_SECS_ENV: &str = "SCALLOP_BACKEND_TIMEOUT_SECS";

/// Generous default: provenance-tracking runs on larger programs can take a
/// while, but the client should not hang forever on a dead backend.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[async_trait]
pub trait ScallopBackend: Send + Sync {
    /// Execute the program against the supplied relations.
    ///
    /// No automatic retry on failure; callers re-trigger manually.
    async fn run(&self, request: &RunRequest) -> Result<RunResponse, BackendError>;
}

/// The real reasoning backend, spoken to over HTTP.
pub struct HttpBackend {
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpBackend {
    /// `endpoint` is the backend's base URL; the run route lives at
    /// `<endpoint>/api/run-scallop`.
    pub fn new(endpoint: &str) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs()))
            .build()?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }
}

fn timeout_secs() -> u64 {
    match std::env::var(SCALLOP_BACKEND_TIMEOUT_SECS_ENV) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                tracing::warn!(
                    value = %raw,
                    "ignoring invalid {SCALLOP_BACKEND_TIMEOUT_SECS_ENV}; using default"
                );
                DEFAULT_TIMEOUT_SECS
            }
        },
        Err(_) => DEFAULT_TIMEOUT_SECS,
    }
}

#[async_trait]
impl ScallopBackend for HttpBackend {
    async fn run(&self, request: &RunRequest) -> Result<RunResponse, BackendError> {
        let url = format!("{}/api/run-scallop", self.endpoint);
        tracing::debug!(
            url = %url,
            inputs = request.inputs.len(),
            outputs = request.outputs.len(),
            "submitting run"
        );

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status.to_string(),
            };
            return Err(BackendError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<RunResponse>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

/// Canned backend for tests: cycles through its responses, or always fails.
pub struct MockBackend {
    responses: Vec<RunResponse>,
    failure: Option<(u16, String)>,
    index: AtomicUsize,
}

impl MockBackend {
    pub fn new(responses: Vec<RunResponse>) -> Self {
        Self {
            responses,
            failure: None,
            index: AtomicUsize::new(0),
        }
    }

    pub fn always(response: RunResponse) -> Self {
        Self::new(vec![response])
    }

    /// A backend whose every run fails with the given remote error.
    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            responses: Vec::new(),
            failure: Some((status, message.to_string())),
            index: AtomicUsize::new(0),
        }
    }

    /// How many runs this mock has served.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScallopBackend for MockBackend {
    async fn run(&self, _request: &RunRequest) -> Result<RunResponse, BackendError> {
        let idx = self.index.fetch_add(1, Ordering::SeqCst);
        if let Some((status, message)) = &self.failure {
            return Err(BackendError::Remote {
                status: *status,
                message: message.clone(),
            });
        }
        Ok(self
            .responses
            .get(idx % self.responses.len().max(1))
            .cloned()
            .unwrap_or_default())
    }
}
