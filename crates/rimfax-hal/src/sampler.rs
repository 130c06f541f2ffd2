//! The [`Sampler`] trait and configuration.
//!
//! A sampler executes a batch of bound circuits and reports one
//! [`OutcomeDistribution`] per batch item:
//!
//! ```text
//!   submit() ──→ status() ──→ result()
//!    (async)      (async)      (async)
//! ```
//!
//! Design principles follow the rest of the workspace: async-native I/O,
//! `Send + Sync` for shared ownership, and a minimal surface covering the
//! job lifecycle. The whole batch travels in a single `submit` call — a
//! batch of N items is one round trip, never N.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rimfax_ir::CircuitTemplate;

use crate::distribution::OutcomeDistribution;
use crate::error::{SamplerError, SamplerResult};
use crate::job::{JobId, JobStatus};

/// One entry of a batched submission: a circuit plus the concrete values to
/// bind over its parameter namespace, positionally.
#[derive(Debug, Clone)]
pub struct SamplerItem {
    /// The circuit to execute.
    pub circuit: Arc<CircuitTemplate>,
    /// Values for the circuit's parameters, in namespace order.
    pub values: Vec<f64>,
}

impl SamplerItem {
    /// Create a batch item.
    pub fn new(circuit: Arc<CircuitTemplate>, values: Vec<f64>) -> Self {
        Self { circuit, values }
    }
}

/// Configuration for a sampler instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Name of the sampler.
    pub name: String,
    /// API endpoint URL, for remote samplers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Authentication token, for remote samplers.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Additional configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SamplerConfig {
    /// Create a new sampler configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: None,
            token: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the endpoint URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the authentication token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Add extra configuration.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl fmt::Debug for SamplerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamplerConfig")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .field("extra", &self.extra)
            .finish()
    }
}

/// Trait for sampling backends.
///
/// # Contract
///
/// - `submit()` accepts the whole batch in one call and MUST return a
///   `JobId` with initial status `Queued`.
/// - `result()` MUST only be called once status is `Completed`, and yields
///   one distribution per submitted item, index-aligned with the batch.
/// - A batch either resolves fully or fails as a whole; implementations
///   MUST NOT report partial results.
/// - `wait()` has a default implementation (500ms poll, 5-minute timeout);
///   implementations with their own timeout policy override it.
#[async_trait]
pub trait Sampler: Send + Sync {
    /// Get the name of this sampler.
    fn name(&self) -> &str;

    /// Submit a batch of circuits with their binding values.
    async fn submit(&self, batch: &[SamplerItem]) -> SamplerResult<JobId>;

    /// Get the status of a job.
    async fn status(&self, job_id: &JobId) -> SamplerResult<JobStatus>;

    /// Get the distributions of a completed job, index-aligned with the
    /// submitted batch.
    async fn result(&self, job_id: &JobId) -> SamplerResult<Vec<OutcomeDistribution>>;

    /// Cancel a pending job.
    async fn cancel(&self, job_id: &JobId) -> SamplerResult<()>;

    /// Wait for a job to complete and return its distributions.
    ///
    /// Default implementation polls every 500ms for up to 5 minutes.
    async fn wait(&self, job_id: &JobId) -> SamplerResult<Vec<OutcomeDistribution>> {
        use tokio::time::sleep;

        let poll_interval = Duration::from_millis(500);
        let max_polls = 600; // 5 minutes max

        for _ in 0..max_polls {
            let status = self.status(job_id).await?;

            match status {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(msg) => return Err(SamplerError::JobFailed(msg)),
                JobStatus::Cancelled => return Err(SamplerError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    sleep(poll_interval).await;
                }
            }
        }

        Err(SamplerError::Timeout(job_id.0.clone()))
    }
}

/// Trait for creating samplers from configuration.
pub trait SamplerFactory: Sampler + Sized {
    /// Create a sampler from configuration.
    fn from_config(config: SamplerConfig) -> SamplerResult<Self>;
}
