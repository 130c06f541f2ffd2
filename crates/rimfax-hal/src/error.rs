//! Error types for the sampler abstraction.

use thiserror::Error;

/// Errors that can occur in sampler operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SamplerError {
    /// Batch submission failed.
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    /// Job execution failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Job was cancelled.
    #[error("Job cancelled")]
    JobCancelled,

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Timeout waiting for a job.
    #[error("Timeout waiting for job {0}")]
    Timeout(String),

    /// A circuit exceeds the sampler's capacity.
    #[error("Circuit exceeds sampler capacity: {0}")]
    CircuitTooLarge(String),

    /// Value binding failed for a batch item.
    #[error("Binding failed for item {index}: {source}")]
    Binding {
        /// Index of the offending batch item.
        index: usize,
        /// The underlying IR error.
        #[source]
        source: rimfax_ir::IrError,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic backend error.
    #[error("Sampler error: {0}")]
    Backend(String),
}

/// Result type for sampler operations.
pub type SamplerResult<T> = Result<T, SamplerError>;
