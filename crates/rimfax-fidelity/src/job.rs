//! Asynchronous handle for an in-flight fidelity run.

use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};
use tokio::task::JoinHandle;
use tracing::debug;

use rimfax_hal::{JobId, Sampler};

use crate::error::{FidelityError, FidelityResult};
use crate::result::StateFidelityResult;

/// Observable status of a fidelity job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FidelityJobStatus {
    /// The run has been submitted and is in progress.
    Running,
    /// The run finished and its result is cached on the handle.
    Completed,
    /// The run failed, or was cancelled.
    Failed,
}

enum JobState {
    Submitted(JoinHandle<FidelityResult<StateFidelityResult>>),
    Resolving,
    Completed(StateFidelityResult),
    Failed(String),
}

/// Handle to a submitted fidelity run.
///
/// Returned by the estimator once a request has validated; backend faults
/// surface here, not at submission. The first [`FidelityJob::result`] call
/// awaits the run and caches the outcome; later calls return the cached
/// value without touching the sampler again. Failures are cached the same
/// way, as [`FidelityError::JobFailed`].
pub struct FidelityJob {
    state: Arc<Mutex<JobState>>,
    sampler: Arc<dyn Sampler>,
    // Filled by the spawned task once the batch is submitted; lets cancel()
    // reach the backend job, not just the local task.
    backend_id: Arc<OnceCell<JobId>>,
}

impl FidelityJob {
    pub(crate) fn new(
        handle: JoinHandle<FidelityResult<StateFidelityResult>>,
        sampler: Arc<dyn Sampler>,
        backend_id: Arc<OnceCell<JobId>>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(JobState::Submitted(handle))),
            sampler,
            backend_id,
        }
    }

    /// Await the run and return its fidelities.
    ///
    /// Concurrent callers serialize on the handle; all of them observe the
    /// same cached outcome.
    pub async fn result(&self) -> FidelityResult<StateFidelityResult> {
        let mut state = self.state.lock().await;
        let handle = match &mut *state {
            JobState::Completed(result) => return Ok(result.clone()),
            JobState::Failed(reason) => return Err(FidelityError::JobFailed(reason.clone())),
            JobState::Resolving => {
                // Unreachable while the lock is held across the await below,
                // but a poisoned marker must not hang callers.
                return Err(FidelityError::JobFailed(
                    "job resolution was interrupted".to_string(),
                ));
            }
            state @ JobState::Submitted(_) => {
                match std::mem::replace(state, JobState::Resolving) {
                    JobState::Submitted(handle) => handle,
                    _ => unreachable!(),
                }
            }
        };

        let outcome = match handle.await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(err)) => Err(err.to_string()),
            Err(join_err) if join_err.is_cancelled() => Err("job was cancelled".to_string()),
            Err(join_err) => Err(format!("job task panicked: {join_err}")),
        };
        match outcome {
            Ok(result) => {
                debug!(fidelities = result.len(), "fidelity job completed");
                *state = JobState::Completed(result.clone());
                Ok(result)
            }
            Err(reason) => {
                debug!(%reason, "fidelity job failed");
                *state = JobState::Failed(reason.clone());
                Err(FidelityError::JobFailed(reason))
            }
        }
    }

    /// Current status without awaiting completion.
    pub fn status(&self) -> FidelityJobStatus {
        match self.state.try_lock() {
            Ok(state) => match &*state {
                JobState::Submitted(_) | JobState::Resolving => FidelityJobStatus::Running,
                JobState::Completed(_) => FidelityJobStatus::Completed,
                JobState::Failed(_) => FidelityJobStatus::Failed,
            },
            // The lock is held only while a caller is resolving.
            Err(_) => FidelityJobStatus::Running,
        }
    }

    /// Abort the run, cancelling the backend job when one was submitted.
    /// A no-op once the job has reached a terminal state.
    pub async fn cancel(&self) {
        {
            let mut state = self.state.lock().await;
            match &*state {
                JobState::Submitted(handle) => {
                    handle.abort();
                    *state = JobState::Failed("job was cancelled".to_string());
                }
                _ => return,
            }
        }
        if let Some(job_id) = self.backend_id.get() {
            if let Err(err) = self.sampler.cancel(job_id).await {
                debug!(%job_id, %err, "backend cancellation failed");
            }
        }
    }
}

impl std::fmt::Debug for FidelityJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FidelityJob")
            .field("status", &self.status())
            .finish()
    }
}
