//! The compute-uncompute fidelity estimator.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use rimfax_hal::{Sampler, SamplerItem};
use rimfax_ir::CircuitTemplate;

use crate::broadcast::{broadcast, OneOrMany, ParameterValues};
use crate::compose::CircuitCache;
use crate::error::{FidelityError, FidelityResult, Side};
use crate::job::FidelityJob;
use crate::outcome::zero_outcome_probability;
use crate::result::StateFidelityResult;

/// Estimates state fidelities by the compute-uncompute method.
///
/// For each pair `(U, V)` of state-preparation circuits with parameter
/// values `(a, b)`, the fidelity `|⟨0|V(b)† U(a)|0⟩|²` is the probability
/// of the all-zero outcome after running `U(a)` followed by the exact
/// adjoint of `V(b)`. The estimator builds those circuits, submits the
/// whole batch to its [`Sampler`] in one call, and reports one fidelity
/// per pair.
///
/// Composed circuits are cached by template identity, so iterative callers
/// that re-run the same `Arc`ed pair with fresh values pay composition
/// once.
pub struct ComputeUncompute {
    sampler: Arc<dyn Sampler>,
    cache: CircuitCache,
}

impl ComputeUncompute {
    /// Create an estimator over the given sampler.
    pub fn new(sampler: Arc<dyn Sampler>) -> Self {
        Self {
            sampler,
            cache: CircuitCache::new(),
        }
    }

    /// The sampler this estimator submits to.
    pub fn sampler(&self) -> &Arc<dyn Sampler> {
        &self.sampler
    }

    /// Submit a batched fidelity evaluation.
    ///
    /// `left`/`right` accept a single template or a list; values accept
    /// `()` for none, one assignment, or a batch of assignments (plain
    /// vectors or `ndarray` arrays). Shapes broadcast: a single template
    /// pairs with every value row, omitted values mean empty assignments.
    ///
    /// Usage faults (shape, arity, width mismatches) fail here, before
    /// anything reaches the sampler. Backend faults surface on the
    /// returned [`FidelityJob`].
    #[instrument(skip_all, fields(sampler = self.sampler.name()))]
    pub async fn run(
        &self,
        left: impl Into<OneOrMany<Arc<CircuitTemplate>>>,
        right: impl Into<OneOrMany<Arc<CircuitTemplate>>>,
        left_values: impl Into<ParameterValues>,
        right_values: impl Into<ParameterValues>,
    ) -> FidelityResult<FidelityJob> {
        let left = left.into();
        let right = right.into();
        match (left.is_empty(), right.is_empty()) {
            (true, true) => return Err(FidelityError::MissingInput),
            (true, false) => return Err(FidelityError::MissingCircuits(Side::Left)),
            (false, true) => return Err(FidelityError::MissingCircuits(Side::Right)),
            (false, false) => {}
        }

        let items = broadcast(left, right, left_values.into(), right_values.into())?;

        let mut batch = Vec::with_capacity(items.len());
        for item in &items {
            let circuit = self.cache.get_or_compose(&item.left, &item.right)?;
            let mut values = item.left_values.clone();
            values.extend_from_slice(&item.right_values);
            batch.push(SamplerItem::new(circuit, values));
        }
        debug!(pairs = batch.len(), "submitting fidelity batch");

        let sampler = Arc::clone(&self.sampler);
        let backend_id = Arc::new(OnceCell::new());
        let id_slot = Arc::clone(&backend_id);
        let handle = tokio::spawn(async move {
            let job_id = sampler.submit(&batch).await?;
            // Publish the id before waiting so cancel() can reach the
            // backend job.
            let _ = id_slot.set(job_id.clone());
            let distributions = sampler.wait(&job_id).await?;
            let fidelities = distributions.iter().map(zero_outcome_probability).collect();
            Ok(StateFidelityResult::new(fidelities))
        });
        Ok(FidelityJob::new(
            handle,
            Arc::clone(&self.sampler),
            backend_id,
        ))
    }

    /// Evaluate a single pair and await the result.
    pub async fn evaluate(
        &self,
        left: &Arc<CircuitTemplate>,
        right: &Arc<CircuitTemplate>,
        left_values: impl Into<ParameterValues>,
        right_values: impl Into<ParameterValues>,
    ) -> FidelityResult<f64> {
        let job = self
            .run(left, right, left_values, right_values)
            .await?;
        let result = job.result().await?;
        Ok(result.fidelities()[0])
    }
}

impl std::fmt::Debug for ComputeUncompute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputeUncompute")
            .field("sampler", &self.sampler.name())
            .field("cached_circuits", &self.cache.len())
            .finish()
    }
}
