//! Compute-uncompute circuit construction with an identity-keyed cache.

use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;
use tracing::debug;

use rimfax_ir::CircuitTemplate;

use crate::error::{FidelityError, FidelityResult};

/// Build the compute-uncompute circuit for one pair of templates.
///
/// The left template is relabeled to the `x` namespace, the right to `y`,
/// then the circuit is `left`, followed by the adjoint of `right`, followed
/// by measurement of all qubits. Relabeling keeps the namespaces disjoint
/// even when both sides are the same template, and fixes the binding order:
/// left values first, right values after.
pub fn compose_pair(
    left: &CircuitTemplate,
    right: &CircuitTemplate,
) -> FidelityResult<CircuitTemplate> {
    if left.num_qubits() != right.num_qubits() {
        return Err(FidelityError::StructuralMismatch {
            left_qubits: left.num_qubits(),
            right_qubits: right.num_qubits(),
        });
    }
    let forward = left.relabeled("x");
    let backward = right.relabeled("y").inverse()?;
    let mut combined = forward.compose(&backward)?;
    combined.measure_all();
    Ok(combined)
}

/// Cache key: a template pair compared and hashed by allocation identity.
///
/// The key owns its `Arc`s, so a cached pair's addresses stay pinned for
/// the life of the entry and cannot be recycled for unrelated templates.
#[derive(Debug, Clone)]
struct PairKey(Arc<CircuitTemplate>, Arc<CircuitTemplate>);

impl PartialEq for PairKey {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) && Arc::ptr_eq(&self.1, &other.1)
    }
}

impl Eq for PairKey {}

impl std::hash::Hash for PairKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
        (Arc::as_ptr(&self.1) as usize).hash(state);
    }
}

/// Cache of composed circuits, keyed by template identity.
///
/// A hit requires the caller to pass the *same* allocations, not merely
/// equal templates. That is the common shape in iterative workloads, where
/// the ansatz pair is fixed and only the bound values change between
/// calls.
#[derive(Debug, Default)]
pub struct CircuitCache {
    entries: Mutex<FxHashMap<PairKey, Arc<CircuitTemplate>>>,
}

impl CircuitCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the composed circuit for `(left, right)`, composing on miss.
    pub fn get_or_compose(
        &self,
        left: &Arc<CircuitTemplate>,
        right: &Arc<CircuitTemplate>,
    ) -> FidelityResult<Arc<CircuitTemplate>> {
        let key = PairKey(Arc::clone(left), Arc::clone(right));
        {
            let entries = self
                .entries
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(hit) = entries.get(&key) {
                debug!(left = left.name(), right = right.name(), "circuit cache hit");
                return Ok(Arc::clone(hit));
            }
        }

        // Compose outside the lock; a racing duplicate insert is harmless.
        let composed = Arc::new(compose_pair(left, right)?);
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let entry = entries.entry(key).or_insert_with(|| Arc::clone(&composed));
        Ok(Arc::clone(entry))
    }

    /// Number of cached circuits.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no circuits.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
