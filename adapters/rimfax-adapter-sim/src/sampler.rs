//! Statevector sampler implementation.

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, instrument};
use uuid::Uuid;

use rimfax_hal::{
    Job, JobId, JobStatus, OutcomeDistribution, Sampler, SamplerConfig, SamplerError,
    SamplerFactory, SamplerItem, SamplerResult,
};
use rimfax_ir::CircuitTemplate;

use crate::statevector::Statevector;

/// Job data for the simulator.
struct SimJob {
    job: Job,
    result: Option<Vec<OutcomeDistribution>>,
}

/// Hard ceiling on the register width. Amplitude storage is `2^n` complex
/// numbers, and the shift computing it must stay well inside `usize`.
const QUBIT_LIMIT: u32 = 30;

/// Local statevector sampler.
///
/// Simulates each batch item and reports its outcome distribution. By
/// default the distribution is exact (the squared amplitudes), which is what
/// noiseless algorithm tests want; [`StatevectorSampler::with_shots`] turns
/// on finite-shot sampling instead. Supports circuits up to ~20 qubits
/// (limited by memory).
pub struct StatevectorSampler {
    /// Sampler configuration.
    config: SamplerConfig,
    /// Active jobs.
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
    /// Maximum number of qubits supported.
    max_qubits: u32,
    /// Number of shots; `None` reports exact distributions.
    shots: Option<u32>,
}

impl StatevectorSampler {
    /// Create a new exact-distribution sampler with default settings.
    pub fn new() -> Self {
        Self {
            config: SamplerConfig::new("statevector"),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            max_qubits: 20,
            shots: None,
        }
    }

    /// Report finite-shot empirical distributions instead of exact ones.
    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = Some(shots);
        self
    }

    /// Create a sampler with a custom qubit limit, capped at the hard
    /// ceiling the amplitude storage supports.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            config: SamplerConfig::new("statevector"),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            max_qubits: max_qubits.min(QUBIT_LIMIT),
            shots: None,
        }
    }

    /// Simulate one bound circuit and read out its distribution.
    fn run_circuit(&self, circuit: &CircuitTemplate) -> SamplerResult<OutcomeDistribution> {
        let start = Instant::now();
        let num_qubits = circuit.num_qubits();

        let mut sv = Statevector::new(num_qubits);
        for op in circuit.ops() {
            sv.apply(op)?;
        }

        let dist = match self.shots {
            None => OutcomeDistribution::from_probabilities(
                num_qubits,
                sv.probabilities()
                    .into_iter()
                    .enumerate()
                    .filter(|(_, p)| *p > 0.0)
                    .map(|(outcome, p)| (outcome as u64, p)),
            ),
            Some(shots) => {
                let mut rng = rand::thread_rng();
                let mut counts: FxHashMap<u64, u64> = FxHashMap::default();
                for _ in 0..shots {
                    *counts.entry(sv.sample(&mut rng)).or_insert(0) += 1;
                }
                OutcomeDistribution::from_counts(num_qubits, &counts, u64::from(shots))
            }
        };

        debug!(
            qubits = num_qubits,
            elapsed_us = start.elapsed().as_micros() as u64,
            "circuit simulated"
        );
        Ok(dist)
    }
}

impl Default for StatevectorSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sampler for StatevectorSampler {
    fn name(&self) -> &str {
        &self.config.name
    }

    #[instrument(skip(self, batch), fields(items = batch.len()))]
    async fn submit(&self, batch: &[SamplerItem]) -> SamplerResult<JobId> {
        if batch.is_empty() {
            return Err(SamplerError::SubmissionFailed("empty batch".to_string()));
        }

        for (index, item) in batch.iter().enumerate() {
            if item.circuit.num_qubits() > self.max_qubits {
                return Err(SamplerError::CircuitTooLarge(format!(
                    "item {index} has {} qubits but the simulator supports {}",
                    item.circuit.num_qubits(),
                    self.max_qubits
                )));
            }
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::new(job_id.clone(), batch.len());

        {
            let mut jobs = self
                .jobs
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            jobs.insert(job_id.0.clone(), SimJob { job, result: None });
        }

        debug!("submitted job: {}", job_id);

        // Bind and simulate immediately; the whole batch resolves or fails
        // as one unit.
        let mut distributions = Vec::with_capacity(batch.len());
        let mut failure = None;
        for (index, item) in batch.iter().enumerate() {
            let bound = match item.circuit.bind(&item.values) {
                Ok(bound) => bound,
                Err(source) => {
                    failure = Some(SamplerError::Binding { index, source });
                    break;
                }
            };
            match self.run_circuit(&bound) {
                Ok(dist) => distributions.push(dist),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        {
            let mut jobs = self
                .jobs
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(sim_job) = jobs.get_mut(&job_id.0) {
                match failure {
                    None => {
                        sim_job.result = Some(distributions);
                        sim_job.job = sim_job.job.clone().with_status(JobStatus::Completed);
                    }
                    Some(ref err) => {
                        sim_job.job = sim_job
                            .job
                            .clone()
                            .with_status(JobStatus::Failed(err.to_string()));
                    }
                }
            }
        }

        match failure {
            None => Ok(job_id),
            Some(err) => Err(err),
        }
    }

    async fn status(&self, job_id: &JobId) -> SamplerResult<JobStatus> {
        let jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        jobs.get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| SamplerError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> SamplerResult<Vec<OutcomeDistribution>> {
        let jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        jobs.get(&job_id.0)
            .and_then(|j| j.result.clone())
            .ok_or_else(|| SamplerError::JobNotFound(job_id.0.clone()))
    }

    async fn cancel(&self, job_id: &JobId) -> SamplerResult<()> {
        let mut jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(sim_job) = jobs.get_mut(&job_id.0) {
            sim_job.job = sim_job.job.clone().with_status(JobStatus::Cancelled);
            Ok(())
        } else {
            Err(SamplerError::JobNotFound(job_id.0.clone()))
        }
    }
}

impl SamplerFactory for StatevectorSampler {
    fn from_config(config: SamplerConfig) -> SamplerResult<Self> {
        let max_qubits = config
            .extra
            .get("max_qubits")
            .and_then(serde_json::Value::as_u64)
            .map_or(20, |v| v.min(u64::from(QUBIT_LIMIT)) as u32);
        let shots = config
            .extra
            .get("shots")
            .and_then(serde_json::Value::as_u64)
            .map(|v| v as u32);

        Ok(Self {
            config,
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            max_qubits,
            shots,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rimfax_ir::{ParameterExpression, QubitId};

    fn bell() -> Arc<CircuitTemplate> {
        let mut t = CircuitTemplate::new("bell", 2);
        t.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        t.measure_all();
        Arc::new(t)
    }

    #[tokio::test]
    async fn test_exact_bell_distribution() {
        let sampler = StatevectorSampler::new();
        let job_id = sampler
            .submit(&[SamplerItem::new(bell(), vec![])])
            .await
            .unwrap();

        let status = sampler.status(&job_id).await.unwrap();
        assert!(status.is_success());

        let dists = sampler.wait(&job_id).await.unwrap();
        assert_eq!(dists.len(), 1);
        assert!((dists[0].probability(0) - 0.5).abs() < 1e-12);
        assert!((dists[0].probability(3) - 0.5).abs() < 1e-12);
        assert_eq!(dists[0].probability(1), 0.0);
    }

    #[tokio::test]
    async fn test_shot_sampling_normalizes() {
        let sampler = StatevectorSampler::new().with_shots(1000);
        let job_id = sampler
            .submit(&[SamplerItem::new(bell(), vec![])])
            .await
            .unwrap();

        let dists = sampler.result(&job_id).await.unwrap();
        let total: f64 = dists[0].iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
        // Bell state never produces 01 or 10.
        assert_eq!(dists[0].probability(1), 0.0);
        assert_eq!(dists[0].probability(2), 0.0);
    }

    #[tokio::test]
    async fn test_parameterized_batch() {
        let mut t = CircuitTemplate::new("rot", 1);
        t.rx(ParameterExpression::symbol("theta"), QubitId(0))
            .unwrap();
        t.measure_all();
        let t = Arc::new(t);

        let sampler = StatevectorSampler::new();
        let batch = [
            SamplerItem::new(Arc::clone(&t), vec![0.0]),
            SamplerItem::new(Arc::clone(&t), vec![std::f64::consts::PI]),
        ];
        let job_id = sampler.submit(&batch).await.unwrap();
        let dists = sampler.wait(&job_id).await.unwrap();

        assert!((dists[0].probability(0) - 1.0).abs() < 1e-12);
        assert!(dists[1].probability(0) < 1e-12);
    }

    #[tokio::test]
    async fn test_binding_arity_fails_batch() {
        let mut t = CircuitTemplate::new("rot", 1);
        t.rx(ParameterExpression::symbol("theta"), QubitId(0))
            .unwrap();
        let sampler = StatevectorSampler::new();

        let err = sampler
            .submit(&[SamplerItem::new(Arc::new(t), vec![])])
            .await
            .unwrap_err();
        assert!(matches!(err, SamplerError::Binding { index: 0, .. }));
    }

    #[tokio::test]
    async fn test_too_many_qubits() {
        let sampler = StatevectorSampler::with_max_qubits(3);
        let t = Arc::new(CircuitTemplate::new("wide", 8));

        let err = sampler
            .submit(&[SamplerItem::new(t, vec![])])
            .await
            .unwrap_err();
        assert!(matches!(err, SamplerError::CircuitTooLarge(_)));
    }

    #[tokio::test]
    async fn test_qubit_limit_is_capped() {
        // A permissive configured limit must not let a wide circuit reach
        // the statevector allocation, whose size is a shift by the width.
        let sampler = StatevectorSampler::with_max_qubits(200);
        assert_eq!(sampler.max_qubits, QUBIT_LIMIT);

        let t = Arc::new(CircuitTemplate::new("huge", 64));
        let err = sampler
            .submit(&[SamplerItem::new(t, vec![])])
            .await
            .unwrap_err();
        assert!(matches!(err, SamplerError::CircuitTooLarge(_)));
    }

    #[tokio::test]
    async fn test_from_config_caps_qubit_limit() {
        let config = SamplerConfig::new("statevector")
            .with_extra("max_qubits", serde_json::json!(1u64 << 40));
        let sampler = StatevectorSampler::from_config(config).unwrap();
        assert_eq!(sampler.max_qubits, QUBIT_LIMIT);
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = SamplerConfig::new("statevector")
            .with_extra("max_qubits", serde_json::json!(8))
            .with_extra("shots", serde_json::json!(256));
        let sampler = StatevectorSampler::from_config(config).unwrap();
        assert_eq!(sampler.max_qubits, 8);
        assert_eq!(sampler.shots, Some(256));
    }
}
