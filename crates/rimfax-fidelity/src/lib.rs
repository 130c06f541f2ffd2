//! Batched compute-uncompute state-fidelity estimation.
//!
//! The fidelity of two pure states prepared by circuits `U` and `V` is
//! `|⟨0|V† U|0⟩|²`: run `U`, undo it with the exact adjoint of `V`, and
//! measure how often everything returns to zero. [`ComputeUncompute`]
//! packages that construction as a batched, asynchronous estimator over
//! any [`Sampler`](rimfax_hal::Sampler).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rimfax_fidelity::ComputeUncompute;
//! use rimfax_ir::{CircuitTemplate, ParameterExpression, QubitId};
//! use rimfax_adapter_sim::StatevectorSampler;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ansatz = CircuitTemplate::new("ansatz", 1);
//! ansatz.rx(ParameterExpression::symbol("theta"), QubitId(0))?;
//! let ansatz = Arc::new(ansatz);
//!
//! let estimator = ComputeUncompute::new(Arc::new(StatevectorSampler::new()));
//! let job = estimator
//!     .run(&ansatz, &ansatz, [0.0], [std::f64::consts::PI])
//!     .await?;
//! let result = job.result().await?;
//! assert!(result.fidelities()[0] < 1e-10);
//! # Ok(())
//! # }
//! ```

pub mod broadcast;
pub mod compose;
pub mod error;
pub mod estimator;
pub mod job;
pub mod outcome;
pub mod result;

pub use broadcast::{broadcast, EvaluationItem, OneOrMany, ParameterValues};
pub use compose::{compose_pair, CircuitCache};
pub use error::{FidelityError, FidelityResult, Side};
pub use estimator::ComputeUncompute;
pub use job::{FidelityJob, FidelityJobStatus};
pub use outcome::zero_outcome_probability;
pub use result::StateFidelityResult;
