//! Rimfax sampling-backend abstraction layer
//!
//! A unified interface for backends that execute parameterized circuits by
//! sampling and report outcome-frequency distributions.
//!
//! The layer provides:
//! - The [`Sampler`] trait: one batched submission, job lifecycle, one
//!   [`OutcomeDistribution`] per batch item on resolution
//! - [`SamplerConfig`] / [`SamplerFactory`] for construction from
//!   configuration
//! - Job lifecycle types ([`JobId`], [`JobStatus`], [`Job`])
//!
//! # Example: executing a batch
//!
//! ```ignore
//! use std::sync::Arc;
//! use rimfax_hal::{Sampler, SamplerItem};
//! use rimfax_adapter_sim::StatevectorSampler;
//! use rimfax_ir::{CircuitTemplate, QubitId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut bell = CircuitTemplate::new("bell", 2);
//!     bell.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
//!     bell.measure_all();
//!
//!     let sampler = StatevectorSampler::new();
//!     let job_id = sampler
//!         .submit(&[SamplerItem::new(Arc::new(bell), vec![])])
//!         .await?;
//!     let dists = sampler.wait(&job_id).await?;
//!     println!("p(00) = {}", dists[0].probability(0));
//!     Ok(())
//! }
//! ```

pub mod distribution;
pub mod error;
pub mod job;
pub mod sampler;

pub use distribution::OutcomeDistribution;
pub use error::{SamplerError, SamplerResult};
pub use job::{Job, JobId, JobStatus};
pub use sampler::{Sampler, SamplerConfig, SamplerFactory, SamplerItem};
