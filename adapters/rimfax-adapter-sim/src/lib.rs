//! Rimfax local statevector sampler
//!
//! A [`Sampler`](rimfax_hal::Sampler) backed by dense statevector
//! simulation. Distributions are exact by default (squared amplitudes),
//! which lets algorithm-level tests assert noiseless values; finite-shot
//! sampling is available via [`StatevectorSampler::with_shots`].

pub mod sampler;
pub mod statevector;

pub use sampler::StatevectorSampler;
pub use statevector::Statevector;
