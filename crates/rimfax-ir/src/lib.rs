//! Rimfax circuit templates
//!
//! Parameterized circuit templates with an ordered parameter namespace and
//! the derivations the rest of the workspace builds on: exact inversion
//! (unitary adjoint), sequential composition, positional relabeling, and
//! positional value binding.
//!
//! # Example
//!
//! ```
//! use rimfax_ir::{CircuitTemplate, ParameterExpression, QubitId};
//!
//! let mut prep = CircuitTemplate::new("prep", 2);
//! prep.rx(ParameterExpression::symbol("a"), QubitId(0))?
//!     .rx(ParameterExpression::symbol("b"), QubitId(1))?;
//!
//! assert_eq!(prep.parameter_count(), 2);
//! let bound = prep.bind(&[0.1, 0.2])?;
//! assert_eq!(bound.parameter_count(), 0);
//! # Ok::<(), rimfax_ir::IrError>(())
//! ```

pub mod error;
pub mod gate;
pub mod parameter;
pub mod qubit;
pub mod template;

pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use parameter::ParameterExpression;
pub use qubit::QubitId;
pub use template::{CircuitTemplate, TemplateOp};
