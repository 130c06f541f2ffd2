//! Standard gates with known semantics, including exact adjoints.

use serde::{Deserialize, Serialize};

use crate::parameter::ParameterExpression;

/// Standard gates supported by templates.
///
/// Every gate in this set has an exact adjoint expressible in the same set,
/// which is what makes whole-template inversion exact rather than
/// approximate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,
    /// Rotation around X axis.
    Rx(ParameterExpression),
    /// Rotation around Y axis.
    Ry(ParameterExpression),
    /// Rotation around Z axis.
    Rz(ParameterExpression),
    /// Phase gate.
    P(ParameterExpression),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(
        ParameterExpression,
        ParameterExpression,
        ParameterExpression,
    ),
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// Controlled rotation around X.
    CRx(ParameterExpression),
    /// Controlled rotation around Y.
    CRy(ParameterExpression),
    /// Controlled rotation around Z.
    CRz(ParameterExpression),
    /// Controlled phase gate.
    CP(ParameterExpression),
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(_, _, _) => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::CRx(_) => "crx",
            StandardGate::CRy(_) => "cry",
            StandardGate::CRz(_) => "crz",
            StandardGate::CP(_) => "cp",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::U(_, _, _) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CRx(_)
            | StandardGate::CRy(_)
            | StandardGate::CRz(_)
            | StandardGate::CP(_) => 2,

            StandardGate::CCX | StandardGate::CSwap => 3,
        }
    }

    /// Get the angle parameters of this gate.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CRx(p)
            | StandardGate::CRy(p)
            | StandardGate::CRz(p)
            | StandardGate::CP(p) => vec![p],

            StandardGate::U(a, b, c) => vec![a, b, c],

            _ => vec![],
        }
    }

    /// Check if this gate carries a free symbolic parameter.
    pub fn is_parameterized(&self) -> bool {
        self.parameters().iter().any(|p| p.is_symbolic())
    }

    /// The exact adjoint (unitary inverse) of this gate.
    pub fn adjoint(&self) -> StandardGate {
        match self {
            // Self-inverse gates.
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CCX
            | StandardGate::CSwap => self.clone(),

            StandardGate::S => StandardGate::Sdg,
            StandardGate::Sdg => StandardGate::S,
            StandardGate::T => StandardGate::Tdg,
            StandardGate::Tdg => StandardGate::T,
            StandardGate::SX => StandardGate::SXdg,
            StandardGate::SXdg => StandardGate::SX,

            StandardGate::Rx(p) => StandardGate::Rx(-p.clone()),
            StandardGate::Ry(p) => StandardGate::Ry(-p.clone()),
            StandardGate::Rz(p) => StandardGate::Rz(-p.clone()),
            StandardGate::P(p) => StandardGate::P(-p.clone()),
            StandardGate::CRx(p) => StandardGate::CRx(-p.clone()),
            StandardGate::CRy(p) => StandardGate::CRy(-p.clone()),
            StandardGate::CRz(p) => StandardGate::CRz(-p.clone()),
            StandardGate::CP(p) => StandardGate::CP(-p.clone()),

            // U(θ, φ, λ)† = U(-θ, -λ, -φ); note the swapped phase angles.
            StandardGate::U(theta, phi, lambda) => {
                StandardGate::U(-theta.clone(), -lambda.clone(), -phi.clone())
            }
        }
    }

    /// Rebuild the gate with each angle expression mapped through `f`.
    pub(crate) fn map_parameters(
        &self,
        f: &impl Fn(&ParameterExpression) -> ParameterExpression,
    ) -> StandardGate {
        match self {
            StandardGate::Rx(p) => StandardGate::Rx(f(p)),
            StandardGate::Ry(p) => StandardGate::Ry(f(p)),
            StandardGate::Rz(p) => StandardGate::Rz(f(p)),
            StandardGate::P(p) => StandardGate::P(f(p)),
            StandardGate::CRx(p) => StandardGate::CRx(f(p)),
            StandardGate::CRy(p) => StandardGate::CRy(f(p)),
            StandardGate::CRz(p) => StandardGate::CRz(f(p)),
            StandardGate::CP(p) => StandardGate::CP(f(p)),
            StandardGate::U(a, b, c) => StandardGate::U(f(a), f(b), f(c)),
            fixed => fixed.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);

        assert!(!StandardGate::H.is_parameterized());
        assert!(!StandardGate::Rx(ParameterExpression::constant(PI)).is_parameterized());
        assert!(StandardGate::Rx(ParameterExpression::symbol("theta")).is_parameterized());
    }

    #[test]
    fn test_adjoint_pairs() {
        assert_eq!(StandardGate::S.adjoint(), StandardGate::Sdg);
        assert_eq!(StandardGate::Tdg.adjoint(), StandardGate::T);
        assert_eq!(StandardGate::H.adjoint(), StandardGate::H);
        assert_eq!(StandardGate::CCX.adjoint(), StandardGate::CCX);
    }

    #[test]
    fn test_rotation_adjoint_negates_angle() {
        let g = StandardGate::Rx(ParameterExpression::constant(PI / 2.0));
        match g.adjoint() {
            StandardGate::Rx(p) => assert_eq!(p.as_f64(), Some(-PI / 2.0)),
            other => panic!("unexpected adjoint {other:?}"),
        }
    }

    #[test]
    fn test_u_adjoint_swaps_phases() {
        let g = StandardGate::U(
            ParameterExpression::constant(0.1),
            ParameterExpression::constant(0.2),
            ParameterExpression::constant(0.3),
        );
        match g.adjoint() {
            StandardGate::U(t, p, l) => {
                assert_eq!(t.as_f64(), Some(-0.1));
                assert_eq!(p.as_f64(), Some(-0.3));
                assert_eq!(l.as_f64(), Some(-0.2));
            }
            other => panic!("unexpected adjoint {other:?}"),
        }
    }

    #[test]
    fn test_adjoint_involution() {
        let g = StandardGate::CRy(ParameterExpression::symbol("a"));
        assert_eq!(g.adjoint().adjoint(), g);
    }
}
