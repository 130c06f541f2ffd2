//! Parameterized circuit templates.
//!
//! A [`CircuitTemplate`] is a not-yet-bound unit of computation: a fixed
//! qubit register, an ordered sequence of standard gates, and an ordered
//! namespace of free parameter symbols (first-use order). Templates are
//! immutable once built and shared as `Arc<CircuitTemplate>` by consumers
//! that cache derived circuits by identity.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::parameter::ParameterExpression;
use crate::qubit::QubitId;

/// A single operation in a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateOp {
    /// A standard gate applied to specific qubits.
    Gate {
        /// The gate.
        gate: StandardGate,
        /// Operand qubits, control(s) first.
        qubits: Vec<QubitId>,
    },
    /// Computational-basis measurement of the listed qubits.
    Measure {
        /// Measured qubits, in readout order.
        qubits: Vec<QubitId>,
    },
}

/// A parameterized quantum circuit template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitTemplate {
    /// Name of the template.
    name: String,
    /// Width of the qubit register.
    num_qubits: u32,
    /// Operations in application order.
    ops: Vec<TemplateOp>,
    /// Free parameter symbols in first-use order.
    parameters: Vec<String>,
    /// Whether a measurement has been appended.
    measured: bool,
}

impl CircuitTemplate {
    /// Create a new empty template over `num_qubits` qubits.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            ops: vec![],
            parameters: vec![],
            measured: false,
        }
    }

    // =========================================================================
    // Building
    // =========================================================================

    /// Apply a gate to the given qubits.
    pub fn apply(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        if self.measured {
            return Err(IrError::OperationAfterMeasure(gate.name().to_string()));
        }
        let qubits: Vec<QubitId> = qubits.into_iter().collect();
        if qubits.len() != gate.num_qubits() as usize {
            return Err(IrError::GateArity {
                gate: gate.name().to_string(),
                expected: gate.num_qubits(),
                actual: qubits.len(),
            });
        }
        for q in &qubits {
            if q.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit: q.0,
                    num_qubits: self.num_qubits,
                });
            }
        }
        for p in gate.parameters() {
            p.collect_symbols(&mut self.parameters);
        }
        self.ops.push(TemplateOp::Gate { gate, qubits });
        Ok(self)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::H, [qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::X, [qubit])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::Y, [qubit])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::Z, [qubit])
    }

    /// Apply Rx rotation gate.
    pub fn rx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(StandardGate::Rx(theta.into()), [qubit])
    }

    /// Apply Ry rotation gate.
    pub fn ry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(StandardGate::Ry(theta.into()), [qubit])
    }

    /// Apply Rz rotation gate.
    pub fn rz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(StandardGate::Rz(theta.into()), [qubit])
    }

    /// Apply phase gate.
    pub fn p(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(StandardGate::P(theta.into()), [qubit])
    }

    /// Apply universal U gate.
    pub fn u(
        &mut self,
        theta: impl Into<ParameterExpression>,
        phi: impl Into<ParameterExpression>,
        lambda: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(
            StandardGate::U(theta.into(), phi.into(), lambda.into()),
            [qubit],
        )
    }

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::CX, [control, target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::CZ, [control, target])
    }

    /// Apply controlled-phase gate.
    pub fn cp(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(StandardGate::CP(theta.into()), [control, target])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::Swap, [q1, q2])
    }

    /// Measure every qubit in the computational basis.
    ///
    /// Terminal: no further operations can be appended afterwards.
    pub fn measure_all(&mut self) -> &mut Self {
        let qubits: Vec<QubitId> = (0..self.num_qubits).map(QubitId).collect();
        self.ops.push(TemplateOp::Measure { qubits });
        self.measured = true;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the template name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the number of free parameters.
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Get the free parameter symbols in declaration order.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Get the operations in application order.
    pub fn ops(&self) -> &[TemplateOp] {
        &self.ops
    }

    /// Whether the template ends in a measurement.
    pub fn has_measurements(&self) -> bool {
        self.measured
    }

    // =========================================================================
    // Derivation
    // =========================================================================

    /// The exact adjoint of this template: operations reversed, each gate
    /// replaced by its adjoint. The parameter namespace is unchanged.
    ///
    /// Fails for templates containing measurements, which have no unitary
    /// inverse.
    pub fn inverse(&self) -> IrResult<CircuitTemplate> {
        if self.measured {
            return Err(IrError::NonInvertible(
                "template contains measurements".to_string(),
            ));
        }
        let ops = self
            .ops
            .iter()
            .rev()
            .map(|op| match op {
                TemplateOp::Gate { gate, qubits } => TemplateOp::Gate {
                    gate: gate.adjoint(),
                    qubits: qubits.clone(),
                },
                TemplateOp::Measure { qubits } => TemplateOp::Measure {
                    qubits: qubits.clone(),
                },
            })
            .collect();
        Ok(Self {
            name: format!("{}_dg", self.name),
            num_qubits: self.num_qubits,
            ops,
            parameters: self.parameters.clone(),
            measured: false,
        })
    }

    /// Sequential composition: this template's operations followed by
    /// `other`'s. Parameter namespaces concatenate, self's symbols first.
    ///
    /// Both templates must have the same qubit count, the receiver must not
    /// be measured, and the namespaces must be disjoint. Callers composing
    /// two views of the same template relabel one side first (see
    /// [`CircuitTemplate::relabeled`]).
    pub fn compose(&self, other: &CircuitTemplate) -> IrResult<CircuitTemplate> {
        if self.num_qubits != other.num_qubits {
            return Err(IrError::QubitCountMismatch {
                left: self.num_qubits,
                right: other.num_qubits,
            });
        }
        if self.measured {
            return Err(IrError::OperationAfterMeasure(other.name.clone()));
        }
        if let Some(clash) = other.parameters.iter().find(|p| self.parameters.contains(p)) {
            return Err(IrError::ParameterClash(clash.clone()));
        }
        let mut parameters = self.parameters.clone();
        parameters.extend(other.parameters.iter().cloned());
        let mut ops = self.ops.clone();
        ops.extend(other.ops.iter().cloned());
        Ok(Self {
            name: format!("{}_{}", self.name, other.name),
            num_qubits: self.num_qubits,
            ops,
            parameters,
            measured: other.measured,
        })
    }

    /// Rename the parameter namespace positionally to `{prefix}0`,
    /// `{prefix}1`, ... in declaration order.
    ///
    /// The rename is simultaneous, so existing symbols that happen to match
    /// a target name are not captured.
    pub fn relabeled(&self, prefix: &str) -> CircuitTemplate {
        let map: FxHashMap<String, String> = self
            .parameters
            .iter()
            .enumerate()
            .map(|(i, old)| (old.clone(), format!("{prefix}{i}")))
            .collect();
        let parameters = (0..self.parameters.len())
            .map(|i| format!("{prefix}{i}"))
            .collect();
        let ops = self.map_gate_params(|p| p.renamed(&map));
        Self {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            ops,
            parameters,
            measured: self.measured,
        }
    }

    /// Bind concrete values to the namespace, positionally.
    ///
    /// `values` must match [`CircuitTemplate::parameter_count`] exactly.
    /// The result has an empty namespace and every angle concrete.
    pub fn bind(&self, values: &[f64]) -> IrResult<CircuitTemplate> {
        if values.len() != self.parameters.len() {
            return Err(IrError::BindingArity {
                expected: self.parameters.len(),
                actual: values.len(),
            });
        }
        let map: FxHashMap<String, f64> = self
            .parameters
            .iter()
            .cloned()
            .zip(values.iter().copied())
            .collect();
        let ops = self.map_gate_params(|p| p.bind_all(&map));
        Ok(Self {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            ops,
            parameters: vec![],
            measured: self.measured,
        })
    }

    fn map_gate_params(
        &self,
        f: impl Fn(&ParameterExpression) -> ParameterExpression,
    ) -> Vec<TemplateOp> {
        self.ops
            .iter()
            .map(|op| match op {
                TemplateOp::Gate { gate, qubits } => TemplateOp::Gate {
                    gate: gate.map_parameters(&f),
                    qubits: qubits.clone(),
                },
                TemplateOp::Measure { qubits } => TemplateOp::Measure {
                    qubits: qubits.clone(),
                },
            })
            .collect()
    }

    // =========================================================================
    // Pre-built templates
    // =========================================================================

    /// A hardware-efficient Ry + CX-chain ansatz with `(reps + 1) * n` free
    /// parameters named `theta0`, `theta1`, ...
    pub fn real_amplitudes(num_qubits: u32, reps: u32) -> IrResult<Self> {
        let mut t = Self::new("real_amplitudes", num_qubits);
        let mut next = 0;
        for layer in 0..=reps {
            for q in 0..num_qubits {
                t.ry(ParameterExpression::symbol(format!("theta{next}")), QubitId(q))?;
                next += 1;
            }
            if layer < reps {
                for q in 0..num_qubits.saturating_sub(1) {
                    t.cx(QubitId(q), QubitId(q + 1))?;
                }
            }
        }
        Ok(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn rx_pair() -> CircuitTemplate {
        let mut t = CircuitTemplate::new("rx_pair", 2);
        t.rx(ParameterExpression::symbol("a"), QubitId(0)).unwrap();
        t.rx(ParameterExpression::symbol("b"), QubitId(1)).unwrap();
        t
    }

    #[test]
    fn test_namespace_first_use_order() {
        let t = rx_pair();
        assert_eq!(t.parameters(), ["a", "b"]);
        assert_eq!(t.parameter_count(), 2);
        assert_eq!(t.num_qubits(), 2);
    }

    #[test]
    fn test_repeated_symbol_collected_once() {
        let mut t = CircuitTemplate::new("shared", 2);
        t.ry(ParameterExpression::symbol("a"), QubitId(0)).unwrap();
        t.ry(ParameterExpression::symbol("a"), QubitId(1)).unwrap();
        assert_eq!(t.parameters(), ["a"]);
    }

    #[test]
    fn test_qubit_out_of_range() {
        let mut t = CircuitTemplate::new("t", 1);
        let err = t.h(QubitId(1)).unwrap_err();
        assert!(matches!(err, IrError::QubitOutOfRange { qubit: 1, .. }));
    }

    #[test]
    fn test_gate_arity_checked() {
        let mut t = CircuitTemplate::new("t", 2);
        let err = t
            .apply(StandardGate::CX, [QubitId(0)])
            .unwrap_err();
        assert!(matches!(err, IrError::GateArity { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_inverse_reverses_and_adjoints() {
        let mut t = CircuitTemplate::new("t", 1);
        t.h(QubitId(0)).unwrap();
        t.rx(PI / 2.0, QubitId(0)).unwrap();
        let inv = t.inverse().unwrap();

        match &inv.ops()[0] {
            TemplateOp::Gate { gate: StandardGate::Rx(p), .. } => {
                assert_eq!(p.as_f64(), Some(-PI / 2.0));
            }
            other => panic!("unexpected op {other:?}"),
        }
        match &inv.ops()[1] {
            TemplateOp::Gate { gate: StandardGate::H, .. } => {}
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_inverse_rejects_measured() {
        let mut t = CircuitTemplate::new("t", 1);
        t.h(QubitId(0)).unwrap();
        t.measure_all();
        assert!(matches!(t.inverse(), Err(IrError::NonInvertible(_))));
    }

    #[test]
    fn test_measure_is_terminal() {
        let mut t = CircuitTemplate::new("t", 1);
        t.measure_all();
        assert!(t.has_measurements());
        assert!(matches!(
            t.h(QubitId(0)),
            Err(IrError::OperationAfterMeasure(_))
        ));
    }

    #[test]
    fn test_compose_concatenates_namespaces() {
        let left = rx_pair().relabeled("x");
        let right = rx_pair().relabeled("y");
        let combined = left.compose(&right).unwrap();
        assert_eq!(combined.parameters(), ["x0", "x1", "y0", "y1"]);
        assert_eq!(combined.ops().len(), 4);
    }

    #[test]
    fn test_compose_rejects_clash() {
        let t = rx_pair();
        assert!(matches!(
            t.compose(&t),
            Err(IrError::ParameterClash(_))
        ));
    }

    #[test]
    fn test_compose_rejects_width_mismatch() {
        let t = rx_pair();
        let narrow = CircuitTemplate::new("n", 1);
        assert!(matches!(
            t.compose(&narrow),
            Err(IrError::QubitCountMismatch { left: 2, right: 1 })
        ));
    }

    #[test]
    fn test_relabel_avoids_capture() {
        // Namespace ["b", "x0"]: a naive sequential rename of b → x0 would
        // then sweep the original x0 along with it.
        let mut t = CircuitTemplate::new("t", 2);
        t.rx(ParameterExpression::symbol("b"), QubitId(0)).unwrap();
        t.rx(ParameterExpression::symbol("x0"), QubitId(1)).unwrap();
        let relabeled = t.relabeled("x");
        assert_eq!(relabeled.parameters(), ["x0", "x1"]);

        let bound = relabeled.bind(&[0.25, 0.75]).unwrap();
        match &bound.ops()[1] {
            TemplateOp::Gate { gate: StandardGate::Rx(p), .. } => {
                assert_eq!(p.as_f64(), Some(0.75));
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_bind_arity() {
        let t = rx_pair();
        assert!(matches!(
            t.bind(&[0.1]),
            Err(IrError::BindingArity { expected: 2, actual: 1 })
        ));
        let bound = t.bind(&[0.1, 0.2]).unwrap();
        assert_eq!(bound.parameter_count(), 0);
    }

    #[test]
    fn test_bind_empty_namespace() {
        let mut t = CircuitTemplate::new("t", 1);
        t.h(QubitId(0)).unwrap();
        assert!(t.bind(&[]).is_ok());
    }

    #[test]
    fn test_real_amplitudes_parameter_count() {
        let t = CircuitTemplate::real_amplitudes(2, 3).unwrap();
        assert_eq!(t.parameter_count(), 8);
        assert_eq!(t.num_qubits(), 2);
    }
}
