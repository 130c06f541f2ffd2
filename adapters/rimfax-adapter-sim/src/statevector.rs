//! Statevector simulation engine.

use num_complex::Complex64;
use std::f64::consts::PI;

use rimfax_hal::{SamplerError, SamplerResult};
use rimfax_ir::{ParameterExpression, StandardGate, TemplateOp};

/// A statevector representing a quantum state.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: u32) -> Self {
        let size = 1usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits: num_qubits as usize,
        }
    }

    /// Apply a template operation.
    ///
    /// Measurements and barriers do not modify the statevector; the
    /// distribution is read out afterwards.
    pub fn apply(&mut self, op: &TemplateOp) -> SamplerResult<()> {
        match op {
            TemplateOp::Gate { gate, qubits } => {
                let qubits: Vec<usize> = qubits.iter().map(|q| q.index()).collect();
                self.apply_gate(gate, &qubits)
            }
            TemplateOp::Measure { .. } => Ok(()),
        }
    }

    /// Exact probability per computational-basis outcome.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Sample a measurement outcome.
    pub fn sample(&self, rng: &mut impl rand::Rng) -> u64 {
        let r: f64 = rng.r#gen();

        let mut cumulative = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            cumulative += amp.norm_sqr();
            if r < cumulative {
                return i as u64;
            }
        }

        // Fallback (shouldn't happen with normalized states)
        (self.amplitudes.len() - 1) as u64
    }

    fn angle(p: &ParameterExpression) -> SamplerResult<f64> {
        p.as_f64().ok_or_else(|| {
            SamplerError::Backend(format!("unbound parameter `{p}` reached the simulator"))
        })
    }

    fn apply_gate(&mut self, gate: &StandardGate, qubits: &[usize]) -> SamplerResult<()> {
        match gate {
            StandardGate::I => {}
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::Y => self.apply_y(qubits[0]),
            StandardGate::Z => self.apply_z(qubits[0]),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::S => self.apply_phase(qubits[0], PI / 2.0),
            StandardGate::Sdg => self.apply_phase(qubits[0], -PI / 2.0),
            StandardGate::T => self.apply_phase(qubits[0], PI / 4.0),
            StandardGate::Tdg => self.apply_phase(qubits[0], -PI / 4.0),
            StandardGate::SX => self.apply_global_phased_rx(qubits[0], PI / 2.0),
            StandardGate::SXdg => self.apply_global_phased_rx(qubits[0], -PI / 2.0),
            StandardGate::Rx(t) => self.apply_rx(qubits[0], Self::angle(t)?),
            StandardGate::Ry(t) => self.apply_ry(qubits[0], Self::angle(t)?),
            StandardGate::Rz(t) => self.apply_rz(qubits[0], Self::angle(t)?),
            StandardGate::P(t) => self.apply_phase(qubits[0], Self::angle(t)?),
            StandardGate::U(t, p, l) => self.apply_u(
                qubits[0],
                Self::angle(t)?,
                Self::angle(p)?,
                Self::angle(l)?,
            ),
            StandardGate::CX => self.apply_cx(qubits[0], qubits[1]),
            StandardGate::CY => self.apply_cy(qubits[0], qubits[1]),
            StandardGate::CZ => self.apply_cz(qubits[0], qubits[1]),
            StandardGate::CH => self.apply_ch(qubits[0], qubits[1]),
            StandardGate::Swap => self.apply_swap(qubits[0], qubits[1]),
            StandardGate::CRx(t) => self.apply_crx(qubits[0], qubits[1], Self::angle(t)?),
            StandardGate::CRy(t) => self.apply_cry(qubits[0], qubits[1], Self::angle(t)?),
            StandardGate::CRz(t) => self.apply_crz(qubits[0], qubits[1], Self::angle(t)?),
            StandardGate::CP(t) => self.apply_cp(qubits[0], qubits[1], Self::angle(t)?),
            StandardGate::CCX => self.apply_ccx(qubits[0], qubits[1], qubits[2]),
            StandardGate::CSwap => self.apply_cswap(qubits[0], qubits[1], qubits[2]),
        }
        Ok(())
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask != 0 {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for i in 0..(1 << self.num_qubits) {
            if i & mask != 0 {
                self.amplitudes[i] *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let neg_i_s = Complex64::new(0.0, -s);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                self.amplitudes[i] *= phase_0;
            } else {
                self.amplitudes[i] *= phase_1;
            }
        }
    }

    fn apply_u(&mut self, qubit: usize, theta: f64, phi: f64, lambda: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let e_il = Complex64::from_polar(1.0, lambda);
        let e_ip = Complex64::from_polar(1.0, phi);
        let e_ipl = Complex64::from_polar(1.0, phi + lambda);

        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - e_il * s * b;
                self.amplitudes[j] = e_ip * s * a + e_ipl * c * b;
            }
        }
    }

    // SX = e^{iπ/4} Rx(π/2); the global phase matters once controlled
    // versions or composition with adjoints enter, so keep it.
    fn apply_global_phased_rx(&mut self, qubit: usize, theta: f64) {
        let phase = Complex64::from_polar(1.0, theta / 2.0);
        self.apply_rx(qubit, theta);
        for amp in &mut self.amplitudes {
            *amp *= phase;
        }
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_cy(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask != 0) {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_ch(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..(1 << self.num_qubits) {
            let b1 = (i & mask1) != 0;
            let b2 = (i & mask2) != 0;
            if b1 && !b2 {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_crx(&mut self, control: usize, target: usize, theta: f64) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let neg_i_s = Complex64::new(0.0, -s);
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_cry(&mut self, control: usize, target: usize, theta: f64) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_crz(&mut self, control: usize, target: usize, theta: f64) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for i in 0..(1 << self.num_qubits) {
            if i & ctrl_mask != 0 {
                if i & tgt_mask == 0 {
                    self.amplitudes[i] *= phase_0;
                } else {
                    self.amplitudes[i] *= phase_1;
                }
            }
        }
    }

    fn apply_cp(&mut self, control: usize, target: usize, theta: f64) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        let phase = Complex64::from_polar(1.0, theta);
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask != 0) {
                self.amplitudes[i] *= phase;
            }
        }
    }

    // =========================================================================
    // Three-qubit gate implementations
    // =========================================================================

    fn apply_ccx(&mut self, c1: usize, c2: usize, target: usize) {
        let c1_mask = 1 << c1;
        let c2_mask = 1 << c2;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & c1_mask != 0) && (i & c2_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_cswap(&mut self, control: usize, t1: usize, t2: usize) {
        let ctrl_mask = 1 << control;
        let t1_mask = 1 << t1;
        let t2_mask = 1 << t2;
        for i in 0..(1 << self.num_qubits) {
            if i & ctrl_mask != 0 {
                let b1 = (i & t1_mask) != 0;
                let b2 = (i & t2_mask) != 0;
                if b1 && !b2 {
                    let j = (i & !t1_mask) | t2_mask;
                    self.amplitudes.swap(i, j);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rimfax_ir::{CircuitTemplate, QubitId};

    fn run(template: &CircuitTemplate) -> Statevector {
        let mut sv = Statevector::new(template.num_qubits());
        for op in template.ops() {
            sv.apply(op).unwrap();
        }
        sv
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        let probs = sv.probabilities();
        assert!(approx_eq(probs[0], 1.0));
        assert!(approx_eq(probs[1] + probs[2] + probs[3], 0.0));
    }

    #[test]
    fn test_bell_state() {
        let mut t = CircuitTemplate::new("bell", 2);
        t.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        let probs = run(&t).probabilities();

        assert!(approx_eq(probs[0], 0.5));
        assert!(approx_eq(probs[1], 0.0));
        assert!(approx_eq(probs[2], 0.0));
        assert!(approx_eq(probs[3], 0.5));
    }

    #[test]
    fn test_rotation_then_adjoint_is_identity() {
        let mut t = CircuitTemplate::new("t", 1);
        t.rx(0.7, QubitId(0)).unwrap();
        t.ry(1.1, QubitId(0)).unwrap();
        let roundtrip = t.compose(&t.inverse().unwrap()).unwrap();
        let probs = run(&roundtrip).probabilities();

        assert!(approx_eq(probs[0], 1.0));
    }

    #[test]
    fn test_sx_adjoint_cancels_global_phase() {
        let mut t = CircuitTemplate::new("t", 1);
        t.apply(StandardGate::SX, [QubitId(0)]).unwrap();
        t.apply(StandardGate::SXdg, [QubitId(0)]).unwrap();
        let probs = run(&t).probabilities();
        assert!(approx_eq(probs[0], 1.0));
    }

    #[test]
    fn test_unbound_parameter_rejected() {
        let mut t = CircuitTemplate::new("t", 1);
        t.rx(ParameterExpression::symbol("theta"), QubitId(0))
            .unwrap();
        let mut sv = Statevector::new(1);
        let err = sv.apply(&t.ops()[0]).unwrap_err();
        assert!(matches!(err, SamplerError::Backend(_)));
    }

    #[test]
    fn test_sample_deterministic() {
        let mut t = CircuitTemplate::new("t", 1);
        t.x(QubitId(0)).unwrap();
        let sv = run(&t);

        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            assert_eq!(sv.sample(&mut rng), 1);
        }
    }
}
