//! Diagonal-unitary synthesis.
//!
//! A diagonal unitary `diag(e^{iθ_x})` on `k` qubits is a phase polynomial.
//! Expanding `θ` in the Walsh basis,
//!
//!   θ_x = Σ_S w_S · (-1)^{S·x},   w_S = 2^{-k} Σ_x θ_x · (-1)^{S·x}
//!
//! and writing `(-1)^p = 1 - 2p` for the parity `p = S·x`, every non-empty
//! subset `S` contributes a phase gate `P(-2 w_S)` on the parity of the
//! qubits in `S` and a global phase `w_S`. The parity is computed in place by
//! a CX ladder onto the last qubit of `S` and uncomputed afterwards:
//!
//!   CX(s_0,s_1) · CX(s_1,s_2) · … · P(-2 w_S) on s_last · … · CX(s_0,s_1)

use tnequiv_ir::{Instruction, QubitId, StandardGate};

/// Walsh coefficients below this magnitude emit no gates.
const COEFFICIENT_EPSILON: f64 = 1e-12;

/// Elementary gates implementing a diagonal unitary, plus the global phase
/// they leave out.
#[derive(Debug, Clone)]
pub struct PhasePolynomial {
    /// CX and phase gates in program order.
    pub instructions: Vec<Instruction>,
    /// Global phase in radians.
    pub global_phase: f64,
}

/// Synthesize `diag(e^{iθ_x})` on `qubits`, with `qubits[0]` the
/// least-significant bit of `x`.
///
/// `phases.len()` must equal `2^qubits.len()`; the diagonal box type
/// guarantees this for its entries.
#[allow(clippy::cast_precision_loss)]
pub fn synthesize_diagonal(phases: &[f64], qubits: &[QubitId]) -> PhasePolynomial {
    debug_assert_eq!(phases.len(), 1usize << qubits.len());

    let coefficients = walsh_coefficients(phases);
    let global_phase = coefficients.iter().sum();

    let mut instructions = vec![];
    for (subset, &w) in coefficients.iter().enumerate().skip(1) {
        if w.abs() < COEFFICIENT_EPSILON {
            continue;
        }
        let members: Vec<QubitId> = qubits
            .iter()
            .enumerate()
            .filter(|(bit, _)| subset & (1 << bit) != 0)
            .map(|(_, &q)| q)
            .collect();
        let Some(&target) = members.last() else {
            continue;
        };

        cx_ladder(&mut instructions, &members);
        instructions.push(Instruction::single_qubit_gate(
            StandardGate::P((-2.0 * w).into()),
            target,
        ));
        cx_ladder_reverse(&mut instructions, &members);
    }

    PhasePolynomial {
        instructions,
        global_phase,
    }
}

/// Normalized fast Walsh-Hadamard transform.
#[allow(clippy::cast_precision_loss)]
fn walsh_coefficients(phases: &[f64]) -> Vec<f64> {
    let mut w = phases.to_vec();
    let n = w.len();
    let mut half = 1;
    while half < n {
        for block in (0..n).step_by(2 * half) {
            for i in block..block + half {
                let (a, b) = (w[i], w[i + half]);
                w[i] = a + b;
                w[i + half] = a - b;
            }
        }
        half *= 2;
    }
    let scale = 1.0 / n as f64;
    for c in &mut w {
        *c *= scale;
    }
    w
}

/// Forward ladder: CX(q[0],q[1]), CX(q[1],q[2]), …, CX(q[k-2],q[k-1]).
fn cx_ladder(out: &mut Vec<Instruction>, qubits: &[QubitId]) {
    for window in qubits.windows(2) {
        out.push(Instruction::two_qubit_gate(
            StandardGate::CX,
            window[0],
            window[1],
        ));
    }
}

fn cx_ladder_reverse(out: &mut Vec<Instruction>, qubits: &[QubitId]) {
    for window in qubits.windows(2).rev() {
        out.push(Instruction::two_qubit_gate(
            StandardGate::CX,
            window[0],
            window[1],
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_walsh_roundtrip() {
        let phases = [0.1, -0.4, 1.3, 0.7];
        let w = walsh_coefficients(&phases);
        // θ_x = Σ_S w_S (-1)^{popcount(S & x)}
        for (x, &theta) in phases.iter().enumerate() {
            let rebuilt: f64 = w
                .iter()
                .enumerate()
                .map(|(s, c)| if (s & x).count_ones() % 2 == 0 { *c } else { -c })
                .sum();
            assert!((rebuilt - theta).abs() < 1e-12);
        }
    }

    #[test]
    fn test_single_qubit_diagonal_is_one_phase_gate() {
        // diag(1, e^{iπ/4}) = T
        let poly = synthesize_diagonal(&[0.0, FRAC_PI_4], &[QubitId(0)]);
        assert_eq!(poly.instructions.len(), 1);
        assert_eq!(
            poly.instructions[0].as_gate().and_then(|g| g.as_standard()),
            Some(&StandardGate::P((-2.0 * (-FRAC_PI_4 / 2.0)).into()))
        );
        assert!((poly.global_phase - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_diagonal_is_global_phase_only() {
        let poly = synthesize_diagonal(&[0.3; 4], &[QubitId(0), QubitId(1)]);
        assert!(poly.instructions.is_empty());
        assert!((poly.global_phase - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_parity_term_uses_ladder() {
        // θ = (0, π, π, 0): only the two-qubit parity term survives.
        let pi = std::f64::consts::PI;
        let poly = synthesize_diagonal(&[0.0, pi, pi, 0.0], &[QubitId(0), QubitId(1)]);
        let names: Vec<_> = poly.instructions.iter().map(Instruction::name).collect();
        assert_eq!(names, vec!["cx", "p", "cx"]);
        assert_eq!(poly.instructions[1].qubits, vec![QubitId(1)]);
    }
}
