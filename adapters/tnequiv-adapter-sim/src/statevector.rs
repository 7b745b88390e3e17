//! Statevector engine.
//!
//! Qubit `i` of a circuit is bit `i` of the basis-state index.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::debug;

use tnequiv_ir::{Circuit, GateKind, Instruction, InstructionKind};
use tnequiv_oracle::{OracleError, OracleResult};

use crate::matrix::{GateAction, Matrix2, gate_action};

/// A pure state over `n` qubits (`2^n` amplitudes).
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// Create the state `|0...0>`.
    pub fn new(num_qubits: usize) -> Self {
        Self::basis(num_qubits, 0)
    }

    /// Create the computational basis state `|index>`.
    pub fn basis(num_qubits: usize, index: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume the state and return its amplitudes.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// The inner product `<self|other>`.
    pub fn inner(&self, other: &Self) -> Complex64 {
        self.amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum()
    }

    /// Squared norm.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Multiply every amplitude by `e^{iφ}`.
    pub fn apply_global_phase(&mut self, phase: f64) {
        if phase != 0.0 {
            let factor = Complex64::from_polar(1.0, phase);
            for amp in &mut self.amplitudes {
                *amp *= factor;
            }
        }
    }

    /// Apply an instruction.
    ///
    /// Barriers are no-ops. Measurements, resets, boxes and conditional
    /// gates are not unitary operations on a pure state and are rejected.
    pub fn apply(&mut self, instruction: &Instruction) -> OracleResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                if gate.is_conditional() {
                    return Err(OracleError::UnsupportedOperation(format!(
                        "conditional {}",
                        gate.name()
                    )));
                }
                let GateKind::Standard(standard) = &gate.kind else {
                    return Err(OracleError::UnsupportedOperation(format!(
                        "{} (decompose boxes before contraction)",
                        gate.name()
                    )));
                };
                let qubits: Vec<_> = instruction.qubits.iter().map(|q| q.0 as usize).collect();
                match gate_action(standard)? {
                    GateAction::Controlled(matrix) => {
                        let (target, controls) = split_last(&qubits)?;
                        self.apply_controlled(&matrix, controls, target);
                    }
                    GateAction::ControlledSwap => {
                        if qubits.len() < 2 {
                            return Err(OracleError::Backend(format!(
                                "{} needs two target qubits",
                                gate.name()
                            )));
                        }
                        let (controls, targets) = qubits.split_at(qubits.len() - 2);
                        self.apply_controlled_swap(controls, targets[0], targets[1]);
                    }
                }
                Ok(())
            }
            InstructionKind::Barrier => Ok(()),
            InstructionKind::Measure | InstructionKind::Reset => Err(
                OracleError::UnsupportedOperation(instruction.name().to_string()),
            ),
        }
    }

    /// Apply `matrix` to `target` on the subspace where every control is 1.
    fn apply_controlled(&mut self, matrix: &Matrix2, controls: &[usize], target: usize) {
        let [a, b, c, d] = matrix.data;
        let control_mask = mask(controls);
        let target_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & target_mask == 0 && i & control_mask == control_mask {
                let j = i | target_mask;
                let x0 = self.amplitudes[i];
                let x1 = self.amplitudes[j];
                self.amplitudes[i] = a * x0 + b * x1;
                self.amplitudes[j] = c * x0 + d * x1;
            }
        }
    }

    /// Exchange `q1` and `q2` on the subspace where every control is 1.
    fn apply_controlled_swap(&mut self, controls: &[usize], q1: usize, q2: usize) {
        let control_mask = mask(controls);
        let m1 = 1 << q1;
        let m2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if i & control_mask == control_mask && i & m1 != 0 && i & m2 == 0 {
                let j = (i & !m1) | m2;
                self.amplitudes.swap(i, j);
            }
        }
    }
}

fn mask(qubits: &[usize]) -> usize {
    qubits.iter().fold(0, |m, q| m | (1 << q))
}

fn split_last(qubits: &[usize]) -> OracleResult<(usize, &[usize])> {
    qubits
        .split_last()
        .map(|(t, c)| (*t, c))
        .ok_or_else(|| OracleError::Backend("gate has no operands".into()))
}

/// Run `circuit` on `initial`, including its global phase.
pub fn evolve(circuit: &Circuit, initial: Statevector) -> OracleResult<Statevector> {
    if initial.num_qubits() != circuit.num_qubits() {
        return Err(OracleError::Backend(format!(
            "circuit '{}' has {} qubits, initial state has {}",
            circuit.name(),
            circuit.num_qubits(),
            initial.num_qubits()
        )));
    }
    let mut state = initial;
    for inst in circuit.instructions() {
        state.apply(inst)?;
    }
    state.apply_global_phase(circuit.global_phase());
    Ok(state)
}

/// Run `circuit` on `|0...0>`.
pub fn simulate(circuit: &Circuit) -> OracleResult<Statevector> {
    evolve(circuit, Statevector::new(circuit.num_qubits()))
}

/// The full unitary of `circuit`, row and column indices little-endian.
pub fn circuit_unitary(circuit: &Circuit) -> OracleResult<Array2<Complex64>> {
    let n = circuit.num_qubits();
    let dim = 1usize << n;
    let mut unitary = Array2::zeros((dim, dim));
    for col in 0..dim {
        let state = evolve(circuit, Statevector::basis(n, col))?;
        for (row, amp) in state.into_amplitudes().into_iter().enumerate() {
            unitary[[row, col]] = amp;
        }
    }
    debug!("Built {dim}x{dim} unitary for circuit '{}'", circuit.name());
    Ok(unitary)
}

/// `<0|bra† ket|0>`.
pub fn exact_overlap(bra: &Circuit, ket: &Circuit) -> OracleResult<Complex64> {
    Ok(simulate(bra)?.inner(&simulate(ket)?))
}
