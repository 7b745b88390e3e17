//! Choi-state embedding.
//!
//! Applying an `n`-qubit unitary `U` to one half of `n` Bell pairs prepares
//!
//! ```text
//!   |Φ_U> = 2^{-n/2} Σ_x |x>_C ⊗ U|x>_T
//! ```
//!
//! whose amplitudes are the entries of `U`. Two unitaries agree up to a
//! global phase exactly when their Choi states have overlap of magnitude 1.
//!
//! With qubit `i` as bit `i` of the basis index, `C` on the low half and `T`
//! on the high half, the statevector reshaped row-major to `2^n x 2^n` is
//! `U / sqrt(2^n)` (row = target index, column = control index).

use tracing::debug;

use tnequiv_compile::PassManagerBuilder;
use tnequiv_ir::{Circuit, CircuitBox, DiagonalBox, QubitId};

use crate::bell::build_bell_pairs;
use crate::error::{EquivError, EquivResult};

/// Name of the Bell-pair control register in a Choi circuit.
pub const CONTROL_REGISTER: &str = "C";
/// Name of the register the unitary acts on in a Choi circuit.
pub const TARGET_REGISTER: &str = "T";

fn require_unitary(circuit: &Circuit) -> EquivResult<()> {
    if circuit.num_clbits() > 0 {
        return Err(EquivError::IncompatibleCircuits(format!(
            "circuit '{}' has {} classical bits; a Choi state needs a pure unitary",
            circuit.name(),
            circuit.num_clbits()
        )));
    }
    Ok(())
}

/// Prepare the Choi state of `unitary` on `2n` qubits.
///
/// The commands of `unitary` are inlined on the `"T"` register unchanged.
pub fn embed_choi_state(unitary: &Circuit) -> EquivResult<Circuit> {
    require_unitary(unitary)?;
    let pairs = build_bell_pairs(unitary.num_qubits(), CONTROL_REGISTER, TARGET_REGISTER)?;
    let mut circuit = pairs.circuit;
    circuit.set_name(format!("choi({})", unitary.name()));
    circuit.append(unitary, pairs.target.qubits(), &[])?;
    Ok(circuit)
}

/// Like [`embed_choi_state`], but with `unitary` wrapped in a labelled box.
///
/// The label is for display only; decompose the box before contraction.
pub fn embed_boxed_choi_state(unitary: &Circuit, label: &str) -> EquivResult<Circuit> {
    require_unitary(unitary)?;
    let pairs = build_bell_pairs(unitary.num_qubits(), CONTROL_REGISTER, TARGET_REGISTER)?;
    let mut circuit = pairs.circuit;
    circuit.set_name(format!("choi({label})"));
    circuit.add_box(
        CircuitBox::new(unitary)?.with_label(label),
        pairs.target.iter(),
    )?;
    Ok(circuit)
}

/// Prepare the Choi state of a diagonal unitary on `n` qubits.
///
/// `diag(d)` has Choi amplitudes `d_x / sqrt(2^n)` on `|x>` alone, so a
/// layer of Hadamards followed by the diagonal suffices. The diagonal is
/// synthesized into CX and phase gates before returning.
pub fn embed_diagonal_choi_state(diagonal: &DiagonalBox) -> EquivResult<Circuit> {
    let n = diagonal.num_qubits();
    let mut circuit = Circuit::with_size("diagonal_choi", n, 0);
    let qubits: Vec<QubitId> = (0..n).map(QubitId).collect();
    for &q in &qubits {
        circuit.h(q)?;
    }
    circuit.add_diagonal(diagonal.clone(), qubits)?;

    let (pm, mut props) = PassManagerBuilder::new()
        .with_box_decomposition(true)
        .build();
    pm.run(&mut circuit, &mut props)?;
    debug!(
        "Diagonal Choi circuit on {} qubits has {} gates",
        n,
        circuit.num_ops()
    );
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tnequiv_ir::StandardGate;

    #[test]
    fn test_choi_layout() {
        let mut u = Circuit::with_size("u", 2, 0);
        u.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();

        let choi = embed_choi_state(&u).unwrap();
        assert_eq!(choi.num_qubits(), 4);
        assert_eq!(choi.name(), "choi(u)");
        assert!(choi.qreg(CONTROL_REGISTER).is_some());
        let target = choi.qreg(TARGET_REGISTER).unwrap().clone();

        // 2 H + 2 CX for the pairs, then the inlined unitary on T.
        let ops: Vec<_> = choi.instructions().collect();
        assert_eq!(ops.len(), 6);
        assert_eq!(ops[4].name(), "h");
        assert_eq!(ops[4].qubits, vec![target.qubits()[0]]);
        assert_eq!(ops[5].qubits, target.qubits().to_vec());
        assert!(!choi.instructions().any(|i| i.is_box()));
    }

    #[test]
    fn test_choi_keeps_global_phase() {
        let mut u = Circuit::with_size("u", 1, 0);
        u.x(QubitId(0)).unwrap();
        u.set_global_phase(0.3);
        assert_eq!(embed_choi_state(&u).unwrap().global_phase(), 0.3);
    }

    #[test]
    fn test_choi_rejects_classical_bits() {
        let u = Circuit::with_size("m", 1, 1);
        assert!(matches!(
            embed_choi_state(&u),
            Err(EquivError::IncompatibleCircuits(_))
        ));
    }

    #[test]
    fn test_boxed_choi_carries_label() {
        let mut u = Circuit::with_size("u", 1, 0);
        u.gate(StandardGate::Y, [QubitId(0)]).unwrap();
        let choi = embed_boxed_choi_state(&u, "A").unwrap();
        let boxes: Vec<_> = choi
            .instructions()
            .filter_map(|i| match &i.as_gate()?.kind {
                tnequiv_ir::GateKind::Box(b) => b.label().map(str::to_string),
                _ => None,
            })
            .collect();
        assert_eq!(boxes, vec!["A".to_string()]);
    }

    #[test]
    fn test_diagonal_choi_is_decomposed() {
        let diagonal = DiagonalBox::from_phases([0.0, 0.5, 1.0, 1.5]).unwrap();
        let choi = embed_diagonal_choi_state(&diagonal).unwrap();
        assert_eq!(choi.num_qubits(), 2);
        assert!(choi.instructions().all(|i| !i.is_box()));
        assert!(choi.instructions().take(2).all(|i| i.name() == "h"));
    }
}
