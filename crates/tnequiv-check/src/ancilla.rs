//! Ancilla-padded partial-equivalence circuits.
//!
//! To test whether a wide circuit `B` (on `n` logical qubits plus `k`
//! ancillas starting in `|0>`) acts as a narrow circuit `A` and returns its
//! ancillas, two circuits are contracted against each other:
//!
//! ```text
//!   lhs (bra):  r0 pairs ─ B on (r0.t, anc) ─ A† on r0.t      r1 pairs idle
//!   rhs (ket):  r0 pairs idle                  r1 pairs ─ A† on r1.t ─ B on (r1.t, anc)
//! ```
//!
//! Each side needs its own copy of the reference entanglement, hence the two
//! Bell blocks. The first `n` qubits of `B`, in its own qubit order, are the
//! logical wires; the rest are ancillas.

use std::fmt;

use tracing::debug;

use tnequiv_ir::{Circuit, CircuitBox, QubitId};

use crate::bell::build_bell_pairs;
use crate::error::{EquivError, EquivResult};

/// Display label of the boxed wide circuit.
pub const B_LABEL: &str = "B";
/// Display label of the boxed inverse of the narrow circuit.
pub const A_DAGGER_LABEL: &str = "A†";

/// Control register of the first Bell block.
pub const R0_CONTROL: &str = "q_r0_c";
/// Target register of the first Bell block.
pub const R0_TARGET: &str = "q_r0_t";
/// Control register of the second Bell block.
pub const R1_CONTROL: &str = "q_r1_c";
/// Target register of the second Bell block.
pub const R1_TARGET: &str = "q_r1_t";
/// Ancilla register shared by both orientations.
pub const ANCILLA_REGISTER: &str = "q_r0_ca";

/// Which side of the overlap a check circuit prepares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Bra side: `B` then `A†` on the first Bell block.
    Lhs,
    /// Ket side: `A†` then `B` on the second Bell block.
    Rhs,
}

impl Orientation {
    /// Box labels in program order.
    pub fn box_labels(self) -> [&'static str; 2] {
        match self {
            Orientation::Lhs => [B_LABEL, A_DAGGER_LABEL],
            Orientation::Rhs => [A_DAGGER_LABEL, B_LABEL],
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Lhs => write!(f, "lhs"),
            Orientation::Rhs => write!(f, "rhs"),
        }
    }
}

/// Width of the check circuit for `A` on `n` and `B` on `m > n` qubits:
/// two Bell blocks of `2n` qubits each plus `m - n` ancillas.
pub fn ancilla_check_width(n: usize, m: usize) -> EquivResult<usize> {
    if m <= n {
        return Err(EquivError::DimensionMismatch { small: n, large: m });
    }
    n.checked_mul(4)
        .and_then(|w| w.checked_add(m - n))
        .filter(|&w| u32::try_from(w).is_ok())
        .ok_or_else(|| {
            EquivError::InvalidDimension(format!(
                "ancilla check for {n} and {m} qubits needs more qubits than a circuit can address"
            ))
        })
}

/// Build one side of the partial-equivalence overlap.
///
/// Both orientations have `4n + (m - n)` qubits and exactly two boxes,
/// labelled in the order given by [`Orientation::box_labels`]. Fails with
/// [`EquivError::DimensionMismatch`] unless `b` is strictly wider than `a`.
pub fn build_ancilla_check_circuit(
    a: &Circuit,
    b: &Circuit,
    orientation: Orientation,
) -> EquivResult<Circuit> {
    let n = a.num_qubits();
    let m = b.num_qubits();
    let width = ancilla_check_width(n, m)?;

    let r0 = build_bell_pairs(n, R0_CONTROL, R0_TARGET)?;
    let r1 = build_bell_pairs(n, R1_CONTROL, R1_TARGET)?;

    let mut circuit = r0.circuit;
    circuit.set_name(format!("ancilla_check_{orientation}"));
    let r1_map = circuit.extend_disjoint(&r1.circuit)?;
    let r1_target = r1.target.relocated(&r1_map);
    let ancillas = circuit.add_qreg(ANCILLA_REGISTER, m - n)?;

    let b_box = CircuitBox::new(b)?.with_label(B_LABEL);
    let a_dagger_box = CircuitBox::new(&a.dagger()?)?.with_label(A_DAGGER_LABEL);

    let padded = |target: &[QubitId]| -> Vec<QubitId> {
        target.iter().copied().chain(ancillas.iter()).collect()
    };

    match orientation {
        Orientation::Lhs => {
            circuit.add_box(b_box, padded(r0.target.qubits()))?;
            circuit.add_box(a_dagger_box, r0.target.iter())?;
        }
        Orientation::Rhs => {
            circuit.add_box(a_dagger_box, r1_target.iter())?;
            circuit.add_box(b_box, padded(r1_target.qubits()))?;
        }
    }

    debug_assert_eq!(circuit.num_qubits(), width);
    debug!(
        "Built {} ancilla check: {} qubits ({} ancillas)",
        orientation,
        width,
        m - n
    );
    Ok(circuit)
}
