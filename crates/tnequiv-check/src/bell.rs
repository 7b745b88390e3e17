//! Bell-pair preparation blocks.

use tnequiv_ir::{Circuit, QuantumRegister};

use crate::error::{EquivError, EquivResult};

/// `n` Bell pairs over two fresh registers.
///
/// `control[i]` is entangled with `target[i]` and nothing else. The register
/// handles stay valid for the returned circuit; after composing it into
/// another circuit, carry them over with
/// [`QuantumRegister::relocated`].
#[derive(Debug, Clone, PartialEq)]
pub struct BellPairs {
    /// The preparation circuit.
    pub circuit: Circuit,
    /// Register receiving the Hadamards.
    pub control: QuantumRegister,
    /// Register receiving the CX targets.
    pub target: QuantumRegister,
}

impl BellPairs {
    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.control.len()
    }

    /// Whether there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.control.is_empty()
    }

    /// Drop the handles and keep the circuit.
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }
}

/// Build `n` Bell pairs: H on every control qubit, then CX from
/// `control[i]` to `target[i]`.
///
/// Fails with [`EquivError::InvalidDimension`] when `2n` qubits cannot be
/// addressed, and with a duplicate-register error when both names agree.
pub fn build_bell_pairs(
    n: usize,
    control_name: &str,
    target_name: &str,
) -> EquivResult<BellPairs> {
    if n.checked_mul(2).is_none_or(|w| u32::try_from(w).is_err()) {
        return Err(EquivError::InvalidDimension(format!(
            "{n} Bell pairs need more qubits than a circuit can address"
        )));
    }

    let mut circuit = Circuit::new("bell_pairs");
    let control = circuit.add_qreg(control_name, n)?;
    let target = circuit.add_qreg(target_name, n)?;

    for q in control.iter() {
        circuit.h(q)?;
    }
    for (c, t) in control.iter().zip(target.iter()) {
        circuit.cx(c, t)?;
    }

    Ok(BellPairs {
        circuit,
        control,
        target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tnequiv_ir::IrError;

    #[test]
    fn test_layout() {
        let pairs = build_bell_pairs(3, "C", "T").unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs.circuit.num_qubits(), 6);
        assert_eq!(pairs.circuit.num_ops(), 6);
        assert_eq!(pairs.circuit.qregs()[0].name(), "C");
        assert_eq!(pairs.circuit.qregs()[1].name(), "T");

        let names: Vec<_> = pairs.circuit.instructions().map(|i| i.name()).collect();
        assert_eq!(names, vec!["h", "h", "h", "cx", "cx", "cx"]);

        let cx: Vec<_> = pairs
            .circuit
            .instructions()
            .filter(|i| i.name() == "cx")
            .map(|i| i.qubits.clone())
            .collect();
        for (i, qubits) in cx.iter().enumerate() {
            assert_eq!(qubits[0], pairs.control.qubits()[i]);
            assert_eq!(qubits[1], pairs.target.qubits()[i]);
        }
    }

    #[test]
    fn test_zero_pairs() {
        let pairs = build_bell_pairs(0, "C", "T").unwrap();
        assert!(pairs.is_empty());
        assert_eq!(pairs.circuit.num_qubits(), 0);
        assert_eq!(pairs.circuit.num_ops(), 0);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            build_bell_pairs(4, "a", "b").unwrap(),
            build_bell_pairs(4, "a", "b").unwrap()
        );
    }

    #[test]
    fn test_unaddressable_width() {
        assert!(matches!(
            build_bell_pairs(usize::MAX, "C", "T"),
            Err(EquivError::InvalidDimension(_))
        ));
        assert!(matches!(
            build_bell_pairs(1 << 31, "C", "T"),
            Err(EquivError::InvalidDimension(_))
        ));
    }

    #[test]
    fn test_same_register_names_rejected() {
        assert!(matches!(
            build_bell_pairs(2, "q", "q"),
            Err(EquivError::Ir(IrError::DuplicateRegister(name))) if name == "q"
        ));
    }
}
