//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{ClassicalCondition, Gate, StandardGate};
use crate::qubit::{ClbitId, QubitId};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A quantum gate operation.
    Gate(Gate),
    /// Measurement operation.
    Measure,
    /// Reset qubit to |0⟩.
    Reset,
    /// Barrier (synchronization point).
    Barrier,
}

/// A complete instruction with operands.
///
/// For conditional gates `clbits` holds the condition bits, so the DAG
/// orders the gate after whatever last wrote them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
    /// Classical bits this instruction reads or writes.
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        let gate = gate.into();
        let clbits = gate
            .condition
            .as_ref()
            .map(|c| c.bits.clone())
            .unwrap_or_default();
        Self {
            kind: InstructionKind::Gate(gate),
            qubits: qubits.into_iter().collect(),
            clbits,
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Create a classically controlled gate instruction.
    pub fn conditional(
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
        condition: ClassicalCondition,
    ) -> Self {
        Self::gate(gate.into().with_condition(condition), qubits)
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Create a reset instruction.
    pub fn reset(qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Reset,
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Check if this is a reset.
    pub fn is_reset(&self) -> bool {
        matches!(self.kind, InstructionKind::Reset)
    }

    /// Check if this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// Check if this is a classically controlled gate.
    pub fn is_conditional(&self) -> bool {
        self.as_gate().is_some_and(Gate::is_conditional)
    }

    /// Check if this is a box or diagonal box.
    pub fn is_box(&self) -> bool {
        self.as_gate().is_some_and(|g| g.kind.is_box())
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Get the classical condition, if any.
    pub fn condition(&self) -> Option<&ClassicalCondition> {
        self.as_gate().and_then(|g| g.condition.as_ref())
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
        }
    }

    /// The adjoint of this instruction on the same operands.
    ///
    /// Barriers are self-inverse. Measurements, resets and conditional gates
    /// have no inverse.
    pub fn inverse(&self) -> IrResult<Self> {
        let kind = match &self.kind {
            InstructionKind::Gate(g) if g.is_conditional() => {
                return Err(IrError::NotUnitary(format!("conditional {}", g.name())));
            }
            InstructionKind::Gate(g) => InstructionKind::Gate(Gate {
                kind: g.kind.inverse()?,
                condition: None,
            }),
            InstructionKind::Barrier => InstructionKind::Barrier,
            InstructionKind::Measure | InstructionKind::Reset => {
                return Err(IrError::NotUnitary(self.name().to_string()));
            }
        };
        Ok(Self {
            kind,
            qubits: self.qubits.clone(),
            clbits: self.clbits.clone(),
        })
    }

    /// Copy of this instruction with its operands renamed.
    ///
    /// Condition bits are renamed along with the operand bits.
    #[must_use]
    pub fn remapped(
        &self,
        qubit_map: impl Fn(QubitId) -> QubitId,
        clbit_map: impl Fn(ClbitId) -> ClbitId,
    ) -> Self {
        let mut kind = self.kind.clone();
        if let InstructionKind::Gate(Gate {
            condition: Some(condition),
            ..
        }) = &mut kind
        {
            for bit in &mut condition.bits {
                *bit = clbit_map(*bit);
            }
        }
        Self {
            kind,
            qubits: self.qubits.iter().map(|&q| qubit_map(q)).collect(),
            clbits: self.clbits.iter().map(|&c| clbit_map(c)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::single_qubit_gate(StandardGate::H, QubitId(0));
        assert!(inst.is_gate());
        assert!(!inst.is_conditional());
        assert_eq!(inst.qubits.len(), 1);
        assert_eq!(inst.name(), "h");
    }

    #[test]
    fn test_measure_instruction() {
        let inst = Instruction::measure(QubitId(0), ClbitId(0));
        assert!(inst.is_measure());
        assert_eq!(inst.qubits.len(), 1);
        assert_eq!(inst.clbits.len(), 1);
        assert!(inst.inverse().is_err());
    }

    #[test]
    fn test_conditional_carries_condition_bits() {
        let inst = Instruction::conditional(
            StandardGate::X,
            [QubitId(1)],
            ClassicalCondition::bit(ClbitId(0)),
        );
        assert!(inst.is_conditional());
        assert_eq!(inst.clbits, vec![ClbitId(0)]);
        assert!(matches!(inst.inverse(), Err(IrError::NotUnitary(_))));

        let moved = inst.remapped(|q| QubitId(q.0 + 2), |c| ClbitId(c.0 + 5));
        assert_eq!(moved.qubits, vec![QubitId(3)]);
        assert_eq!(moved.clbits, vec![ClbitId(5)]);
        assert_eq!(moved.condition().map(|c| c.bits.clone()), Some(vec![ClbitId(5)]));
    }

    #[test]
    fn test_barrier_instruction() {
        let inst = Instruction::barrier([QubitId(0), QubitId(1), QubitId(2)]);
        assert!(inst.is_barrier());
        assert_eq!(inst.qubits.len(), 3);
        assert_eq!(inst.inverse().unwrap(), inst);
    }
}
