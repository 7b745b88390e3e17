//! High-level circuit builder API.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::boxes::{CircuitBox, DiagonalBox};
use crate::dag::CircuitDag;
use crate::error::{IrError, IrResult};
use crate::gate::{ClassicalCondition, Gate, StandardGate};
use crate::instruction::Instruction;
use crate::parameter::ParameterExpression;
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};
use crate::register::{ClassicalRegister, QuantumRegister, QubitMap};

/// A quantum circuit.
///
/// Every wire belongs to exactly one named register. Qubit and clbit ids are
/// dense and follow allocation order, so the `i`-th entry of
/// [`qubits`](Self::qubits) always has id `i`.
#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    qubits: Vec<Qubit>,
    clbits: Vec<Clbit>,
    qregs: Vec<QuantumRegister>,
    cregs: Vec<ClassicalRegister>,
    dag: CircuitDag,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            qregs: vec![],
            cregs: vec![],
            dag: CircuitDag::new(),
        }
    }

    /// Create a circuit with a register `q` of `num_qubits` qubits and, if
    /// `num_clbits > 0`, a register `c` of classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        // Fresh circuit: neither name can collide and the widths fit in u32.
        circuit.push_qreg("q".into(), num_qubits);
        if num_clbits > 0 {
            circuit.push_creg("c".into(), num_clbits);
        }
        circuit
    }

    /// Add a quantum register and return its handle.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_qreg(&mut self, name: impl Into<String>, size: usize) -> IrResult<QuantumRegister> {
        let name = name.into();
        if self.qregs.iter().any(|r| r.name() == name) {
            return Err(IrError::DuplicateRegister(name));
        }
        let width = self.qubits.len() + size;
        if u32::try_from(width).is_err() {
            return Err(IrError::WidthOverflow(width));
        }
        Ok(self.push_qreg(name, size as u32))
    }

    /// Add a classical register and return its handle.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_creg(
        &mut self,
        name: impl Into<String>,
        size: usize,
    ) -> IrResult<ClassicalRegister> {
        let name = name.into();
        if self.cregs.iter().any(|r| r.name() == name) {
            return Err(IrError::DuplicateRegister(name));
        }
        let width = self.clbits.len() + size;
        if u32::try_from(width).is_err() {
            return Err(IrError::WidthOverflow(width));
        }
        Ok(self.push_creg(name, size as u32))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn push_qreg(&mut self, name: String, size: u32) -> QuantumRegister {
        let start = self.qubits.len() as u32;
        let mut ids = Vec::with_capacity(size as usize);
        for index in 0..size {
            let id = QubitId(start + index);
            self.qubits.push(Qubit::new(id, &name, index));
            self.dag.add_qubit(id);
            ids.push(id);
        }
        let reg = QuantumRegister::new(name, ids);
        self.qregs.push(reg.clone());
        reg
    }

    #[allow(clippy::cast_possible_truncation)]
    fn push_creg(&mut self, name: String, size: u32) -> ClassicalRegister {
        let start = self.clbits.len() as u32;
        let mut ids = Vec::with_capacity(size as usize);
        for index in 0..size {
            let id = ClbitId(start + index);
            self.clbits.push(Clbit::new(id, &name, index));
            self.dag.add_clbit(id);
            ids.push(id);
        }
        let reg = ClassicalRegister::new(name, ids);
        self.cregs.push(reg.clone());
        reg
    }

    fn standard(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::gate(gate, qubits))?;
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::H, [qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::X, [qubit])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Y, [qubit])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Z, [qubit])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::S, [qubit])
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Sdg, [qubit])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::T, [qubit])
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Tdg, [qubit])
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::SX, [qubit])
    }

    /// Apply Rx rotation gate.
    pub fn rx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.standard(StandardGate::Rx(theta.into()), [qubit])
    }

    /// Apply Ry rotation gate.
    pub fn ry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.standard(StandardGate::Ry(theta.into()), [qubit])
    }

    /// Apply Rz rotation gate.
    pub fn rz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.standard(StandardGate::Rz(theta.into()), [qubit])
    }

    /// Apply phase gate.
    pub fn p(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.standard(StandardGate::P(theta.into()), [qubit])
    }

    /// Apply universal U gate.
    pub fn u(
        &mut self,
        theta: impl Into<ParameterExpression>,
        phi: impl Into<ParameterExpression>,
        lambda: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.standard(
            StandardGate::U(theta.into(), phi.into(), lambda.into()),
            [qubit],
        )
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::CX, [control, target])
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::CY, [control, target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::CZ, [control, target])
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::CH, [control, target])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Swap, [q1, q2])
    }

    /// Apply controlled-Rz gate.
    pub fn crz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.standard(StandardGate::CRz(theta.into()), [control, target])
    }

    /// Apply controlled-phase gate.
    pub fn cp(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.standard(StandardGate::CP(theta.into()), [control, target])
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::CCX, [c1, c2, target])
    }

    /// Apply Fredkin (CSWAP) gate.
    pub fn cswap(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::CSwap, [control, t1, t2])
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply any gate, including boxes.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::gate(gate, qubits))?;
        Ok(self)
    }

    /// Apply a gate that fires only when `condition` holds.
    pub fn conditional_gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
        condition: ClassicalCondition,
    ) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::conditional(gate, qubits, condition))?;
        Ok(self)
    }

    /// Embed a boxed sub-circuit on `qubits`.
    pub fn add_box(
        &mut self,
        circuit_box: CircuitBox,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.gate(circuit_box, qubits)
    }

    /// Apply a diagonal unitary on `qubits`.
    pub fn add_diagonal(
        &mut self,
        diagonal: DiagonalBox,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.gate(diagonal, qubits)
    }

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::measure(qubit, clbit))?;
        Ok(self)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::reset(qubit))?;
        Ok(self)
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::barrier(qubits))?;
        Ok(self)
    }

    /// Append an already-built instruction.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.dag.apply(instruction)?;
        Ok(self)
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// The conjugate transpose: commands reversed, each one inverted.
    ///
    /// Fails with [`IrError::NotUnitary`] on measurements, resets and
    /// conditional gates.
    pub fn dagger(&self) -> IrResult<Self> {
        let mut inverse = self.empty_like();
        inverse.set_global_phase(-self.global_phase());
        let ops: Vec<&Instruction> = self.instructions().collect();
        for inst in ops.into_iter().rev() {
            inverse.dag.apply(inst.inverse()?)?;
        }
        Ok(inverse)
    }

    /// Append `other` on fresh wires (disjoint tensor product).
    ///
    /// `other`'s registers are recreated under their own names; a clash with
    /// an existing register fails with [`IrError::DuplicateRegister`]. The
    /// returned map relocates `other`'s qubit ids, so register handles taken
    /// from `other` can be carried over with
    /// [`QuantumRegister::relocated`].
    pub fn extend_disjoint(&mut self, other: &Circuit) -> IrResult<QubitMap> {
        for reg in other.qregs.iter().map(QuantumRegister::name) {
            if self.qreg(reg).is_some() {
                return Err(IrError::DuplicateRegister(reg.to_string()));
            }
        }
        for reg in other.cregs.iter().map(ClassicalRegister::name) {
            if self.creg(reg).is_some() {
                return Err(IrError::DuplicateRegister(reg.to_string()));
            }
        }

        let mut qubit_map = QubitMap::default();
        for reg in &other.qregs {
            let fresh = self.add_qreg(reg.name(), reg.len())?;
            for (from, to) in reg.iter().zip(fresh.iter()) {
                qubit_map.insert(from, to);
            }
        }
        let mut clbit_map: FxHashMap<ClbitId, ClbitId> = FxHashMap::default();
        for reg in &other.cregs {
            let fresh = self.add_creg(reg.name(), reg.len())?;
            for (&from, &to) in reg.clbits().iter().zip(fresh.clbits()) {
                clbit_map.insert(from, to);
            }
        }

        for inst in other.instructions() {
            self.dag.apply(inst.remapped(
                |q| qubit_map.map(q),
                |c| clbit_map.get(&c).copied().unwrap_or(c),
            ))?;
        }
        self.set_global_phase(self.global_phase() + other.global_phase());
        Ok(qubit_map)
    }

    /// The disjoint tensor product `self ⊗ other` as a new circuit.
    pub fn tensor(&self, other: &Circuit) -> IrResult<Self> {
        let mut product = self.clone();
        product.extend_disjoint(other)?;
        Ok(product)
    }

    /// Inline `other`'s commands, mapping its `i`-th qubit to `qubits[i]`
    /// and its `j`-th classical bit to `clbits[j]`.
    pub fn append(
        &mut self,
        other: &Circuit,
        qubits: &[QubitId],
        clbits: &[ClbitId],
    ) -> IrResult<&mut Self> {
        if qubits.len() != other.num_qubits() {
            return Err(IrError::WireCountMismatch {
                wire: "qubits",
                source_width: other.num_qubits(),
                target_width: qubits.len(),
            });
        }
        if clbits.len() != other.num_clbits() {
            return Err(IrError::WireCountMismatch {
                wire: "classical bits",
                source_width: other.num_clbits(),
                target_width: clbits.len(),
            });
        }
        let mut seen = FxHashSet::default();
        for &qubit in qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: None,
                });
            }
        }

        for inst in other.instructions() {
            self.dag.apply(inst.remapped(
                |q| qubits[q.0 as usize],
                |c| clbits[c.0 as usize],
            ))?;
        }
        self.set_global_phase(self.global_phase() + other.global_phase());
        Ok(self)
    }

    /// A circuit with the same name, registers and global phase but no
    /// commands.
    #[allow(clippy::cast_possible_truncation)]
    pub fn empty_like(&self) -> Self {
        let mut empty = Self::new(self.name.clone());
        for reg in &self.qregs {
            empty.push_qreg(reg.name().to_string(), reg.len() as u32);
        }
        for reg in &self.cregs {
            empty.push_creg(reg.name().to_string(), reg.len() as u32);
        }
        empty.set_global_phase(self.global_phase());
        empty
    }

    /// Copy of this circuit without the classical registers none of whose
    /// bits are referenced by any command. Remaining bits are renumbered.
    #[allow(clippy::cast_possible_truncation)]
    pub fn without_unused_cregs(&self) -> IrResult<Self> {
        let used: FxHashSet<ClbitId> = self
            .instructions()
            .flat_map(|inst| inst.clbits.iter().copied())
            .collect();

        let mut pruned = Self::new(self.name.clone());
        for reg in &self.qregs {
            pruned.push_qreg(reg.name().to_string(), reg.len() as u32);
        }
        let mut clbit_map: FxHashMap<ClbitId, ClbitId> = FxHashMap::default();
        for reg in &self.cregs {
            if !reg.clbits().iter().any(|c| used.contains(c)) {
                continue;
            }
            let fresh = pruned.push_creg(reg.name().to_string(), reg.len() as u32);
            for (&from, &to) in reg.clbits().iter().zip(fresh.clbits()) {
                clbit_map.insert(from, to);
            }
        }

        for inst in self.instructions() {
            pruned
                .dag
                .apply(inst.remapped(|q| q, |c| clbit_map.get(&c).copied().unwrap_or(c)))?;
        }
        pruned.set_global_phase(self.global_phase());
        Ok(pruned)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the circuit.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the number of commands.
    pub fn num_ops(&self) -> usize {
        self.dag.num_ops()
    }

    /// Get the circuit depth.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Iterate over commands in program order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> + '_ {
        self.dag.ops()
    }

    /// Get the global phase in radians.
    pub fn global_phase(&self) -> f64 {
        self.dag.global_phase()
    }

    /// Set the global phase in radians.
    pub fn set_global_phase(&mut self, phase: f64) {
        self.dag.set_global_phase(phase);
    }

    /// Get a reference to the underlying DAG.
    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the qubit ids in allocation order.
    pub fn qubit_ids(&self) -> Vec<QubitId> {
        self.qubits.iter().map(|q| q.id).collect()
    }

    /// Get the classical bits in the circuit.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Get the quantum registers in allocation order.
    pub fn qregs(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    /// Get the classical registers in allocation order.
    pub fn cregs(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    /// Look up a quantum register by name.
    pub fn qreg(&self, name: &str) -> Option<&QuantumRegister> {
        self.qregs.iter().find(|r| r.name() == name)
    }

    /// Look up a classical register by name.
    pub fn creg(&self, name: &str) -> Option<&ClassicalRegister> {
        self.cregs.iter().find(|r| r.name() == name)
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a QFT circuit (without measurements).
    pub fn qft(n: u32) -> IrResult<Self> {
        use std::f64::consts::PI;

        let mut circuit = Self::with_size("QFT", n, 0);

        for i in 0..n {
            circuit.h(QubitId(i))?;
            for j in (i + 1)..n {
                let angle = PI / f64::from(j - i).exp2();
                circuit.cp(angle, QubitId(j), QubitId(i))?;
            }
        }

        // Bit reversal
        for i in 0..n / 2 {
            circuit.swap(QubitId(i), QubitId(n - 1 - i))?;
        }

        Ok(circuit)
    }
}

impl PartialEq for Circuit {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.qregs == other.qregs
            && self.cregs == other.cregs
            && self.global_phase() == other.global_phase()
            && self.instructions().eq(other.instructions())
    }
}

// =============================================================================
// Serialization
// =============================================================================

#[derive(Serialize, Deserialize)]
struct RegisterRepr {
    name: String,
    size: usize,
}

/// Flat wire format: register declarations then commands in program order.
#[derive(Serialize, Deserialize)]
struct CircuitRepr {
    name: String,
    #[serde(default)]
    qregs: Vec<RegisterRepr>,
    #[serde(default)]
    cregs: Vec<RegisterRepr>,
    #[serde(default)]
    global_phase: f64,
    #[serde(default)]
    instructions: Vec<Instruction>,
}

impl From<&Circuit> for CircuitRepr {
    fn from(circuit: &Circuit) -> Self {
        Self {
            name: circuit.name.clone(),
            qregs: circuit
                .qregs
                .iter()
                .map(|r| RegisterRepr {
                    name: r.name().to_string(),
                    size: r.len(),
                })
                .collect(),
            cregs: circuit
                .cregs
                .iter()
                .map(|r| RegisterRepr {
                    name: r.name().to_string(),
                    size: r.len(),
                })
                .collect(),
            global_phase: circuit.global_phase(),
            instructions: circuit.instructions().cloned().collect(),
        }
    }
}

impl TryFrom<CircuitRepr> for Circuit {
    type Error = IrError;

    fn try_from(repr: CircuitRepr) -> Result<Self, Self::Error> {
        let mut circuit = Circuit::new(repr.name);
        for reg in repr.qregs {
            circuit.add_qreg(reg.name, reg.size)?;
        }
        for reg in repr.cregs {
            circuit.add_creg(reg.name, reg.size)?;
        }
        for inst in repr.instructions {
            circuit.dag.apply(inst)?;
        }
        circuit.set_global_phase(repr.global_phase);
        Ok(circuit)
    }
}

impl Serialize for Circuit {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CircuitRepr::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Circuit {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = CircuitRepr::deserialize(deserializer)?;
        Circuit::try_from(repr).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
    }

    #[test]
    fn test_circuit_with_size() {
        let circuit = Circuit::with_size("test", 3, 2);
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.qreg("q").map(QuantumRegister::len), Some(3));
        assert!(Circuit::with_size("test", 2, 0).cregs().is_empty());
    }

    #[test]
    fn test_add_registers() {
        let mut circuit = Circuit::new("test");
        let c = circuit.add_qreg("C", 2).unwrap();
        let t = circuit.add_qreg("T", 2).unwrap();

        assert_eq!(c.qubits(), &[QubitId(0), QubitId(1)]);
        assert_eq!(t.qubits(), &[QubitId(2), QubitId(3)]);
        assert_eq!(format!("{}", circuit.qubits()[3]), "T[1]");
        assert!(matches!(
            circuit.add_qreg("T", 1),
            Err(IrError::DuplicateRegister(name)) if name == "T"
        ));
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size("test", 2, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(1))
            .unwrap();

        assert_eq!(circuit.depth(), 3); // H, CX, parallel measures
    }

    #[test]
    fn test_dagger_reverses_and_inverts() {
        let mut circuit = Circuit::with_size("a", 2, 0);
        circuit
            .h(QubitId(0))
            .unwrap()
            .t(QubitId(1))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();
        circuit.set_global_phase(0.5);

        let inv = circuit.dagger().unwrap();
        let names: Vec<_> = inv.instructions().map(Instruction::name).collect();
        assert_eq!(names, vec!["cx", "tdg", "h"]);
        assert!((inv.global_phase() + 0.5).abs() < 1e-12);
        assert_eq!(inv.dagger().unwrap(), circuit);
    }

    #[test]
    fn test_dagger_rejects_measurement() {
        let mut circuit = Circuit::with_size("m", 1, 1);
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        assert!(matches!(circuit.dagger(), Err(IrError::NotUnitary(_))));
    }

    #[test]
    fn test_extend_disjoint_relocates_handles() {
        let mut left = Circuit::new("left");
        let a = left.add_qreg("a", 1).unwrap();
        left.h(a.qubits()[0]).unwrap();

        let mut right = Circuit::new("right");
        let b = right.add_qreg("b", 2).unwrap();
        right.cx(b.qubits()[0], b.qubits()[1]).unwrap();

        let map = left.extend_disjoint(&right).unwrap();
        let b = b.relocated(&map);
        assert_eq!(left.num_qubits(), 3);
        assert_eq!(b.qubits(), &[QubitId(1), QubitId(2)]);
        assert_eq!(left.qreg("b"), Some(&b));

        let last = left.instructions().last().unwrap();
        assert_eq!(last.qubits, vec![QubitId(1), QubitId(2)]);

        assert!(matches!(
            left.extend_disjoint(&right),
            Err(IrError::DuplicateRegister(_))
        ));
    }

    #[test]
    fn test_append_maps_qubits() {
        let mut inner = Circuit::with_size("u", 2, 0);
        inner.cx(QubitId(0), QubitId(1)).unwrap();

        let mut outer = Circuit::with_size("outer", 3, 0);
        outer
            .append(&inner, &[QubitId(2), QubitId(0)], &[])
            .unwrap();
        let inst = outer.instructions().next().unwrap();
        assert_eq!(inst.qubits, vec![QubitId(2), QubitId(0)]);

        assert!(matches!(
            outer.append(&inner, &[QubitId(0)], &[]),
            Err(IrError::WireCountMismatch { .. })
        ));
        assert!(matches!(
            outer.append(&inner, &[QubitId(1), QubitId(1)], &[]),
            Err(IrError::DuplicateQubit { .. })
        ));
    }

    #[test]
    fn test_without_unused_cregs() {
        let mut circuit = Circuit::new("p");
        let q = circuit.add_qreg("q", 1).unwrap();
        let unused = circuit.add_creg("unused", 2).unwrap();
        let used = circuit.add_creg("m", 1).unwrap();
        circuit.measure(q.qubits()[0], used.clbits()[0]).unwrap();
        assert_eq!(unused.len(), 2);

        let pruned = circuit.without_unused_cregs().unwrap();
        assert_eq!(pruned.num_clbits(), 1);
        assert!(pruned.creg("unused").is_none());
        let inst = pruned.instructions().next().unwrap();
        assert_eq!(inst.clbits, vec![ClbitId(0)]);
    }

    #[test]
    fn test_qft_structure() {
        let circuit = Circuit::qft(3).unwrap();
        assert_eq!(circuit.num_qubits(), 3);
        // 3 H + 3 CP + 1 SWAP
        assert_eq!(circuit.num_ops(), 7);
        let cp = circuit
            .instructions()
            .find(|i| i.name() == "cp")
            .and_then(|i| i.as_gate().and_then(Gate::as_standard).cloned());
        assert_eq!(cp, Some(StandardGate::CP(ParameterExpression::constant(PI / 2.0))));
    }

    #[test]
    fn test_wide_qft_angles() {
        let circuit = Circuit::qft(40).unwrap();
        // 40 H + 780 CP + 20 SWAP
        assert_eq!(circuit.num_ops(), 40 + 40 * 39 / 2 + 20);

        let farthest = circuit
            .instructions()
            .find(|i| i.name() == "cp" && i.qubits == vec![QubitId(39), QubitId(0)])
            .and_then(|i| match i.as_gate().and_then(Gate::as_standard) {
                Some(StandardGate::CP(theta)) => theta.as_f64(),
                _ => None,
            })
            .unwrap();
        let expected = PI / 2f64.powi(39);
        assert!((farthest - expected).abs() <= expected * 1e-12);
    }

    #[test]
    fn test_json_roundtrip_preserves_registers() {
        let mut circuit = Circuit::new("rt");
        let c = circuit.add_qreg("C", 1).unwrap();
        let t = circuit.add_qreg("T", 1).unwrap();
        let m = circuit.add_creg("m", 1).unwrap();
        circuit
            .h(c.qubits()[0])
            .unwrap()
            .measure(c.qubits()[0], m.clbits()[0])
            .unwrap()
            .conditional_gate(
                StandardGate::X,
                [t.qubits()[0]],
                ClassicalCondition::bit(m.clbits()[0]),
            )
            .unwrap();

        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
        assert_eq!(back.qreg("T"), Some(&t));
    }
}
