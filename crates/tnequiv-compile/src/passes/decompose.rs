//! Box decomposition.

use serde::{Deserialize, Serialize};
use tracing::debug;

use tnequiv_ir::{Circuit, GateKind, Instruction, InstructionKind, QubitId};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::synthesis::synthesize_diagonal;

/// What [`DecomposeBoxes`] expanded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompositionStats {
    /// Circuit boxes inlined, nested ones included.
    pub boxes_inlined: usize,
    /// Diagonal boxes synthesized into CX and phase gates.
    pub diagonals_synthesized: usize,
}

/// Expand every box into elementary gates.
///
/// Circuit boxes are inlined recursively with their qubits mapped onto the
/// box's operands and their global phase added to the outer circuit.
/// Diagonal boxes are synthesized as phase polynomials. Labels are dropped.
pub struct DecomposeBoxes;

impl Pass for DecomposeBoxes {
    fn name(&self) -> &'static str {
        "decompose_boxes"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let mut out = circuit.empty_like();
        let mut stats = DecompositionStats::default();
        let mut global_phase = circuit.global_phase();

        for inst in circuit.instructions() {
            global_phase += expand(inst, &mut out, &mut stats)?;
        }
        out.set_global_phase(global_phase);

        debug!(
            "Inlined {} boxes and synthesized {} diagonals",
            stats.boxes_inlined, stats.diagonals_synthesized
        );
        properties.insert(stats);
        *circuit = out;
        Ok(())
    }

    fn should_run(&self, circuit: &Circuit, _properties: &PropertySet) -> bool {
        circuit.instructions().any(Instruction::is_box)
    }
}

/// Push the elementary form of `inst` onto `out` and return the global phase
/// it contributes.
fn expand(
    inst: &Instruction,
    out: &mut Circuit,
    stats: &mut DecompositionStats,
) -> CompileResult<f64> {
    let InstructionKind::Gate(gate) = &inst.kind else {
        out.push(inst.clone())?;
        return Ok(0.0);
    };
    if gate.kind.is_box() && gate.is_conditional() {
        return Err(CompileError::UnsupportedConditional {
            gate: gate.name().to_string(),
            reason: "conditional boxes cannot be inlined".into(),
        });
    }

    match &gate.kind {
        GateKind::Standard(_) => {
            out.push(inst.clone())?;
            Ok(0.0)
        }
        GateKind::Box(circuit_box) => {
            stats.boxes_inlined += 1;
            let inner = circuit_box.circuit();
            let operands = &inst.qubits;
            let mut phase = inner.global_phase();
            for inner_inst in inner.instructions() {
                let mapped = inner_inst.remapped(|q: QubitId| operands[q.0 as usize], |c| c);
                phase += expand(&mapped, out, stats)?;
            }
            Ok(phase)
        }
        GateKind::Diagonal(diagonal) => {
            stats.diagonals_synthesized += 1;
            let poly = synthesize_diagonal(&diagonal.phases(), &inst.qubits);
            for gate_inst in poly.instructions {
                out.push(gate_inst)?;
            }
            Ok(poly.global_phase)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tnequiv_ir::{CircuitBox, DiagonalBox};

    #[test]
    fn test_inline_maps_operands() {
        let mut inner = Circuit::with_size("u", 2, 0);
        inner.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        inner.set_global_phase(0.25);

        let mut outer = Circuit::with_size("outer", 3, 0);
        outer
            .add_box(
                CircuitBox::new(&inner).unwrap().with_label("B"),
                [QubitId(2), QubitId(1)],
            )
            .unwrap();

        let mut props = PropertySet::new();
        DecomposeBoxes.run(&mut outer, &mut props).unwrap();

        let ops: Vec<_> = outer.instructions().collect();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].qubits, vec![QubitId(2)]);
        assert_eq!(ops[1].qubits, vec![QubitId(2), QubitId(1)]);
        assert!((outer.global_phase() - 0.25).abs() < 1e-12);
        assert_eq!(
            props.get::<DecompositionStats>().map(|s| s.boxes_inlined),
            Some(1)
        );
    }

    #[test]
    fn test_nested_boxes() {
        let mut leaf = Circuit::with_size("leaf", 1, 0);
        leaf.t(QubitId(0)).unwrap();

        let mut middle = Circuit::with_size("middle", 2, 0);
        middle
            .add_box(CircuitBox::new(&leaf).unwrap(), [QubitId(1)])
            .unwrap();

        let mut outer = Circuit::with_size("outer", 2, 0);
        outer
            .add_box(CircuitBox::new(&middle).unwrap(), [QubitId(1), QubitId(0)])
            .unwrap();

        let mut props = PropertySet::new();
        DecomposeBoxes.run(&mut outer, &mut props).unwrap();

        let ops: Vec<_> = outer.instructions().collect();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].name(), "t");
        assert_eq!(ops[0].qubits, vec![QubitId(0)]);
        assert_eq!(props.get::<DecompositionStats>().unwrap().boxes_inlined, 2);
    }

    #[test]
    fn test_diagonal_synthesized() {
        let mut circuit = Circuit::with_size("d", 2, 0);
        let diagonal = DiagonalBox::from_phases([0.0, 0.5, -0.5, 1.0]).unwrap();
        circuit
            .add_diagonal(diagonal, [QubitId(0), QubitId(1)])
            .unwrap();

        let mut props = PropertySet::new();
        assert!(DecomposeBoxes.should_run(&circuit, &props));
        DecomposeBoxes.run(&mut circuit, &mut props).unwrap();

        assert!(!circuit.instructions().any(Instruction::is_box));
        assert!(!DecomposeBoxes.should_run(&circuit, &props));
        assert_eq!(
            props.get::<DecompositionStats>().unwrap().diagonals_synthesized,
            1
        );
    }
}
