//! Conditional elimination by deferred measurement.
//!
//! A measurement followed by a gate conditioned on its outcome is replaced
//! by the controlled version of that gate, with the measured qubit as
//! control. The rewrite is a single forward scan. The only state carried
//! between commands is the most recent measurement; every conditional is
//! assumed to be controlled by it. No data-flow analysis is done, so a
//! conditional that reads an older measurement is still wired to the most
//! recent measured qubit (a warning is logged when the condition bit
//! disagrees).

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tnequiv_ir::{
    Circuit, ClbitId, GateKind, Instruction, InstructionKind, QubitId, StandardGate,
};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// What [`EliminateConditionals`] rewrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalEliminationReport {
    /// Measurements dropped from the circuit.
    pub measurements_removed: usize,
    /// Conditional gates turned into controlled gates.
    pub conditionals_rewritten: usize,
    /// Classical registers left unused and removed.
    pub pruned_registers: Vec<String>,
}

/// Rewrite measure-then-conditional-X patterns into CX gates.
///
/// Fails with [`CompileError::UnsupportedConditional`] when a conditional
/// reads more than one bit, fires on a value other than 1, wraps anything
/// but an X gate, has no measurement before it, or targets the measured
/// qubit itself.
pub struct EliminateConditionals;

impl Pass for EliminateConditionals {
    fn name(&self) -> &'static str {
        "eliminate_conditionals"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let mut out = circuit.empty_like();
        let mut report = ConditionalEliminationReport::default();
        let mut last_measured: Option<(QubitId, ClbitId)> = None;

        for inst in circuit.instructions() {
            match &inst.kind {
                InstructionKind::Measure => {
                    last_measured = Some((inst.qubits[0], inst.clbits[0]));
                    report.measurements_removed += 1;
                }
                InstructionKind::Gate(gate) if gate.is_conditional() => {
                    let control = controlled_replacement(inst, last_measured)?;
                    out.cx(control, inst.qubits[0])?;
                    report.conditionals_rewritten += 1;
                }
                _ => {
                    out.push(inst.clone())?;
                }
            }
        }

        let pruned = out.without_unused_cregs()?;
        report.pruned_registers = out
            .cregs()
            .iter()
            .filter(|r| pruned.creg(r.name()).is_none())
            .map(|r| r.name().to_string())
            .collect();

        debug!(
            "Removed {} measurements, rewrote {} conditionals, pruned registers {:?}",
            report.measurements_removed, report.conditionals_rewritten, report.pruned_registers
        );
        properties.insert(report);
        *circuit = pruned;
        Ok(())
    }

    fn should_run(&self, circuit: &Circuit, _properties: &PropertySet) -> bool {
        circuit
            .instructions()
            .any(|i| i.is_measure() || i.is_conditional())
    }
}

/// Validate a conditional and return the qubit that should control it.
fn controlled_replacement(
    inst: &Instruction,
    last_measured: Option<(QubitId, ClbitId)>,
) -> CompileResult<QubitId> {
    let unsupported = |reason: String| CompileError::UnsupportedConditional {
        gate: inst.name().to_string(),
        reason,
    };

    let Some(condition) = inst.condition() else {
        return Err(unsupported("gate carries no condition".into()));
    };
    if condition.width() != 1 {
        return Err(unsupported(format!(
            "condition reads {} bits, only single-bit conditions can be rewritten",
            condition.width()
        )));
    }
    if condition.value != 1 {
        return Err(unsupported(format!(
            "condition fires on value {}, only value 1 can be rewritten",
            condition.value
        )));
    }
    let is_x = inst
        .as_gate()
        .is_some_and(|g| matches!(g.kind, GateKind::Standard(StandardGate::X)));
    if !is_x {
        return Err(unsupported("only a conditional X can be rewritten".into()));
    }
    let Some((control, measured_bit)) = last_measured else {
        return Err(unsupported("no measurement precedes the conditional".into()));
    };
    if control == inst.qubits[0] {
        return Err(unsupported(format!(
            "target {control} is the measured qubit"
        )));
    }
    if condition.bits[0] != measured_bit {
        warn!(
            "Conditional on {} follows a measurement into {}; using {} as control",
            condition.bits[0], measured_bit, control
        );
    }
    Ok(control)
}
