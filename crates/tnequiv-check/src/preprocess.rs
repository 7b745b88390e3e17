//! Conditional elimination for partial-equivalence workflows.
//!
//! Circuits that implement gates through measurement-based ancilla gadgets
//! carry mid-circuit measurements and classically controlled Paulis. Before
//! they can be compared as unitaries, each measure-then-conditional-X is
//! replaced by a CX from the measured qubit (deferred measurement).
//!
//! The rewrite takes the most recent measurement in program order as the
//! control of every following conditional. Circuits whose conditionals read
//! older measurements are rewritten incorrectly; no data-flow analysis is
//! attempted.

use tnequiv_compile::PassManagerBuilder;
use tnequiv_compile::passes::ConditionalEliminationReport;
use tnequiv_ir::Circuit;

use crate::error::EquivResult;

/// Rewrite `circuit` into a measurement-free, conditional-free circuit.
///
/// Barriers are kept. Classical registers left unused are removed. Fails
/// with [`EquivError::UnsupportedConditional`](crate::EquivError::UnsupportedConditional)
/// for conditionals on more than one bit, conditionals wrapping anything
/// other than X, and conditionals with no preceding measurement.
pub fn eliminate_conditionals(circuit: &Circuit) -> EquivResult<Circuit> {
    eliminate_conditionals_with_report(circuit).map(|(rewritten, _)| rewritten)
}

/// Like [`eliminate_conditionals`], also returning what was rewritten.
pub fn eliminate_conditionals_with_report(
    circuit: &Circuit,
) -> EquivResult<(Circuit, ConditionalEliminationReport)> {
    let (pm, mut props) = PassManagerBuilder::new()
        .with_conditional_elimination(true)
        .build();
    let mut rewritten = circuit.clone();
    pm.run(&mut rewritten, &mut props)?;
    let report = props
        .remove::<ConditionalEliminationReport>()
        .unwrap_or_default();
    Ok((rewritten, report))
}
