//! Contraction readiness verification.

use serde::{Deserialize, Serialize};
use tracing::debug;

use tnequiv_ir::Circuit;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Result of [`ContractionReadiness`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessResult {
    /// Whether the verification passed.
    pub passed: bool,
    /// Number of qubits in the verified circuit.
    pub num_qubits: usize,
    /// Number of elementary gates in the verified circuit.
    pub num_gates: usize,
}

/// Analysis pass asserting that only unconditional elementary gates remain.
///
/// Runs last in the preparation pipeline as a safety net: boxes, barriers,
/// measurements, resets and conditionals have no place in an overlap
/// contraction, and finding one means an earlier stage was skipped.
pub struct ContractionReadiness;

impl Pass for ContractionReadiness {
    fn name(&self) -> &'static str {
        "contraction_readiness"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        properties.insert(ReadinessResult::default());

        let offending = circuit.instructions().enumerate().find(|(_, inst)| {
            !inst.is_gate() || inst.is_box() || inst.is_conditional()
        });
        if let Some((position, inst)) = offending {
            let what = if inst.is_conditional() {
                format!("conditional {}", inst.name())
            } else {
                inst.name().to_string()
            };
            return Err(CompileError::NotContractible {
                circuit: circuit.name().to_string(),
                reason: format!("{what} at position {position}"),
            });
        }

        let result = ReadinessResult {
            passed: true,
            num_qubits: circuit.num_qubits(),
            num_gates: circuit.num_ops(),
        };
        debug!(
            "Circuit '{}' ready: {} qubits, {} gates",
            circuit.name(),
            result.num_qubits,
            result.num_gates
        );
        properties.insert(result);
        Ok(())
    }
}
