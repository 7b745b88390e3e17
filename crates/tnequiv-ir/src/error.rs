//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not found in circuit.
    #[error("Qubit {qubit:?} not found in circuit{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Classical bit not found in circuit.
    #[error("Classical bit {clbit:?} not found in circuit{}", format_gate_context(.gate_name))]
    ClbitNotFound {
        /// The classical bit that was not found.
        clbit: ClbitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Invalid DAG structure.
    #[error("Invalid DAG structure: {0}")]
    InvalidDag(String),

    /// Gate requires different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit:?} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A register with this name already exists in the circuit.
    #[error("Register '{0}' already exists in circuit")]
    DuplicateRegister(String),

    /// Composing two circuits with incompatible wire counts.
    #[error("Cannot map {source_width} {wire} onto {target_width} {wire}")]
    WireCountMismatch {
        /// "qubits" or "classical bits".
        wire: &'static str,
        /// Wires in the circuit being inserted.
        source_width: usize,
        /// Wires supplied for the mapping.
        target_width: usize,
    },

    /// Operation has no inverse (measurement, reset, classical control).
    #[error("Operation '{0}' is not unitary and cannot be inverted")]
    NotUnitary(String),

    /// Diagonal box entries are malformed.
    #[error("Invalid diagonal: {0}")]
    InvalidDiagonal(String),

    /// Circuit exceeds the addressable qubit range.
    #[error("Circuit width {0} exceeds the addressable qubit range")]
    WidthOverflow(usize),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
