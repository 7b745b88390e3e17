//! Error types for the compilation crate.

use thiserror::Error;

/// Errors raised by normalization passes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] tnequiv_ir::IrError),

    /// A classically controlled operation cannot be rewritten into a
    /// unitary one.
    #[error("Unsupported conditional '{gate}': {reason}")]
    UnsupportedConditional {
        /// Name of the conditional's payload operation.
        gate: String,
        /// What made it unsupported.
        reason: String,
    },

    /// The circuit still holds operations a contraction engine cannot take.
    #[error("Circuit '{circuit}' is not ready for contraction: {reason}")]
    NotContractible {
        /// Name of the offending circuit.
        circuit: String,
        /// The first offending operation found.
        reason: String,
    },
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
