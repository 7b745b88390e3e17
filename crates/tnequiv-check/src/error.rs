//! Error types for equivalence checking.

use thiserror::Error;

use tnequiv_compile::CompileError;
use tnequiv_ir::IrError;
use tnequiv_oracle::OracleError;

/// Errors that can occur while building check circuits or reaching a verdict.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EquivError {
    /// A requested width cannot be represented.
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// The ancilla construction needs a strictly wider second circuit.
    #[error(
        "Ancilla check needs the second circuit to be wider: first has {small} qubits, second has {large}"
    )]
    DimensionMismatch {
        /// Width of the reference circuit.
        small: usize,
        /// Width of the ancilla-padded circuit.
        large: usize,
    },

    /// The circuits cannot be compared in the requested mode.
    #[error("Incompatible circuits: {0}")]
    IncompatibleCircuits(String),

    /// Conditional elimination met a conditional it cannot rewrite.
    #[error("Unsupported conditional {gate}: {reason}")]
    UnsupportedConditional {
        /// Name of the conditional gate.
        gate: String,
        /// Why it cannot be rewritten.
        reason: String,
    },

    /// The contraction oracle failed or returned a non-finite overlap.
    #[error("Contraction failed: {0}")]
    ContractionFailure(#[from] OracleError),

    /// Invalid checker configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Circuit construction error.
    #[error("Circuit error: {0}")]
    Ir(#[from] IrError),

    /// Normalization pipeline error.
    #[error("Normalization error: {0}")]
    Compile(CompileError),
}

impl From<CompileError> for EquivError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::UnsupportedConditional { gate, reason } => {
                EquivError::UnsupportedConditional { gate, reason }
            }
            CompileError::Ir(e) => EquivError::Ir(e),
            other => EquivError::Compile(other),
        }
    }
}

/// Result type for equivalence checking.
pub type EquivResult<T> = Result<T, EquivError>;
