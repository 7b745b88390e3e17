//! Error types for the oracle crate.

use std::time::Duration;

use thiserror::Error;

use crate::session::SessionId;

/// Errors that can occur while computing an overlap.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OracleError {
    /// Circuit is wider than the oracle can contract.
    #[error("Circuit has {requested} qubits but the oracle supports at most {max}")]
    TooManyQubits {
        /// Width of the submitted circuit.
        requested: usize,
        /// Largest width the oracle accepts.
        max: usize,
    },

    /// Bra and ket circuits act on different numbers of qubits.
    #[error("Bra circuit has {bra} qubits, ket circuit has {ket}")]
    WidthMismatch {
        /// Width of the bra-preparation circuit.
        bra: usize,
        /// Width of the ket-preparation circuit.
        ket: usize,
    },

    /// The circuit contains an operation the oracle cannot contract.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A gate parameter is still symbolic.
    #[error("Unbound parameter in gate {0}")]
    UnboundParameter(String),

    /// Contraction produced NaN or infinity.
    #[error("Contraction returned a non-finite overlap")]
    NonFinite,

    /// The session was already released.
    #[error("Session {0} has been released")]
    SessionClosed(SessionId),

    /// Contraction did not finish in time.
    #[error("Contraction timed out after {0:?}")]
    Timeout(Duration),

    /// Generic engine failure.
    #[error("Oracle error: {0}")]
    Backend(String),
}

/// Result type for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;
