//! tnequiv Statevector Oracle
//!
//! An exact [`ContractionOracle`](tnequiv_oracle::ContractionOracle) for
//! small circuits: both state-preparation circuits are simulated as dense
//! statevectors and their inner product is returned. Useful as a reference
//! engine in tests and for checking circuits up to a couple dozen qubits.
//!
//! The crate also exposes the underlying engine:
//!
//! - [`simulate`]: run a circuit on `|0...0>`
//! - [`circuit_unitary`]: full `2^n x 2^n` unitary as an `ndarray` matrix
//! - [`exact_overlap`]: `<0|bra† ket|0>` without the session machinery
//!
//! Qubit `i` is bit `i` of the basis-state index.
//!
//! # Example
//!
//! ```ignore
//! use tnequiv_adapter_sim::StatevectorOracle;
//! use tnequiv_oracle::ContractionOracle;
//!
//! let oracle = StatevectorOracle::new();
//! let overlap = oracle.overlap(&bra, &ket, None).await?;
//! assert!((overlap.norm() - 1.0).abs() < 1e-9);
//! ```

mod matrix;
mod oracle;
mod statevector;

pub use matrix::Matrix2;
pub use oracle::{DEFAULT_MAX_QUBITS, SessionInfo, StatevectorOracle};
pub use statevector::{Statevector, circuit_unitary, evolve, exact_overlap, simulate};
