//! tnequiv Equivalence Checking
//!
//! Decides whether two quantum circuits implement the same unitary up to
//! global phase by contracting Choi-state overlaps instead of building
//! matrices.
//!
//! # Overview
//!
//! - [`build_bell_pairs`]: `n` Bell pairs over two fresh registers
//! - [`embed_choi_state`]: unitary applied to one half of the pairs
//! - [`embed_diagonal_choi_state`]: `n`-qubit Choi state of a diagonal
//! - [`build_ancilla_check_circuit`]: one side of a partial-equivalence overlap
//! - [`eliminate_conditionals`]: deferred-measurement rewrite of gadgets
//! - [`EquivalenceChecker`]: verdicts through a contraction oracle
//!
//! # Pipeline
//!
//! ```text
//!   A, B ──→ validate ──→ embed (Choi / ancilla) ──→ prepare ──→ oracle ──→ | |ov| - 1 | ≤ tol
//!             eager         tnequiv-check            tnequiv-compile   tnequiv-oracle
//! ```
//!
//! # Example
//!
//! ```rust
//! use tnequiv_check::{build_ancilla_check_circuit, embed_choi_state, Orientation};
//! use tnequiv_ir::{Circuit, QubitId};
//!
//! let mut a = Circuit::with_size("a", 2, 0);
//! a.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let choi = embed_choi_state(&a).unwrap();
//! assert_eq!(choi.num_qubits(), 4);
//!
//! let b = Circuit::with_size("b", 3, 0);
//! let lhs = build_ancilla_check_circuit(&a, &b, Orientation::Lhs).unwrap();
//! assert_eq!(lhs.num_qubits(), 9);
//! ```

pub mod ancilla;
pub mod bell;
pub mod checker;
pub mod choi;
pub mod config;
pub mod error;
pub mod preprocess;

pub use ancilla::{Orientation, ancilla_check_width, build_ancilla_check_circuit};
pub use bell::{BellPairs, build_bell_pairs};
pub use checker::{CheckMode, EquivalenceChecker, EquivalenceClaim};
pub use choi::{embed_boxed_choi_state, embed_choi_state, embed_diagonal_choi_state};
pub use config::{CheckerConfig, DEFAULT_TOLERANCE};
pub use error::{EquivError, EquivResult};
pub use preprocess::{eliminate_conditionals, eliminate_conditionals_with_report};
