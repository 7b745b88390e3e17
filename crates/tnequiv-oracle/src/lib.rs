//! tnequiv Contraction Oracle Boundary
//!
//! The equivalence core never contracts tensor networks itself. It hands a
//! bra-preparation and a ket-preparation circuit to a [`ContractionOracle`]
//! and receives the complex overlap `<0|bra† ket|0>`.
//!
//! # Overview
//!
//! - [`ContractionOracle`]: engine interface (name, capabilities, sessions)
//! - [`OverlapSession`]: one open contraction holding engine resources
//! - [`ScopedSession`]: guard that releases a session on every exit path
//! - [`OracleCapabilities`]: width limit and engine traits
//!
//! # Implementations
//!
//! | Oracle | Crate | Engine |
//! |--------|-------|--------|
//! | `StatevectorOracle` | `tnequiv-adapter-sim` | exact CPU statevector |
//!
//! # Example
//!
//! ```ignore
//! use tnequiv_oracle::ContractionOracle;
//! use tnequiv_adapter_sim::StatevectorOracle;
//!
//! let oracle = StatevectorOracle::new();
//! let overlap = oracle.overlap(&bra, &ket, None).await?;
//! ```

pub mod error;
pub mod oracle;
pub mod session;

pub use error::{OracleError, OracleResult};
pub use oracle::{ContractionOracle, OracleCapabilities};
pub use session::{OverlapSession, ScopedSession, SessionId};
