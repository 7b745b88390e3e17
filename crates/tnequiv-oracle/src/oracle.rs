//! Contraction oracle trait and capabilities.
//!
//! The [`ContractionOracle`] trait is the only way the equivalence core
//! reaches a tensor-network engine:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ open_session() ──→ contract() ──→ release()
//!    (sync, &ref)        (sync)          (async)           (async)       (sync, drop)
//! ```
//!
//! ## Method table
//!
//! | Method | Kind | Required | Returns |
//! |--------|------|----------|---------|
//! | `name()` | sync | yes | `&str` |
//! | `capabilities()` | sync | yes | `&OracleCapabilities` |
//! | `validate()` | sync | provided | `OracleResult<()>` |
//! | `open_session()` | async | yes | `OracleResult<Box<dyn OverlapSession>>` |
//! | `overlap()` | async | provided | `OracleResult<Complex64>` |

use std::time::Duration;

use async_trait::async_trait;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tnequiv_ir::Circuit;

use crate::error::{OracleError, OracleResult};
use crate::session::{OverlapSession, ScopedSession};

/// What an oracle can contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleCapabilities {
    /// Name of the oracle.
    pub name: String,
    /// Widest circuit the oracle accepts.
    pub max_qubits: usize,
    /// Whether overlaps are exact up to floating-point rounding.
    pub exact: bool,
    /// Whether contraction runs on an accelerator.
    pub accelerated: bool,
}

impl OracleCapabilities {
    /// Capabilities of an exact CPU engine.
    pub fn exact_cpu(name: impl Into<String>, max_qubits: usize) -> Self {
        Self {
            name: name.into(),
            max_qubits,
            exact: true,
            accelerated: false,
        }
    }

    /// Mark the engine as accelerator-backed.
    #[must_use]
    pub fn with_acceleration(mut self, accelerated: bool) -> Self {
        self.accelerated = accelerated;
        self
    }
}

/// A tensor-network engine computing `<bra|ket>` for two state-preparation
/// circuits applied to `|0…0>`.
///
/// # Contract
///
/// - `capabilities()` is synchronous and infallible; cache it at
///   construction time.
/// - `open_session()` may assume `validate()` passed.
/// - Every session returned by `open_session()` is released exactly once,
///   which [`overlap`](Self::overlap) guarantees through [`ScopedSession`].
/// - Failures surface unchanged; nothing here retries.
#[async_trait]
pub trait ContractionOracle: Send + Sync {
    /// Get the name of this oracle.
    fn name(&self) -> &str;

    /// Get the capabilities of this oracle.
    fn capabilities(&self) -> &OracleCapabilities;

    /// Check a bra/ket pair against this oracle's limits.
    fn validate(&self, bra: &Circuit, ket: &Circuit) -> OracleResult<()> {
        if bra.num_qubits() != ket.num_qubits() {
            return Err(OracleError::WidthMismatch {
                bra: bra.num_qubits(),
                ket: ket.num_qubits(),
            });
        }
        let max = self.capabilities().max_qubits;
        if bra.num_qubits() > max {
            return Err(OracleError::TooManyQubits {
                requested: bra.num_qubits(),
                max,
            });
        }
        Ok(())
    }

    /// Acquire engine resources for one contraction of `bra` against `ket`.
    async fn open_session(
        &self,
        bra: &Circuit,
        ket: &Circuit,
    ) -> OracleResult<Box<dyn OverlapSession>>;

    /// Validate, open a scoped session, contract and release.
    ///
    /// The session is released whether contraction succeeds, fails or
    /// times out.
    async fn overlap(
        &self,
        bra: &Circuit,
        ket: &Circuit,
        timeout: Option<Duration>,
    ) -> OracleResult<Complex64> {
        self.validate(bra, ket)?;
        let mut session = ScopedSession::new(self.open_session(bra, ket).await?);
        let overlap = session.contract_with_timeout(timeout).await?;
        debug!(
            "Oracle {} session {} overlap = {}",
            self.name(),
            session.id(),
            overlap
        );
        Ok(overlap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionId;

    struct NullOracle {
        capabilities: OracleCapabilities,
    }

    struct NullSession(SessionId);

    #[async_trait]
    impl OverlapSession for NullSession {
        fn id(&self) -> SessionId {
            self.0
        }

        async fn contract(&mut self) -> OracleResult<Complex64> {
            Ok(Complex64::new(0.0, 0.0))
        }

        fn release(&mut self) {}
    }

    #[async_trait]
    impl ContractionOracle for NullOracle {
        fn name(&self) -> &str {
            &self.capabilities.name
        }

        fn capabilities(&self) -> &OracleCapabilities {
            &self.capabilities
        }

        async fn open_session(
            &self,
            _bra: &Circuit,
            _ket: &Circuit,
        ) -> OracleResult<Box<dyn OverlapSession>> {
            Ok(Box::new(NullSession(SessionId::new())))
        }
    }

    fn oracle(max_qubits: usize) -> NullOracle {
        NullOracle {
            capabilities: OracleCapabilities::exact_cpu("null", max_qubits),
        }
    }

    #[test]
    fn test_validate_width_mismatch() {
        let err = oracle(8)
            .validate(&Circuit::with_size("a", 2, 0), &Circuit::with_size("b", 3, 0))
            .unwrap_err();
        assert!(matches!(err, OracleError::WidthMismatch { bra: 2, ket: 3 }));
    }

    #[test]
    fn test_validate_too_many_qubits() {
        let wide = Circuit::with_size("w", 5, 0);
        let err = oracle(4).validate(&wide, &wide).unwrap_err();
        assert!(matches!(
            err,
            OracleError::TooManyQubits {
                requested: 5,
                max: 4
            }
        ));
    }

    #[tokio::test]
    async fn test_overlap_runs_through_session() {
        let c = Circuit::with_size("c", 1, 0);
        let value = oracle(4).overlap(&c, &c, None).await.unwrap();
        assert_eq!(value, Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_capabilities_builder() {
        let caps = OracleCapabilities::exact_cpu("gpu-tn", 40).with_acceleration(true);
        assert!(caps.exact);
        assert!(caps.accelerated);
        assert_eq!(caps.max_qubits, 40);
    }
}
