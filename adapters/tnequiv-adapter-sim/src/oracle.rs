//! Statevector contraction oracle.

use async_trait::async_trait;
use num_complex::Complex64;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, instrument};

use tnequiv_ir::Circuit;
use tnequiv_oracle::{
    ContractionOracle, OracleCapabilities, OracleError, OracleResult, OverlapSession, SessionId,
};

use crate::statevector::exact_overlap;

/// Default width limit: `2^24` amplitudes, 256 MiB per state.
pub const DEFAULT_MAX_QUBITS: usize = 24;

/// Bookkeeping for an open session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    /// Session identifier.
    pub id: SessionId,
    /// Name of the bra-preparation circuit.
    pub bra: String,
    /// Name of the ket-preparation circuit.
    pub ket: String,
    /// Width of both circuits.
    pub num_qubits: usize,
}

type SessionTable = Arc<Mutex<FxHashMap<SessionId, SessionInfo>>>;

/// Exact overlap oracle backed by dense statevector simulation.
///
/// Stands in for a tensor-network engine in tests and for small circuits.
/// Both circuits are simulated from `|0...0>` and the inner product is
/// taken directly, so results are exact up to rounding.
pub struct StatevectorOracle {
    capabilities: OracleCapabilities,
    sessions: SessionTable,
}

impl StatevectorOracle {
    /// Create an oracle with the default width limit.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create an oracle with a custom width limit.
    pub fn with_max_qubits(max_qubits: usize) -> Self {
        Self {
            capabilities: OracleCapabilities::exact_cpu("statevector", max_qubits),
            sessions: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    /// Number of sessions opened and not yet released.
    pub fn open_sessions(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Snapshot of the sessions opened and not yet released.
    pub fn active_sessions(&self) -> Vec<SessionInfo> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

impl Default for StatevectorOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContractionOracle for StatevectorOracle {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &OracleCapabilities {
        &self.capabilities
    }

    #[instrument(skip(self, bra, ket), fields(bra = %bra.name(), ket = %ket.name()))]
    async fn open_session(
        &self,
        bra: &Circuit,
        ket: &Circuit,
    ) -> OracleResult<Box<dyn OverlapSession>> {
        self.validate(bra, ket)?;

        let id = SessionId::new();
        let record = SessionInfo {
            id,
            bra: bra.name().to_string(),
            ket: ket.name().to_string(),
            num_qubits: bra.num_qubits(),
        };
        debug!(
            "Opened session {} for '{}' vs '{}' on {} qubits",
            id, record.bra, record.ket, record.num_qubits
        );
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, record);

        Ok(Box::new(StatevectorSession {
            id,
            bra: Arc::new(bra.clone()),
            ket: Arc::new(ket.clone()),
            sessions: Arc::clone(&self.sessions),
            released: false,
        }))
    }
}

/// One open overlap computation on a [`StatevectorOracle`].
struct StatevectorSession {
    id: SessionId,
    bra: Arc<Circuit>,
    ket: Arc<Circuit>,
    sessions: SessionTable,
    released: bool,
}

#[async_trait]
impl OverlapSession for StatevectorSession {
    fn id(&self) -> SessionId {
        self.id
    }

    async fn contract(&mut self) -> OracleResult<Complex64> {
        if self.released {
            return Err(OracleError::SessionClosed(self.id));
        }

        let bra = Arc::clone(&self.bra);
        let ket = Arc::clone(&self.ket);
        let start = Instant::now();

        // Simulation is CPU-bound; keep it off the async workers.
        let overlap = tokio::task::spawn_blocking(move || exact_overlap(&bra, &ket))
            .await
            .map_err(|e| OracleError::Backend(format!("Contraction task failed: {e}")))??;

        debug!(
            "Session {} contracted in {:?}: {}",
            self.id,
            start.elapsed(),
            overlap
        );
        Ok(overlap)
    }

    fn release(&mut self) {
        if !self.released {
            self.sessions
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&self.id);
            self.released = true;
        }
    }
}
