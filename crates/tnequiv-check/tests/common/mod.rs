//! Shared helpers for the integration tests.
//!
//! [`StubOracle`] answers every contraction from a fixed [`StubBehavior`] and
//! counts sessions, contractions and releases so tests can check that a
//! failing contraction is neither retried nor leaked. It also refuses any
//! circuit that still contains a box, which catches a skipped preparation
//! step.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use num_complex::Complex64;

use tnequiv_ir::Circuit;
use tnequiv_oracle::{
    ContractionOracle, OracleCapabilities, OracleError, OracleResult, OverlapSession, SessionId,
};

/// Install a test subscriber honoring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// What every contraction of a [`StubOracle`] does.
#[derive(Debug, Clone, Copy)]
pub enum StubBehavior {
    /// Return this overlap.
    Fixed(Complex64),
    /// Fail with a backend error.
    Fail,
    /// Return NaN.
    NonFinite,
    /// Never finish.
    Hang,
}

#[derive(Debug, Default)]
pub struct StubCounters {
    pub opened: AtomicUsize,
    pub contracted: AtomicUsize,
    pub released: AtomicUsize,
}

impl StubCounters {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn contracted(&self) -> usize {
        self.contracted.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

pub struct StubOracle {
    behavior: StubBehavior,
    capabilities: OracleCapabilities,
    counters: Arc<StubCounters>,
}

impl StubOracle {
    pub fn new(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            capabilities: OracleCapabilities::exact_cpu("stub", 64),
            counters: Arc::new(StubCounters::default()),
        }
    }

    pub fn returning(overlap: Complex64) -> Self {
        Self::new(StubBehavior::Fixed(overlap))
    }

    pub fn counters(&self) -> Arc<StubCounters> {
        Arc::clone(&self.counters)
    }
}

#[async_trait]
impl ContractionOracle for StubOracle {
    fn name(&self) -> &str {
        "stub"
    }

    fn capabilities(&self) -> &OracleCapabilities {
        &self.capabilities
    }

    async fn open_session(
        &self,
        bra: &Circuit,
        ket: &Circuit,
    ) -> OracleResult<Box<dyn OverlapSession>> {
        for circuit in [bra, ket] {
            if let Some(inst) = circuit.instructions().find(|i| i.is_box()) {
                return Err(OracleError::UnsupportedOperation(format!(
                    "box {} reached the oracle",
                    inst.name()
                )));
            }
        }
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(StubSession {
            id: SessionId::new(),
            behavior: self.behavior,
            counters: Arc::clone(&self.counters),
            released: false,
        }))
    }
}

struct StubSession {
    id: SessionId,
    behavior: StubBehavior,
    counters: Arc<StubCounters>,
    released: bool,
}

#[async_trait]
impl OverlapSession for StubSession {
    fn id(&self) -> SessionId {
        self.id
    }

    async fn contract(&mut self) -> OracleResult<Complex64> {
        if self.released {
            return Err(OracleError::SessionClosed(self.id));
        }
        self.counters.contracted.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            StubBehavior::Fixed(overlap) => Ok(overlap),
            StubBehavior::Fail => Err(OracleError::Backend("out of device memory".into())),
            StubBehavior::NonFinite => Ok(Complex64::new(f64::NAN, 0.0)),
            StubBehavior::Hang => std::future::pending().await,
        }
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.counters.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}
