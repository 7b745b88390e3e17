//! Overlap sessions and their scoped guard.
//!
//! A session owns whatever engine resources one contraction needs (device
//! buffers, a contraction path, workspace memory). Its lifecycle:
//!
//! ```text
//!   open_session() ──→ contract() ──→ release()
//!                          │              ▲
//!                          └── error ─────┘
//! ```
//!
//! **Invariants:**
//! - `release()` is called exactly once per session, whether or not
//!   `contract()` succeeded. [`ScopedSession`] enforces this on drop.
//! - A released session never contracts again.
//! - Failures are never retried here.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{OracleError, OracleResult};

/// Unique identifier for an overlap session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a session ID from a string.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One bra/ket contraction held open on an oracle.
#[async_trait]
pub trait OverlapSession: Send {
    /// Identifier of this session.
    fn id(&self) -> SessionId;

    /// Contract `<bra|ket>`.
    ///
    /// Fails with [`OracleError::SessionClosed`] after [`release`](Self::release).
    async fn contract(&mut self) -> OracleResult<Complex64>;

    /// Free the engine resources held by this session.
    ///
    /// Must be idempotent and must not fail.
    fn release(&mut self);
}

/// RAII guard that releases its session when dropped.
///
/// Dropping the guard mid-contraction (for example when a timeout fires and
/// the contraction future is cancelled) still releases the session.
pub struct ScopedSession {
    inner: Box<dyn OverlapSession>,
    released: bool,
}

impl ScopedSession {
    /// Take ownership of an open session.
    pub fn new(inner: Box<dyn OverlapSession>) -> Self {
        debug!("Acquired overlap session {}", inner.id());
        Self {
            inner,
            released: false,
        }
    }

    /// Identifier of the guarded session.
    pub fn id(&self) -> SessionId {
        self.inner.id()
    }

    /// Contract the session, rejecting non-finite results.
    pub async fn contract(&mut self) -> OracleResult<Complex64> {
        if self.released {
            return Err(OracleError::SessionClosed(self.id()));
        }
        let overlap = self.inner.contract().await?;
        if !overlap.re.is_finite() || !overlap.im.is_finite() {
            warn!("Session {} returned non-finite overlap {}", self.id(), overlap);
            return Err(OracleError::NonFinite);
        }
        Ok(overlap)
    }

    /// Contract with an optional deadline.
    ///
    /// `None` waits indefinitely. On timeout the in-flight contraction is
    /// dropped and [`OracleError::Timeout`] is returned.
    pub async fn contract_with_timeout(
        &mut self,
        timeout: Option<Duration>,
    ) -> OracleResult<Complex64> {
        match timeout {
            None => self.contract().await,
            Some(limit) => tokio::time::timeout(limit, self.contract())
                .await
                .map_err(|_| OracleError::Timeout(limit))?,
        }
    }

    /// Release the session now instead of at drop.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if !self.released {
            self.inner.release();
            self.released = true;
            debug!("Released overlap session {}", self.inner.id());
        }
    }
}

impl Drop for ScopedSession {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl fmt::Debug for ScopedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedSession")
            .field("id", &self.inner.id())
            .field("released", &self.released)
            .finish()
    }
}
