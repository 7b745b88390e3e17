//! Checker configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EquivError, EquivResult};

/// Default absolute tolerance on `| |overlap| - 1 |`.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

/// Configuration for an [`EquivalenceChecker`](crate::EquivalenceChecker).
///
/// Missing fields take their defaults when deserialized:
///
/// ```json
/// { "tolerance": 1e-6, "contraction_timeout": { "secs": 30, "nanos": 0 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Absolute tolerance on the overlap magnitude.
    pub tolerance: f64,
    /// Deadline for a single contraction. `None` waits indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contraction_timeout: Option<Duration>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            contraction_timeout: None,
        }
    }
}

impl CheckerConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overlap tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the contraction deadline.
    #[must_use]
    pub fn with_contraction_timeout(mut self, timeout: Duration) -> Self {
        self.contraction_timeout = Some(timeout);
        self
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> EquivResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EquivError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the tolerance is finite and non-negative.
    pub fn validate(&self) -> EquivResult<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(EquivError::Configuration(format!(
                "tolerance must be a non-negative finite number, got {}",
                self.tolerance
            )));
        }
        if self.contraction_timeout == Some(Duration::ZERO) {
            return Err(EquivError::Configuration(
                "contraction timeout must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Whether `|overlap|` is within tolerance of 1.
    pub fn accepts(&self, overlap_magnitude: f64) -> bool {
        (overlap_magnitude - 1.0).abs() <= self.tolerance
    }
}
