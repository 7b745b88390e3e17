//! Equivalence verdicts from contraction overlaps.
//!
//! | Method | Circuits | Bra | Ket |
//! |--------|----------|-----|-----|
//! | `check_equivalence` | same width | Choi state of `A` | Choi state of `B` |
//! | `check_equivalence_with_ancillas` | `A` narrower | lhs check circuit | rhs check circuit |
//! | `check_diagonal_equivalence` | diagonal boxes | diagonal Choi of `A` | diagonal Choi of `B` |
//!
//! Both prepared states are normalized, so two circuits agree up to global
//! phase exactly when the overlap has magnitude 1. Every input is checked
//! before anything is built or contracted, and oracle failures are surfaced
//! as [`EquivError::ContractionFailure`] without retrying.

use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use tnequiv_compile::PassManagerBuilder;
use tnequiv_compile::passes::ReadinessResult;
use tnequiv_ir::{Circuit, DiagonalBox};
use tnequiv_oracle::ContractionOracle;

use crate::ancilla::{Orientation, build_ancilla_check_circuit};
use crate::choi::{embed_choi_state, embed_diagonal_choi_state};
use crate::config::CheckerConfig;
use crate::error::{EquivError, EquivResult};

/// How a pair of circuits was compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckMode {
    /// Choi states of two circuits of equal width.
    Full,
    /// Ancilla-padded check of a narrow circuit against a wider one.
    WithAncillas,
    /// Diagonal fast path on `n` qubits.
    Diagonal,
}

impl fmt::Display for CheckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckMode::Full => write!(f, "full"),
            CheckMode::WithAncillas => write!(f, "with_ancillas"),
            CheckMode::Diagonal => write!(f, "diagonal"),
        }
    }
}

/// Outcome of one equivalence evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquivalenceClaim {
    /// The comparison that was run.
    pub mode: CheckMode,
    /// Overlap returned by the oracle.
    pub overlap: Complex64,
    /// Whether `|overlap|` is within tolerance of 1.
    pub equivalent: bool,
}

impl EquivalenceClaim {
    /// `|overlap|`.
    pub fn magnitude(&self) -> f64 {
        self.overlap.norm()
    }

    /// Relative phase between the two circuits, meaningful only when
    /// [`equivalent`](Self::equivalent) holds.
    pub fn relative_phase(&self) -> f64 {
        self.overlap.arg()
    }
}

/// Decides circuit equivalence through a [`ContractionOracle`].
///
/// # Example
///
/// ```ignore
/// use tnequiv_adapter_sim::StatevectorOracle;
/// use tnequiv_check::EquivalenceChecker;
///
/// let checker = EquivalenceChecker::new(StatevectorOracle::new());
/// assert!(checker.check_equivalence(&a, &b).await?);
/// ```
#[derive(Debug)]
pub struct EquivalenceChecker<O> {
    oracle: O,
    config: CheckerConfig,
}

impl<O: ContractionOracle> EquivalenceChecker<O> {
    /// Create a checker with the default configuration.
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            config: CheckerConfig::default(),
        }
    }

    /// Create a checker with a validated configuration.
    pub fn with_config(oracle: O, config: CheckerConfig) -> EquivResult<Self> {
        config.validate()?;
        Ok(Self { oracle, config })
    }

    /// Get the oracle.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Get the configuration.
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Whether `a` and `b` implement the same unitary up to global phase.
    pub async fn check_equivalence(&self, a: &Circuit, b: &Circuit) -> EquivResult<bool> {
        Ok(self.evaluate_equivalence(a, b).await?.equivalent)
    }

    /// Like [`check_equivalence`](Self::check_equivalence), keeping the
    /// overlap.
    ///
    /// Fails with [`EquivError::IncompatibleCircuits`] when the widths differ
    /// or either circuit has classical bits.
    #[instrument(skip_all, fields(a = %a.name(), b = %b.name(), qubits = a.num_qubits()))]
    pub async fn evaluate_equivalence(
        &self,
        a: &Circuit,
        b: &Circuit,
    ) -> EquivResult<EquivalenceClaim> {
        if a.num_qubits() != b.num_qubits() {
            return Err(EquivError::IncompatibleCircuits(format!(
                "'{}' has {} qubits but '{}' has {}; use check_equivalence_with_ancillas \
                 when the second circuit carries ancillas",
                a.name(),
                a.num_qubits(),
                b.name(),
                b.num_qubits()
            )));
        }
        require_no_clbits(a)?;
        require_no_clbits(b)?;

        let bra = embed_choi_state(a)?;
        let ket = embed_choi_state(b)?;
        self.claim(CheckMode::Full, bra, ket).await
    }

    /// Whether `b`, with its extra qubits as ancillas starting and ending in
    /// `|0>`, implements `a` up to global phase.
    pub async fn check_equivalence_with_ancillas(
        &self,
        a: &Circuit,
        b: &Circuit,
    ) -> EquivResult<bool> {
        Ok(self.evaluate_equivalence_with_ancillas(a, b).await?.equivalent)
    }

    /// Like [`check_equivalence_with_ancillas`](Self::check_equivalence_with_ancillas),
    /// keeping the overlap.
    ///
    /// Fails with [`EquivError::IncompatibleCircuits`] unless `b` is strictly
    /// wider than `a` and neither has classical bits. Circuits with
    /// measurement-based gadgets go through
    /// [`eliminate_conditionals`](crate::eliminate_conditionals) first.
    #[instrument(
        skip_all,
        fields(a = %a.name(), b = %b.name(), ancillas = b.num_qubits().saturating_sub(a.num_qubits()))
    )]
    pub async fn evaluate_equivalence_with_ancillas(
        &self,
        a: &Circuit,
        b: &Circuit,
    ) -> EquivResult<EquivalenceClaim> {
        if a.num_qubits() == b.num_qubits() {
            return Err(EquivError::IncompatibleCircuits(format!(
                "'{}' and '{}' both have {} qubits; use check_equivalence",
                a.name(),
                b.name(),
                a.num_qubits()
            )));
        }
        if a.num_qubits() > b.num_qubits() {
            return Err(EquivError::IncompatibleCircuits(format!(
                "'{}' has {} qubits, more than the {} of '{}'; the ancilla circuit goes second",
                a.name(),
                a.num_qubits(),
                b.num_qubits(),
                b.name()
            )));
        }
        require_no_clbits(a)?;
        require_no_clbits(b)?;

        let bra = build_ancilla_check_circuit(a, b, Orientation::Lhs)?;
        let ket = build_ancilla_check_circuit(a, b, Orientation::Rhs)?;
        self.claim(CheckMode::WithAncillas, bra, ket).await
    }

    /// Compare two circuits in whichever mode their widths call for.
    pub async fn evaluate(&self, a: &Circuit, b: &Circuit) -> EquivResult<EquivalenceClaim> {
        if a.num_qubits() < b.num_qubits() {
            self.evaluate_equivalence_with_ancillas(a, b).await
        } else {
            self.evaluate_equivalence(a, b).await
        }
    }

    /// Whether two diagonal unitaries agree up to global phase.
    pub async fn check_diagonal_equivalence(
        &self,
        a: &DiagonalBox,
        b: &DiagonalBox,
    ) -> EquivResult<bool> {
        Ok(self.evaluate_diagonal_equivalence(a, b).await?.equivalent)
    }

    /// Like [`check_diagonal_equivalence`](Self::check_diagonal_equivalence),
    /// keeping the overlap. Uses `n` qubits instead of `2n`.
    #[instrument(skip_all, fields(qubits = a.num_qubits()))]
    pub async fn evaluate_diagonal_equivalence(
        &self,
        a: &DiagonalBox,
        b: &DiagonalBox,
    ) -> EquivResult<EquivalenceClaim> {
        if a.num_qubits() != b.num_qubits() {
            return Err(EquivError::IncompatibleCircuits(format!(
                "diagonals act on {} and {} qubits",
                a.num_qubits(),
                b.num_qubits()
            )));
        }
        let bra = embed_diagonal_choi_state(a)?;
        let ket = embed_diagonal_choi_state(b)?;
        self.claim(CheckMode::Diagonal, bra, ket).await
    }

    async fn claim(
        &self,
        mode: CheckMode,
        mut bra: Circuit,
        mut ket: Circuit,
    ) -> EquivResult<EquivalenceClaim> {
        prepare_for_contraction(&mut bra)?;
        prepare_for_contraction(&mut ket)?;

        let overlap = self
            .oracle
            .overlap(&bra, &ket, self.config.contraction_timeout)
            .await?;
        let equivalent = self.config.accepts(overlap.norm());

        info!(
            "{} check on {} qubits via {}: |overlap| = {:.6}, equivalent = {}",
            mode,
            bra.num_qubits(),
            self.oracle.name(),
            overlap.norm(),
            equivalent
        );
        Ok(EquivalenceClaim {
            mode,
            overlap,
            equivalent,
        })
    }
}

fn require_no_clbits(circuit: &Circuit) -> EquivResult<()> {
    if circuit.num_clbits() > 0 {
        return Err(EquivError::IncompatibleCircuits(format!(
            "'{}' has {} classical bits; only measurement-free unitary circuits can be compared",
            circuit.name(),
            circuit.num_clbits()
        )));
    }
    Ok(())
}

/// Inline boxes, strip barriers and confirm only elementary gates remain.
fn prepare_for_contraction(circuit: &mut Circuit) -> EquivResult<()> {
    let (pm, mut props) = PassManagerBuilder::contraction_preparation().build();
    pm.run(circuit, &mut props)?;
    if let Some(readiness) = props.get::<ReadinessResult>() {
        debug!(
            "Prepared '{}': {} qubits, {} gates",
            circuit.name(),
            readiness.num_qubits,
            readiness.num_gates
        );
    }
    Ok(())
}
