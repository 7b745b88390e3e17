//! Opaque multi-qubit operations.
//!
//! A [`CircuitBox`] wraps an owned copy of a sub-circuit so the outer circuit
//! can treat it as a single instruction. A [`DiagonalBox`] describes a
//! diagonal unitary directly by its phases. Both are expanded into elementary
//! gates by the box decomposition pass before simulation or contraction.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};

/// Tolerance on `|d| = 1` for diagonal entries.
const UNIT_MODULUS_TOLERANCE: f64 = 1e-9;

/// A sub-circuit embedded as one operation.
///
/// The label is for display and bookkeeping only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitBox {
    circuit: Circuit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl CircuitBox {
    /// Box a copy of `circuit`.
    ///
    /// Fails if the circuit has classical bits: a box is a unitary block.
    pub fn new(circuit: &Circuit) -> IrResult<Self> {
        if circuit.num_clbits() > 0 {
            return Err(IrError::NotUnitary(format!(
                "box over circuit '{}' with {} classical bits",
                circuit.name(),
                circuit.num_clbits()
            )));
        }
        Ok(Self {
            circuit: circuit.clone(),
            label: None,
        })
    }

    /// Attach a display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The wrapped circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// The display label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Number of qubits the box acts on.
    #[allow(clippy::cast_possible_truncation)]
    pub fn num_qubits(&self) -> u32 {
        self.circuit.num_qubits() as u32
    }

    /// Box of the inverse circuit. The label gains a dagger suffix.
    pub fn inverse(&self) -> IrResult<Self> {
        Ok(Self {
            circuit: self.circuit.dagger()?,
            label: self.label.as_ref().map(|l| format!("{l}†")),
        })
    }
}

/// A diagonal unitary `diag(d_0, ..., d_{2^k - 1})`.
///
/// Entry `j` multiplies the basis state whose index is `j`, with the box's
/// first qubit as the least-significant bit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Complex64>", into = "Vec<Complex64>")]
pub struct DiagonalBox {
    entries: Vec<Complex64>,
}

impl DiagonalBox {
    /// Build a diagonal box from its entries.
    ///
    /// The length must be a power of two no smaller than 2 and every entry
    /// must have unit modulus.
    pub fn new(entries: Vec<Complex64>) -> IrResult<Self> {
        let len = entries.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(IrError::InvalidDiagonal(format!(
                "length {len} is not a power of two >= 2"
            )));
        }
        if let Some((j, d)) = entries.iter().enumerate().find(|(_, d)| {
            !d.re.is_finite() || !d.im.is_finite() || (d.norm() - 1.0).abs() > UNIT_MODULUS_TOLERANCE
        }) {
            return Err(IrError::InvalidDiagonal(format!(
                "entry {j} = {d} does not have unit modulus"
            )));
        }
        Ok(Self { entries })
    }

    /// Build a diagonal box from the phases `θ_j` of `d_j = e^{iθ_j}`.
    pub fn from_phases(phases: impl IntoIterator<Item = f64>) -> IrResult<Self> {
        Self::new(
            phases
                .into_iter()
                .map(|theta| Complex64::from_polar(1.0, theta))
                .collect(),
        )
    }

    /// The diagonal entries.
    pub fn entries(&self) -> &[Complex64] {
        &self.entries
    }

    /// The phase angle of each entry.
    pub fn phases(&self) -> Vec<f64> {
        self.entries.iter().map(|d| d.arg()).collect()
    }

    /// Number of qubits the box acts on.
    pub fn num_qubits(&self) -> u32 {
        self.entries.len().trailing_zeros()
    }

    /// The complex-conjugate diagonal.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            entries: self.entries.iter().map(Complex64::conj).collect(),
        }
    }
}

impl TryFrom<Vec<Complex64>> for DiagonalBox {
    type Error = IrError;

    fn try_from(entries: Vec<Complex64>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<DiagonalBox> for Vec<Complex64> {
    fn from(diagonal: DiagonalBox) -> Self {
        diagonal.entries
    }
}
