//! Register handles.
//!
//! Allocating a register returns a handle that owns the ordered ids of its
//! wires. Builders thread these handles through subsequent calls instead of
//! looking registers up by name, so two circuits that happen to reuse a
//! register name can never be confused with each other.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::qubit::{ClbitId, QubitId};

/// Handle to a named, ordered group of qubits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumRegister {
    name: String,
    qubits: Vec<QubitId>,
}

impl QuantumRegister {
    pub(crate) fn new(name: impl Into<String>, qubits: Vec<QubitId>) -> Self {
        Self {
            name: name.into(),
            qubits,
        }
    }

    /// The register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The qubits of this register in index order.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Get the qubit at `index`.
    pub fn get(&self, index: usize) -> Option<QubitId> {
        self.qubits.get(index).copied()
    }

    /// Number of qubits in the register.
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    /// Check if the register has no qubits.
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// Iterate over the qubits in index order.
    pub fn iter(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.qubits.iter().copied()
    }

    /// Translate this handle through a qubit relocation.
    ///
    /// Qubits absent from `map` keep their id.
    #[must_use]
    pub fn relocated(&self, map: &QubitMap) -> Self {
        Self {
            name: self.name.clone(),
            qubits: self.qubits.iter().map(|&q| map.map(q)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a QuantumRegister {
    type Item = QubitId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, QubitId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.qubits.iter().copied()
    }
}

/// Handle to a named, ordered group of classical bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalRegister {
    name: String,
    clbits: Vec<ClbitId>,
}

impl ClassicalRegister {
    pub(crate) fn new(name: impl Into<String>, clbits: Vec<ClbitId>) -> Self {
        Self {
            name: name.into(),
            clbits,
        }
    }

    /// The register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bits of this register in index order.
    pub fn clbits(&self) -> &[ClbitId] {
        &self.clbits
    }

    /// Get the bit at `index`.
    pub fn get(&self, index: usize) -> Option<ClbitId> {
        self.clbits.get(index).copied()
    }

    /// Number of bits in the register.
    pub fn len(&self) -> usize {
        self.clbits.len()
    }

    /// Check if the register has no bits.
    pub fn is_empty(&self) -> bool {
        self.clbits.is_empty()
    }
}

/// Relocation of qubits produced when one circuit is merged into another.
#[derive(Debug, Clone, Default)]
pub struct QubitMap {
    inner: FxHashMap<QubitId, QubitId>,
}

impl QubitMap {
    pub(crate) fn insert(&mut self, from: QubitId, to: QubitId) {
        self.inner.insert(from, to);
    }

    /// Look up where `qubit` was moved to.
    pub fn get(&self, qubit: QubitId) -> Option<QubitId> {
        self.inner.get(&qubit).copied()
    }

    /// Map `qubit`, leaving unknown qubits untouched.
    pub fn map(&self, qubit: QubitId) -> QubitId {
        self.get(qubit).unwrap_or(qubit)
    }

    /// Number of relocated qubits.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if nothing was relocated.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
