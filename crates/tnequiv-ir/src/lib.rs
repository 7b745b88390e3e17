//! tnequiv Circuit Intermediate Representation
//!
//! Core data structures for the circuits that the equivalence checker builds
//! and compares.
//!
//! # Overview
//!
//! A [`Circuit`] is a register-based builder over a DAG ([`CircuitDag`]).
//! Every qubit and classical bit lives in a named register; allocating a
//! register returns a handle ([`QuantumRegister`], [`ClassicalRegister`])
//! that later calls take instead of a register name.
//!
//! # Core Components
//!
//! - **Wires**: [`QubitId`], [`ClbitId`] and the register handles
//! - **Gates**: [`StandardGate`] for built-in gates, [`CircuitBox`] for an
//!   embedded sub-circuit, [`DiagonalBox`] for a diagonal unitary
//! - **Classical control**: [`ClassicalCondition`] on a [`Gate`]
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **Composition**: [`Circuit::dagger`], [`Circuit::extend_disjoint`],
//!   [`Circuit::tensor`] and [`Circuit::append`]
//!
//! # Example: Bell pair on named registers
//!
//! ```rust
//! use tnequiv_ir::Circuit;
//!
//! let mut circuit = Circuit::new("bell");
//! let c = circuit.add_qreg("C", 1).unwrap();
//! let t = circuit.add_qreg("T", 1).unwrap();
//!
//! circuit.h(c.qubits()[0]).unwrap();
//! circuit.cx(c.qubits()[0], t.qubits()[0]).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```
//!
//! # Example: Boxing a sub-circuit
//!
//! ```rust
//! use tnequiv_ir::{Circuit, CircuitBox, QubitId};
//!
//! let mut inner = Circuit::with_size("u", 1, 0);
//! inner.t(QubitId(0)).unwrap();
//!
//! let mut outer = Circuit::with_size("outer", 2, 0);
//! let boxed = CircuitBox::new(&inner).unwrap().with_label("U");
//! outer.add_box(boxed, [QubitId(1)]).unwrap();
//!
//! let inst = outer.instructions().next().unwrap();
//! assert!(inst.is_box());
//! ```

pub mod boxes;
pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod qubit;
pub mod register;

pub use boxes::{CircuitBox, DiagonalBox};
pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::{ClassicalCondition, Gate, GateKind, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use parameter::ParameterExpression;
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};
pub use register::{ClassicalRegister, QuantumRegister, QubitMap};
