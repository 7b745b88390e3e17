//! tnequiv Normalization Passes
//!
//! Circuits built for an equivalence check carry structure that a
//! contraction engine cannot consume directly: boxed sub-circuits, diagonal
//! boxes, barriers, and (in partial-equivalence workflows) mid-circuit
//! measurements feeding classically controlled gates. This crate rewrites
//! them into plain elementary-gate circuits through a pass pipeline.
//!
//! # Architecture
//!
//! ```text
//! Input Circuit
//!       │
//!       ▼
//! ┌─────────────┐
//! │ PassManager │ ◄── PropertySet (per-pass reports)
//! └─────────────┘
//!       │
//!       ├── EliminateConditionals   (optional)
//!       ├── DecomposeBoxes
//!       ├── RemoveBarriers
//!       └── ContractionReadiness    (analysis, always last)
//!       │
//!       ▼
//! Elementary-gate circuit
//! ```
//!
//! # Example
//!
//! ```rust
//! use tnequiv_compile::PassManagerBuilder;
//! use tnequiv_ir::{Circuit, CircuitBox, QubitId};
//!
//! let mut inner = Circuit::with_size("u", 1, 0);
//! inner.h(QubitId(0)).unwrap();
//!
//! let mut circuit = Circuit::with_size("outer", 1, 0);
//! circuit
//!     .add_box(CircuitBox::new(&inner).unwrap(), [QubitId(0)])
//!     .unwrap();
//!
//! let (pm, mut props) = PassManagerBuilder::contraction_preparation().build();
//! pm.run(&mut circuit, &mut props).unwrap();
//! assert!(!circuit.instructions().any(|i| i.is_box()));
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod passes;
pub mod property;
pub mod synthesis;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind};
pub use property::PropertySet;
