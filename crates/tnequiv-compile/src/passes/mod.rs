//! Built-in normalization passes.
//!
//! - [`DecomposeBoxes`]: inline circuit boxes, synthesize diagonal boxes
//! - [`RemoveBarriers`]: drop scheduling barriers
//! - [`EliminateConditionals`]: deferred-measurement rewrite of
//!   measure-then-conditional-X
//! - [`ContractionReadiness`]: final check that only elementary gates remain

mod barriers;
mod conditionals;
mod decompose;
mod readiness;

pub use barriers::RemoveBarriers;
pub use conditionals::{ConditionalEliminationReport, EliminateConditionals};
pub use decompose::{DecomposeBoxes, DecompositionStats};
pub use readiness::{ContractionReadiness, ReadinessResult};
