//! Pass manager for orchestrating normalization.

use tracing::{debug, info, instrument};

use tnequiv_ir::Circuit;

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{ContractionReadiness, DecomposeBoxes, EliminateConditionals, RemoveBarriers};
use crate::property::PropertySet;

/// Manages and executes a sequence of passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given circuit.
    #[instrument(skip(self, circuit, properties), fields(circuit = %circuit.name()))]
    pub fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            circuit.num_qubits()
        );

        for pass in &self.passes {
            if pass.should_run(circuit, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(circuit, properties)?;
                debug!("Pass {} completed, ops: {}", pass.name(), circuit.num_ops());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, final depth: {}, ops: {}",
            circuit.depth(),
            circuit.num_ops()
        );

        Ok(())
    }

    /// Get the names of the passes in execution order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the normalization pipeline run before contraction.
///
/// Stages run in a fixed order: conditional elimination, box decomposition,
/// barrier removal, readiness check.
#[derive(Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct PassManagerBuilder {
    eliminate_conditionals: bool,
    decompose_boxes: bool,
    remove_barriers: bool,
    readiness_check: bool,
}

impl PassManagerBuilder {
    /// Create a builder with every stage disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Box decomposition, barrier removal and the readiness check: what
    /// every circuit needs before it is handed to a contraction oracle.
    pub fn contraction_preparation() -> Self {
        Self::new()
            .with_box_decomposition(true)
            .with_barrier_removal(true)
            .with_readiness_check(true)
    }

    /// Enable or disable conditional elimination.
    #[must_use]
    pub fn with_conditional_elimination(mut self, enabled: bool) -> Self {
        self.eliminate_conditionals = enabled;
        self
    }

    /// Enable or disable box decomposition.
    #[must_use]
    pub fn with_box_decomposition(mut self, enabled: bool) -> Self {
        self.decompose_boxes = enabled;
        self
    }

    /// Enable or disable barrier removal.
    #[must_use]
    pub fn with_barrier_removal(mut self, enabled: bool) -> Self {
        self.remove_barriers = enabled;
        self
    }

    /// Enable or disable the final readiness check.
    #[must_use]
    pub fn with_readiness_check(mut self, enabled: bool) -> Self {
        self.readiness_check = enabled;
        self
    }

    /// Build the pass manager and return it with a fresh property set.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();

        if self.eliminate_conditionals {
            pm.add_pass(EliminateConditionals);
        }
        if self.decompose_boxes {
            pm.add_pass(DecomposeBoxes);
        }
        if self.remove_barriers {
            pm.add_pass(RemoveBarriers);
        }
        // Always last, to catch anything an earlier stage left behind.
        if self.readiness_check {
            pm.add_pass(ContractionReadiness);
        }

        (pm, PropertySet::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tnequiv_ir::{CircuitBox, QubitId};

    use crate::passes::{DecompositionStats, ReadinessResult};

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);
    }

    #[test]
    fn test_preparation_preset_order() {
        let (pm, props) = PassManagerBuilder::contraction_preparation().build();
        assert_eq!(
            pm.pass_names(),
            vec!["decompose_boxes", "remove_barriers", "contraction_readiness"]
        );
        assert!(props.is_empty());
    }

    #[test]
    fn test_preparation_normalizes_boxed_circuit() {
        let mut inner = Circuit::with_size("u", 2, 0);
        inner.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();

        let mut circuit = Circuit::with_size("outer", 2, 0);
        circuit
            .add_box(CircuitBox::new(&inner).unwrap(), [QubitId(0), QubitId(1)])
            .unwrap()
            .barrier([QubitId(0), QubitId(1)])
            .unwrap();

        let (pm, mut props) = PassManagerBuilder::contraction_preparation().build();
        pm.run(&mut circuit, &mut props).unwrap();

        assert_eq!(circuit.num_ops(), 2);
        assert_eq!(props.get::<DecompositionStats>().unwrap().boxes_inlined, 1);
        assert!(props.get::<ReadinessResult>().unwrap().passed);
    }
}
