//! Barrier removal.

use tracing::debug;

use tnequiv_ir::{Circuit, Instruction};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Drop every barrier. Barriers only constrain scheduling and carry no
/// tensor, so contraction engines reject them.
pub struct RemoveBarriers;

impl Pass for RemoveBarriers {
    fn name(&self) -> &'static str {
        "remove_barriers"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, _properties: &mut PropertySet) -> CompileResult<()> {
        let mut out = circuit.empty_like();
        let mut removed = 0usize;
        for inst in circuit.instructions() {
            if inst.is_barrier() {
                removed += 1;
            } else {
                out.push(inst.clone())?;
            }
        }
        debug!("Removed {} barriers", removed);
        *circuit = out;
        Ok(())
    }

    fn should_run(&self, circuit: &Circuit, _properties: &PropertySet) -> bool {
        circuit.instructions().any(Instruction::is_barrier)
    }
}
