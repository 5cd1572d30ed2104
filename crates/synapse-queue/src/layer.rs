//! [`Layer`]: one queue entry (spec §3).

use synapse_core::{PriorityClass, StepId};
use synapse_graph::StackFrame;

/// Describes where in a graph node execution should resume, with what stack
/// frame and at which priority.
///
/// `id` is only meaningful for the two heap-scheduled classes
/// ([`PriorityClass::Barrier`]/[`PriorityClass::Sampler`]); FIFO-bucket
/// layers carry whatever id they were constructed with but it plays no part
/// in their ordering.
pub struct Layer {
    /// Instruction cursor: where to resume within `stack.node.seq`.
    pub idx: usize,
    /// The per-propagation execution context.
    pub stack: StackFrame,
    /// The priority class this layer is currently queued under.
    pub class: PriorityClass,
    /// The heap comparator's ordering key for `Barrier`/`Sampler` layers.
    pub id: StepId,
}

impl Layer {
    /// A layer resuming at the start of its node's instruction sequence.
    pub fn start(stack: StackFrame, class: PriorityClass, id: StepId) -> Self {
        Self {
            idx: 0,
            stack,
            class,
            id,
        }
    }
}
