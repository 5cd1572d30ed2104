//! The per-node execution context: [`StackFrame`] and [`LocalFlags`] (spec §3).

use std::rc::Rc;

use synapse_core::{UserFnFailure, Value};

use crate::node::GraphNode;

/// The per-node execution context carrying the propagated value, two
/// scratch slots, and a parent link for causal chaining.
///
/// Created when a node is first enqueued. `parent` links to the stack frame
/// of the upstream node that produced this value; user functions can walk it
/// to inspect the causal chain of a propagation (spec §4.4, "fan-out stack
/// linkage").
pub struct StackFrame {
    /// The propagated datum. `None` is the `undefined` the source checks for.
    pub value: Option<Value>,
    /// Scratch slot `a`, used by multi-argument opcodes.
    pub a: Option<Value>,
    /// Scratch slot `b`, used by multi-argument opcodes.
    pub b: Option<Value>,
    /// The upstream frame that produced this one's `value`, if any.
    pub parent: Option<Rc<StackFrame>>,
    /// The node this frame belongs to.
    pub node: Rc<GraphNode>,
}

impl StackFrame {
    /// A root frame with no parent, seeded directly by `launch`.
    pub fn seed(node: Rc<GraphNode>, value: Option<Value>) -> Self {
        Self {
            value,
            a: None,
            b: None,
            parent: None,
            node,
        }
    }

    /// A child frame fanned out from a completed parent, reusing the
    /// parent's outgoing value and linking `parent` for causal context
    /// (spec §4.4).
    pub fn child_of(parent: Rc<StackFrame>, node: Rc<GraphNode>) -> Self {
        let value = parent.value.clone();
        Self {
            value,
            a: None,
            b: None,
            parent: Some(parent),
            node,
        }
    }
}

/// Per-node, per-traversal execution flags (spec §3).
///
/// `skip` means "do not propagate further"; `fail` means the same, plus it
/// carries the diagnostic from whichever user function threw.
#[derive(Default)]
pub struct LocalFlags {
    /// Set by `check`/`filter` to stop propagation without an error.
    pub skip: bool,
    /// Set when a `filter`/`compute`/`run` user function fails.
    pub fail: Option<UserFnFailure>,
}

impl LocalFlags {
    /// `true` once either flag is set — the interpreter stops stepping.
    pub fn halted(&self) -> bool {
        self.skip || self.fail.is_some()
    }
}
