//! Step opcodes: the closed instruction set the interpreter evaluates.
//!
//! The source dispatches on a small string tag per step (spec §9, "Dynamic
//! step dispatch"). Here that becomes a tagged variant: [`StepKind`] is a
//! closed sum type and the interpreter is a `match` over it, so an unhandled
//! opcode is a compile error rather than a silent no-op.

use std::fmt;
use std::rc::Rc;

use synapse_core::{LocalStoreId, PriorityClass, StepId, Value};

use crate::stack::StackFrame;
use synapse_core::Scope;

/// A user-supplied predicate for `filter` steps.
///
/// Returns `Ok(true)` to let the value through, `Ok(false)` to skip, or
/// `Err` on failure (caught by the interpreter, never propagated as a panic
/// across the drain loop — see `synapse-graph::guard`).
pub type FilterFn = Rc<dyn Fn(&Value, &Scope, &StackFrame) -> Result<bool, String>>;

/// A user-supplied transform for `compute`/`run` steps.
pub type ComputeFn = Rc<dyn Fn(&Value, &Scope, &StackFrame) -> Result<Value, String>>;

/// Source operand for a `mov` step.
#[derive(Clone)]
pub enum MovSource {
    /// The stack frame's `value` slot.
    Stack,
    /// The stack frame's `a` scratch slot.
    A,
    /// The stack frame's `b` scratch slot.
    B,
    /// An embedded literal, evaluated once at graph-construction time.
    Literal(Value),
    /// A ref cell, addressed by local store id.
    Store(LocalStoreId),
}

impl fmt::Debug for MovSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stack => write!(f, "Stack"),
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
            Self::Literal(_) => write!(f, "Literal(..)"),
            Self::Store(s) => write!(f, "Store({s})"),
        }
    }
}

/// Destination operand for a `mov` step.
#[derive(Clone, Copy, Debug)]
pub enum MovTarget {
    /// The stack frame's `value` slot.
    Stack,
    /// The stack frame's `a` scratch slot.
    A,
    /// The stack frame's `b` scratch slot.
    B,
    /// A ref cell, addressed by local store id. The only legal way to write
    /// a ref cell (spec §3 invariant).
    Store(LocalStoreId),
}

/// What a `check` step tests.
#[derive(Clone, Copy, Debug)]
pub enum CheckKind {
    /// `skip` if the stack value is undefined (`None`).
    Defined,
    /// `skip` if the stack value is identical (`===`) to a ref cell's
    /// current value.
    Changed {
        /// The ref cell to compare against.
        store: LocalStoreId,
    },
}

/// One opcode and its payload (spec §3, "Step kinds and their data").
#[derive(Clone)]
pub enum StepKind {
    /// Move a value between stack slots, a literal, or a ref cell.
    Mov {
        /// Where the value comes from.
        from: MovSource,
        /// Where the value goes.
        to: MovTarget,
    },
    /// Test the stack value and set `skip` accordingly.
    Check(CheckKind),
    /// Run a user predicate; `skip` on false, `fail` on error.
    Filter(FilterFn),
    /// Run a user transform; replace the stack value, `fail` on error.
    Compute(ComputeFn),
    /// Same as `Compute`, but must execute under [`PriorityClass::Effect`];
    /// re-pushes the node at that priority otherwise (spec §4.2).
    Run(ComputeFn),
    /// A checkpoint that defers the node to a named priority with a
    /// coalescing guard (spec §4.2/§4.3).
    Barrier {
        /// Target priority class once the barrier clears.
        priority: PriorityClass,
    },
}

impl fmt::Debug for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mov { from, to } => f.debug_struct("Mov").field("from", from).field("to", to).finish(),
            Self::Check(kind) => f.debug_tuple("Check").field(kind).finish(),
            Self::Filter(_) => write!(f, "Filter(..)"),
            Self::Compute(_) => write!(f, "Compute(..)"),
            Self::Run(_) => write!(f, "Run(..)"),
            Self::Barrier { priority } => f.debug_struct("Barrier").field("priority", priority).finish(),
        }
    }
}

/// One instruction in a graph node's sequence: an opcode plus the id used
/// when the opcode is a `barrier` (the barrier's id is the step's own id,
/// per spec §6 — "step ids drive `Layer.id` via barrier registration").
#[derive(Clone, Debug)]
pub struct Step {
    /// This step's id, doubling as the barrier id when `kind` is `Barrier`.
    pub id: StepId,
    /// The opcode and its payload.
    pub kind: StepKind,
}

impl Step {
    /// Construct a step with a fresh id from [`synapse_core::next_step_id`].
    pub fn new(kind: StepKind) -> Self {
        Self {
            id: synapse_core::next_step_id(),
            kind,
        }
    }
}
