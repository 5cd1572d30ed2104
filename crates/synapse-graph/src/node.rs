//! The graph node: an immutable record of instructions, children, and registers.

use std::rc::Rc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use synapse_core::{LocalStoreId, Scope, UnitId};

use crate::refcell::RefCellSlot;
use crate::step::Step;

/// Most nodes have a small, fixed number of children; `SmallVec` avoids a
/// heap allocation for the common case of zero or one (matching the
/// register-table/child-list sizing convention used elsewhere in this
/// codebase's graph-shaped types).
pub type ChildList = SmallVec<[Rc<GraphNode>; 4]>;

/// A graph node: immutable after construction (spec §3 invariant).
///
/// `seq`, `next`, `reg`, and `scope` never change once a node exists; the
/// interpreter only ever reads them. The only mutable state touched during a
/// propagation lives in the [`StackFrame`](crate::stack::StackFrame) and the
/// [`RefCellSlot`]s a node's register table points at.
pub struct GraphNode {
    /// This node's id, assigned at construction by the graph-construction
    /// layer (out of scope per spec §1) via [`synapse_core::next_unit_id`].
    pub id: UnitId,
    /// Ordered instruction sequence.
    pub seq: Vec<Step>,
    /// Ordered child nodes, fanned out to at priority `child` on completion.
    pub next: ChildList,
    /// Local store id to ref cell mapping. `IndexMap` so iteration order is
    /// deterministic and matches declaration order, in case a future reader
    /// needs it (validation error messages, debugging).
    pub reg: IndexMap<LocalStoreId, Rc<RefCellSlot>>,
    /// Opaque per-graph record passed to every user function as context.
    pub scope: Scope,
}

impl GraphNode {
    /// Construct a node with a fresh id.
    pub fn new(seq: Vec<Step>, next: ChildList, reg: IndexMap<LocalStoreId, Rc<RefCellSlot>>, scope: Scope) -> Self {
        Self {
            id: synapse_core::next_unit_id(),
            seq,
            next,
            reg,
            scope,
        }
    }

    /// Look up a ref cell by local store id.
    pub fn store(&self, id: LocalStoreId) -> Option<&Rc<RefCellSlot>> {
        self.reg.get(&id)
    }
}
