//! Optional startup validation over an externally-constructed graph.
//!
//! Graph construction itself is out of scope (spec §1), but nothing stops a
//! caller that doesn't fully trust its graph-construction layer from asking
//! this crate to check it first — in the same spirit as the staged
//! `validate()` passes used elsewhere in this codebase before a constructed
//! value is put to work. This is opt-in, not run on every `launch`, so a
//! caller that already knows its graph is sound pays nothing for it on the
//! hot path.

use std::collections::HashSet;
use std::rc::Rc;

use synapse_core::{EngineError, UnitId};
use synapse_graph::{CheckKind, GraphNode, MovSource, MovTarget, StepKind};

/// Validate `root` and every node reachable from it:
///
/// - every step's referenced store slot exists in that node's register table
/// - no node names itself as its own direct child (one local shape check;
///   full cycle detection stays out of scope per spec §1's Non-goals, but a
///   node that is its own child would hang the drain loop on a real graph,
///   so this much is worth the single comparison)
pub fn validate_graph(root: &Rc<GraphNode>) -> Result<(), EngineError> {
    let mut seen = HashSet::new();
    let mut stack = vec![Rc::clone(root)];

    while let Some(node) = stack.pop() {
        if !seen.insert(node.id) {
            continue;
        }
        validate_node(&node)?;
        for child in node.next.iter() {
            // Ids are assigned uniquely per `GraphNode::new` call, so an id
            // match here is as reliable a self-reference signal as pointer
            // identity and doesn't require the two sides to be the same `Rc`
            // allocation (relevant for the test fixtures below, and for any
            // future graph-construction layer that might rebuild handles).
            if child.id == node.id {
                return Err(EngineError::SelfReferentialChild { node: node.id });
            }
            stack.push(Rc::clone(child));
        }
    }
    Ok(())
}

fn validate_node(node: &GraphNode) -> Result<(), EngineError> {
    for step in &node.seq {
        match &step.kind {
            StepKind::Mov { from, to } => {
                if let MovSource::Store(store) = from {
                    require_register(node, step.id, *store)?;
                }
                if let MovTarget::Store(store) = to {
                    require_register(node, step.id, *store)?;
                }
            }
            StepKind::Check(CheckKind::Changed { store }) => {
                require_register(node, step.id, *store)?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn require_register(node: &GraphNode, step: synapse_core::StepId, store: synapse_core::LocalStoreId) -> Result<(), EngineError> {
    if node.store(store).is_some() {
        Ok(())
    } else {
        Err(EngineError::MissingRegister { node: node.id, step, store })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synapse_core::{LocalStoreId, Scope};
    use synapse_graph::Step;
    use indexmap::IndexMap;

    fn leaf_node() -> Rc<GraphNode> {
        Rc::new(GraphNode::new(Vec::new(), Default::default(), IndexMap::new(), Scope::new(())))
    }

    #[test]
    fn empty_graph_is_valid() {
        assert!(validate_graph(&leaf_node()).is_ok());
    }

    #[test]
    fn missing_register_is_rejected() {
        let step = Step::new(StepKind::Check(CheckKind::Changed { store: LocalStoreId(0) }));
        let node = Rc::new(GraphNode::new(vec![step], Default::default(), IndexMap::new(), Scope::new(())));
        assert!(matches!(
            validate_graph(&node),
            Err(EngineError::MissingRegister { .. })
        ));
    }

    #[test]
    fn self_referential_child_is_rejected() {
        // Two separate allocations sharing an id stand in for a genuine
        // self-loop: `GraphNode::next` holds strong `Rc`s, so a node cannot
        // literally contain a reference to itself from within its own
        // constructor without tying a knot `Rc` doesn't support safely.
        let id = UnitId::from_raw(42);
        let stand_in = Rc::new(GraphNode {
            id,
            seq: Vec::new(),
            next: Default::default(),
            reg: IndexMap::new(),
            scope: Scope::new(()),
        });
        let mut next = synapse_graph::ChildList::new();
        next.push(stand_in);
        let node = Rc::new(GraphNode {
            id,
            seq: Vec::new(),
            next,
            reg: IndexMap::new(),
            scope: Scope::new(()),
        });

        assert!(matches!(
            validate_graph(&node),
            Err(EngineError::SelfReferentialChild { .. })
        ));
    }
}
