//! The skew heap shared by the `barrier` and `sampler` priority classes
//! (spec §4.3).

use synapse_core::PriorityClass;

use crate::layer::Layer;

/// A skew heap node. Children are explicit optional pointers rather than the
/// source's `0` sentinel (spec §9, "Heap nodes with `0` sentinels") — the
/// meld algorithm itself is unchanged.
pub struct HeapNode {
    /// The layer stored at this node.
    pub layer: Layer,
    /// Left child.
    pub left: Option<Box<HeapNode>>,
    /// Right child.
    pub right: Option<Box<HeapNode>>,
}

impl HeapNode {
    /// A fresh singleton node with no children.
    pub fn singleton(layer: Layer) -> Box<HeapNode> {
        Box::new(HeapNode {
            layer,
            left: None,
            right: None,
        })
    }
}

/// Two-key comparator (spec §4.3): within the same class, smaller id wins;
/// across classes, `Barrier` wins over `Sampler`.
fn wins(a: &Layer, b: &Layer) -> bool {
    if a.class == b.class {
        a.id <= b.id
    } else {
        a.class == PriorityClass::Barrier
    }
}

/// Min-first meld of two heaps. If either is empty, returns the other.
/// Otherwise picks a winner via [`wins`], sets `winner.right = meld(winner.right,
/// loser)`, then swaps `winner.left` with the freshly-melded `winner.right`
/// (the standard skew-heap rotation).
pub fn meld(a: Option<Box<HeapNode>>, b: Option<Box<HeapNode>>) -> Option<Box<HeapNode>> {
    let (a, b) = match (a, b) {
        (None, None) => return None,
        (Some(a), None) => return Some(a),
        (None, Some(b)) => return Some(b),
        (Some(a), Some(b)) => (a, b),
    };
    let (mut winner, loser) = if wins(&a.layer, &b.layer) { (a, b) } else { (b, a) };
    let melded_right = meld(winner.right.take(), Some(loser));
    winner.right = winner.left.take();
    winner.left = melded_right;
    Some(winner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use synapse_core::StepId;
    use synapse_core::{Scope, Value};
    use synapse_graph::{GraphNode, StackFrame};
    use std::rc::Rc;
    use proptest::prelude::*;

    fn layer(class: PriorityClass, id: u64) -> Layer {
        let node = Rc::new(GraphNode::new(
            Vec::new(),
            Default::default(),
            Default::default(),
            Scope::new(()),
        ));
        let stack = StackFrame::seed(node, Some(Value::new(id as i64)));
        Layer::start(stack, class, StepId::from_raw(id))
    }

    #[test]
    fn meld_with_empty_is_identity_either_order() {
        let a = HeapNode::singleton(layer(PriorityClass::Barrier, 1));
        assert!(meld(Some(a), None).is_some());
        let b = HeapNode::singleton(layer(PriorityClass::Barrier, 2));
        assert!(meld(None, Some(b)).is_some());
    }

    #[test]
    fn barrier_beats_sampler_regardless_of_id() {
        let barrier = HeapNode::singleton(layer(PriorityClass::Barrier, 100));
        let sampler = HeapNode::singleton(layer(PriorityClass::Sampler, 1));
        let melded = meld(Some(sampler), Some(barrier)).unwrap();
        assert_eq!(melded.layer.class, PriorityClass::Barrier);
    }

    #[test]
    fn same_class_smaller_id_wins() {
        let a = HeapNode::singleton(layer(PriorityClass::Barrier, 5));
        let b = HeapNode::singleton(layer(PriorityClass::Barrier, 2));
        let melded = meld(Some(a), Some(b)).unwrap();
        assert_eq!(melded.layer.id, StepId::from_raw(2));
    }

    #[test]
    fn repeated_meld_extracts_in_sorted_order() {
        let mut heap = None;
        for id in [5u64, 1, 4, 2, 3] {
            heap = meld(heap, Some(HeapNode::singleton(layer(PriorityClass::Barrier, id))));
        }
        let mut order = Vec::new();
        while let Some(root) = heap {
            order.push(root.layer.id);
            heap = meld(root.left, root.right);
        }
        assert_eq!(
            order,
            vec![
                StepId::from_raw(1),
                StepId::from_raw(2),
                StepId::from_raw(3),
                StepId::from_raw(4),
                StepId::from_raw(5)
            ]
        );
    }

    fn drain_ids(mut heap: Option<Box<HeapNode>>) -> Vec<StepId> {
        let mut order = Vec::new();
        while let Some(root) = heap {
            order.push(root.layer.id);
            heap = meld(root.left, root.right);
        }
        order
    }

    proptest! {
        /// Whatever order distinct ids are melded in, the shared heap always
        /// extracts barrier-class entries in ascending id order.
        #[test]
        fn meld_extracts_barrier_ids_sorted(mut ids in proptest::collection::hash_set(0u64..500, 1..40)) {
            let ids: Vec<u64> = ids.drain().collect();
            let mut sorted = ids.clone();
            sorted.sort_unstable();

            let mut heap = None;
            for id in ids {
                heap = meld(heap, Some(HeapNode::singleton(layer(PriorityClass::Barrier, id))));
            }

            let extracted: Vec<u64> = drain_ids(heap).into_iter().map(StepId::raw).collect();
            prop_assert_eq!(extracted, sorted);
        }

        /// Meld is commutative in the sense that matters here: the set of ids
        /// extracted afterwards doesn't depend on which side won the root.
        #[test]
        fn meld_is_order_independent(a_id in 0u64..500, b_id in 0u64..500) {
            prop_assume!(a_id != b_id);
            let a = HeapNode::singleton(layer(PriorityClass::Barrier, a_id));
            let b = HeapNode::singleton(layer(PriorityClass::Barrier, b_id));
            let forward = drain_ids(meld(Some(a), Some(b)));

            let a = HeapNode::singleton(layer(PriorityClass::Barrier, a_id));
            let b = HeapNode::singleton(layer(PriorityClass::Barrier, b_id));
            let backward = drain_ids(meld(Some(b), Some(a)));

            prop_assert_eq!(forward, backward);
        }

        /// Regardless of how many sampler entries are mixed in, every barrier
        /// entry always extracts before every sampler entry.
        #[test]
        fn barrier_entries_always_precede_sampler_entries(
            barrier_ids in proptest::collection::vec(0u64..200, 1..10),
            sampler_ids in proptest::collection::vec(200u64..400, 1..10),
        ) {
            let mut heap = None;
            for id in barrier_ids.iter().chain(sampler_ids.iter()) {
                let class = if *id < 200 { PriorityClass::Barrier } else { PriorityClass::Sampler };
                heap = meld(heap, Some(HeapNode::singleton(layer(class, *id))));
            }

            let mut seen_sampler = false;
            let mut heap = heap;
            while let Some(root) = heap {
                if root.layer.class == PriorityClass::Sampler {
                    seen_sampler = true;
                } else {
                    prop_assert!(!seen_sampler, "a barrier entry extracted after a sampler entry");
                }
                heap = meld(root.left, root.right);
            }
        }
    }
}
