use std::rc::Rc;

use indexmap::IndexMap;

use synapse_core::{next_ref_id, LocalStoreId, PriorityClass, Scope};
use synapse_graph::{ChildList, ComputeFn, FilterFn, GraphNode, MovSource, MovTarget, RefCellSlot, Step, StepKind};

/// A ref cell paired with the local store id a node's register table should
/// map it under. Bundled together so a fixture builder only needs one
/// argument per cell instead of a slot and an id kept in sync by hand.
pub struct MockRefCell {
    pub store: LocalStoreId,
    pub slot: Rc<RefCellSlot>,
}

impl MockRefCell {
    /// A fresh, empty cell addressed under `store`.
    pub fn new(store: LocalStoreId) -> Self {
        Self {
            store,
            slot: Rc::new(RefCellSlot::new(next_ref_id())),
        }
    }

    /// The cell's current value, for test assertions.
    pub fn read(&self) -> Option<synapse_core::Value> {
        self.slot.read()
    }

    fn register(&self, reg: &mut IndexMap<LocalStoreId, Rc<RefCellSlot>>) {
        reg.insert(self.store, Rc::clone(&self.slot));
    }
}

/// A single-step node running `f` as a `compute`, fanning out to `next`.
pub fn compute_node(f: ComputeFn, next: ChildList) -> Rc<GraphNode> {
    Rc::new(GraphNode::new(
        vec![Step::new(StepKind::Compute(f))],
        next,
        IndexMap::new(),
        Scope::new(()),
    ))
}

/// A single-step node running `f` as a `filter`, fanning out to `next`.
pub fn filter_node(f: FilterFn, next: ChildList) -> Rc<GraphNode> {
    Rc::new(GraphNode::new(
        vec![Step::new(StepKind::Filter(f))],
        next,
        IndexMap::new(),
        Scope::new(()),
    ))
}

/// A single-step node running `f` as a `run` (effect) step, fanning out to
/// `next` once it has been requeued and executed at [`PriorityClass::Effect`].
pub fn effect_node(f: ComputeFn, next: ChildList) -> Rc<GraphNode> {
    Rc::new(GraphNode::new(
        vec![Step::new(StepKind::Run(f))],
        next,
        IndexMap::new(),
        Scope::new(()),
    ))
}

/// A leaf node that writes whatever reaches it into `cell`.
pub fn sink_node(cell: &MockRefCell) -> Rc<GraphNode> {
    let mut reg = IndexMap::new();
    cell.register(&mut reg);
    let write = Step::new(StepKind::Mov {
        from: MovSource::Stack,
        to: MovTarget::Store(cell.store),
    });
    Rc::new(GraphNode::new(vec![write], Default::default(), reg, Scope::new(())))
}

/// A combine-style node: a `barrier` targeting `priority`, then a write into
/// `cell`. Multiple simultaneous arrivals at this node coalesce into one
/// survivor past the barrier (spec §4.3).
pub fn combine_node(priority: PriorityClass, cell: &MockRefCell) -> Rc<GraphNode> {
    let mut reg = IndexMap::new();
    cell.register(&mut reg);
    Rc::new(GraphNode::new(
        vec![
            Step::new(StepKind::Barrier { priority }),
            Step::new(StepKind::Mov {
                from: MovSource::Stack,
                to: MovTarget::Store(cell.store),
            }),
        ],
        Default::default(),
        reg,
        Scope::new(()),
    ))
}

/// A sample-style node: a `barrier` targeting `priority`, then copies
/// `from`'s current value into `to`. Pair with [`combine_node`] at a
/// lower-dequeued barrier class to observe post-settle state safely.
pub fn sampler_node(priority: PriorityClass, from: &MockRefCell, to: &MockRefCell) -> Rc<GraphNode> {
    let mut reg = IndexMap::new();
    from.register(&mut reg);
    to.register(&mut reg);
    Rc::new(GraphNode::new(
        vec![
            Step::new(StepKind::Barrier { priority }),
            Step::new(StepKind::Mov {
                from: MovSource::Store(from.store),
                to: MovTarget::Store(to.store),
            }),
        ],
        Default::default(),
        reg,
        Scope::new(()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use synapse_core::Value;
    use synapse_engine::{Engine, LaunchSpec};

    #[test]
    fn sink_node_captures_propagated_value() {
        let cell = MockRefCell::new(LocalStoreId(0));
        let node = sink_node(&cell);

        let engine = Engine::new();
        engine.launch(LaunchSpec::single(node, Some(Value::new(7i64)))).unwrap();

        assert_eq!(*cell.read().unwrap().downcast_ref::<i64>().unwrap(), 7);
    }

    #[test]
    fn combine_and_sampler_fixtures_compose() {
        let state = MockRefCell::new(LocalStoreId(0));
        let result = MockRefCell::new(LocalStoreId(1));
        let combine = combine_node(PriorityClass::Barrier, &state);
        let sampler = sampler_node(PriorityClass::Sampler, &state, &result);

        let engine = Engine::new();
        engine
            .launch(LaunchSpec::many(vec![
                (combine, Some(Value::new(3i64))),
                (sampler, None),
            ]))
            .unwrap();

        assert_eq!(*result.read().unwrap().downcast_ref::<i64>().unwrap(), 3);
    }
}
