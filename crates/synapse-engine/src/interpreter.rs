//! Evaluates one node's instruction sequence against its stack frame
//! (spec §4.2).

use std::cell::RefCell;

use synapse_core::{EngineError, PriorityClass, Value};
use synapse_graph::guard;
use synapse_graph::{CheckKind, LocalFlags, MovSource, MovTarget, StackFrame, StepKind};
use synapse_queue::{Layer, Queue};

use crate::registry::BarrierRegistry;

/// What became of a node handed to [`run_node`].
pub enum Outcome {
    /// A `barrier` or `run` step re-pushed this layer elsewhere; the driver
    /// has nothing further to do with it this iteration.
    Suspended,
    /// The layer ran to the end of its node's instruction sequence (cleanly,
    /// or halted early by `skip`/`fail`).
    Finished {
        /// The stack frame as of the last executed step.
        stack: StackFrame,
        /// Whether propagation should continue to this node's children.
        flags: LocalFlags,
    },
}

fn value_opt_identical(a: &Option<Value>, b: &Option<Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.identical_to(b),
        _ => false,
    }
}

/// Run `layer` from its current cursor until it halts: clean completion,
/// `skip`, `fail`, or a `barrier`/`run` suspension.
///
/// Structural errors (spec §7.2 — unknown register, queue bookkeeping
/// violations) return `Err` and abort the whole drain; user-function
/// failures (spec §7.1) are caught internally and surface as `flags.fail`
/// on a `Finished` outcome, never as an `Err` here.
///
/// `queue`/`barriers` are shared `RefCell`s, not owned `&mut` references, so
/// that a `filter`/`compute`/`run` user function invoked partway through
/// this loop can itself call back into `Engine::launch` on the same engine
/// (spec §5) without this function holding a conflicting borrow across that
/// call — every access here is a borrow taken and dropped within a single
/// statement.
pub fn run_node(mut layer: Layer, queue: &RefCell<Queue>, barriers: &RefCell<BarrierRegistry>) -> Result<Outcome, EngineError> {
    let mut flags = LocalFlags::default();

    loop {
        let Some(step) = layer.stack.node.seq.get(layer.idx).cloned() else {
            break;
        };

        match step.kind {
            StepKind::Mov { from, to } => {
                let value = match from {
                    MovSource::Stack => layer.stack.value.clone(),
                    MovSource::A => layer.stack.a.clone(),
                    MovSource::B => layer.stack.b.clone(),
                    MovSource::Literal(v) => Some(v),
                    MovSource::Store(store) => {
                        let cell = layer.stack.node.store(store).ok_or(EngineError::MissingRegister {
                            node: layer.stack.node.id,
                            step: step.id,
                            store,
                        })?;
                        cell.read()
                    }
                };
                match to {
                    MovTarget::Stack => layer.stack.value = value,
                    MovTarget::A => layer.stack.a = value,
                    MovTarget::B => layer.stack.b = value,
                    MovTarget::Store(store) => {
                        let cell = layer.stack.node.store(store).ok_or(EngineError::MissingRegister {
                            node: layer.stack.node.id,
                            step: step.id,
                            store,
                        })?;
                        match value {
                            Some(v) => cell.write(v),
                            None => cell.clear(),
                        }
                    }
                }
                layer.idx += 1;
            }

            StepKind::Check(CheckKind::Defined) => {
                flags.skip = layer.stack.value.is_none();
                layer.idx += 1;
            }

            StepKind::Check(CheckKind::Changed { store }) => {
                let cell = layer.stack.node.store(store).ok_or(EngineError::MissingRegister {
                    node: layer.stack.node.id,
                    step: step.id,
                    store,
                })?;
                flags.skip = value_opt_identical(&layer.stack.value, &cell.read());
                layer.idx += 1;
            }

            StepKind::Filter(f) => {
                let current = layer.stack.value.clone().unwrap_or_else(|| Value::new(()));
                match guard::call_filter(&f, &current, &layer.stack.node.scope, &layer.stack) {
                    Ok(true) => layer.idx += 1,
                    Ok(false) => flags.skip = true,
                    Err(failure) => flags.fail = Some(failure),
                }
            }

            StepKind::Compute(f) => {
                let current = layer.stack.value.clone().unwrap_or_else(|| Value::new(()));
                match guard::call_compute(&f, &current, &layer.stack.node.scope, &layer.stack) {
                    Ok(next) => {
                        layer.stack.value = Some(next);
                        layer.idx += 1;
                    }
                    Err(failure) => flags.fail = Some(failure),
                }
            }

            StepKind::Run(f) => {
                if layer.class != PriorityClass::Effect {
                    layer.class = PriorityClass::Effect;
                    queue.borrow_mut().push(layer);
                    return Ok(Outcome::Suspended);
                }
                // Deliberate fallthrough (spec §9): `run` at the correct
                // priority IS a `compute`, gated only by the effect-priority
                // requeue above. This is load-bearing, not a missing `break`.
                let current = layer.stack.value.clone().unwrap_or_else(|| Value::new(()));
                match guard::call_compute(&f, &current, &layer.stack.node.scope, &layer.stack) {
                    Ok(next) => {
                        layer.stack.value = Some(next);
                        layer.idx += 1;
                    }
                    Err(failure) => flags.fail = Some(failure),
                }
            }

            StepKind::Barrier { priority } => {
                if layer.class != priority {
                    if barriers.borrow_mut().register(step.id) {
                        layer.class = priority;
                        layer.id = step.id;
                        queue.borrow_mut().push(layer);
                    }
                    // Else: coalescing — a barrier already in flight for
                    // this id; this arrival contributes nothing further.
                    return Ok(Outcome::Suspended);
                }
                barriers.borrow_mut().clear(step.id);
                layer.idx += 1;
            }
        }

        if flags.halted() {
            break;
        }
    }

    Ok(Outcome::Finished {
        stack: layer.stack,
        flags,
    })
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use indexmap::IndexMap;
    use synapse_core::{LocalStoreId, PriorityClass, RefId, Scope, StepId, Value};
    use synapse_graph::{GraphNode, RefCellSlot, Step, StepKind};

    use super::*;

    /// `check {changed}` against a ref cell holding the same `i64` value,
    /// compared by-value rather than by allocation: two independently
    /// constructed `Value::new(7i64)`s must read as unchanged (`skip`).
    #[test]
    fn check_changed_skips_for_an_equal_independently_constructed_i64() {
        let store = LocalStoreId(0);
        let cell = Rc::new(RefCellSlot::with_value(RefId::from_raw(1), Value::new(7i64)));
        let mut reg = IndexMap::new();
        reg.insert(store, Rc::clone(&cell));

        let step = Step::new(StepKind::Check(CheckKind::Changed { store }));
        let node = Rc::new(GraphNode::new(vec![step], Default::default(), reg, Scope::new(())));
        let stack = StackFrame::seed(node, Some(Value::new(7i64)));
        let layer = Layer::start(stack, PriorityClass::Pure, StepId::from_raw(1));

        let queue = RefCell::new(Queue::new());
        let barriers = RefCell::new(BarrierRegistry::new());
        let outcome = run_node(layer, &queue, &barriers).unwrap();
        match outcome {
            Outcome::Finished { flags, .. } => assert!(flags.skip, "equal i64 payloads must be reported unchanged"),
            Outcome::Suspended => panic!("expected Finished"),
        }
    }

    #[test]
    fn check_changed_does_not_skip_for_a_different_i64() {
        let store = LocalStoreId(0);
        let cell = Rc::new(RefCellSlot::with_value(RefId::from_raw(1), Value::new(7i64)));
        let mut reg = IndexMap::new();
        reg.insert(store, Rc::clone(&cell));

        let step = Step::new(StepKind::Check(CheckKind::Changed { store }));
        let node = Rc::new(GraphNode::new(vec![step], Default::default(), reg, Scope::new(())));
        let stack = StackFrame::seed(node, Some(Value::new(8i64)));
        let layer = Layer::start(stack, PriorityClass::Pure, StepId::from_raw(1));

        let queue = RefCell::new(Queue::new());
        let barriers = RefCell::new(BarrierRegistry::new());
        let outcome = run_node(layer, &queue, &barriers).unwrap();
        match outcome {
            Outcome::Finished { flags, .. } => assert!(!flags.skip, "different i64 payloads must be reported changed"),
            Outcome::Suspended => panic!("expected Finished"),
        }
    }
}
