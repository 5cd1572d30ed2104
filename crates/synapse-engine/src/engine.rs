//! The driver: `launch`, the drain loop, and re-entrant single-start
//! semantics (spec §4.4).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use synapse_core::{EngineError, PriorityClass, StepId, Value};
use synapse_graph::{GraphNode, StackFrame};
use synapse_queue::{Layer, Queue};

use crate::interpreter::{self, Outcome};
use crate::registry::BarrierRegistry;

/// A non-heap-scheduled layer's `id` plays no part in its ordering; `0`
/// matches the source's own convention for this case (spec §4.2, the `run`
/// step's effect-priority push uses `id = 0` literally).
const FIFO_ID: StepId = StepId::from_raw(0);

/// What to seed into the queue for one `launch` call.
///
/// The source's `launch` accepts a node handle, an array of node handles with
/// a parallel payload array, or a `{target, params, defer}` descriptor that
/// unpacks to the same three pieces of information (spec §6). Those three
/// call shapes are one Rust type: a single seed is `Many` with one element,
/// and the descriptor's `defer` is this crate's `upsert` — there is no
/// separate code path for it.
pub enum LaunchUnits {
    /// One seed node and its payload.
    Single(Rc<GraphNode>, Option<Value>),
    /// Several seed nodes, each with its own payload.
    Many(Vec<(Rc<GraphNode>, Option<Value>)>),
}

/// A fully-specified `launch` call.
pub struct LaunchSpec {
    /// The node(s) to seed at priority `pure`.
    pub units: LaunchUnits,
    /// If a drain is already active, `true` means "just enqueue and return";
    /// `false` means "start a nested drain" (spec §4.4).
    pub upsert: bool,
}

impl LaunchSpec {
    /// A single seed node, not deferring to an outer drain.
    pub fn single(node: Rc<GraphNode>, payload: Option<Value>) -> Self {
        Self {
            units: LaunchUnits::Single(node, payload),
            upsert: false,
        }
    }

    /// Several seed nodes in parallel, not deferring to an outer drain.
    pub fn many(pairs: Vec<(Rc<GraphNode>, Option<Value>)>) -> Self {
        Self {
            units: LaunchUnits::Many(pairs),
            upsert: false,
        }
    }

    /// Set the `upsert` flag.
    pub fn with_upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }
}

/// An explicit engine instance: owns the queue, barrier registry, and the
/// single-entrant `started` flag (spec §9 re-architects the source's
/// module-level singletons this way, which also means multiple isolated
/// engines can coexist, e.g. one per test).
///
/// Every field lives behind interior mutability and every method below takes
/// `&self`, not `&mut self` — this is what makes [`EngineHandle`] possible: a
/// user function running under the drain loop only ever sees a shared `&Engine`
/// (via its `Scope`), and shared references can't call `&mut self` methods.
/// Queue/barrier access is always a short-lived borrow taken and released
/// within a single statement, never held across a call out to user code, so a
/// `launch` re-entering from inside a running `compute`/`filter`/`run` (spec
/// §5) never collides with the borrow the outer drain is using.
#[derive(Default)]
pub struct Engine {
    queue: RefCell<Queue>,
    barriers: RefCell<BarrierRegistry>,
    started: Cell<bool>,
}

impl Engine {
    /// A fresh engine with an empty queue and no propagation in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while a drain loop is on the call stack (possibly nested).
    pub fn is_started(&self) -> bool {
        self.started.get()
    }

    fn seed(&self, units: LaunchUnits) {
        match units {
            LaunchUnits::Single(node, payload) => self.seed_one(node, payload),
            LaunchUnits::Many(pairs) => {
                for (node, payload) in pairs {
                    self.seed_one(node, payload);
                }
            }
        }
    }

    fn seed_one(&self, node: Rc<GraphNode>, payload: Option<Value>) {
        let stack = StackFrame::seed(node, payload);
        self.queue.borrow_mut().push(Layer::start(stack, PriorityClass::Pure, FIFO_ID));
    }

    /// The public entry point (spec §4.4).
    ///
    /// Seeds the queue, then either starts the drain loop, returns
    /// immediately (an `upsert` call arriving while a drain is active — the
    /// live drain will pick up what was just seeded), or runs a nested drain
    /// (re-entrance without `upsert`), saving and restoring `started` around
    /// it exactly as the spec describes. Callable from inside a user
    /// function running under this same engine's drain loop (spec §5):
    /// nothing here ever holds a borrow across a call back into user code,
    /// so the re-entrant seed (and, for the non-`upsert` case, nested drain)
    /// runs against the live queue rather than a stale snapshot.
    pub fn launch(&self, spec: LaunchSpec) -> Result<(), EngineError> {
        self.seed(spec.units);

        if !self.started.get() {
            self.started.set(true);
            let result = self.drain();
            self.started.set(false);
            result
        } else if spec.upsert {
            Ok(())
        } else {
            let prior = self.started.get();
            self.started.set(true);
            let result = self.drain();
            self.started.set(prior);
            result
        }
    }

    /// Repeatedly dequeue a layer, interpret it, and fan out its children,
    /// until the queue is empty. A re-entrant `launch` triggered from inside
    /// `interpreter::run_node` seeds (and may itself fully drain) this same
    /// queue; either way this loop simply keeps popping until nothing is
    /// left, whether that's because it did all the work or because a nested
    /// drain already did.
    ///
    /// The pop is its own `let` statement rather than a `while let` over
    /// `borrow_mut().pop()` directly: a `while let`'s scrutinee temporaries
    /// stay alive for the whole loop body, which here would hold the queue's
    /// `RefCell` borrow across the call into `run_node` — and thus across
    /// any user closure it invokes — defeating the whole point of wrapping
    /// the queue in a `RefCell` in the first place.
    fn drain(&self) -> Result<(), EngineError> {
        loop {
            let popped = self.queue.borrow_mut().pop()?;
            let Some(layer) = popped else { break };
            match interpreter::run_node(layer, &self.queue, &self.barriers)? {
                Outcome::Suspended => {}
                Outcome::Finished { stack, flags } => {
                    if !flags.halted() {
                        self.fan_out(stack);
                    }
                }
            }
        }
        Ok(())
    }

    /// Enqueue one `child`-priority layer per child node, reusing the
    /// completed stack's value and linking the new frames' `parent` to it
    /// (spec §4.4, "fan-out stack linkage").
    fn fan_out(&self, completed: StackFrame) {
        let children: Vec<_> = completed.node.next.iter().cloned().collect();
        if children.is_empty() {
            return;
        }
        let parent = Rc::new(completed);
        for child in children {
            let child_stack = StackFrame::child_of(parent.clone(), child);
            self.queue
                .borrow_mut()
                .push(Layer::start(child_stack, PriorityClass::Child, FIFO_ID));
        }
    }
}

/// A shared handle to a live [`Engine`], reachable from inside a running
/// `compute`/`filter`/`run` user function (spec §5, "launch may be called
/// from inside a user function running under the drain loop"; spec §8's
/// re-entrant-launch property).
///
/// Threaded through a node's [`Scope`](synapse_core::Scope) payload: a
/// caller builds one `EngineHandle`, passes `Scope::new(handle.clone())` (or
/// a struct embedding it) to every node it wants able to re-enter the
/// engine, and a `ComputeFn`/`FilterFn` downcasts its `scope` argument back
/// to reach [`EngineHandle::launch`]. Cloning an `EngineHandle` clones the
/// `Rc`, not the engine — every clone drives the same queue and `started`
/// flag.
#[derive(Clone, Default)]
pub struct EngineHandle(Rc<Engine>);

impl EngineHandle {
    /// Wrap a fresh, empty engine in a shareable handle.
    pub fn new() -> Self {
        Self(Rc::new(Engine::new()))
    }

    /// Launch against the wrapped engine. See [`Engine::launch`].
    pub fn launch(&self, spec: LaunchSpec) -> Result<(), EngineError> {
        self.0.launch(spec)
    }

    /// `true` while a drain loop is on the call stack for the wrapped engine.
    pub fn is_started(&self) -> bool {
        self.0.is_started()
    }
}
