//! Synapse: a reactive dataflow propagation engine.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all synapse sub-crates. For most users, adding `synapse` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use synapse::prelude::*;
//! use synapse::graph::{MovSource, MovTarget, RefCellSlot};
//!
//! // A child node that captures whatever value reaches it.
//! let slot = Rc::new(RefCellSlot::new(synapse::types::next_ref_id()));
//! let store = LocalStoreId(0);
//! let mut reg = indexmap::IndexMap::new();
//! reg.insert(store, Rc::clone(&slot));
//! let sink = Rc::new(GraphNode::new(
//!     vec![Step::new(StepKind::Mov { from: MovSource::Stack, to: MovTarget::Store(store) })],
//!     Default::default(),
//!     reg,
//!     Scope::new(()),
//! ));
//!
//! // A root node that doubles its incoming value before fanning out.
//! let double: ComputeFn = Rc::new(|v, _scope, _stack| {
//!     let n = *v.downcast_ref::<i64>().ok_or_else(|| "expected i64".to_string())?;
//!     Ok(Value::new(n * 2))
//! });
//! let mut next = ChildList::new();
//! next.push(sink);
//! let root = Rc::new(GraphNode::new(
//!     vec![Step::new(StepKind::Compute(double))],
//!     next,
//!     indexmap::IndexMap::new(),
//!     Scope::new(()),
//! ));
//!
//! let engine = Engine::new();
//! engine.launch(LaunchSpec::single(root, Some(Value::new(5i64)))).unwrap();
//!
//! assert_eq!(*slot.read().unwrap().downcast_ref::<i64>().unwrap(), 10);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `synapse-core` | Ids, `Value`/`Scope`, `PriorityClass`, error types |
//! | [`graph`] | `synapse-graph` | Ref cells, graph nodes, step opcodes, stack frames |
//! | [`queue`] | `synapse-queue` | The composite priority queue and skew heap |
//! | [`engine`] | `synapse-engine` | The interpreter, barrier registry, and `Engine`/`launch` driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Ids, the dynamic `Value`/`Scope` wrappers, and error types (`synapse-core`).
pub use synapse_core as types;

/// Ref cells, graph nodes, step opcodes, and stack frames (`synapse-graph`).
pub use synapse_graph as graph;

/// The composite priority queue and shared skew heap (`synapse-queue`).
pub use synapse_queue as queue;

/// The interpreter and `Engine`/`launch` driver (`synapse-engine`).
pub use synapse_engine as engine;

/// Common imports for typical synapse usage.
///
/// ```rust
/// use synapse::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use synapse_core::{LocalStoreId, PriorityClass, Scope, UnitId, Value};

    // Errors
    pub use synapse_core::{EngineError, UserFnFailure};

    // Graph
    pub use synapse_graph::{ChildList, ComputeFn, FilterFn, GraphNode, Step, StepKind};

    // Engine
    pub use synapse_engine::{Engine, EngineHandle, LaunchSpec, LaunchUnits};
}
