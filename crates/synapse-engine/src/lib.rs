//! The barrier registry, the per-node interpreter, and the `Engine`/`launch`
//! driver that ties the queue and the graph together (spec §4, §9).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod engine;
pub mod interpreter;
pub mod registry;
pub mod validate;

pub use engine::{Engine, EngineHandle, LaunchSpec, LaunchUnits};
pub use interpreter::{run_node, Outcome};
pub use registry::BarrierRegistry;
pub use validate::validate_graph;
