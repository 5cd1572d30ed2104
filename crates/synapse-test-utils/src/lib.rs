//! Fixtures for exercising the synapse propagation engine without rebuilding
//! the same small graphs in every test module.
//!
//! Mirrors the `Mock*`-builder shape used elsewhere in this codebase's
//! test-support crates: prebuilt pieces a caller wires together, rather than
//! a framework a caller has to learn.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    combine_node, compute_node, effect_node, filter_node, sampler_node, sink_node, MockRefCell,
};
