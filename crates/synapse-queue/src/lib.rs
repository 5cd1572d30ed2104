//! The composite priority queue: five priority classes, three FIFO buckets,
//! and a shared skew heap (spec §4.3).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod heap;
pub mod layer;
pub mod queue;

pub use heap::{meld, HeapNode};
pub use layer::Layer;
pub use queue::Queue;
