//! Ids, the dynamic [`Value`]/[`Scope`] wrappers, and error types shared by
//! every crate in the propagation-engine workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod priority;
pub mod value;

pub use error::{EngineError, UserFnFailure};
pub use id::{next_ref_id, next_step_id, next_unit_id, BarrierId, LocalStoreId, RefId, StepId, UnitId};
pub use priority::PriorityClass;
pub use value::{Scope, Value};
