//! Error types for the propagation engine.
//!
//! Two families, kept syntactically distinct so a call site cannot mistake a
//! recoverable user-function failure for a structural bug: [`UserFnFailure`]
//! and [`EngineError`].

use std::error::Error;
use std::fmt;

use crate::id::{LocalStoreId, StepId, UnitId};

/// Why a `filter`/`compute`/`run` user function failed to produce a value.
///
/// The engine catches both cases, marks the current layer's `fail` flag, and
/// writes a diagnostic to the process error stream; neither variant aborts
/// the drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFnFailure {
    /// The function returned an error explicitly.
    Returned(String),
    /// The function panicked instead of returning.
    Panicked(String),
}

impl fmt::Display for UserFnFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Returned(msg) => write!(f, "user function returned an error: {msg}"),
            Self::Panicked(msg) => write!(f, "user function panicked: {msg}"),
        }
    }
}

impl Error for UserFnFailure {}

/// A structural error: a condition that should be impossible for correctly
/// constructed graphs, per spec §7.2. The drain loop does not catch these the
/// way it catches [`UserFnFailure`] — it returns them, aborting the whole
/// drain rather than just the offending node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A `mov`/`check` step named a store slot absent from its node's
    /// register table.
    MissingRegister {
        /// The node whose register table was consulted.
        node: UnitId,
        /// The step that made the reference.
        step: StepId,
        /// The store slot that was not found.
        store: LocalStoreId,
    },
    /// The dequeue loop found a priority bucket it believed non-empty to
    /// actually be empty — a queue-bookkeeping invariant violation.
    QueueSizeMismatch {
        /// Human-readable description of which bucket/size disagreed.
        detail: String,
    },
    /// Graph-shape validation rejected a node that names itself as its own
    /// direct child (see `validate` in `synapse-engine`).
    SelfReferentialChild {
        /// The offending node.
        node: UnitId,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRegister { node, step, store } => write!(
                f,
                "node {node} step {step} references store slot {store} absent from its register table"
            ),
            Self::QueueSizeMismatch { detail } => write!(f, "queue bookkeeping invariant violated: {detail}"),
            Self::SelfReferentialChild { node } => {
                write!(f, "node {node} names itself as its own direct child")
            }
        }
    }
}

impl Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_fn_failure_display() {
        let f = UserFnFailure::Returned("bad input".into());
        assert_eq!(f.to_string(), "user function returned an error: bad input");
    }

    #[test]
    fn engine_error_display_includes_ids() {
        let e = EngineError::MissingRegister {
            node: UnitId::from_raw(3),
            step: StepId::from_raw(7),
            store: LocalStoreId(2),
        };
        let msg = e.to_string();
        assert!(msg.contains("store slot 2"));
    }
}
