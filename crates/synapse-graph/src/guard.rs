//! Wraps every user-function call so a throw (an `Err`) or a panic converts
//! into a [`UserFnFailure`] plus a diagnostic, instead of unwinding across the
//! drain loop (spec §9, "User-function exceptions").
//!
//! Unlike the debug-only write-coverage diagnostic elsewhere in this
//! codebase, this guard's diagnostic is always on: spec §7 describes writing
//! to "the process error stream" as part of the engine's observable
//! contract, not a development-time assertion.

use std::panic::{self, AssertUnwindSafe};

use synapse_core::{Scope, UserFnFailure, Value};

use crate::stack::StackFrame;
use crate::step::{ComputeFn, FilterFn};

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Invoke a `filter` step's predicate, catching both an `Err` return and a
/// panic. The closures here only read from `value`/`scope`/`stack`, so
/// asserting unwind-safety is sound: a panic mid-call leaves no engine state
/// half-mutated for a caller to observe.
pub fn call_filter(f: &FilterFn, value: &Value, scope: &Scope, stack: &StackFrame) -> Result<bool, UserFnFailure> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| f(value, scope, stack)));
    match result {
        Ok(Ok(pass)) => Ok(pass),
        Ok(Err(msg)) => {
            let failure = UserFnFailure::Returned(msg);
            eprintln!("synapse: filter step failed: {failure}");
            Err(failure)
        }
        Err(payload) => {
            let failure = UserFnFailure::Panicked(panic_message(payload));
            eprintln!("synapse: filter step panicked: {failure}");
            Err(failure)
        }
    }
}

/// Invoke a `compute`/`run` step's transform, with the same catch-and-log
/// contract as [`call_filter`].
pub fn call_compute(f: &ComputeFn, value: &Value, scope: &Scope, stack: &StackFrame) -> Result<Value, UserFnFailure> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| f(value, scope, stack)));
    match result {
        Ok(Ok(next)) => Ok(next),
        Ok(Err(msg)) => {
            let failure = UserFnFailure::Returned(msg);
            eprintln!("synapse: compute step failed: {failure}");
            Err(failure)
        }
        Err(payload) => {
            let failure = UserFnFailure::Panicked(panic_message(payload));
            eprintln!("synapse: compute step panicked: {failure}");
            Err(failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn frame() -> (crate::node::GraphNode, Scope) {
        let scope = Scope::new(());
        let node = crate::node::GraphNode::new(
            Vec::new(),
            Default::default(),
            Default::default(),
            scope.clone(),
        );
        (node, scope)
    }

    #[test]
    fn filter_returning_err_is_caught() {
        let (node, scope) = frame();
        let stack = StackFrame::seed(Rc::new(node), None);
        let f: FilterFn = Rc::new(|_v, _s, _st| Err("nope".to_string()));
        let result = call_filter(&f, &Value::new(1i64), &scope, &stack);
        assert!(matches!(result, Err(UserFnFailure::Returned(_))));
    }

    #[test]
    fn filter_panicking_is_caught() {
        let (node, scope) = frame();
        let stack = StackFrame::seed(Rc::new(node), None);
        let f: FilterFn = Rc::new(|_v, _s, _st| panic!("boom"));
        let result = call_filter(&f, &Value::new(1i64), &scope, &stack);
        assert!(matches!(result, Err(UserFnFailure::Panicked(_))));
    }

    #[test]
    fn compute_success_passes_through() {
        let (node, scope) = frame();
        let stack = StackFrame::seed(Rc::new(node), None);
        let f: ComputeFn = Rc::new(|v, _s, _st| {
            let n = *v.downcast_ref::<i64>().unwrap();
            Ok(Value::new(n + 1))
        });
        let result = call_compute(&f, &Value::new(5i64), &scope, &stack).unwrap();
        assert_eq!(*result.downcast_ref::<i64>().unwrap(), 6);
    }

    use proptest::prelude::*;

    proptest! {
        /// Whatever message a `filter` returns as its `Err`, the guard must
        /// preserve it verbatim in the resulting `UserFnFailure::Returned`.
        #[test]
        fn any_filter_error_message_survives_the_guard(msg in ".*") {
            let (node, scope) = frame();
            let stack = StackFrame::seed(Rc::new(node), None);
            let owned = msg.clone();
            let f: FilterFn = Rc::new(move |_v, _s, _st| Err(owned.clone()));
            let result = call_filter(&f, &Value::new(1i64), &scope, &stack);
            prop_assert_eq!(result, Err(UserFnFailure::Returned(msg)));
        }
    }
}
