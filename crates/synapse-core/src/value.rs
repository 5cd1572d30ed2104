//! The dynamically-typed `Value` and `Scope` wrappers at the interpreter boundary.
//!
//! Both the propagated datum and the per-graph scope record are arbitrary user
//! data (spec §9, "opaque `scope` and `value`"); representing them as a
//! reference-counted `dyn Any` lets `check {changed}` implement the source
//! language's `===` without forcing every payload through a single concrete
//! type.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// A propagated value, or a node's opaque scope record.
///
/// Cloning a `Value` clones the handle, not the payload — two clones of the
/// same `Value` are `===` to each other by construction. [`Value::eq`]
/// implements the source language's identity comparison: pointer identity for
/// arbitrary payloads, with a value-equality fallback for the closed set of
/// primitive scalars (`f64`, `i64`, `bool`, `String`) for which `===` is itself
/// value equality rather than reference equality.
#[derive(Clone)]
pub struct Value(Rc<dyn Any>);

impl Value {
    /// Wrap an arbitrary payload.
    pub fn new<T: Any + 'static>(payload: T) -> Self {
        Self(Rc::new(payload))
    }

    /// Borrow the payload as a concrete type, if it matches.
    pub fn downcast_ref<T: Any + 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// `true` if this and `other` are the same reference-counted allocation.
    pub fn is_same_allocation(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Source-language `===`: same allocation, or equal primitive scalars.
    ///
    /// The source language has a single `number` type; this workspace's
    /// payloads arrive as whichever concrete Rust numeric type the caller
    /// chose (`i64` is what every in-tree number-valued store actually uses,
    /// alongside `f64`), so the fallback has to special-case each numeric
    /// type it might see rather than just `f64`.
    pub fn identical_to(&self, other: &Self) -> bool {
        if self.is_same_allocation(other) {
            return true;
        }
        if let (Some(a), Some(b)) = (self.downcast_ref::<f64>(), other.downcast_ref::<f64>()) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (self.downcast_ref::<i64>(), other.downcast_ref::<i64>()) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (self.downcast_ref::<bool>(), other.downcast_ref::<bool>()) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (self.downcast_ref::<String>(), other.downcast_ref::<String>()) {
            return a == b;
        }
        false
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&Rc::as_ptr(&self.0)).finish()
    }
}

/// An opaque per-graph scope record, passed to every user function as context.
///
/// Distinct type from [`Value`] even though the representation is identical,
/// so a call site cannot accidentally hand a propagated value where a scope
/// was expected or vice versa.
#[derive(Clone)]
pub struct Scope(Rc<dyn Any>);

impl Scope {
    /// Wrap an arbitrary scope payload.
    pub fn new<T: Any + 'static>(payload: T) -> Self {
        Self(Rc::new(payload))
    }

    /// Borrow the scope payload as a concrete type, if it matches.
    pub fn downcast_ref<T: Any + 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Scope").field(&Rc::as_ptr(&self.0)).finish()
    }
}
