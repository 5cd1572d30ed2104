//! Ref cells: mutable value slots addressed by stable ids (spec §4.1).

use std::cell::RefCell as StdRefCell;

use synapse_core::{RefId, Value};

/// A mutable value slot, owned by the graph that first registers it and
/// read/written by any node whose register table maps a local store id to it.
///
/// Writes happen only through a `mov` step whose destination is this cell
/// (enforced by the interpreter, not by this type); `RefCellSlot` itself is a
/// trivial read/write contract, as spec §4.1 says it should be.
pub struct RefCellSlot {
    id: RefId,
    current: StdRefCell<Option<Value>>,
}

impl RefCellSlot {
    /// Create an empty cell (no current value) with the given id.
    pub fn new(id: RefId) -> Self {
        Self {
            id,
            current: StdRefCell::new(None),
        }
    }

    /// Create a cell already holding a value.
    pub fn with_value(id: RefId, value: Value) -> Self {
        Self {
            id,
            current: StdRefCell::new(Some(value)),
        }
    }

    /// The cell's stable id.
    pub fn id(&self) -> RefId {
        self.id
    }

    /// `readRef(cell) -> current`.
    pub fn read(&self) -> Option<Value> {
        self.current.borrow().clone()
    }

    /// Replace `current`. Only called by the interpreter's `mov` handling.
    pub fn write(&self, value: Value) {
        *self.current.borrow_mut() = Some(value);
    }

    /// Set `current` to undefined. Reachable when a `mov` moves an undefined
    /// stack/scratch slot into a ref cell.
    pub fn clear(&self) {
        *self.current.borrow_mut() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let cell = RefCellSlot::new(RefId::from_raw(1));
        assert!(cell.read().is_none());
    }

    #[test]
    fn write_then_read_round_trips() {
        let cell = RefCellSlot::new(RefId::from_raw(1));
        let v = Value::new(6i64);
        cell.write(v.clone());
        let read_back = cell.read().unwrap();
        assert!(read_back.identical_to(&v));
    }
}
