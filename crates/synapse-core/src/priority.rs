//! The fixed total order over priority classes (spec §3).

/// One of the five fixed priority classes a [`Layer`](../synapse_queue/struct.Layer.html)
/// may be scheduled under.
///
/// Declared in dequeue order: `Child` is dequeued before `Pure`, which is
/// dequeued before `Barrier`, and so on. The derived [`Ord`] impl is exactly
/// this order — lower variant, higher priority.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriorityClass {
    /// Fan-out to a completed node's children.
    Child = 0,
    /// An ordinary top-level seed, or a `launch` injection.
    Pure = 1,
    /// A `barrier` step's target class; heap-scheduled, shared with `Sampler`.
    Barrier = 2,
    /// A sample-style observer reading state a barrier node just settled;
    /// heap-scheduled, shared with `Barrier`.
    Sampler = 3,
    /// A `run` step's required class.
    Effect = 4,
}

impl PriorityClass {
    /// All five classes, in dequeue order. Useful for iterating buckets.
    pub const ALL: [PriorityClass; 5] = [
        PriorityClass::Child,
        PriorityClass::Pure,
        PriorityClass::Barrier,
        PriorityClass::Sampler,
        PriorityClass::Effect,
    ];

    /// `true` for the two classes backed by the shared skew heap rather than
    /// a FIFO bucket.
    pub fn is_heap_scheduled(self) -> bool {
        matches!(self, PriorityClass::Barrier | PriorityClass::Sampler)
    }

    /// Index into a 5-slot bucket array.
    pub fn bucket_index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_order_matches_spec() {
        assert!(PriorityClass::Child < PriorityClass::Pure);
        assert!(PriorityClass::Pure < PriorityClass::Barrier);
        assert!(PriorityClass::Barrier < PriorityClass::Sampler);
        assert!(PriorityClass::Sampler < PriorityClass::Effect);
    }

    #[test]
    fn heap_scheduled_classes() {
        assert!(PriorityClass::Barrier.is_heap_scheduled());
        assert!(PriorityClass::Sampler.is_heap_scheduled());
        assert!(!PriorityClass::Pure.is_heap_scheduled());
        assert!(!PriorityClass::Child.is_heap_scheduled());
        assert!(!PriorityClass::Effect.is_heap_scheduled());
    }

    #[test]
    fn bucket_indices_are_0_through_4() {
        for (i, class) in PriorityClass::ALL.iter().enumerate() {
            assert_eq!(class.bucket_index(), i);
        }
    }
}
