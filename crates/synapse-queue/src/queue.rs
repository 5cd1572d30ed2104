//! The composite priority queue: three FIFO buckets plus the shared skew heap
//! (spec §4.3).

use std::collections::VecDeque;

use synapse_core::{EngineError, PriorityClass};

use crate::heap::{meld, HeapNode};
use crate::layer::Layer;

/// Five-slot scheduling structure. `Child`, `Pure`, and `Effect` are plain
/// FIFO buckets; `Barrier` and `Sampler` share one skew heap, with their
/// sizes tracked separately so dequeue can still "attribute a size to each
/// class" without the heap itself knowing about buckets.
#[derive(Default)]
pub struct Queue {
    child: VecDeque<Layer>,
    pure: VecDeque<Layer>,
    effect: VecDeque<Layer>,
    heap: Option<Box<HeapNode>>,
    barrier_len: usize,
    sampler_len: usize,
}

impl Queue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a layer at `layer.class`. `Barrier`/`Sampler` layers meld into
    /// the shared heap; the other three append to their FIFO bucket.
    pub fn push(&mut self, layer: Layer) {
        match layer.class {
            PriorityClass::Child => self.child.push_back(layer),
            PriorityClass::Pure => self.pure.push_back(layer),
            PriorityClass::Effect => self.effect.push_back(layer),
            PriorityClass::Barrier => {
                self.heap = meld(self.heap.take(), Some(HeapNode::singleton(layer)));
                self.barrier_len += 1;
            }
            PriorityClass::Sampler => {
                self.heap = meld(self.heap.take(), Some(HeapNode::singleton(layer)));
                self.sampler_len += 1;
            }
        }
    }

    /// Scan buckets in priority order (0..4); the first non-empty bucket
    /// wins. Returns `Err` only if internal bookkeeping disagrees with the
    /// heap's actual contents — a structural bug, not a user-facing
    /// condition.
    pub fn pop(&mut self) -> Result<Option<Layer>, EngineError> {
        for class in PriorityClass::ALL {
            match class {
                PriorityClass::Child => {
                    if let Some(layer) = self.child.pop_front() {
                        return Ok(Some(layer));
                    }
                }
                PriorityClass::Pure => {
                    if let Some(layer) = self.pure.pop_front() {
                        return Ok(Some(layer));
                    }
                }
                PriorityClass::Effect => {
                    if let Some(layer) = self.effect.pop_front() {
                        return Ok(Some(layer));
                    }
                }
                PriorityClass::Barrier => {
                    if self.barrier_len > 0 {
                        return self.pop_heap_root().map(Some);
                    }
                }
                PriorityClass::Sampler => {
                    if self.sampler_len > 0 {
                        return self.pop_heap_root().map(Some);
                    }
                }
            }
        }
        Ok(None)
    }

    fn pop_heap_root(&mut self) -> Result<Layer, EngineError> {
        let root = self.heap.take().ok_or_else(|| EngineError::QueueSizeMismatch {
            detail: "barrier/sampler bucket length positive but shared heap is empty".to_string(),
        })?;
        let HeapNode { layer, left, right } = *root;
        self.heap = meld(left, right);
        match layer.class {
            PriorityClass::Barrier => self.barrier_len -= 1,
            PriorityClass::Sampler => self.sampler_len -= 1,
            other => {
                return Err(EngineError::QueueSizeMismatch {
                    detail: format!("shared heap yielded a layer of non-heap class {other:?}"),
                })
            }
        }
        Ok(layer)
    }

    /// Number of layers currently queued under `class`.
    pub fn len_for(&self, class: PriorityClass) -> usize {
        match class {
            PriorityClass::Child => self.child.len(),
            PriorityClass::Pure => self.pure.len(),
            PriorityClass::Effect => self.effect.len(),
            PriorityClass::Barrier => self.barrier_len,
            PriorityClass::Sampler => self.sampler_len,
        }
    }

    /// `true` if every bucket and the shared heap are empty.
    pub fn is_empty(&self) -> bool {
        PriorityClass::ALL.iter().all(|&c| self.len_for(c) == 0)
    }
}
