//! Size-capped max-heap of provisionally accepted applicants.

use std::collections::BinaryHeap;

/// A held applicant keyed by `(rank, id)`.
///
/// The derived ordering compares `rank` first, then `id`, so the heap's
/// maximum is always the worst-ranked member with a deterministic
/// tie-break.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Seat<A> {
    pub(crate) rank: usize,
    pub(crate) id: A,
}

impl<A> Seat<A> {
    pub(crate) fn new(rank: usize, id: A) -> Self {
        Self { rank, id }
    }
}

/// Bounded pool with the worst member at the root.
#[derive(Debug, Clone)]
pub(crate) struct BoundedHeap<A: Ord> {
    heap: BinaryHeap<Seat<A>>,
    capacity: usize,
}

impl<A: Ord> BoundedHeap<A> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity.saturating_add(1).min(1024)),
            capacity,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn has_room(&self) -> bool {
        self.heap.len() < self.capacity
    }

    pub(crate) fn worst(&self) -> Option<&Seat<A>> {
        self.heap.peek()
    }

    /// Whether `(rank, id)` beats the current worst member.
    ///
    /// False on an empty heap: there is nobody to beat.
    pub(crate) fn outranks_worst(&self, rank: usize, id: &A) -> bool {
        self.worst()
            .is_some_and(|w| (rank, id) < (w.rank, &w.id))
    }

    /// Whether a bounded insert of `(rank, id)` would keep it in the pool.
    pub(crate) fn admits(&self, rank: usize, id: &A) -> bool {
        self.has_room() || self.outranks_worst(rank, id)
    }

    /// Inserts `seat`, then pops and returns the worst member if the pool
    /// overflowed. The returned seat may be `seat` itself.
    pub(crate) fn insert(&mut self, seat: Seat<A>) -> Option<Seat<A>> {
        self.heap.push(seat);
        if self.heap.len() > self.capacity {
            self.heap.pop()
        } else {
            None
        }
    }

    pub(crate) fn pop_worst(&mut self) -> Option<Seat<A>> {
        self.heap.pop()
    }

    pub(crate) fn contains(&self, id: &A) -> bool {
        self.heap.iter().any(|s| &s.id == id)
    }

    /// Members best-first.
    pub(crate) fn members(&self) -> Vec<&A> {
        let mut seats: Vec<&Seat<A>> = self.heap.iter().collect();
        seats.sort();
        seats.into_iter().map(|s| &s.id).collect()
    }
}
