//! Storage for the terms of a [SparsePolynomial](super::polynomial::SparsePolynomial).
//!
//! Terms are nodes of a singly-linked list. The nodes live in a slab owned by the
//! polynomial and are addressed by [SummandId]. Released nodes go onto a free list
//! and are handed out again by the next allocation.

use crate::domains::Ring;

use super::{monomial::ExponentVector, Exponent};

/// The index of a summand in a [SummandPool].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SummandId(u32);

impl SummandId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single term `coefficient * x^exponents` together with the link to the next term.
#[derive(Clone, Debug)]
pub struct Summand<R: Ring, E: Exponent> {
    pub coefficient: R::Element,
    pub exponents: ExponentVector<E>,
    pub(crate) next: Option<SummandId>,
}

impl<R: Ring, E: Exponent> Summand<R, E> {
    pub fn new(coefficient: R::Element, exponents: ExponentVector<E>) -> Self {
        Summand {
            coefficient,
            exponents,
            next: None,
        }
    }

    #[inline]
    pub fn next(&self) -> Option<SummandId> {
        self.next
    }
}

/// A slab of summands with a free list.
#[derive(Clone, Debug)]
pub struct SummandPool<R: Ring, E: Exponent> {
    slots: Vec<Option<Summand<R, E>>>,
    free: Vec<SummandId>,
}

impl<R: Ring, E: Exponent> Default for SummandPool<R, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Ring, E: Exponent> SummandPool<R, E> {
    pub fn new() -> Self {
        SummandPool {
            slots: vec![],
            free: vec![],
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        SummandPool {
            slots: Vec::with_capacity(cap),
            free: vec![],
        }
    }

    /// Store `summand` and return its id, reusing a released slot if there is one.
    pub fn alloc(&mut self, summand: Summand<R, E>) -> SummandId {
        if let Some(id) = self.free.pop() {
            debug_assert!(self.slots[id.index()].is_none());
            self.slots[id.index()] = Some(summand);
            id
        } else {
            let id = SummandId(
                u32::try_from(self.slots.len()).expect("Too many summands in one polynomial"),
            );
            self.slots.push(Some(summand));
            id
        }
    }

    /// Remove a summand from the pool and return it.
    pub fn release(&mut self, id: SummandId) -> Summand<R, E> {
        let s = self.slots[id.index()]
            .take()
            .expect("Summand released twice");
        self.free.push(id);
        s
    }

    #[inline]
    pub fn get(&self, id: SummandId) -> &Summand<R, E> {
        self.slots[id.index()]
            .as_ref()
            .expect("Access to a released summand")
    }

    #[inline]
    pub fn get_mut(&mut self, id: SummandId) -> &mut Summand<R, E> {
        self.slots[id.index()]
            .as_mut()
            .expect("Access to a released summand")
    }

    #[inline]
    pub(crate) fn set_next(&mut self, id: SummandId, next: Option<SummandId>) {
        self.get_mut(id).next = next;
    }

    /// The number of summands that are currently stored.
    #[inline]
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// The number of slots, live or free.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Release every summand at once.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
mod tests {
    use crate::domains::integer::{Integer, Z};
    use crate::poly::monomial::ExponentVector;

    use super::{Summand, SummandPool};

    #[test]
    fn free_list_reuse() {
        let mut pool = SummandPool::<Z, u8>::new();
        let a = pool.alloc(Summand::new(Integer::new(1), ExponentVector::one(2)));
        let b = pool.alloc(Summand::new(Integer::new(2), ExponentVector::one(2)));
        assert_eq!(pool.live(), 2);

        let s = pool.release(a);
        assert_eq!(s.coefficient, Integer::new(1));
        assert_eq!(pool.live(), 1);

        let c = pool.alloc(Summand::new(Integer::new(3), ExponentVector::one(2)));
        assert_eq!(c, a);
        assert_eq!(pool.capacity(), 2);
        assert_eq!(pool.get(b).coefficient, Integer::new(2));
        assert_eq!(pool.get(c).coefficient, Integer::new(3));
    }

    #[test]
    #[should_panic(expected = "Access to a released summand")]
    fn released_access() {
        let mut pool = SummandPool::<Z, u8>::new();
        let a = pool.alloc(Summand::new(Integer::new(1), ExponentVector::one(1)));
        pool.release(a);
        pool.get(a);
    }
}
