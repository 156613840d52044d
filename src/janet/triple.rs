use crate::domains::Ring;
use crate::error::PolynomialError;
use crate::poly::{
    monomial::ExponentVector, polynomial::SparsePolynomial, Exponent, MonomialOrder,
};

/// A polynomial together with the monomial it descends from and the variables
/// for which its prolongation has been formed.
#[derive(Clone, Debug)]
pub struct JanetTriple<R: Ring, E: Exponent, O: MonomialOrder> {
    polynomial: SparsePolynomial<R, E, O>,
    ancestor: ExponentVector<E>,
    nonmultiplicative: Vec<bool>,
}

impl<R: Ring, E: Exponent, O: MonomialOrder> JanetTriple<R, E, O> {
    /// Create a triple whose ancestor is the leading monomial of `polynomial`.
    pub fn new(polynomial: SparsePolynomial<R, E, O>) -> Result<Self, PolynomialError> {
        let ancestor = polynomial.lmonomial()?.clone();
        Ok(Self::with_ancestor(polynomial, ancestor))
    }

    pub fn with_ancestor(
        polynomial: SparsePolynomial<R, E, O>,
        ancestor: ExponentVector<E>,
    ) -> Self {
        debug_assert_eq!(polynomial.nvars(), ancestor.nvars());
        let nvars = polynomial.nvars();
        JanetTriple {
            polynomial,
            ancestor,
            nonmultiplicative: vec![false; nvars],
        }
    }

    #[inline]
    pub fn polynomial(&self) -> &SparsePolynomial<R, E, O> {
        &self.polynomial
    }

    #[inline]
    pub fn ancestor(&self) -> &ExponentVector<E> {
        &self.ancestor
    }

    /// The leading monomial. Triples never hold the zero polynomial.
    #[inline]
    pub fn leading_monomial(&self) -> &ExponentVector<E> {
        self.polynomial
            .lmonomial()
            .expect("Janet triple with zero polynomial")
    }

    pub fn nvars(&self) -> usize {
        self.nonmultiplicative.len()
    }

    /// The flags of the variables that have been treated as non-multiplicative.
    pub fn nonmultiplicative(&self) -> &[bool] {
        &self.nonmultiplicative
    }

    #[inline]
    pub fn is_nonmultiplicative(&self, var: usize) -> bool {
        self.nonmultiplicative[var]
    }

    #[inline]
    pub fn set_nonmultiplicative(&mut self, var: usize) {
        self.nonmultiplicative[var] = true;
    }

    pub fn clear_nonmultiplicative(&mut self) {
        for f in &mut self.nonmultiplicative {
            *f = false;
        }
    }

    /// Replace the polynomial by one with the same leading monomial, keeping
    /// the ancestor and the flags.
    pub fn set_polynomial(&mut self, polynomial: SparsePolynomial<R, E, O>) {
        debug_assert_eq!(polynomial.lmonomial().ok(), self.polynomial.lmonomial().ok());
        self.polynomial = polynomial;
    }

    pub fn into_polynomial(self) -> SparsePolynomial<R, E, O> {
        self.polynomial
    }
}

/// A stable reference to a triple in a [TripleStore].
///
/// Removing a triple invalidates its id: the slot may be reused, but with a
/// new generation, so an old id never resolves to the new triple.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TripleId {
    index: u32,
    generation: u32,
}

impl std::fmt::Display for TripleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.index)?;
        if self.generation > 0 {
            write!(f, "'{}", self.generation)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// The owner of all triples of a basis computation.
#[derive(Clone, Debug)]
pub struct TripleStore<R: Ring, E: Exponent, O: MonomialOrder> {
    slots: Vec<Slot<JanetTriple<R, E, O>>>,
    free: Vec<u32>,
}

impl<R: Ring, E: Exponent, O: MonomialOrder> Default for TripleStore<R, E, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Ring, E: Exponent, O: MonomialOrder> TripleStore<R, E, O> {
    pub fn new() -> Self {
        TripleStore {
            slots: vec![],
            free: vec![],
        }
    }

    pub fn insert(&mut self, triple: JanetTriple<R, E, O>) -> TripleId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(triple);
            TripleId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = u32::try_from(self.slots.len()).expect("Too many triples");
            self.slots.push(Slot {
                generation: 0,
                value: Some(triple),
            });
            TripleId {
                index,
                generation: 0,
            }
        }
    }

    /// Get the triple, or `None` if `id` was removed.
    pub fn get(&self, id: TripleId) -> Option<&JanetTriple<R, E, O>> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.value.as_ref())
    }

    pub fn get_mut(&mut self, id: TripleId) -> Option<&mut JanetTriple<R, E, O>> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.value.as_mut())
    }

    /// Remove a triple. Returns `None` if `id` is stale.
    pub fn remove(&mut self, id: TripleId) -> Option<JanetTriple<R, E, O>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }

        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(value)
    }

    pub fn contains(&self, id: TripleId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the live triples.
    pub fn iter(&self) -> impl Iterator<Item = (TripleId, &JanetTriple<R, E, O>)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.value.as_ref().map(|t| {
                (
                    TripleId {
                        index: i as u32,
                        generation: s.generation,
                    },
                    t,
                )
            })
        })
    }
}
