use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use crate::domains::{EuclideanDomain, Field, Ring};
use crate::error::PolynomialError;
use crate::printer::{PolynomialPrinter, PrintOptions};

use super::monomial::ExponentVector;
use super::summand::{Summand, SummandId, SummandPool};
use super::{Exponent, LexOrder, MonomialOrder, Variable};

/// Multivariate polynomial stored as a singly-linked list of summands,
/// sorted from the leading term down.
///
/// Every summand has a non-zero coefficient and the monomials are strictly
/// decreasing in the order `O`. The zero polynomial is the empty list.
pub struct SparsePolynomial<R: Ring, E: Exponent = u16, O: MonomialOrder = LexOrder> {
    pool: SummandPool<R, E>,
    head: Option<SummandId>,
    // the last summand, so that appending is O(1)
    tail: Option<SummandId>,
    ring: R,
    variables: Arc<Vec<Variable>>,
    _phantom: PhantomData<O>,
}

impl<R: Ring, E: Exponent, O: MonomialOrder> SparsePolynomial<R, E, O> {
    /// Constructs a zero polynomial. Instead of using this constructor,
    /// prefer to create new polynomials from existing ones, so that the
    /// variable map and ring are inherited.
    #[inline]
    pub fn new(ring: &R, variables: Arc<Vec<Variable>>) -> Self {
        Self {
            pool: SummandPool::new(),
            head: None,
            tail: None,
            ring: ring.clone(),
            variables,
            _phantom: PhantomData,
        }
    }

    /// Constructs a polynomial from terms in any order. Terms with equal
    /// monomials are merged.
    pub fn from_terms(
        ring: &R,
        variables: Arc<Vec<Variable>>,
        terms: Vec<(R::Element, Vec<E>)>,
    ) -> Self {
        let mut terms: Vec<_> = terms
            .into_iter()
            .map(|(c, e)| (c, ExponentVector::from_slice(&e)))
            .collect();
        terms.sort_by(|a, b| b.1.cmp_by::<O>(&a.1));

        let mut res = Self::new(ring, variables);
        let mut last: Option<(R::Element, ExponentVector<E>)> = None;
        for (c, e) in terms {
            assert_eq!(
                e.nvars(),
                res.nvars(),
                "nvars mismatched: got {}, expected {}",
                e.nvars(),
                res.nvars()
            );

            if let Some((lc, le)) = &mut last {
                if *le == e {
                    res.ring.add_assign(lc, &c);
                    continue;
                }
            }

            if let Some((lc, le)) = last.replace((c, e)) {
                res.push_back(lc, le);
            }
        }

        if let Some((lc, le)) = last {
            res.push_back(lc, le);
        }

        res
    }

    /// Constructs a zero polynomial, inheriting the ring and variable map from `self`.
    #[inline]
    pub fn zero(&self) -> Self {
        Self::new(&self.ring, self.variables.clone())
    }

    /// Constructs a constant polynomial,
    /// inheriting the ring and variable map from `self`.
    #[inline]
    pub fn constant(&self, coeff: R::Element) -> Self {
        let mut res = self.zero();
        res.push_back(coeff, ExponentVector::one(self.nvars()));
        res
    }

    /// Constructs a polynomial that is one, inheriting the ring and variable map from `self`.
    #[inline]
    pub fn one(&self) -> Self {
        self.constant(self.ring.one())
    }

    /// Constructs a polynomial with a single term.
    #[inline]
    pub fn monomial(&self, coeff: R::Element, exponents: ExponentVector<E>) -> Self {
        debug_assert_eq!(self.nvars(), exponents.nvars());
        let mut res = self.zero();
        res.push_back(coeff, exponents);
        res
    }

    /// The variable `var` as a polynomial.
    pub fn variable(&self, var: usize) -> Self {
        self.monomial(
            self.ring.one(),
            ExponentVector::variable(self.nvars(), var, E::one()),
        )
    }

    /// Release all summands, making the polynomial zero.
    pub fn assign_zero(&mut self) {
        self.pool.clear();
        self.head = None;
        self.tail = None;
    }

    /// Replace the polynomial by the constant `coeff`.
    pub fn assign(&mut self, coeff: R::Element) {
        self.assign_zero();
        let one = ExponentVector::one(self.nvars());
        self.push_back(coeff, one);
    }

    #[inline]
    pub fn ring(&self) -> &R {
        &self.ring
    }

    /// Get a reference to the variables list.
    #[inline]
    pub fn variables(&self) -> &[Variable] {
        self.variables.as_ref()
    }

    /// Get a copy of the variable list.
    pub fn get_vars(&self) -> Arc<Vec<Variable>> {
        self.variables.clone()
    }

    /// Returns the number of variables in the polynomial.
    #[inline]
    pub fn nvars(&self) -> usize {
        self.variables.len()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.head.is_none()
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        match self.head {
            Some(h) => {
                let s = self.pool.get(h);
                s.next.is_none() && s.exponents.is_one() && self.ring.is_one(&s.coefficient)
            }
            None => false,
        }
    }

    /// Returns true if the polynomial is constant.
    #[inline]
    pub fn is_constant(&self) -> bool {
        match self.head {
            Some(h) => self.pool.get(h).exponents.is_one(),
            None => true,
        }
    }

    /// Returns the number of terms in the polynomial. This walks the whole list.
    pub fn nterms(&self) -> usize {
        self.terms().count()
    }

    /// The leading coefficient.
    pub fn lcoeff(&self) -> Result<&R::Element, PolynomialError> {
        self.leading_term()
            .map(|t| t.coefficient)
            .ok_or(PolynomialError::ZeroPolynomial)
    }

    /// The leading monomial.
    pub fn lmonomial(&self) -> Result<&ExponentVector<E>, PolynomialError> {
        self.leading_term()
            .map(|t| t.exponents)
            .ok_or(PolynomialError::ZeroPolynomial)
    }

    /// The leading term, or `None` for the zero polynomial.
    #[inline]
    pub fn leading_term(&self) -> Option<TermView<'_, R, E>> {
        self.head.map(|h| {
            let s = self.pool.get(h);
            TermView {
                coefficient: &s.coefficient,
                exponents: &s.exponents,
            }
        })
    }

    /// The trailing term, or `None` for the zero polynomial.
    #[inline]
    pub fn trailing_term(&self) -> Option<TermView<'_, R, E>> {
        self.tail.map(|t| {
            let s = self.pool.get(t);
            TermView {
                coefficient: &s.coefficient,
                exponents: &s.exponents,
            }
        })
    }

    /// The highest total degree of any term, 0 for the zero polynomial.
    pub fn total_degree(&self) -> u32 {
        self.terms().map(|t| t.exponents.degree()).max().unwrap_or(0)
    }

    /// The highest power of `var` that occurs.
    pub fn degree(&self, var: usize) -> E {
        self.terms()
            .map(|t| t.exponents[var])
            .max()
            .unwrap_or(E::zero())
    }

    /// Returns an iterator over the terms from the leading term down.
    #[inline]
    pub fn terms(&self) -> TermIterator<'_, R, E> {
        TermIterator {
            pool: &self.pool,
            next: self.head,
        }
    }

    /// Create a printer with custom options.
    pub fn printer(&self, opts: PrintOptions) -> PolynomialPrinter<'_, R, E, O> {
        PolynomialPrinter::new_with_options(self, opts)
    }

    /// Link the summand `id` directly after `prev`, or at the front if `prev` is `None`.
    fn link_after(&mut self, prev: Option<SummandId>, id: SummandId) {
        let next = match prev {
            Some(p) => self.pool.get(p).next,
            None => self.head,
        };
        self.pool.set_next(id, next);

        match prev {
            Some(p) => self.pool.set_next(p, Some(id)),
            None => self.head = Some(id),
        }

        if next.is_none() {
            self.tail = Some(id);
        }
    }

    /// Unlink and release the summand `id` that follows `prev`.
    fn unlink_after(&mut self, prev: Option<SummandId>, id: SummandId) -> Summand<R, E> {
        let s = self.pool.release(id);

        match prev {
            Some(p) => self.pool.set_next(p, s.next),
            None => self.head = s.next,
        }

        if s.next.is_none() {
            self.tail = prev;
        }

        s
    }

    /// Insert a new leading term. A zero coefficient is ignored.
    ///
    /// Panics if `exponents` is not strictly greater than the current leading monomial.
    pub fn push_front(&mut self, coefficient: R::Element, exponents: ExponentVector<E>) {
        if R::is_zero(&coefficient) {
            return;
        }

        if let Some(h) = self.head {
            assert!(
                exponents.cmp_by::<O>(&self.pool.get(h).exponents) == Ordering::Greater,
                "push_front of {} would break the monomial order",
                exponents
            );
        }

        let id = self.pool.alloc(Summand::new(coefficient, exponents));
        self.link_after(None, id);
    }

    /// Append a new trailing term. A zero coefficient is ignored.
    ///
    /// The caller guarantees that `exponents` is strictly smaller than every monomial
    /// already present; this is only checked in debug builds.
    pub fn push_back(&mut self, coefficient: R::Element, exponents: ExponentVector<E>) {
        if R::is_zero(&coefficient) {
            return;
        }

        debug_assert_eq!(exponents.nvars(), self.nvars());
        if let Some(t) = self.tail {
            debug_assert!(
                exponents.cmp_by::<O>(&self.pool.get(t).exponents) == Ordering::Less,
                "push_back of {} would break the monomial order",
                exponents
            );
        }

        let id = self.pool.alloc(Summand::new(coefficient, exponents));
        self.link_after(self.tail, id);
    }

    /// Remove and return the leading term.
    pub fn pop_front(&mut self) -> Option<(R::Element, ExponentVector<E>)> {
        let h = self.head?;
        let s = self.unlink_after(None, h);
        Some((s.coefficient, s.exponents))
    }

    /// Add a single term at its sorted position, merging with an equal monomial.
    pub fn add_term(&mut self, coefficient: R::Element, exponents: ExponentVector<E>) {
        if R::is_zero(&coefficient) {
            return;
        }

        // fast path: appending
        match self.tail {
            None => {
                self.push_back(coefficient, exponents);
                return;
            }
            Some(t) if exponents.cmp_by::<O>(&self.pool.get(t).exponents) == Ordering::Less => {
                self.push_back(coefficient, exponents);
                return;
            }
            _ => {}
        }

        let mut prev = None;
        let mut cur = self.head;
        while let Some(c) = cur {
            let s = self.pool.get_mut(c);
            match exponents.cmp_by::<O>(&s.exponents) {
                Ordering::Greater => break,
                Ordering::Equal => {
                    self.ring.add_assign(&mut s.coefficient, &coefficient);
                    if R::is_zero(&s.coefficient) {
                        self.unlink_after(prev, c);
                    }
                    return;
                }
                Ordering::Less => {
                    prev = cur;
                    cur = s.next;
                }
            }
        }

        let id = self.pool.alloc(Summand::new(coefficient, exponents));
        self.link_after(prev, id);
    }

    /// Compute `self += coeff * x^monomial * other` in a single merge pass.
    ///
    /// The product terms are generated in decreasing order, so the walk over `self`
    /// never has to go back. Terms that cancel are removed.
    pub fn add_mul_monomial(
        &mut self,
        coeff: &R::Element,
        monomial: &ExponentVector<E>,
        other: &Self,
    ) {
        debug_assert_eq!(self.ring, other.ring);
        assert_eq!(
            self.nvars(),
            other.nvars(),
            "nvars mismatched: got {}, expected {}",
            other.nvars(),
            self.nvars()
        );

        if R::is_zero(coeff) {
            return;
        }

        let mut prev: Option<SummandId> = None;
        let mut cur = self.head;

        for t in other.terms() {
            let c = self.ring.mul(coeff, t.coefficient);
            if R::is_zero(&c) {
                continue;
            }
            let m = t.exponents.mul(monomial);

            loop {
                let Some(cid) = cur else {
                    let id = self.pool.alloc(Summand::new(c, m));
                    self.link_after(prev, id);
                    prev = Some(id);
                    break;
                };

                let s = self.pool.get_mut(cid);
                match m.cmp_by::<O>(&s.exponents) {
                    Ordering::Greater => {
                        let id = self.pool.alloc(Summand::new(c, m));
                        self.link_after(prev, id);
                        prev = Some(id);
                        break;
                    }
                    Ordering::Equal => {
                        self.ring.add_assign(&mut s.coefficient, &c);
                        cur = s.next;
                        if R::is_zero(&s.coefficient) {
                            self.unlink_after(prev, cid);
                        } else {
                            prev = Some(cid);
                        }
                        break;
                    }
                    Ordering::Less => {
                        prev = Some(cid);
                        cur = s.next;
                    }
                }
            }
        }
    }

    /// Compute `self -= coeff * x^monomial * other`.
    pub fn sub_mul_monomial(
        &mut self,
        coeff: &R::Element,
        monomial: &ExponentVector<E>,
        other: &Self,
    ) {
        let neg = self.ring.neg(coeff);
        self.add_mul_monomial(&neg, monomial, other);
    }

    /// Negate every coefficient.
    pub fn negate(&mut self) {
        let mut cur = self.head;
        while let Some(c) = cur {
            let s = self.pool.get_mut(c);
            s.coefficient = self.ring.neg(&s.coefficient);
            cur = s.next;
        }
    }

    /// Multiply every coefficient with `coeff`.
    pub fn mul_coeff(&mut self, coeff: &R::Element) {
        if R::is_zero(coeff) {
            self.assign_zero();
            return;
        }

        let mut cur = self.head;
        while let Some(c) = cur {
            let s = self.pool.get_mut(c);
            self.ring.mul_assign(&mut s.coefficient, coeff);
            debug_assert!(!R::is_zero(&s.coefficient), "Coefficient ring has zero divisors");
            cur = s.next;
        }
    }

    /// Divide every coefficient by `coeff`. If any division is inexact, `false`
    /// is returned and the polynomial is left untouched.
    pub fn try_div_coeff(&mut self, coeff: &R::Element) -> bool {
        let mut quotients = Vec::new();
        for t in self.terms() {
            match self.ring.try_div(t.coefficient, coeff) {
                Some(q) => quotients.push(q),
                None => return false,
            }
        }

        let mut cur = self.head;
        for q in quotients {
            let c = cur.expect("Term count changed during division");
            let s = self.pool.get_mut(c);
            s.coefficient = q;
            cur = s.next;
        }

        true
    }

    /// Multiply every term by the monomial `x^exponents`.
    pub fn mul_monomial(&mut self, exponents: &ExponentVector<E>) {
        let mut cur = self.head;
        while let Some(c) = cur {
            let s = self.pool.get_mut(c);
            s.exponents.mul_assign(exponents);
            cur = s.next;
        }
    }

    /// Compute `self^pow`.
    pub fn pow(&self, mut pow: usize) -> Self {
        if pow == 0 {
            return self.one();
        }

        let mut x = self.clone();
        let mut y = self.one();
        while pow != 1 {
            if pow % 2 == 1 {
                y = &y * &x;
                pow -= 1;
            }

            x = &x * &x;
            pow /= 2;
        }

        x * &y
    }

    /// Substitute `values[i]` for variable `i`.
    pub fn evaluate(&self, values: &[R::Element]) -> R::Element {
        assert_eq!(values.len(), self.nvars());

        let mut res = self.ring.zero();
        for t in self.terms() {
            let mut m = t.coefficient.clone();
            for (v, e) in values.iter().zip(t.exponents.as_slice()) {
                if !e.is_zero() {
                    self.ring
                        .mul_assign(&mut m, &self.ring.pow(v, e.to_u32() as u64));
                }
            }
            self.ring.add_assign(&mut res, &m);
        }
        res
    }

    /// Check if the polynomial is sorted and has only non-zero coefficients.
    pub fn check_consistency(&self) {
        let mut last: Option<&ExponentVector<E>> = None;
        let mut count = 0;
        let mut cur = self.head;
        let mut prev = None;

        while let Some(c) = cur {
            let s = self.pool.get(c);
            count += 1;

            assert_eq!(s.exponents.nvars(), self.nvars());

            if R::is_zero(&s.coefficient) {
                panic!("Inconsistent polynomial (0 coefficient): {}", self);
            }

            if let Some(l) = last {
                match s.exponents.cmp_by::<O>(l) {
                    Ordering::Equal => {
                        panic!("Inconsistent polynomial (equal monomials): {}", self)
                    }
                    Ordering::Greater => panic!(
                        "Inconsistent polynomial (wrong monomial ordering): {}",
                        self
                    ),
                    Ordering::Less => {}
                }
            }

            last = Some(&s.exponents);
            prev = cur;
            cur = s.next;
        }

        assert_eq!(prev, self.tail, "Inconsistent polynomial (stale tail)");
        assert_eq!(count, self.pool.live(), "Inconsistent polynomial (leaked summands)");
    }

    /// The number of summand slots held by the polynomial, including released ones.
    pub fn allocated_summands(&self) -> usize {
        self.pool.capacity()
    }
}

impl<R: Field, E: Exponent, O: MonomialOrder> SparsePolynomial<R, E, O> {
    /// Make the polynomial monic, i.e., make the leading coefficient `1` by
    /// multiplying all monomials with `1/lcoeff`.
    pub fn make_monic(&mut self) {
        if let Some(t) = self.leading_term() {
            if !self.ring.is_one(t.coefficient) {
                let ci = self.ring.inv(t.coefficient);
                self.mul_coeff(&ci);
            }
        }
    }
}

impl<R: EuclideanDomain, E: Exponent, O: MonomialOrder> SparsePolynomial<R, E, O> {
    /// Get the content from the coefficients.
    pub fn content(&self) -> R::Element {
        let mut terms = self.terms();
        let Some(first) = terms.next() else {
            return self.ring.zero();
        };

        let mut c = first.coefficient.clone();
        for t in terms {
            if self.ring.is_one(&c) {
                break;
            }
            c = self.ring.gcd(&c, t.coefficient);
        }
        c
    }

    /// Make the polynomial primitive by removing the content.
    pub fn make_primitive(&mut self) {
        let c = self.content();
        if !R::is_zero(&c) && !self.ring.is_one(&c) {
            let exact = self.try_div_coeff(&c);
            debug_assert!(exact);
        }
    }
}

impl<R: Ring, E: Exponent, O: MonomialOrder> Clone for SparsePolynomial<R, E, O> {
    /// A deep copy. The copy stores its summands contiguously.
    fn clone(&self) -> Self {
        let mut res = Self {
            pool: SummandPool::with_capacity(self.pool.live()),
            head: None,
            tail: None,
            ring: self.ring.clone(),
            variables: self.variables.clone(),
            _phantom: PhantomData,
        };

        for t in self.terms() {
            let id = res
                .pool
                .alloc(Summand::new(t.coefficient.clone(), t.exponents.clone()));
            res.link_after(res.tail, id);
        }

        res
    }
}

impl<R: Ring, E: Exponent, O: MonomialOrder> std::fmt::Debug for SparsePolynomial<R, E, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "[]");
        }
        let mut first = true;
        write!(f, "[ ")?;
        for monomial in self {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }
            write!(
                f,
                "{{ {:?}, {:?} }}",
                monomial.coefficient,
                monomial.exponents.as_slice()
            )?;
        }
        write!(f, " ]")
    }
}

impl<R: Ring, E: Exponent, O: MonomialOrder> Display for SparsePolynomial<R, E, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        PolynomialPrinter::new(self).fmt(f)
    }
}

impl<R: Ring, E: Exponent, O: MonomialOrder> PartialEq for SparsePolynomial<R, E, O> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }

        if self.nvars() != other.nvars() {
            return false;
        }

        let mut a = self.terms();
        let mut b = other.terms();
        loop {
            match (a.next(), b.next()) {
                (None, None) => return true,
                (Some(x), Some(y)) => {
                    if x.exponents != y.exponents || x.coefficient != y.coefficient {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

impl<R: Ring, E: Exponent, O: MonomialOrder> Eq for SparsePolynomial<R, E, O> {}

impl<R: Ring, E: Exponent, O: MonomialOrder> Hash for SparsePolynomial<R, E, O> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for t in self.terms() {
            t.coefficient.hash(state);
            t.exponents.hash(state);
        }
        self.nvars().hash(state);
    }
}

impl<'a, 'b, R: Ring, E: Exponent, O: MonomialOrder> Add<&'a SparsePolynomial<R, E, O>>
    for &'b SparsePolynomial<R, E, O>
{
    type Output = SparsePolynomial<R, E, O>;

    fn add(self, other: &'a SparsePolynomial<R, E, O>) -> Self::Output {
        self.clone() + other
    }
}

impl<'a, R: Ring, E: Exponent, O: MonomialOrder> Add<&'a SparsePolynomial<R, E, O>>
    for SparsePolynomial<R, E, O>
{
    type Output = Self;

    fn add(mut self, other: &'a SparsePolynomial<R, E, O>) -> Self::Output {
        let one = self.ring.one();
        self.add_mul_monomial(&one, &ExponentVector::one(self.nvars()), other);
        self
    }
}

impl<R: Ring, E: Exponent, O: MonomialOrder> Add for SparsePolynomial<R, E, O> {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        // merge the shorter polynomial into the longer one
        if self.pool.live() < other.pool.live() {
            other + &self
        } else {
            self + &other
        }
    }
}

impl<'a, 'b, R: Ring, E: Exponent, O: MonomialOrder> Sub<&'a SparsePolynomial<R, E, O>>
    for &'b SparsePolynomial<R, E, O>
{
    type Output = SparsePolynomial<R, E, O>;

    fn sub(self, other: &'a SparsePolynomial<R, E, O>) -> Self::Output {
        self.clone() - other
    }
}

impl<'a, R: Ring, E: Exponent, O: MonomialOrder> Sub<&'a SparsePolynomial<R, E, O>>
    for SparsePolynomial<R, E, O>
{
    type Output = Self;

    fn sub(mut self, other: &'a SparsePolynomial<R, E, O>) -> Self::Output {
        let minus_one = self.ring.neg(&self.ring.one());
        self.add_mul_monomial(&minus_one, &ExponentVector::one(self.nvars()), other);
        self
    }
}

impl<R: Ring, E: Exponent, O: MonomialOrder> Sub for SparsePolynomial<R, E, O> {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        self - &other
    }
}

impl<'a, 'b, R: Ring, E: Exponent, O: MonomialOrder> Mul<&'a SparsePolynomial<R, E, O>>
    for &'b SparsePolynomial<R, E, O>
{
    type Output = SparsePolynomial<R, E, O>;

    fn mul(self, other: &'a SparsePolynomial<R, E, O>) -> Self::Output {
        let mut res = self.zero();
        for t in self.terms() {
            res.add_mul_monomial(t.coefficient, t.exponents, other);
        }
        res
    }
}

impl<'a, R: Ring, E: Exponent, O: MonomialOrder> Mul<&'a SparsePolynomial<R, E, O>>
    for SparsePolynomial<R, E, O>
{
    type Output = Self;

    fn mul(self, other: &'a SparsePolynomial<R, E, O>) -> Self::Output {
        &self * other
    }
}

impl<R: Ring, E: Exponent, O: MonomialOrder> Mul for SparsePolynomial<R, E, O> {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        &self * &other
    }
}

impl<R: Ring, E: Exponent, O: MonomialOrder> Neg for SparsePolynomial<R, E, O> {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        self.negate();
        self
    }
}

/// View object for a term in a sparse polynomial.
#[derive(Debug)]
pub struct TermView<'a, R: 'a + Ring, E: 'a + Exponent> {
    pub coefficient: &'a R::Element,
    pub exponents: &'a ExponentVector<E>,
}

impl<'a, R: Ring, E: Exponent> Clone for TermView<'a, R, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, R: Ring, E: Exponent> Copy for TermView<'a, R, E> {}

/// Iterator over the terms of a sparse polynomial, from the leading term down.
pub struct TermIterator<'a, R: Ring, E: Exponent> {
    pool: &'a SummandPool<R, E>,
    next: Option<SummandId>,
}

impl<'a, R: Ring, E: Exponent> Iterator for TermIterator<'a, R, E> {
    type Item = TermView<'a, R, E>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let s = self.pool.get(self.next?);
        self.next = s.next;
        Some(TermView {
            coefficient: &s.coefficient,
            exponents: &s.exponents,
        })
    }
}

impl<'a, R: Ring, E: Exponent, O: MonomialOrder> IntoIterator for &'a SparsePolynomial<R, E, O> {
    type Item = TermView<'a, R, E>;
    type IntoIter = TermIterator<'a, R, E>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.terms()
    }
}

#[cfg(test)]
mod tests {
    use crate::domains::finite_field::Zp;
    use crate::domains::integer::{Integer, Z};
    use crate::domains::rational::Q;
    use crate::domains::Ring;
    use crate::error::PolynomialError;
    use crate::poly::monomial::ExponentVector;
    use crate::poly::{variables, GrevLexOrder};

    use super::SparsePolynomial;

    fn int_poly(terms: &[(i64, [u16; 2])]) -> SparsePolynomial<Z> {
        SparsePolynomial::from_terms(
            &Z,
            variables(&["x", "y"]),
            terms
                .iter()
                .map(|(c, e)| (Integer::new(*c), e.to_vec()))
                .collect(),
        )
    }

    #[test]
    fn construction_sorts_and_merges() {
        let p = int_poly(&[
            (1, [0, 1]),
            (2, [1, 0]),
            (3, [0, 1]),
            (-2, [1, 0]),
            (5, [0, 0]),
        ]);
        p.check_consistency();
        assert_eq!(p.nterms(), 2);
        assert_eq!(p.to_string(), "4*y+5");
        assert_eq!(p.lmonomial().unwrap().as_slice(), &[0, 1]);
    }

    #[test]
    fn zero_polynomial() {
        let p = int_poly(&[]);
        assert!(p.is_zero());
        assert!(p.is_constant());
        assert_eq!(p.lcoeff(), Err(PolynomialError::ZeroPolynomial));
        assert_eq!(p.lmonomial(), Err(PolynomialError::ZeroPolynomial));
        assert_eq!(p.nterms(), 0);
        assert_eq!(p.total_degree(), 0);
    }

    #[test]
    fn assign() {
        let mut p = int_poly(&[(1, [2, 0]), (1, [0, 0])]);
        p.assign(Integer::new(7));
        p.check_consistency();
        assert!(p.is_constant());
        assert_eq!(p.lcoeff(), Ok(&Integer::new(7)));

        p.assign(Integer::new(0));
        assert!(p.is_zero());
        p.check_consistency();
    }

    #[test]
    fn push_front_and_back() {
        let mut p = int_poly(&[]);
        p.push_back(Integer::new(1), ExponentVector::from_slice(&[1, 0]));
        p.push_back(Integer::new(0), ExponentVector::from_slice(&[0, 1]));
        p.push_back(Integer::new(2), ExponentVector::from_slice(&[0, 0]));
        p.push_front(Integer::new(3), ExponentVector::from_slice(&[2, 0]));
        p.push_front(Integer::new(0), ExponentVector::from_slice(&[3, 0]));
        p.check_consistency();
        assert_eq!(p.to_string(), "3*x^2+x+2");
    }

    #[test]
    #[should_panic(expected = "would break the monomial order")]
    fn push_front_out_of_order() {
        let mut p = int_poly(&[(1, [1, 0])]);
        p.push_front(Integer::new(1), ExponentVector::from_slice(&[0, 5]));
    }

    #[test]
    fn multiply_accumulate_cancels() {
        // (x + y) - 1 * (x + y) = 0
        let f = int_poly(&[(1, [1, 0]), (1, [0, 1])]);
        let mut g = f.clone();
        g.add_mul_monomial(&Integer::new(-1), &ExponentVector::one(2), &f);
        assert!(g.is_zero());
        g.check_consistency();

        // x^2 + 1 + 2x * (x - y) = 3x^2 - 2xy + 1
        let mut h = int_poly(&[(1, [2, 0]), (1, [0, 0])]);
        let d = int_poly(&[(1, [1, 0]), (-1, [0, 1])]);
        h.add_mul_monomial(&Integer::new(2), &ExponentVector::from_slice(&[1, 0]), &d);
        h.check_consistency();
        assert_eq!(h, int_poly(&[(3, [2, 0]), (-2, [1, 1]), (1, [0, 0])]));
    }

    #[test]
    fn released_summands_are_reused() {
        let mut f = int_poly(&[(1, [2, 0]), (1, [1, 0]), (1, [0, 0])]);
        let slots = f.allocated_summands();
        let g = int_poly(&[(-1, [1, 0])]);
        f.add_mul_monomial(&Integer::new(1), &ExponentVector::one(2), &g);
        let h = int_poly(&[(1, [1, 1])]);
        f.add_mul_monomial(&Integer::new(1), &ExponentVector::one(2), &h);
        f.check_consistency();
        assert_eq!(f.allocated_summands(), slots);
        assert_eq!(f.to_string(), "x^2+x*y+1");
    }

    #[test]
    fn arithmetic() {
        let x = int_poly(&[(1, [1, 0])]);
        let y = x.variable(1);

        let s = &x + &y;
        let p = s.pow(3);
        p.check_consistency();
        assert_eq!(p.to_string(), "x^3+3*x^2*y+3*x*y^2+y^3");

        let d = &p - &(&x * &p);
        d.check_consistency();
        assert_eq!(d.nterms(), 8);
        assert_eq!(d.total_degree(), 4);
        assert_eq!(d.degree(1), 3);

        assert_eq!(&s + &(-s.clone()), s.zero());
        assert_eq!(&s + &s.zero(), s);
    }

    #[test]
    fn coefficient_scaling() {
        let mut p = int_poly(&[(4, [1, 0]), (6, [0, 0])]);
        let orig = p.clone();

        assert!(!p.try_div_coeff(&Integer::new(4)));
        assert_eq!(p, orig);

        assert!(p.try_div_coeff(&Integer::new(2)));
        assert_eq!(p.to_string(), "2*x+3");

        p.mul_coeff(&Integer::new(-3));
        assert_eq!(p.to_string(), "-6*x-9");
        assert_eq!(p.content(), Integer::new(3));

        p.make_primitive();
        assert_eq!(p.to_string(), "-2*x-3");

        p.negate();
        assert_eq!(p.to_string(), "2*x+3");

        p.mul_coeff(&Integer::new(0));
        assert!(p.is_zero());
    }

    #[test]
    fn monic_over_finite_field() {
        let field = Zp::new(7);
        let mut p = SparsePolynomial::<_, u8>::from_terms(
            &field,
            variables(&["x"]),
            vec![(field.to_element(3), vec![2]), (field.to_element(1), vec![0])],
        );
        p.make_monic();
        assert!(field.is_one(p.lcoeff().unwrap()));
        // 3^-1 = 5 mod 7
        assert_eq!(p.to_string(), "x^2+5");
    }

    #[test]
    fn evaluate() {
        let p = SparsePolynomial::<_, u8>::from_terms(
            &Q,
            variables(&["x", "y"]),
            vec![
                (Q.to_element(1, 2), vec![2, 1]),
                (Q.to_element(-3, 1), vec![0, 1]),
            ],
        );
        assert_eq!(
            p.evaluate(&[Q.to_element(2, 1), Q.to_element(1, 3)]),
            Q.to_element(-1, 3)
        );
    }

    #[test]
    fn graded_order() {
        let vars = variables(&["x", "y", "z"]);
        let p = SparsePolynomial::<_, u16, GrevLexOrder>::from_terms(
            &Z,
            vars,
            vec![
                (Integer::new(1), vec![1, 0, 1]),
                (Integer::new(1), vec![0, 2, 0]),
                (Integer::new(1), vec![3, 0, 0]),
            ],
        );
        p.check_consistency();
        assert_eq!(p.to_string(), "x^3+y^2+x*z");
    }

    #[test]
    fn term_iterator_roundtrip() {
        let p = int_poly(&[(2, [2, 1]), (-1, [1, 3]), (7, [0, 0])]);
        let mut q = p.zero();
        for t in &p {
            q.push_back(t.coefficient.clone(), t.exponents.clone());
        }
        assert_eq!(p, q);
        assert_eq!(
            format!("{:?}", q),
            "[ { Natural(2), [2, 1] }, { Natural(-1), [1, 3] }, { Natural(7), [0, 0] } ]"
        );
    }

    #[test]
    fn hash_ignores_variable_names() {
        let p = int_poly(&[(3, [1, 2]), (-1, [0, 0])]);
        let q = SparsePolynomial::from_terms(
            &Z,
            variables(&["u", "v"]),
            vec![(Integer::new(3), vec![1, 2]), (Integer::new(-1), vec![0, 0])],
        );
        assert_eq!(p, q);

        let mut set = ahash::HashSet::default();
        set.insert(p);
        assert!(!set.insert(q));
        assert_eq!(set.len(), 1);
    }
}
