use std::cmp::Ordering;
use std::fmt::{Display, Write};
use std::ops::{Index, IndexMut};

use smallvec::SmallVec;

use super::{Exponent, MonomialOrder, Variable, INLINED_EXPONENTS};

/// The exponents of a monomial, one entry per variable.
///
/// Comparison with [Ord] is plain lexicographic comparison of the
/// exponent list; use [ExponentVector::cmp_by] for a monomial order.
#[derive(Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ExponentVector<E: Exponent> {
    exponents: SmallVec<[E; INLINED_EXPONENTS]>,
}

impl<E: Exponent> ExponentVector<E> {
    /// The monomial `1` in `nvars` variables.
    #[inline]
    pub fn one(nvars: usize) -> Self {
        ExponentVector {
            exponents: SmallVec::from_elem(E::zero(), nvars),
        }
    }

    #[inline]
    pub fn from_slice(exponents: &[E]) -> Self {
        ExponentVector {
            exponents: SmallVec::from_slice(exponents),
        }
    }

    /// Create a monomial from plain `u32` exponents. Panics if an entry does not fit in `E`.
    pub fn from_u32_slice(exponents: &[u32]) -> Self {
        ExponentVector {
            exponents: exponents.iter().map(|e| E::from_u32(*e)).collect(),
        }
    }

    /// The variable `var` to the power `pow`.
    pub fn variable(nvars: usize, var: usize, pow: E) -> Self {
        let mut m = Self::one(nvars);
        m.exponents[var] = pow;
        m
    }

    /// The number of variables.
    #[inline]
    pub fn nvars(&self) -> usize {
        self.exponents.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[E] {
        &self.exponents
    }

    pub fn to_u32_vec(&self) -> Vec<u32> {
        self.exponents.iter().map(|e| e.to_u32()).collect()
    }

    /// The total degree.
    pub fn degree(&self) -> u32 {
        self.exponents.iter().map(|e| e.to_u32()).sum()
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.exponents.iter().all(|e| e.is_zero())
    }

    /// Compare using the monomial order `O`.
    #[inline]
    pub fn cmp_by<O: MonomialOrder>(&self, other: &Self) -> Ordering {
        O::cmp(&self.exponents, &other.exponents)
    }

    /// Multiply two monomials, panicking on exponent overflow.
    pub fn mul(&self, other: &Self) -> Self {
        debug_assert_eq!(self.nvars(), other.nvars());
        ExponentVector {
            exponents: self
                .exponents
                .iter()
                .zip(&other.exponents)
                .map(|(e1, e2)| e1.checked_add(e2).expect("overflow in adding exponents"))
                .collect(),
        }
    }

    /// Multiply `self` by `other` in place.
    pub fn mul_assign(&mut self, other: &Self) {
        for (e1, e2) in self.exponents.iter_mut().zip(&other.exponents) {
            *e1 = e1.checked_add(e2).expect("overflow in adding exponents");
        }
    }

    /// Returns `true` iff `self` divides `other`.
    #[inline]
    pub fn divides(&self, other: &Self) -> bool {
        self.exponents
            .iter()
            .zip(&other.exponents)
            .all(|(a, b)| a <= b)
    }

    /// Compute `self / other` if `other` divides `self`.
    pub fn try_div(&self, other: &Self) -> Option<Self> {
        let mut exponents = SmallVec::with_capacity(self.nvars());
        for (e1, e2) in self.exponents.iter().zip(&other.exponents) {
            exponents.push(e1.checked_sub(e2)?);
        }
        Some(ExponentVector { exponents })
    }

    /// The componentwise minimum.
    pub fn gcd(&self, other: &Self) -> Self {
        ExponentVector {
            exponents: self
                .exponents
                .iter()
                .zip(&other.exponents)
                .map(|(a, b)| *a.min(b))
                .collect(),
        }
    }

    /// The componentwise maximum.
    pub fn lcm(&self, other: &Self) -> Self {
        ExponentVector {
            exponents: self
                .exponents
                .iter()
                .zip(&other.exponents)
                .map(|(a, b)| *a.max(b))
                .collect(),
        }
    }

    /// Write the monomial using variable names, omitting the monomial `1`.
    pub(crate) fn fmt_with_vars<W: Write>(
        &self,
        variables: &[Variable],
        mul_op: char,
        pow_op: &str,
        f: &mut W,
    ) -> std::fmt::Result {
        let mut first = true;
        for (v, e) in variables.iter().zip(&self.exponents) {
            if e.is_zero() {
                continue;
            }

            if !first {
                f.write_char(mul_op)?;
            }
            first = false;

            if e.to_u32() == 1 {
                write!(f, "{}", v)?;
            } else {
                write!(f, "{}{}{}", v, pow_op, e)?;
            }
        }
        Ok(())
    }
}

impl<E: Exponent> Index<usize> for ExponentVector<E> {
    type Output = E;

    #[inline]
    fn index(&self, var: usize) -> &E {
        &self.exponents[var]
    }
}

impl<E: Exponent> IndexMut<usize> for ExponentVector<E> {
    #[inline]
    fn index_mut(&mut self, var: usize) -> &mut E {
        &mut self.exponents[var]
    }
}

impl<E: Exponent> Display for ExponentVector<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('[')?;
        for (i, e) in self.exponents.iter().enumerate() {
            if i > 0 {
                f.write_char(',')?;
            }
            write!(f, "{}", e)?;
        }
        f.write_char(']')
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use crate::poly::{GrevLexOrder, LexOrder};

    use super::ExponentVector;

    #[test]
    fn divisibility() {
        let a = ExponentVector::<u16>::from_slice(&[2, 1, 0]);
        let b = ExponentVector::<u16>::from_slice(&[1, 1, 0]);

        assert!(b.divides(&a));
        assert!(!a.divides(&b));
        assert_eq!(a.try_div(&b), Some(ExponentVector::from_slice(&[1, 0, 0])));
        assert_eq!(b.try_div(&a), None);
        assert_eq!(a.mul(&b).as_slice(), &[3, 2, 0]);
    }

    #[test]
    fn gcd_lcm() {
        let a = ExponentVector::<u8>::from_slice(&[3, 0, 2]);
        let b = ExponentVector::<u8>::from_slice(&[1, 4, 2]);

        assert_eq!(a.gcd(&b).as_slice(), &[1, 0, 2]);
        assert_eq!(a.lcm(&b).as_slice(), &[3, 4, 2]);
        assert_eq!(a.lcm(&b).degree(), 9);
        assert!(ExponentVector::<u8>::one(3).is_one());
    }

    #[test]
    fn ordering() {
        let a = ExponentVector::<u16>::from_slice(&[1, 0, 1]);
        let b = ExponentVector::<u16>::from_slice(&[0, 2, 0]);
        assert_eq!(a.cmp_by::<LexOrder>(&b), Ordering::Greater);
        assert_eq!(a.cmp_by::<GrevLexOrder>(&b), Ordering::Less);
    }

    #[test]
    #[should_panic(expected = "overflow in adding exponents")]
    fn overflow() {
        let a = ExponentVector::<u8>::from_slice(&[200]);
        a.mul(&a);
    }
}
