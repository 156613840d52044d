//! Sparse multivariate polynomials.
//!
//! A [SparsePolynomial](polynomial::SparsePolynomial) is generic over its coefficient
//! ring, the integer type used for exponents and the [MonomialOrder] that sorts its terms.

pub mod division;
pub mod monomial;
pub mod polynomial;
pub mod summand;

use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::Arc;

use smartstring::{LazyCompact, SmartString};

pub const INLINED_EXPONENTS: usize = 6;

pub trait Exponent:
    Hash + Debug + Display + Ord + Clone + Copy + PartialEq + Eq + Default + Send + Sync
{
    fn zero() -> Self;
    fn one() -> Self;
    /// Convert the exponent to `u32`. This is always possible, as `u32` is the largest supported exponent type.
    fn to_u32(&self) -> u32;
    /// Convert from `u32`. This function may panic if the exponent is too large.
    fn from_u32(n: u32) -> Self;
    fn is_zero(&self) -> bool;
    fn checked_add(&self, other: &Self) -> Option<Self>;
    fn checked_sub(&self, other: &Self) -> Option<Self>;
}

macro_rules! impl_exponent {
    ($($t:ty),*) => {
        $(
            impl Exponent for $t {
                #[inline]
                fn zero() -> Self {
                    0
                }

                #[inline]
                fn one() -> Self {
                    1
                }

                #[inline]
                fn to_u32(&self) -> u32 {
                    *self as u32
                }

                #[inline]
                fn from_u32(n: u32) -> Self {
                    if n <= <$t>::MAX as u32 {
                        n as $t
                    } else {
                        panic!("Exponent {} too large for {}", n, stringify!($t));
                    }
                }

                #[inline]
                fn is_zero(&self) -> bool {
                    *self == 0
                }

                #[inline]
                fn checked_add(&self, other: &Self) -> Option<Self> {
                    <$t>::checked_add(*self, *other)
                }

                #[inline]
                fn checked_sub(&self, other: &Self) -> Option<Self> {
                    <$t>::checked_sub(*self, *other)
                }
            }
        )*
    };
}

impl_exponent!(u8, u16, u32);

/// A named polynomial variable.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Variable(SmartString<LazyCompact>);

impl Variable {
    pub fn new(name: &str) -> Variable {
        Variable(name.into())
    }

    pub fn name(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Variable {
    fn from(name: &str) -> Variable {
        Variable::new(name)
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Create a shared variable list, most significant variable first.
pub fn variables(names: &[&str]) -> Arc<Vec<Variable>> {
    Arc::new(names.iter().map(|n| Variable::new(n)).collect())
}

/// A well-order of monomials.
pub trait MonomialOrder: Clone + Copy + Debug + Default + PartialEq + Eq + Hash {
    fn cmp<E: Exponent>(a: &[E], b: &[E]) -> Ordering;
}

/// Lexicographic ordering of monomials.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LexOrder {}

impl MonomialOrder for LexOrder {
    #[inline]
    fn cmp<E: Exponent>(a: &[E], b: &[E]) -> Ordering {
        a.cmp(b)
    }
}

/// Graded lexicographic ordering of monomials.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DegLexOrder {}

impl MonomialOrder for DegLexOrder {
    #[inline]
    fn cmp<E: Exponent>(a: &[E], b: &[E]) -> Ordering {
        let deg: u32 = a.iter().map(|e| e.to_u32()).sum();
        let deg2: u32 = b.iter().map(|e| e.to_u32()).sum();

        deg.cmp(&deg2).then_with(|| a.cmp(b))
    }
}

/// Graded reverse lexicographic ordering of monomials.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GrevLexOrder {}

impl MonomialOrder for GrevLexOrder {
    #[inline]
    fn cmp<E: Exponent>(a: &[E], b: &[E]) -> Ordering {
        let deg: u32 = a.iter().map(|e| e.to_u32()).sum();
        let deg2: u32 = b.iter().map(|e| e.to_u32()).sum();

        match deg.cmp(&deg2) {
            Ordering::Equal => {}
            x => {
                return x;
            }
        }

        for (a1, a2) in a.iter().rev().zip(b.iter().rev()) {
            match a1.cmp(a2) {
                Ordering::Equal => {}
                x => {
                    return x.reverse();
                }
            }
        }

        Ordering::Equal
    }
}
