//! The ring of integers.

use std::fmt::{Display, Error, Formatter};

use rand::Rng;
use rug::{ops::Pow, Integer as ArbitraryPrecisionInteger};

use crate::printer::PrintOptions;

use super::{EuclideanDomain, Ring};

/// The integer ring.
pub type Z = IntegerRing;
/// The integer ring.
pub const Z: IntegerRing = IntegerRing::new();

/// The integer ring.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct IntegerRing;

impl IntegerRing {
    pub const fn new() -> IntegerRing {
        IntegerRing
    }
}

impl Display for IntegerRing {
    fn fmt(&self, _: &mut Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}

/// An arbitrary precision integer. Numbers that fit in an `i64` are
/// always stored as [Integer::Natural], so that equality and hashing
/// can be derived.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Integer {
    Natural(i64),
    Large(ArbitraryPrecisionInteger),
}

impl From<i64> for Integer {
    fn from(n: i64) -> Integer {
        Integer::Natural(n)
    }
}

impl From<i32> for Integer {
    fn from(n: i32) -> Integer {
        Integer::Natural(n as i64)
    }
}

impl From<ArbitraryPrecisionInteger> for Integer {
    fn from(n: ArbitraryPrecisionInteger) -> Integer {
        Integer::from_large(n)
    }
}

impl Integer {
    pub fn new(num: i64) -> Integer {
        Integer::Natural(num)
    }

    /// Downcast to a machine integer when possible.
    pub fn from_large(n: ArbitraryPrecisionInteger) -> Integer {
        match n.to_i64() {
            Some(r) => Integer::Natural(r),
            None => Integer::Large(n),
        }
    }

    pub fn to_large(&self) -> ArbitraryPrecisionInteger {
        match self {
            Integer::Natural(n) => ArbitraryPrecisionInteger::from(*n),
            Integer::Large(r) => r.clone(),
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Integer::Natural(0))
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Integer::Natural(1))
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Integer::Natural(n) => *n < 0,
            Integer::Large(r) => r.cmp0() == std::cmp::Ordering::Less,
        }
    }

    pub fn abs(&self) -> Integer {
        match self {
            Integer::Natural(n) => match n.checked_abs() {
                Some(a) => Integer::Natural(a),
                None => Integer::Large(ArbitraryPrecisionInteger::from(*n).abs()),
            },
            Integer::Large(r) => Integer::Large(r.clone().abs()),
        }
    }

    pub fn pow(&self, e: u64) -> Integer {
        if e > u32::MAX as u64 {
            panic!("Power of exponentation is larger than 2^32: {}", e);
        }
        let e = e as u32;

        match self {
            Integer::Natural(n1) => {
                if let Some(pn) = n1.checked_pow(e) {
                    Integer::Natural(pn)
                } else {
                    Integer::Large(ArbitraryPrecisionInteger::from(*n1).pow(e))
                }
            }
            Integer::Large(r) => Integer::from_large(r.clone().pow(e)),
        }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Integer::Natural(n) => n.fmt(f),
            Integer::Large(r) => r.fmt(f),
        }
    }
}

impl Ring for IntegerRing {
    type Element = Integer;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        if let (Integer::Natural(n1), Integer::Natural(n2)) = (a, b) {
            if let Some(num) = n1.checked_add(*n2) {
                return Integer::Natural(num);
            }
        }

        Integer::from_large(a.to_large() + b.to_large())
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        if let (Integer::Natural(n1), Integer::Natural(n2)) = (a, b) {
            if let Some(num) = n1.checked_sub(*n2) {
                return Integer::Natural(num);
            }
        }

        Integer::from_large(a.to_large() - b.to_large())
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        if let (Integer::Natural(n1), Integer::Natural(n2)) = (a, b) {
            if let Some(num) = n1.checked_mul(*n2) {
                return Integer::Natural(num);
            }
        }

        Integer::from_large(a.to_large() * b.to_large())
    }

    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.add(a, b);
    }

    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.sub(a, b);
    }

    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.mul(a, b);
    }

    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        self.add_assign(a, &self.mul(b, c));
    }

    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        self.sub_assign(a, &self.mul(b, c));
    }

    fn neg(&self, a: &Self::Element) -> Self::Element {
        match a {
            Integer::Natural(n) => match n.checked_neg() {
                Some(r) => Integer::Natural(r),
                None => Integer::Large(-ArbitraryPrecisionInteger::from(*n)),
            },
            Integer::Large(r) => Integer::from_large(-r.clone()),
        }
    }

    fn zero(&self) -> Self::Element {
        Integer::Natural(0)
    }

    fn one(&self) -> Self::Element {
        Integer::Natural(1)
    }

    fn nth(&self, n: i64) -> Self::Element {
        Integer::Natural(n)
    }

    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        b.pow(e)
    }

    fn is_zero(a: &Self::Element) -> bool {
        a.is_zero()
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        a.is_one()
    }

    fn is_minus_one(&self, a: &Self::Element) -> bool {
        matches!(a, Integer::Natural(-1))
    }

    fn characteristic(&self) -> u64 {
        0
    }

    fn try_inv(&self, a: &Self::Element) -> Option<Self::Element> {
        match a {
            Integer::Natural(1) | Integer::Natural(-1) => Some(a.clone()),
            _ => None,
        }
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if b.is_zero() {
            return None;
        }

        let (q, r) = self.quot_rem(a, b);
        if r.is_zero() {
            Some(q)
        } else {
            None
        }
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        let r = rng.gen_range(range.0..range.1);
        Integer::Natural(r)
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        _opts: &PrintOptions,
        _in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        if f.sign_plus() && !element.is_negative() {
            f.write_str("+")?;
        }
        write!(f, "{}", element)
    }
}

impl EuclideanDomain for IntegerRing {
    fn rem(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.quot_rem(a, b).1
    }

    /// Euclidean division: the remainder is always non-negative.
    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        if let (Integer::Natural(a), Integer::Natural(b)) = (a, b) {
            if let (Some(q), Some(r)) = (a.checked_div_euclid(*b), a.checked_rem_euclid(*b)) {
                return (Integer::Natural(q), Integer::Natural(r));
            }
        }

        let (q, r) = a.to_large().div_rem_euc(b.to_large());
        (Integer::from_large(q), Integer::from_large(r))
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        if let (Integer::Natural(n1), Integer::Natural(n2)) = (a, b) {
            let g = gcd_i64(*n1, *n2);
            if g <= i64::MAX as u64 {
                return Integer::Natural(g as i64);
            }
        }

        Integer::from_large(a.to_large().gcd(&b.to_large()))
    }
}

fn gcd_i64(mut a: i64, mut b: i64) -> u64 {
    while a != 0 {
        // i64::MIN % -1 wraps to 0
        let r = b.wrapping_rem(a);
        b = a;
        a = r;
    }
    b.unsigned_abs()
}
