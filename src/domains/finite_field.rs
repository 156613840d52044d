//! Prime fields `Z/pZ` for word-size primes.

use rand::Rng;
use std::fmt::{Display, Error, Formatter};

use crate::printer::PrintOptions;

use super::{EuclideanDomain, Field, Ring};

/// A number in a prime field, stored in Montgomery form.
#[derive(Debug, Copy, Clone, Hash, PartialEq, PartialOrd, Eq)]
pub struct FiniteFieldElement(pub(crate) u32);

/// The prime field `Z / pZ` for an odd prime `p < 2^32`.
///
/// Elements are kept in Montgomery form to increase the performance
/// of the multiplication operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Zp {
    p: u32,
    m: u32,
    one: FiniteFieldElement,
}

impl Zp {
    /// Create a new prime field from an odd prime `p`.
    pub fn new(p: u32) -> Zp {
        if p % 2 == 0 {
            panic!("Prime 2 is not supported: the Montgomery form needs an odd modulus.");
        }
        assert!(is_prime_u32(p), "{} is not a prime", p);

        Zp {
            p,
            m: Self::neg_inv_mod_word(p),
            one: FiniteFieldElement(((1u64 << 32) % p as u64) as u32),
        }
    }

    pub fn get_prime(&self) -> u32 {
        self.p
    }

    /// Compute `-p^-1 mod 2^32` with Newton steps. An odd `p` is its own inverse
    /// modulo 8 and every step doubles the number of correct bits.
    fn neg_inv_mod_word(p: u32) -> u32 {
        let mut inv = p;
        for _ in 0..4 {
            inv = inv.wrapping_mul(2u32.wrapping_sub(p.wrapping_mul(inv)));
        }
        inv.wrapping_neg()
    }

    /// Montgomery reduction: compute `t / 2^32 mod p` for `t < p * 2^32`.
    #[inline(always)]
    fn redc(&self, t: u64) -> u32 {
        let k = (t as u32).wrapping_mul(self.m);
        let (t, carry) = t.overflowing_add(k as u64 * self.p as u64);
        let u = (t >> 32) as u32;
        if carry || u >= self.p {
            u.wrapping_sub(self.p)
        } else {
            u
        }
    }

    /// Map `a mod p` into Montgomery form.
    #[inline(always)]
    pub fn to_element(&self, a: u32) -> FiniteFieldElement {
        FiniteFieldElement((((a as u64) << 32) % self.p as u64) as u32)
    }

    /// Map a signed number into Montgomery form.
    #[inline]
    pub fn to_element_signed(&self, a: i64) -> FiniteFieldElement {
        self.to_element(a.rem_euclid(self.p as i64) as u32)
    }

    /// The representative of `a` in `[0,p)`.
    #[inline(always)]
    pub fn from_element(&self, a: &FiniteFieldElement) -> u32 {
        self.redc(a.0 as u64)
    }

    /// The representative of `a` in `(-p/2,p/2]`.
    pub fn to_symmetric(&self, a: &FiniteFieldElement) -> i64 {
        let i = self.from_element(a) as i64;
        if 2 * i > self.p as i64 {
            i - self.p as i64
        } else {
            i
        }
    }
}

impl Display for Zp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, " % {}", self.p)
    }
}

impl Ring for Zp {
    type Element = FiniteFieldElement;

    #[inline(always)]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let (t, carry) = a.0.overflowing_add(b.0);
        if carry || t >= self.p {
            FiniteFieldElement(t.wrapping_sub(self.p))
        } else {
            FiniteFieldElement(t)
        }
    }

    #[inline(always)]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let (t, borrow) = a.0.overflowing_sub(b.0);
        if borrow {
            FiniteFieldElement(t.wrapping_add(self.p))
        } else {
            FiniteFieldElement(t)
        }
    }

    #[inline(always)]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        FiniteFieldElement(self.redc(a.0 as u64 * b.0 as u64))
    }

    #[inline(always)]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.add(a, b);
    }

    #[inline(always)]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.sub(a, b);
    }

    #[inline(always)]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.mul(a, b);
    }

    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        self.add_assign(a, &self.mul(b, c));
    }

    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        self.sub_assign(a, &self.mul(b, c));
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        if a.0 == 0 {
            *a
        } else {
            FiniteFieldElement(self.p - a.0)
        }
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        FiniteFieldElement(0)
    }

    #[inline]
    fn one(&self) -> Self::Element {
        self.one
    }

    #[inline]
    fn nth(&self, n: i64) -> Self::Element {
        self.to_element_signed(n)
    }

    /// Square and multiply, with the exponent reduced modulo `p - 1`.
    fn pow(&self, b: &Self::Element, mut e: u64) -> Self::Element {
        if !Self::is_zero(b) && e >= self.p as u64 - 1 {
            e %= self.p as u64 - 1;
        }

        if e == 0 {
            return self.one();
        }

        let mut x = *b;
        let mut y = self.one();
        while e != 1 {
            if e % 2 == 1 {
                y = self.mul(&y, &x);
            }

            x = self.mul(&x, &x);
            e /= 2;
        }

        self.mul(&x, &y)
    }

    #[inline]
    fn is_zero(a: &Self::Element) -> bool {
        a.0 == 0
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> bool {
        a == &self.one
    }

    #[inline]
    fn is_minus_one(&self, a: &Self::Element) -> bool {
        a.0 == self.p - self.one.0
    }

    fn characteristic(&self) -> u64 {
        self.p as u64
    }

    /// Invert by Fermat's little theorem.
    fn try_inv(&self, a: &Self::Element) -> Option<Self::Element> {
        if Self::is_zero(a) {
            None
        } else {
            Some(self.pow(a, self.p as u64 - 2))
        }
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        Some(self.mul(a, &self.try_inv(b)?))
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        let r = rng.gen_range(range.0..range.1);
        self.to_element_signed(r)
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        opts: &PrintOptions,
        _in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        if opts.symmetric_representation_for_finite_field {
            let s = self.to_symmetric(element);
            if f.sign_plus() && s >= 0 {
                f.write_str("+")?;
            }
            write!(f, "{}", s)
        } else {
            if f.sign_plus() {
                f.write_str("+")?;
            }
            write!(f, "{}", self.from_element(element))
        }
    }
}

impl EuclideanDomain for Zp {
    #[inline]
    fn rem(&self, _: &Self::Element, _: &Self::Element) -> Self::Element {
        FiniteFieldElement(0)
    }

    #[inline]
    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        (self.mul(a, &self.inv(b)), FiniteFieldElement(0))
    }

    #[inline]
    fn gcd(&self, _: &Self::Element, _: &Self::Element) -> Self::Element {
        self.one()
    }
}

impl Field for Zp {
    #[inline]
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.mul(a, &self.inv(b))
    }

    #[inline]
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.mul(a, &self.inv(b));
    }

    fn inv(&self, a: &Self::Element) -> Self::Element {
        self.try_inv(a)
            .unwrap_or_else(|| panic!("{} is not invertible mod {}", self.printer(a), self.p))
    }
}

/// Check if `n` is a prime by trial division.
pub fn is_prime_u32(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }

    let n = n as u64;
    let mut d = 3u64;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn montgomery_roundtrip() {
        let field = Zp::new(5);
        for i in 0..5 {
            assert_eq!(field.from_element(&field.to_element(i)), i);
        }

        assert_eq!(field.to_element_signed(-2), field.to_element(3));
        assert!(field.is_minus_one(&field.to_element(4)));
        assert!(field.is_one(&field.nth(6)));
    }

    #[test]
    fn arithmetic_mod_5() {
        let field = Zp::new(5);
        let three = field.to_element(3);
        let four = field.to_element(4);

        assert_eq!(field.from_element(&field.add(&three, &four)), 2);
        assert_eq!(field.from_element(&field.sub(&three, &four)), 4);
        assert_eq!(field.from_element(&field.mul(&three, &four)), 2);
        assert_eq!(field.from_element(&field.inv(&three)), 2);
        assert_eq!(field.from_element(&field.pow(&three, 3)), 2);
        assert_eq!(field.to_symmetric(&four), -1);
    }

    #[test]
    fn inverses_in_large_prime() {
        let field = Zp::new(2147483647);
        for i in [1u32, 2, 3, 12345, 2147483646] {
            let a = field.to_element(i);
            assert!(field.is_one(&field.mul(&a, &field.inv(&a))));
        }

        assert!(field.try_inv(&field.zero()).is_none());
    }

    #[test]
    #[should_panic]
    fn composite_modulus() {
        Zp::new(9);
    }

    #[test]
    fn primality() {
        let primes: Vec<_> = (0..30).filter(|n| is_prime_u32(*n)).collect();
        assert_eq!(primes, [2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }
}
