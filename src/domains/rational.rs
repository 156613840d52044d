//! The field of rational numbers.

use std::cmp::Ordering;
use std::fmt::{Display, Error, Formatter};

use rand::Rng;
use rug::{ops::Pow, Rational as ArbitraryPrecisionRational};

use crate::printer::PrintOptions;

use super::{EuclideanDomain, Field, Ring};

/// A rational number. Always kept in canonical form by rug.
pub type Rational = ArbitraryPrecisionRational;

/// The field of rational numbers.
pub type Q = RationalField;
/// The field of rational numbers.
pub const Q: RationalField = RationalField::new();

/// The field of rational numbers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct RationalField;

impl RationalField {
    pub const fn new() -> RationalField {
        RationalField
    }

    /// Create the rational `num/den`. `den` must be non-zero.
    pub fn to_element(&self, num: i64, den: i64) -> Rational {
        Rational::from((num, den))
    }
}

impl Display for RationalField {
    fn fmt(&self, _: &mut Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}

impl Ring for RationalField {
    type Element = Rational;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Rational::from(a + b)
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Rational::from(a - b)
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Rational::from(a * b)
    }

    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a += b;
    }

    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a -= b;
    }

    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a *= b;
    }

    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a += Rational::from(b * c);
    }

    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a -= Rational::from(b * c);
    }

    fn neg(&self, a: &Self::Element) -> Self::Element {
        Rational::from(-a)
    }

    fn zero(&self) -> Self::Element {
        Rational::new()
    }

    fn one(&self) -> Self::Element {
        Rational::from(1)
    }

    fn nth(&self, n: i64) -> Self::Element {
        Rational::from(n)
    }

    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        if e > u32::MAX as u64 {
            panic!("Power of exponentation is larger than 2^32: {}", e);
        }
        b.clone().pow(e as u32)
    }

    fn is_zero(a: &Self::Element) -> bool {
        a.cmp0() == Ordering::Equal
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        *a == 1
    }

    fn is_minus_one(&self, a: &Self::Element) -> bool {
        *a == -1
    }

    fn characteristic(&self) -> u64 {
        0
    }

    fn try_inv(&self, a: &Self::Element) -> Option<Self::Element> {
        if Self::is_zero(a) {
            None
        } else {
            Some(a.clone().recip())
        }
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if Self::is_zero(b) {
            None
        } else {
            Some(Rational::from(a / b))
        }
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        let num = rng.gen_range(range.0..range.1);
        let den = rng.gen_range(1..range.1.max(2));
        Rational::from((num, den))
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        _opts: &PrintOptions,
        in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        let negative = element.cmp0() == Ordering::Less;
        if f.sign_plus() && !negative {
            f.write_str("+")?;
        }

        // a fraction multiplying a monomial is wrapped to keep the output unambiguous
        if in_product && *element.denom() != 1 {
            write!(f, "({})", element)
        } else {
            write!(f, "{}", element)
        }
    }
}

impl EuclideanDomain for RationalField {
    fn rem(&self, _: &Self::Element, _: &Self::Element) -> Self::Element {
        Rational::new()
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        (self.div(a, b), Rational::new())
    }

    fn gcd(&self, _: &Self::Element, _: &Self::Element) -> Self::Element {
        self.one()
    }
}

impl Field for RationalField {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        assert!(!Self::is_zero(b), "Division by zero");
        Rational::from(a / b)
    }

    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        assert!(!Self::is_zero(b), "Division by zero");
        *a /= b;
    }

    fn inv(&self, a: &Self::Element) -> Self::Element {
        self.try_inv(a).expect("0 is not invertible")
    }
}

#[cfg(test)]
mod tests {
    use crate::domains::{Field, Ring};

    use super::Q;

    #[test]
    fn arithmetic() {
        let a = Q.to_element(1, 2);
        let b = Q.to_element(-2, 3);

        assert_eq!(Q.add(&a, &b), Q.to_element(-1, 6));
        assert_eq!(Q.mul(&a, &b), Q.to_element(-1, 3));
        assert_eq!(Q.div(&a, &b), Q.to_element(-3, 4));
        assert!(Q.is_minus_one(&Q.mul(&b, &Q.to_element(3, 2))));
        assert_eq!(Q.pow(&b, 3), Q.to_element(-8, 27));
        assert!(Q.try_div(&a, &Q.zero()).is_none());
    }
}
