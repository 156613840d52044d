//! Division of sparse polynomials: single reduction steps, division with
//! remainder and normal forms with respect to a list of divisors.
//!
//! All routines assume that the coefficient ring is an integral domain.

use tracing::debug;

use crate::domains::Ring;
use crate::error::PolynomialError;

use super::monomial::ExponentVector;
use super::polynomial::SparsePolynomial;
use super::{Exponent, MonomialOrder};

impl<R: Ring, E: Exponent, O: MonomialOrder> SparsePolynomial<R, E, O> {
    /// Compute `(c, m)` such that `lt(self) = c * x^m * lt(divisor)`.
    pub fn divide_leading_term(
        &self,
        divisor: &Self,
    ) -> Result<(R::Element, ExponentVector<E>), PolynomialError> {
        if self.nvars() != divisor.nvars() {
            return Err(PolynomialError::VariableMismatch(
                self.nvars(),
                divisor.nvars(),
            ));
        }

        let lt = self.leading_term().ok_or(PolynomialError::ZeroPolynomial)?;
        let dlt = divisor
            .leading_term()
            .ok_or(PolynomialError::ZeroPolynomial)?;

        let Some(m) = lt.exponents.try_div(dlt.exponents) else {
            return Err(PolynomialError::NotDivisible {
                dividend: lt.exponents.to_string(),
                divisor: dlt.exponents.to_string(),
            });
        };

        let Some(c) = self.ring().try_div(lt.coefficient, dlt.coefficient) else {
            return Err(PolynomialError::InexactCoefficientDivision {
                dividend: self.ring().printer(lt.coefficient).to_string(),
                divisor: self.ring().printer(dlt.coefficient).to_string(),
            });
        };

        Ok((c, m))
    }

    /// Eliminate the leading term of `self` by subtracting a multiple of `divisor`:
    /// `self -= (lt(self) / lt(divisor)) * divisor`.
    ///
    /// On error `self` is unchanged.
    pub fn reduction_step(&mut self, divisor: &Self) -> Result<(), PolynomialError> {
        let (c, m) = self.divide_leading_term(divisor)?;
        self.sub_mul_monomial(&c, &m, divisor);
        Ok(())
    }

    /// Divide by `divisor`, returning the quotient and remainder.
    ///
    /// A leading term that cannot be divided moves to the remainder, so that no term
    /// of the remainder is divisible by the leading term of `divisor`.
    pub fn quot_rem(&self, divisor: &Self) -> Result<(Self, Self), PolynomialError> {
        if divisor.is_zero() {
            return Err(PolynomialError::ZeroPolynomial);
        }

        let mut q = self.zero();
        let mut r = self.zero();
        let mut p = self.clone();

        while !p.is_zero() {
            match p.divide_leading_term(divisor) {
                Ok((c, m)) => {
                    p.sub_mul_monomial(&c, &m, divisor);
                    q.push_back(c, m);
                }
                Err(
                    PolynomialError::NotDivisible { .. }
                    | PolynomialError::InexactCoefficientDivision { .. },
                ) => {
                    if let Some((c, m)) = p.pop_front() {
                        r.push_back(c, m);
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Ok((q, r))
    }

    /// Compute the remainder `self % divisor`.
    pub fn rem(&self, divisor: &Self) -> Result<Self, PolynomialError> {
        Ok(self.quot_rem(divisor)?.1)
    }

    /// Divide `self` by `divisor`, returning the quotient if the division is exact.
    pub fn divides(&self, divisor: &Self) -> Result<Option<Self>, PolynomialError> {
        let (q, r) = self.quot_rem(divisor)?;
        if r.is_zero() {
            Ok(Some(q))
        } else {
            Ok(None)
        }
    }

    /// Fully reduce `self` with respect to `divisors`. Every term of the result is
    /// irreducible: no leading term of a divisor divides it.
    ///
    /// The first divisor in the list that applies is used.
    pub fn normal_form(&self, divisors: &[&Self]) -> Result<Self, PolynomialError> {
        if let Some(d) = divisors.iter().find(|d| d.nvars() != self.nvars()) {
            return Err(PolynomialError::VariableMismatch(self.nvars(), d.nvars()));
        }

        let divisors: Vec<_> = divisors.iter().filter(|d| !d.is_zero()).collect();

        let mut r = self.zero();
        let mut p = self.clone();
        let mut steps = 0usize;

        'outer: while !p.is_zero() {
            for d in &divisors {
                match p.reduction_step(d) {
                    Ok(()) => {
                        steps += 1;
                        continue 'outer;
                    }
                    Err(
                        PolynomialError::NotDivisible { .. }
                        | PolynomialError::InexactCoefficientDivision { .. },
                    ) => {}
                    Err(e) => return Err(e),
                }
            }

            if let Some((c, m)) = p.pop_front() {
                r.push_back(c, m);
            }
        }

        debug!("normal form after {} reduction steps", steps);
        Ok(r)
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
    use crate::poly::polynomial::SparsePolynomial;
    use crate::poly::variables;

    #[test]
    fn reduction_step_mod_5() {
        let field = Zp::new(5);
        let vars = variables(&["x0", "x1"]);

        // f = 3*x0^2*x1 + x1^3 + 4, g = x0^2*x1 + 3
        let mut f = SparsePolynomial::<_, u16>::from_terms(
            &field,
            vars.clone(),
            vec![
                (field.to_element(3), vec![2, 1]),
                (field.to_element(1), vec![0, 3]),
                (field.to_element(4), vec![0, 0]),
            ],
        );
        let g = SparsePolynomial::from_terms(
            &field,
            vars,
            vec![
                (field.to_element(1), vec![2, 1]),
                (field.to_element(3), vec![0, 0]),
            ],
        );

        assert_eq!(f.lmonomial().unwrap().as_slice(), &[2, 1]);
        f.reduction_step(&g).unwrap();
        f.check_consistency();

        assert_eq!(f, f.monomial(field.one(), ExponentVector::from_slice(&[0, 3])));
        assert_eq!(f.to_string(), "x1^3");
    }

    #[test]
    fn reduction_errors() {
        let vars = variables(&["x", "y"]);
        let mut f = SparsePolynomial::<_, u8>::from_terms(
            &Z,
            vars.clone(),
            vec![(Integer::new(3), vec![1, 1])],
        );
        let orig = f.clone();

        let g = SparsePolynomial::from_terms(
            &Z,
            vars.clone(),
            vec![(Integer::new(2), vec![1, 0])],
        );
        assert!(matches!(
            f.reduction_step(&g),
            Err(PolynomialError::InexactCoefficientDivision { .. })
        ));
        assert_eq!(f, orig);

        let h = SparsePolynomial::from_terms(&Z, vars, vec![(Integer::new(1), vec![2, 0])]);
        assert_eq!(
            f.reduction_step(&h),
            Err(PolynomialError::NotDivisible {
                dividend: "[1,1]".into(),
                divisor: "[2,0]".into()
            })
        );

        assert_eq!(f.reduction_step(&f.zero()), Err(PolynomialError::ZeroPolynomial));

        let other = SparsePolynomial::from_terms(
            &Z,
            variables(&["x"]),
            vec![(Integer::new(1), vec![1])],
        );
        assert_eq!(
            f.reduction_step(&other),
            Err(PolynomialError::VariableMismatch(2, 1))
        );
    }

    #[test]
    fn division_with_remainder() {
        let vars = variables(&["x", "y"]);
        let a = SparsePolynomial::<_, u16>::from_terms(
            &Q,
            vars.clone(),
            vec![
                (Q.to_element(1, 1), vec![2, 1]),
                (Q.to_element(1, 1), vec![1, 2]),
                (Q.to_element(1, 1), vec![0, 2]),
            ],
        );
        let b = SparsePolynomial::from_terms(
            &Q,
            vars,
            vec![(Q.to_element(1, 1), vec![1, 1]), (Q.to_element(-1, 1), vec![0, 0])],
        );

        let (q, r) = a.quot_rem(&b).unwrap();
        q.check_consistency();
        r.check_consistency();
        assert_eq!(&(&q * &b) + &r, a);
        for t in &r {
            assert!(!b.lmonomial().unwrap().divides(t.exponents));
        }
        assert_eq!(q.to_string(), "x+y");
        assert_eq!(r.to_string(), "x+y^2+y");

        assert_eq!(a.divides(&b).unwrap(), None);
        let prod = &a * &b;
        assert_eq!(prod.divides(&b).unwrap(), Some(a.clone()));
        assert_eq!(a.quot_rem(&a.zero()), Err(PolynomialError::ZeroPolynomial));
    }

    #[test]
    fn normal_form_multiple_divisors() {
        let field = Zp::new(7);
        let vars = variables(&["x", "y"]);
        let f = SparsePolynomial::<_, u16>::from_terms(
            &field,
            vars.clone(),
            vec![(field.to_element(1), vec![2, 1]), (field.to_element(1), vec![0, 0])],
        );
        // x*y - 1 and y^2 - 1
        let g1 = SparsePolynomial::from_terms(
            &field,
            vars.clone(),
            vec![(field.to_element(1), vec![1, 1]), (field.to_element(6), vec![0, 0])],
        );
        let g2 = SparsePolynomial::from_terms(
            &field,
            vars,
            vec![(field.to_element(1), vec![0, 2]), (field.to_element(6), vec![0, 0])],
        );

        // x^2*y + 1 -> x + 1
        let r = f.normal_form(&[&g1, &g2]).unwrap();
        r.check_consistency();
        assert_eq!(r.to_string(), "x+1");
        assert_eq!(r.normal_form(&[&g1, &g2]).unwrap(), r);
        assert!(f.zero().normal_form(&[&g1]).unwrap().is_zero());
    }
}
