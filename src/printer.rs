//! Textual output of coefficients and polynomials.

use std::fmt::{self, Display, Write};

use crate::domains::{Ring, RingPrinter};
use crate::poly::{polynomial::SparsePolynomial, Exponent, MonomialOrder};

/// Various options for printing coefficients and polynomials.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    pub terms_on_new_line: bool,
    pub symmetric_representation_for_finite_field: bool,
    pub multiplication_operator: char,
    pub double_star_for_exponentiation: bool,
    /// Print at most this many terms, followed by an ellipsis.
    pub max_terms: Option<usize>,
}

impl PrintOptions {
    pub const fn new() -> Self {
        Self {
            terms_on_new_line: false,
            symmetric_representation_for_finite_field: false,
            multiplication_operator: '*',
            double_star_for_exponentiation: false,
            max_terms: None,
        }
    }

    /// Print finite field elements in `(-p/2, p/2]` and
    /// cut off long polynomials, which is convenient in logs.
    pub const fn compact() -> Self {
        Self {
            symmetric_representation_for_finite_field: true,
            max_terms: Some(8),
            ..Self::new()
        }
    }

    fn pow_op(&self) -> &'static str {
        if self.double_star_for_exponentiation {
            "**"
        } else {
            "^"
        }
    }
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A printer for a polynomial that can be used in a [format!] macro.
pub struct PolynomialPrinter<'a, R: Ring, E: Exponent, O: MonomialOrder> {
    pub poly: &'a SparsePolynomial<R, E, O>,
    pub opts: PrintOptions,
}

impl<'a, R: Ring, E: Exponent, O: MonomialOrder> PolynomialPrinter<'a, R, E, O> {
    pub fn new(poly: &'a SparsePolynomial<R, E, O>) -> PolynomialPrinter<'a, R, E, O> {
        PolynomialPrinter {
            poly,
            opts: PrintOptions::default(),
        }
    }

    pub fn new_with_options(
        poly: &'a SparsePolynomial<R, E, O>,
        opts: PrintOptions,
    ) -> PolynomialPrinter<'a, R, E, O> {
        PolynomialPrinter { poly, opts }
    }
}

impl<'a, R: Ring, E: Exponent, O: MonomialOrder> Display for PolynomialPrinter<'a, R, E, O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.poly.is_zero() {
            return f.write_char('0');
        }

        let ring = self.poly.ring();
        let variables = self.poly.variables();
        // a bare minus sign only reads naturally when the ring has negative numbers
        let signed =
            ring.characteristic() == 0 || self.opts.symmetric_representation_for_finite_field;

        for (i, t) in self.poly.terms().enumerate() {
            if let Some(max) = self.opts.max_terms {
                if i == max {
                    return f.write_str("+...");
                }
            }

            let first = i == 0;
            if !first && self.opts.terms_on_new_line {
                f.write_char('\n')?;
            }

            let coeff = RingPrinter {
                ring,
                element: t.coefficient,
                opts: self.opts,
                in_product: !t.exponents.is_one(),
            };

            if t.exponents.is_one() {
                if first {
                    write!(f, "{}", coeff)?;
                } else {
                    write!(f, "{:+}", coeff)?;
                }
                continue;
            }

            if ring.is_one(t.coefficient) {
                if !first {
                    f.write_char('+')?;
                }
            } else if signed && ring.is_minus_one(t.coefficient) {
                f.write_char('-')?;
            } else {
                if first {
                    write!(f, "{}", coeff)?;
                } else {
                    write!(f, "{:+}", coeff)?;
                }
                f.write_char(self.opts.multiplication_operator)?;
            }

            t.exponents.fmt_with_vars(
                variables,
                self.opts.multiplication_operator,
                self.opts.pow_op(),
                f,
            )?;
        }

        Ok(())
    }
}
