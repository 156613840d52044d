//! Recoverable errors of the polynomial layer.
//!
//! Broken invariants (a badly ordered `push_front`, asking an internal
//! Janet node for its triple) are bugs in the caller and panic instead.

/// Errors from polynomial arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolynomialError {
    #[error("The zero polynomial has no leading term")]
    ZeroPolynomial,
    #[error("Leading monomial {divisor} does not divide {dividend}")]
    NotDivisible { dividend: String, divisor: String },
    #[error("Coefficient {dividend} is not divisible by {divisor}")]
    InexactCoefficientDivision { dividend: String, divisor: String },
    #[error("Polynomials live in different rings: {0} vs {1} variables")]
    VariableMismatch(usize, usize),
    #[error("A Janet basis needs at least one variable")]
    NoVariables,
}
