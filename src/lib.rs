//! Involutive is a library for sparse multivariate polynomials over exact
//! coefficient rings and for Janet bases of polynomial ideals.
//!
//! Polynomials are generic over their coefficient ring, exponent type and
//! monomial order. A Janet basis is computed by involutive completion, with a
//! Janet tree to find involutive divisors quickly.
//!
//! For example:
//!
//! ```
//! use involutive::domains::finite_field::Zp;
//! use involutive::janet::basis::JanetBasis;
//! use involutive::poly::{polynomial::SparsePolynomial, variables};
//!
//! let field = Zp::new(5);
//! let vars = variables(&["x", "y"]);
//! let f = SparsePolynomial::<_, u16>::from_terms(
//!     &field,
//!     vars.clone(),
//!     vec![(field.to_element(1), vec![1, 1]), (field.to_element(4), vec![0, 0])],
//! );
//! let g = SparsePolynomial::from_terms(
//!     &field,
//!     vars,
//!     vec![(field.to_element(1), vec![0, 2]), (field.to_element(4), vec![0, 0])],
//! );
//!
//! let basis = JanetBasis::compute(vec![f, g]).unwrap();
//! for p in basis.groebner_basis() {
//!     println!("{}", p);
//! }
//! ```

pub mod domains;
pub mod error;
pub mod janet;
pub mod poly;
pub mod printer;
