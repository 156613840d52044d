//! Janet bases of polynomial ideals.
//!
//! A [JanetTree](tree::JanetTree) indexes the leading monomials of a set of
//! [JanetTriple](triple::JanetTriple)s so that involutive divisors are found by a
//! single walk from the root. Each node only stores the distance to the next node
//! in the degree direction and in the variable direction; a
//! [JanetIterator](iterator::JanetIterator) reconstructs the current monomial
//! while it moves. The triples themselves live in a
//! [TripleStore](triple::TripleStore) and the tree refers to them by id.
//!
//! [JanetBasis](basis::JanetBasis) runs the involutive completion on top of these.

pub mod basis;
pub mod iterator;
pub mod tree;
pub mod triple;
