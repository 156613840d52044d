//! Involutive completion of a polynomial system to a Janet basis.

use ahash::HashSet;
use tracing::{debug, info, instrument};

use crate::domains::Field;
use crate::error::PolynomialError;
use crate::poly::{
    monomial::ExponentVector, polynomial::SparsePolynomial, Exponent, MonomialOrder,
};

use super::tree::JanetTree;
use super::triple::{JanetTriple, TripleId, TripleStore};

/// Settings for the completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JanetBasisSettings {
    /// Log statistics at the `info` level when the completion finishes.
    pub print_stats: bool,
    /// Reduce all terms during the completion, instead of only the leading ones.
    pub full_reduction: bool,
    /// Reduce the tails of the final basis elements.
    pub reduce_result: bool,
}

impl Default for JanetBasisSettings {
    fn default() -> Self {
        JanetBasisSettings {
            print_stats: false,
            full_reduction: true,
            reduce_result: false,
        }
    }
}

#[derive(Default, Debug)]
struct CompletionStats {
    processed: usize,
    reductions: usize,
    zero_reductions: usize,
    prolongations: usize,
    rebuilds: usize,
}

/// A Janet basis of a polynomial ideal, computed with the involutive completion
/// of Gerdt and Blinkov.
///
/// The basis keeps the triples and the Janet tree that indexes their leading
/// monomials, so that involutive normal forms of new polynomials can be computed
/// afterwards.
pub struct JanetBasis<R: Field, E: Exponent, O: MonomialOrder> {
    store: TripleStore<R, E, O>,
    tree: JanetTree,
    basis: Vec<TripleId>,
    zero: SparsePolynomial<R, E, O>,
    settings: JanetBasisSettings,
}

impl<R: Field, E: Exponent, O: MonomialOrder> JanetBasis<R, E, O> {
    /// Compute the Janet basis of the ideal generated by `ideal`, with default settings.
    ///
    /// At least one polynomial is needed to determine the ring and the variables,
    /// and the ring must have at least one variable.
    pub fn compute(
        ideal: Vec<SparsePolynomial<R, E, O>>,
    ) -> Result<JanetBasis<R, E, O>, PolynomialError> {
        Self::compute_with_settings(ideal, JanetBasisSettings::default())
    }

    /// Compute the Janet basis of the ideal generated by `ideal`.
    #[instrument(level = "debug", skip_all)]
    pub fn compute_with_settings(
        ideal: Vec<SparsePolynomial<R, E, O>>,
        settings: JanetBasisSettings,
    ) -> Result<JanetBasis<R, E, O>, PolynomialError> {
        let Some(first) = ideal.first() else {
            return Err(PolynomialError::ZeroPolynomial);
        };

        let zero = first.zero();
        let nvars = zero.nvars();
        if let Some(p) = ideal.iter().find(|p| p.nvars() != nvars) {
            return Err(PolynomialError::VariableMismatch(nvars, p.nvars()));
        }
        if nvars == 0 {
            return Err(PolynomialError::NoVariables);
        }

        let mut b = JanetBasis {
            store: TripleStore::new(),
            tree: JanetTree::new(nvars),
            basis: vec![],
            zero,
            settings,
        };

        let mut queue = vec![];
        let mut pending = HashSet::default();
        for mut p in ideal {
            if p.is_zero() {
                continue;
            }

            p.make_monic();
            if pending.insert(p.clone()) {
                queue.push(b.store.insert(JanetTriple::new(p)?));
            }
        }

        let mut stats = CompletionStats::default();
        b.complete(queue, pending, &mut stats)?;

        if b.settings.reduce_result {
            b.reduce_tails()?;
        }

        if b.settings.print_stats {
            info!(
                "Janet basis of {} elements: processed={}, reductions={}, zero reductions={}, prolongations={}, tree rebuilds={}",
                b.basis.len(),
                stats.processed,
                stats.reductions,
                stats.zero_reductions,
                stats.prolongations,
                stats.rebuilds
            );
        }

        Ok(b)
    }

    fn triple(&self, id: TripleId) -> &JanetTriple<R, E, O> {
        match self.store.get(id) {
            Some(t) => t,
            None => panic!("Basis refers to a removed triple {}", id),
        }
    }

    fn triple_mut(&mut self, id: TripleId) -> &mut JanetTriple<R, E, O> {
        match self.store.get_mut(id) {
            Some(t) => t,
            None => panic!("Basis refers to a removed triple {}", id),
        }
    }

    /// Run the completion until the queue is empty.
    fn complete(
        &mut self,
        mut queue: Vec<TripleId>,
        mut pending: HashSet<SparsePolynomial<R, E, O>>,
        stats: &mut CompletionStats,
    ) -> Result<(), PolynomialError> {
        while let Some(pos) = self.smallest_in_queue(&queue) {
            let id = queue.swap_remove(pos);
            let p = self.triple(id).polynomial().clone();
            pending.remove(&p);
            stats.processed += 1;

            let (mut h, steps) = self.involutive_reduce(&p, self.settings.full_reduction)?;
            stats.reductions += steps;

            if h.is_zero() {
                debug!("Triple {} reduced to zero in {} steps", id, steps);
                stats.zero_reductions += 1;
                self.store.remove(id);
                continue;
            }

            h.make_monic();
            let id = if h.lmonomial()? == p.lmonomial()? {
                self.triple_mut(id).set_polynomial(h);
                id
            } else {
                self.store.remove(id);
                self.store.insert(JanetTriple::new(h)?)
            };

            let lm = self.triple(id).leading_monomial().clone();

            let (moved, kept): (Vec<TripleId>, Vec<TripleId>) =
                self.basis.iter().copied().partition(|t| {
                    let tlm = self.triple(*t).leading_monomial();
                    tlm != &lm && lm.divides(tlm)
                });

            if !moved.is_empty() {
                debug!(
                    "{} basis elements have leading monomials divisible by {}, rebuilding the tree",
                    moved.len(),
                    lm
                );
                stats.rebuilds += 1;

                for t in moved {
                    self.triple_mut(t).clear_nonmultiplicative();
                    queue.push(t);
                }

                let leading: Vec<_> = kept
                    .iter()
                    .map(|t| (*t, self.triple(*t).leading_monomial().clone()))
                    .collect();
                self.tree.delete();
                for (t, tlm) in &leading {
                    self.tree.insert(*t, tlm.as_slice());
                }
                self.basis = kept;
            }

            self.basis.push(id);
            self.tree.insert(id, lm.as_slice());

            for t in self.basis.clone() {
                for q in self.prolong(t) {
                    if pending.insert(q.polynomial().clone()) {
                        debug!("Prolongation {} of triple {}", q.polynomial(), t);
                        stats.prolongations += 1;
                        queue.push(self.store.insert(q));
                    }
                }
            }
        }

        Ok(())
    }

    fn smallest_in_queue(&self, queue: &[TripleId]) -> Option<usize> {
        (0..queue.len()).min_by(|a, b| {
            self.triple(queue[*a])
                .leading_monomial()
                .cmp_by::<O>(self.triple(queue[*b]).leading_monomial())
        })
    }

    /// Form the prolongations of `id` by its non-multiplicative variables that have
    /// not been treated yet, and flag those variables.
    fn prolong(&mut self, id: TripleId) -> Vec<JanetTriple<R, E, O>> {
        let nvars = self.zero.nvars();
        let nm = {
            let lm = self.triple(id).leading_monomial();
            match self.tree.nonmultiplicative_variables(lm.as_slice()) {
                Some(nm) => nm,
                None => panic!("Basis element {} is missing from the Janet tree", id),
            }
        };

        let mut res = vec![];
        for v in 0..nvars {
            if !nm[v] || self.triple(id).is_nonmultiplicative(v) {
                continue;
            }

            let t = self.triple_mut(id);
            t.set_nonmultiplicative(v);

            let mut q = t.polynomial().clone();
            q.mul_monomial(&ExponentVector::variable(nvars, v, E::one()));
            res.push(JanetTriple::with_ancestor(q, t.ancestor().clone()));
        }
        res
    }

    /// Reduce `p` involutively by the basis. With `full` all terms are reduced,
    /// otherwise the reduction stops at the first irreducible leading term.
    /// Returns the result and the number of reduction steps.
    fn involutive_reduce(
        &self,
        p: &SparsePolynomial<R, E, O>,
        full: bool,
    ) -> Result<(SparsePolynomial<R, E, O>, usize), PolynomialError> {
        let mut p = p.clone();
        let mut r = p.zero();
        let mut steps = 0;

        while let Some(t) = p.leading_term() {
            match self.tree.j_divisor(t.exponents.as_slice()) {
                Some(d) => {
                    p.reduction_step(self.triple(d).polynomial())?;
                    steps += 1;
                }
                None if full => {
                    if let Some((c, m)) = p.pop_front() {
                        r.push_back(c, m);
                    }
                }
                None => break,
            }
        }

        if full {
            Ok((r, steps))
        } else {
            Ok((p, steps))
        }
    }

    /// Reduce every term below the leading term of each basis element.
    fn reduce_tails(&mut self) -> Result<(), PolynomialError> {
        for id in self.basis.clone() {
            let mut p = self.triple(id).polynomial().clone();
            let Some((c, m)) = p.pop_front() else {
                continue;
            };

            let (mut r, _) = self.involutive_reduce(&p, true)?;
            r.push_front(c, m);
            r.make_monic();
            self.triple_mut(id).set_polynomial(r);
        }

        Ok(())
    }

    pub fn settings(&self) -> &JanetBasisSettings {
        &self.settings
    }

    /// The number of basis elements.
    pub fn len(&self) -> usize {
        self.basis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.basis.is_empty()
    }

    /// The Janet tree of the leading monomials of the basis.
    pub fn tree(&self) -> &JanetTree {
        &self.tree
    }

    /// The basis triples, sorted by decreasing leading monomial.
    pub fn triples(&self) -> Vec<&JanetTriple<R, E, O>> {
        let mut res: Vec<_> = self.basis.iter().map(|id| self.triple(*id)).collect();
        res.sort_by(|a, b| b.leading_monomial().cmp_by::<O>(a.leading_monomial()));
        res
    }

    /// The basis polynomials, sorted by decreasing leading monomial.
    pub fn basis(&self) -> Vec<&SparsePolynomial<R, E, O>> {
        self.triples().into_iter().map(|t| t.polynomial()).collect()
    }

    /// The involutive normal form of `f` with respect to the basis. It is zero
    /// iff `f` lies in the ideal.
    pub fn normal_form(
        &self,
        f: &SparsePolynomial<R, E, O>,
    ) -> Result<SparsePolynomial<R, E, O>, PolynomialError> {
        if f.nvars() != self.zero.nvars() {
            return Err(PolynomialError::VariableMismatch(
                self.zero.nvars(),
                f.nvars(),
            ));
        }

        let (r, steps) = self.involutive_reduce(f, true)?;
        debug!("Involutive normal form after {} reduction steps", steps);
        Ok(r)
    }

    /// Test whether `f` lies in the ideal.
    pub fn contains(&self, f: &SparsePolynomial<R, E, O>) -> Result<bool, PolynomialError> {
        Ok(self.normal_form(f)?.is_zero())
    }

    /// The reduced Gröbner basis of the ideal, sorted by decreasing leading monomial.
    ///
    /// The basis elements whose leading monomials are minimal with respect to
    /// divisibility form a Gröbner basis; each is reduced by the others and made monic.
    pub fn groebner_basis(&self) -> Vec<SparsePolynomial<R, E, O>> {
        let polys = self.basis();
        let minimal: Vec<_> = polys
            .iter()
            .filter(|p| {
                let Ok(lm) = p.lmonomial() else {
                    return false;
                };
                !polys.iter().any(|q| {
                    q.lmonomial()
                        .map(|qlm| qlm != lm && qlm.divides(lm))
                        .unwrap_or(false)
                })
            })
            .copied()
            .collect();

        let mut res = Vec::with_capacity(minimal.len());
        for (i, p) in minimal.iter().enumerate() {
            let others: Vec<_> = minimal
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, q)| *q)
                .collect();

            // the leading term is irreducible, so this only touches the tail
            let mut r = match p.normal_form(&others) {
                Ok(r) => r,
                Err(_) => (*p).clone(),
            };
            r.make_monic();
            res.push(r);
        }

        res.sort_by(|a, b| match (a.lmonomial(), b.lmonomial()) {
            (Ok(x), Ok(y)) => y.cmp_by::<O>(x),
            _ => std::cmp::Ordering::Equal,
        });
        res
    }
}

#[cfg(test)]
mod tests {
    use crate::domains::finite_field::Zp;
    use crate::domains::rational::Q;
    use crate::error::PolynomialError;
    use crate::poly::{polynomial::SparsePolynomial, variables, DegLexOrder, LexOrder};

    use super::{JanetBasis, JanetBasisSettings};

    fn zp_poly(field: &Zp, terms: &[(u32, [u16; 2])]) -> SparsePolynomial<Zp, u16, LexOrder> {
        SparsePolynomial::from_terms(
            field,
            variables(&["x", "y"]),
            terms
                .iter()
                .map(|(c, e)| (field.to_element(*c), e.to_vec()))
                .collect(),
        )
    }

    #[test]
    fn hyperbola_and_parabola() {
        let field = Zp::new(5);
        // x*y - 1, y^2 - 1
        let f = zp_poly(&field, &[(1, [1, 1]), (4, [0, 0])]);
        let g = zp_poly(&field, &[(1, [0, 2]), (4, [0, 0])]);

        let basis = JanetBasis::compute(vec![f.clone(), g.clone()]).unwrap();
        assert_eq!(basis.len(), 2);

        // x - y and y^2 - 1
        let expected = vec![
            zp_poly(&field, &[(1, [1, 0]), (4, [0, 1])]),
            zp_poly(&field, &[(1, [0, 2]), (4, [0, 0])]),
        ];
        assert_eq!(basis.groebner_basis(), expected);

        assert!(basis.contains(&f).unwrap());
        assert!(basis.contains(&g).unwrap());
        assert!(basis.contains(&(&f * &g)).unwrap());
        assert!(!basis.contains(&f.variable(1)).unwrap());

        for p in basis.basis() {
            p.check_consistency();
        }
    }

    #[test]
    fn monomial_ideal() {
        let field = Zp::new(7);
        let f = zp_poly(&field, &[(1, [2, 0])]);
        let g = zp_poly(&field, &[(1, [0, 1])]);

        let basis = JanetBasis::compute(vec![f.clone(), g.clone()]).unwrap();

        // x*y is added to cover the cone of y
        let lms: Vec<_> = basis
            .basis()
            .iter()
            .map(|p| p.lmonomial().unwrap().to_u32_vec())
            .collect();
        assert_eq!(lms, vec![vec![2, 0], vec![1, 1], vec![0, 1]]);
        assert_eq!(basis.groebner_basis(), vec![f.clone(), g.clone()]);

        let nf = basis.normal_form(&zp_poly(&field, &[(3, [1, 0]), (2, [3, 2])])).unwrap();
        assert_eq!(nf, zp_poly(&field, &[(3, [1, 0])]));

        for t in basis.triples() {
            let nm = basis
                .tree()
                .nonmultiplicative_variables(t.leading_monomial().as_slice())
                .unwrap();
            for (v, is_nm) in nm.iter().enumerate() {
                if *is_nm {
                    assert!(t.is_nonmultiplicative(v));
                }
            }
        }
    }

    #[test]
    fn unit_ideal() {
        let vars = variables(&["x", "y"]);
        // x + 1 and x
        let f = SparsePolynomial::<_, u16, DegLexOrder>::from_terms(
            &Q,
            vars.clone(),
            vec![(Q.to_element(1, 1), vec![1, 0]), (Q.to_element(1, 1), vec![0, 0])],
        );
        let g = SparsePolynomial::from_terms(&Q, vars, vec![(Q.to_element(2, 1), vec![1, 0])]);

        let basis = JanetBasis::compute(vec![f.clone(), g]).unwrap();
        assert_eq!(basis.len(), 1);
        assert!(basis.basis()[0].is_one());
        assert!(basis.contains(&f.variable(1)).unwrap());
    }

    #[test]
    fn head_reduction_and_tail_reduction() {
        let field = Zp::new(5);
        let f = zp_poly(&field, &[(1, [1, 1]), (4, [0, 0])]);
        let g = zp_poly(&field, &[(1, [0, 2]), (4, [0, 0])]);

        let settings = JanetBasisSettings {
            full_reduction: false,
            reduce_result: true,
            ..Default::default()
        };
        let head = JanetBasis::compute_with_settings(vec![f.clone(), g.clone()], settings).unwrap();
        let full = JanetBasis::compute(vec![f, g]).unwrap();

        assert_eq!(head.groebner_basis(), full.groebner_basis());
        assert_eq!(head.basis().len(), full.basis().len());
        assert!(head.settings().reduce_result);
    }

    #[test]
    fn degenerate_input() {
        let field = Zp::new(3);
        let z = zp_poly(&field, &[]);

        let basis = JanetBasis::compute(vec![z.clone(), z.clone()]).unwrap();
        assert!(basis.is_empty());
        assert!(basis.tree().is_empty());
        assert!(basis.contains(&z).unwrap());
        assert!(!basis.contains(&z.one()).unwrap());
        assert!(basis.groebner_basis().is_empty());

        assert!(matches!(
            JanetBasis::<Zp, u16, LexOrder>::compute(vec![]),
            Err(PolynomialError::ZeroPolynomial)
        ));

        let other = SparsePolynomial::<_, u16, LexOrder>::new(&field, variables(&["x"])).one();
        assert_eq!(
            JanetBasis::compute(vec![z, other]).err(),
            Some(PolynomialError::VariableMismatch(2, 1))
        );
    }

    #[test]
    fn ring_without_variables() {
        let field = Zp::new(3);
        let c = SparsePolynomial::<_, u16, LexOrder>::new(&field, variables(&[]))
            .constant(field.to_element(2));
        assert!(!c.is_zero());

        assert_eq!(
            JanetBasis::compute(vec![c.clone()]).err(),
            Some(PolynomialError::NoVariables)
        );
        assert_eq!(
            JanetBasis::compute(vec![c.zero()]).err(),
            Some(PolynomialError::NoVariables)
        );
    }
}
