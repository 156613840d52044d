use involutive::{
    domains::{finite_field::Zp, Ring},
    poly::{
        monomial::ExponentVector, polynomial::SparsePolynomial, variables, GrevLexOrder, LexOrder,
        MonomialOrder,
    },
};
use proptest::prelude::*;

const P: u32 = 5;

type Terms = Vec<(u32, [u16; 3])>;

fn build<O: MonomialOrder>(field: &Zp, terms: &Terms) -> SparsePolynomial<Zp, u16, O> {
    SparsePolynomial::from_terms(
        field,
        variables(&["x", "y", "z"]),
        terms
            .iter()
            .map(|(c, e)| (field.to_element(*c), e.to_vec()))
            .collect(),
    )
}

/// Evaluate a list of terms with plain integer arithmetic modulo `P`.
fn dense_eval(terms: &Terms, point: &[u32; 3]) -> u64 {
    terms.iter().fold(0, |acc, (c, e)| {
        let mut t = *c as u64 % P as u64;
        for (x, k) in point.iter().zip(e) {
            for _ in 0..*k {
                t = t * *x as u64 % P as u64;
            }
        }
        (acc + t) % P as u64
    })
}

fn terms() -> impl Strategy<Value = Terms> {
    proptest::collection::vec((0..P, [0u16..4, 0u16..4, 0u16..4]), 0..8)
}

fn point() -> impl Strategy<Value = [u32; 3]> {
    [0..P, 0..P, 0..P]
}

proptest! {
    #[test]
    fn sorted_without_zero_coefficients(
        a in terms(),
        b in terms(),
        c in 0..P,
        m in [0u16..3, 0u16..3, 0u16..3],
    ) {
        let field = Zp::new(P);
        let mut f = build::<GrevLexOrder>(&field, &a);
        let g = build::<GrevLexOrder>(&field, &b);
        f.check_consistency();

        f.add_mul_monomial(&field.to_element(c), &ExponentVector::from_slice(&m), &g);
        f.check_consistency();
        f.negate();
        f.check_consistency();
        f.mul_coeff(&field.to_element(3));
        f.check_consistency();

        for t in &f {
            prop_assert!(!Zp::is_zero(t.coefficient));
        }
    }

    #[test]
    fn additive_identity(a in terms()) {
        let field = Zp::new(P);
        let f = build::<LexOrder>(&field, &a);

        prop_assert_eq!(&f + &f.zero(), f.clone());
        prop_assert!((&f + &(-f.clone())).is_zero());
        prop_assert!((&f - &f).is_zero());
    }

    #[test]
    fn multiply_accumulate_matches_evaluation(
        a in terms(),
        b in terms(),
        c in 0..P,
        m in [0u16..3, 0u16..3, 0u16..3],
        points in proptest::collection::vec(point(), 1..5),
    ) {
        let field = Zp::new(P);
        let mut f = build::<LexOrder>(&field, &a);
        let g = build::<LexOrder>(&field, &b);
        f.add_mul_monomial(&field.to_element(c), &ExponentVector::from_slice(&m), &g);

        for pt in &points {
            let expected = (dense_eval(&a, pt)
                + c as u64 * dense_eval(&vec![(1, m)], pt) % P as u64 * dense_eval(&b, pt))
                % P as u64;

            let values: Vec<_> = pt.iter().map(|x| field.to_element(*x)).collect();
            prop_assert_eq!(field.from_element(&f.evaluate(&values)) as u64, expected);
        }
    }

    #[test]
    fn reduction_step_progress(a in terms(), b in terms()) {
        let field = Zp::new(P);
        let f = build::<GrevLexOrder>(&field, &a);
        let g = build::<GrevLexOrder>(&field, &b);
        prop_assume!(!f.is_zero() && !g.is_zero());

        // make the leading monomial of g divide the one of f
        let mut f = &f * &g;
        let old = f.clone();
        let (c, m) = f.divide_leading_term(&g).unwrap();
        f.reduction_step(&g).unwrap();
        f.check_consistency();

        if !f.is_zero() {
            let lm = f.lmonomial().unwrap();
            prop_assert!(lm.cmp_by::<GrevLexOrder>(old.lmonomial().unwrap()).is_lt());
        }

        let mut step = g.clone();
        step.mul_monomial(&m);
        step.mul_coeff(&c);
        prop_assert_eq!(&old - &f, step);
    }

    #[test]
    fn term_iterator_round_trip(a in terms()) {
        let field = Zp::new(P);
        let f = build::<LexOrder>(&field, &a);

        let mut g = f.zero();
        for t in &f {
            g.push_back(*t.coefficient, t.exponents.clone());
        }
        g.check_consistency();
        prop_assert_eq!(g.nterms(), f.nterms());
        prop_assert_eq!(g, f);
    }
}

#[test]
fn reduction_mod_5() {
    let field = Zp::new(5);
    let vars = variables(&["x0", "x1"]);

    let mut f = SparsePolynomial::<_, u16>::from_terms(
        &field,
        vars.clone(),
        vec![
            (field.to_element(3), vec![2, 1]),
            (field.to_element(1), vec![0, 3]),
            (field.to_element(4), vec![0, 0]),
        ],
    );
    // x0^2*x1 - 2
    let g = SparsePolynomial::from_terms(
        &field,
        vars,
        vec![
            (field.to_element(1), vec![2, 1]),
            (field.to_element_signed(-2), vec![0, 0]),
        ],
    );

    assert_eq!(f.lmonomial().unwrap().as_slice(), &[2, 1]);
    f.reduction_step(&g).unwrap();
    assert_eq!(f.nterms(), 1);
    assert_eq!(f.lmonomial().unwrap().as_slice(), &[0, 3]);
    assert!(field.is_one(f.lcoeff().unwrap()));
    assert_eq!(f.to_string(), "x1^3");
}

#[test]
fn zero_polynomial_queries() {
    let field = Zp::new(5);
    let z = SparsePolynomial::<_, u16>::new(&field, variables(&["x"]));
    assert!(z.lmonomial().is_err());
    assert!(z.lcoeff().is_err());
    assert_eq!(z.nterms(), 0);
    assert_eq!(z.to_string(), "0");
}
