use std::fmt::{Display, Write};

use tracing::warn;

use crate::poly::Exponent;

use super::iterator::JanetIterator;
use super::triple::TripleId;

/// A reference to a node in the arena of a [JanetTree]. Two arms that contain
/// the same handle share the node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct JanetHandle(u32);

impl JanetHandle {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A reference to an arm, the degree chain of one variable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ArmId(u32);

impl ArmId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node of the Janet tree.
///
/// `dis_next_deg` is the degree gap to the next node of the same arm, with 0
/// meaning that there is none. An internal node may continue in the arm of a
/// later variable, at distance `dis_next_var`. An internal node without such an
/// arm is empty: it marks a degree that no monomial ends on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JanetNode {
    Internal {
        dis_next_deg: u32,
        next_var: Option<(usize, ArmId)>,
    },
    Leaf {
        dis_next_deg: u32,
        triple: TripleId,
    },
}

impl JanetNode {
    pub const EMPTY: JanetNode = JanetNode::Internal {
        dis_next_deg: 0,
        next_var: None,
    };

    #[inline]
    pub fn dis_next_deg(&self) -> u32 {
        match self {
            JanetNode::Internal { dis_next_deg, .. } | JanetNode::Leaf { dis_next_deg, .. } => {
                *dis_next_deg
            }
        }
    }

    #[inline]
    pub(crate) fn set_dis_next_deg(&mut self, dis: u32) {
        match self {
            JanetNode::Internal { dis_next_deg, .. } | JanetNode::Leaf { dis_next_deg, .. } => {
                *dis_next_deg = dis
            }
        }
    }

    /// The distance to the next variable, 0 for leaves and empty nodes.
    #[inline]
    pub fn dis_next_var(&self) -> usize {
        match self {
            JanetNode::Internal {
                next_var: Some((dis, _)),
                ..
            } => *dis,
            _ => 0,
        }
    }

    #[inline]
    pub fn next_arm(&self) -> Option<ArmId> {
        match self {
            JanetNode::Internal {
                next_var: Some((_, arm)),
                ..
            } => Some(*arm),
            _ => None,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, JanetNode::Leaf { .. })
    }

    /// Returns `true` for an internal node without a next variable.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, JanetNode::Internal { next_var: None, .. })
    }

    #[inline]
    pub fn triple(&self) -> Option<TripleId> {
        match self {
            JanetNode::Leaf { triple, .. } => Some(*triple),
            JanetNode::Internal { .. } => None,
        }
    }
}

/// An index of monomials for Janet division.
///
/// The tree covers the variables `begin_var..nvars`. The root arm is the degree
/// chain of `begin_var` and starts at degree `begin_deg`; every other arm starts
/// at degree 0 of its variable. The path of a monomial visits, for each variable
/// that is not skipped, the node at the exponent of that variable, and ends in the
/// leaf that stores the triple.
#[derive(Clone, Debug)]
pub struct JanetTree {
    nodes: Vec<JanetNode>,
    arms: Vec<Vec<JanetHandle>>,
    root: ArmId,
    nvars: usize,
    begin_var: usize,
    begin_deg: u32,
}

impl JanetTree {
    /// Create an empty tree over `nvars` variables.
    pub fn new(nvars: usize) -> JanetTree {
        Self::with_begin(nvars, 0, 0)
    }

    /// Create an empty tree whose root arm belongs to `begin_var` and starts at `begin_deg`.
    pub fn with_begin(nvars: usize, begin_var: usize, begin_deg: u32) -> JanetTree {
        assert!(begin_var < nvars, "A Janet tree needs at least one variable");

        let mut tree = JanetTree {
            nodes: vec![],
            arms: vec![],
            root: ArmId(0),
            nvars,
            begin_var,
            begin_deg,
        };
        let h = tree.new_node(JanetNode::EMPTY);
        tree.root = tree.new_arm(vec![h]);
        tree
    }

    /// Create a tree that holds only `triple`, at the monomial `exponents`.
    pub fn single_leaf<E: Exponent>(
        nvars: usize,
        triple: TripleId,
        exponents: &[E],
        begin_var: usize,
        begin_deg: u32,
    ) -> JanetTree {
        assert_eq!(exponents.len(), nvars);
        assert!(
            exponents[begin_var].to_u32() >= begin_deg,
            "Monomial lies before the start of the tree"
        );

        let mut tree = JanetTree::with_begin(nvars, begin_var, begin_deg);
        let mut iter = JanetIterator::new(&mut tree);
        loop {
            let var = iter.current_var();
            let d = exponents[var].to_u32() - iter.current_deg();
            if d > 0 {
                iter.set_next_deg(d);
                iter.next_deg();
            }

            match (var + 1..nvars).find(|v| !exponents[*v].is_zero()) {
                Some(v) => {
                    iter.set_next_var(v - var);
                    iter.next_var();
                }
                None => {
                    iter.change_to_leaf_node(triple);
                    break;
                }
            }
        }

        tree
    }

    #[inline]
    pub fn nvars(&self) -> usize {
        self.nvars
    }

    #[inline]
    pub fn begin_var(&self) -> usize {
        self.begin_var
    }

    #[inline]
    pub fn begin_deg(&self) -> u32 {
        self.begin_deg
    }

    #[inline]
    pub fn root(&self) -> ArmId {
        self.root
    }

    #[inline]
    pub fn node(&self, h: JanetHandle) -> &JanetNode {
        &self.nodes[h.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, h: JanetHandle) -> &mut JanetNode {
        &mut self.nodes[h.index()]
    }

    #[inline]
    pub fn arm(&self, arm: ArmId) -> &[JanetHandle] {
        &self.arms[arm.index()]
    }

    #[inline]
    pub(crate) fn arm_mut(&mut self, arm: ArmId) -> &mut Vec<JanetHandle> {
        &mut self.arms[arm.index()]
    }

    pub(crate) fn new_node(&mut self, node: JanetNode) -> JanetHandle {
        let h = JanetHandle(u32::try_from(self.nodes.len()).expect("Janet tree too large"));
        self.nodes.push(node);
        h
    }

    pub(crate) fn new_arm(&mut self, handles: Vec<JanetHandle>) -> ArmId {
        let a = ArmId(u32::try_from(self.arms.len()).expect("Janet tree too large"));
        self.arms.push(handles);
        a
    }

    /// Copy the arm `arm` of `other`, including everything below it, into this tree.
    pub(crate) fn import_arm(&mut self, other: &JanetTree, arm: ArmId) -> Vec<JanetHandle> {
        let mut handles = Vec::with_capacity(other.arm(arm).len());
        for h in other.arm(arm) {
            let node = match *other.node(*h) {
                JanetNode::Internal {
                    dis_next_deg,
                    next_var: Some((dis, a)),
                } => {
                    let sub = self.import_arm(other, a);
                    JanetNode::Internal {
                        dis_next_deg,
                        next_var: Some((dis, self.new_arm(sub))),
                    }
                }
                n => n,
            };
            handles.push(self.new_node(node));
        }
        handles
    }

    /// Returns `true` if the tree holds no leaf.
    pub fn is_empty(&self) -> bool {
        let root = self.arm(self.root);
        root.len() == 1 && *self.node(root[0]) == JanetNode::EMPTY
    }

    /// Remove everything. The root arm becomes a single empty node.
    pub fn delete(&mut self) {
        self.nodes.clear();
        self.arms.clear();
        let h = self.new_node(JanetNode::EMPTY);
        self.root = self.new_arm(vec![h]);
    }

    /// Find the involutive divisor of `w`: the triple whose monomial divides `w`
    /// such that the quotient only contains variables that are multiplicative for it.
    pub fn j_divisor<E: Exponent>(&self, w: &[E]) -> Option<TripleId> {
        debug_assert_eq!(w.len(), self.nvars);

        // variables before `begin_var` are multiplicative for every leaf
        let mut iter = JanetIterator::new(self);
        loop {
            let target = w[iter.current_var()].to_u32();
            if iter.current_deg() > target {
                return None;
            }

            while iter.current_deg() < target && iter.dis_next_deg() != 0 {
                if iter.current_deg() + iter.dis_next_deg() > target {
                    return None;
                }
                iter.next_deg();
            }

            if iter.is_leaf() {
                return iter.try_triple();
            }

            if iter.next_var() == 0 {
                return None;
            }
        }
    }

    /// Find the triple stored at exactly `monomial`.
    pub fn find<E: Exponent>(&self, monomial: &[E]) -> Option<TripleId> {
        self.path(monomial).map(|(triple, _)| triple)
    }

    /// Walk the path of `monomial`, returning its triple and the non-multiplicative
    /// flags read off the path.
    fn path<E: Exponent>(&self, monomial: &[E]) -> Option<(TripleId, Vec<bool>)> {
        debug_assert_eq!(monomial.len(), self.nvars);

        if (0..self.begin_var).any(|v| !monomial[v].is_zero()) {
            return None;
        }

        let mut nonmult = vec![false; self.nvars];
        let mut iter = JanetIterator::new(self);
        loop {
            let var = iter.current_var();
            let target = monomial[var].to_u32();
            while iter.current_deg() < target {
                if iter.next_deg() == 0 {
                    return None;
                }
            }

            if iter.current_deg() != target {
                return None;
            }

            nonmult[var] = iter.dis_next_deg() != 0;

            if iter.is_leaf() {
                if (var + 1..self.nvars).any(|v| !monomial[v].is_zero()) {
                    return None;
                }
                return Some((iter.triple(), nonmult));
            }

            let dis = iter.next_var();
            if dis == 0 || (var + 1..var + dis).any(|v| !monomial[v].is_zero()) {
                return None;
            }
        }
    }

    /// The non-multiplicative variables of the monomial `monomial`, which must be
    /// stored in the tree. A variable is non-multiplicative iff the node of the path
    /// in the arm of that variable has a next degree.
    pub fn nonmultiplicative_variables<E: Exponent>(&self, monomial: &[E]) -> Option<Vec<bool>> {
        self.path(monomial).map(|(_, nm)| nm)
    }

    /// Insert `triple` at `monomial`. If a triple is already stored there, it is
    /// replaced and returned.
    pub fn insert<E: Exponent>(&mut self, triple: TripleId, monomial: &[E]) -> Option<TripleId> {
        assert_eq!(monomial.len(), self.nvars);
        let nvars = self.nvars;

        if let Some(v) = (0..self.begin_var).find(|v| !monomial[*v].is_zero()) {
            let sub = JanetTree::single_leaf(nvars, triple, monomial, v, 0);
            self.add_at_begin(&sub);
            return None;
        }

        let first = monomial[self.begin_var].to_u32();
        if first < self.begin_deg {
            let sub = JanetTree::single_leaf(nvars, triple, monomial, self.begin_var, first);
            self.add_at_begin(&sub);
            return None;
        }

        let mut iter = JanetIterator::new(self);
        loop {
            let var = iter.current_var();
            let target = monomial[var].to_u32();

            while iter.current_deg() < target {
                let dis = iter.dis_next_deg();
                if dis == 0 || iter.current_deg() + dis > target {
                    let sub =
                        JanetTree::single_leaf(nvars, triple, monomial, var, iter.current_deg());
                    iter.connect_tree_deg(&sub);
                    return None;
                }
                iter.next_deg();
            }

            let next_nonzero = (var + 1..nvars).find(|v| !monomial[*v].is_zero());

            if iter.is_leaf() {
                let old = iter.change_to_internal_node();
                match next_nonzero {
                    None => {
                        warn!("Replacing triple {} by {} in the Janet tree", old, triple);
                        iter.change_to_leaf_node(triple);
                        return Some(old);
                    }
                    Some(v) => {
                        // the old leaf moves one level down, to degree 0 of `v`
                        iter.set_next_var(v - var);
                        iter.next_var();
                        iter.change_to_leaf_node(old);
                    }
                }
                continue;
            }

            let dis = iter.dis_next_var();
            match next_nonzero {
                None if dis == 0 => {
                    iter.change_to_leaf_node(triple);
                    return None;
                }
                Some(v) if dis == 0 || v - var < dis => {
                    iter.set_next_var(v - var);
                    iter.next_var();
                }
                _ => {
                    iter.next_var();
                }
            }
        }
    }

    /// Splice `subtree` in front of the tree.
    ///
    /// An empty tree is replaced by `subtree`. If both trees start at the same
    /// variable, the root arm of `subtree` must end before `begin_deg` and is
    /// prepended to the root arm. If `subtree` starts at an
    /// earlier variable, it must start at degree 0. The current tree then moves one
    /// level down, below degree 0 of that variable, and `subtree` is grafted after it.
    pub fn add_at_begin(&mut self, subtree: &JanetTree) {
        assert_eq!(subtree.nvars, self.nvars);

        // nothing to link to: the subtree and its anchor replace the placeholder root
        if self.is_empty() {
            *self = subtree.clone();
            return;
        }

        if subtree.begin_var == self.begin_var {
            let chain = self.import_arm(subtree, subtree.root);
            let span: u32 = chain[..chain.len() - 1]
                .iter()
                .map(|h| self.node(*h).dis_next_deg())
                .sum();
            assert!(
                subtree.begin_deg + span < self.begin_deg,
                "Subtree does not end before the start of the tree"
            );

            let last = chain[chain.len() - 1];
            let gap = self.begin_deg - subtree.begin_deg - span;
            self.node_mut(last).set_dis_next_deg(gap);

            let root = self.root;
            self.arm_mut(root).splice(0..0, chain);
            self.begin_deg = subtree.begin_deg;
            return;
        }

        assert!(
            subtree.begin_var < self.begin_var,
            "Subtree starts after the first variable of the tree"
        );
        assert_eq!(subtree.begin_deg, 0, "Subtree must start at degree 0");

        let root = self.root;
        if self.begin_deg > 0 {
            let pad = self.new_node(JanetNode::Internal {
                dis_next_deg: self.begin_deg,
                next_var: None,
            });
            self.arm_mut(root).insert(0, pad);
        }

        let top = self.new_node(JanetNode::Internal {
            dis_next_deg: 0,
            next_var: Some((self.begin_var - subtree.begin_var, root)),
        });
        self.root = self.new_arm(vec![top]);
        self.begin_var = subtree.begin_var;
        self.begin_deg = 0;

        let mut iter = JanetIterator::new(self);
        iter.connect_tree_deg(subtree);
    }

    /// Go to the node that is reached by always taking the last degree and then
    /// the next variable, and return the triple if it is a leaf.
    pub fn highest_leaf(&self) -> Option<TripleId> {
        let mut iter = JanetIterator::new(self);
        iter.goto_highest_node();
        iter.try_triple()
    }

    /// All leaves with their monomials, in the order of a depth-first walk.
    pub fn leaves(&self) -> Vec<(Vec<u32>, TripleId)> {
        let mut res = vec![];
        let mut monomial = vec![0; self.nvars];
        monomial[self.begin_var] = self.begin_deg;
        self.collect_leaves(self.root, self.begin_var, &mut monomial, &mut res);
        res
    }

    fn collect_leaves(
        &self,
        arm: ArmId,
        var: usize,
        monomial: &mut Vec<u32>,
        res: &mut Vec<(Vec<u32>, TripleId)>,
    ) {
        let start = monomial[var];
        for h in self.arm(arm) {
            let node = self.node(*h);
            match node {
                JanetNode::Leaf { triple, .. } => res.push((monomial.clone(), *triple)),
                JanetNode::Internal {
                    next_var: Some((dis, a)),
                    ..
                } => self.collect_leaves(*a, var + dis, monomial, res),
                JanetNode::Internal { next_var: None, .. } => {}
            }
            monomial[var] += node.dis_next_deg();
        }
        monomial[var] = start;
    }

    fn fmt_arm(
        &self,
        arm: ArmId,
        var: usize,
        start: u32,
        depth: usize,
        f: &mut impl Write,
    ) -> std::fmt::Result {
        let mut deg = start;
        for h in self.arm(arm) {
            let node = self.node(*h);
            for _ in 0..depth {
                f.write_str("  ")?;
            }
            write!(f, "x{}^{}", var, deg)?;
            match node {
                JanetNode::Leaf { triple, .. } => writeln!(f, " -> {}", triple)?,
                JanetNode::Internal {
                    next_var: Some((dis, a)),
                    ..
                } => {
                    writeln!(f)?;
                    self.fmt_arm(*a, var + dis, 0, depth + 1, f)?;
                }
                JanetNode::Internal { next_var: None, .. } => writeln!(f, " .")?,
            }
            deg += node.dis_next_deg();
        }
        Ok(())
    }
}

impl Display for JanetTree {
    /// A dump of the tree, one node per line.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_arm(self.root, self.begin_var, self.begin_deg, 0, f)
    }
}
