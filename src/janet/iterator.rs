use std::ops::{Deref, DerefMut};

use super::tree::{ArmId, JanetHandle, JanetNode, JanetTree};
use super::triple::TripleId;

/// A cursor on a [JanetTree] that tracks the monomial of the node it points to.
///
/// Navigation only needs a shared reference to the tree. The surgery methods
/// (`set_next_deg`, `set_next_var`, `change_to_leaf_node`, ...) are available when
/// the iterator holds a mutable one.
pub struct JanetIterator<T: Deref<Target = JanetTree>> {
    tree: T,
    arm: ArmId,
    pos: usize,
    monomial: Vec<u32>,
    var: usize,
}

impl<T: Deref<Target = JanetTree>> JanetIterator<T> {
    /// Create an iterator at the first node of the root arm.
    pub fn new(tree: T) -> Self {
        let mut monomial = vec![0; tree.nvars()];
        monomial[tree.begin_var()] = tree.begin_deg();
        JanetIterator {
            arm: tree.root(),
            pos: 0,
            var: tree.begin_var(),
            monomial,
            tree,
        }
    }

    pub fn return_to_begin(&mut self) {
        self.arm = self.tree.root();
        self.pos = 0;
        self.var = self.tree.begin_var();
        for e in &mut self.monomial {
            *e = 0;
        }
        self.monomial[self.var] = self.tree.begin_deg();
    }

    #[inline]
    pub fn tree(&self) -> &JanetTree {
        &self.tree
    }

    #[inline]
    pub fn current_var(&self) -> usize {
        self.var
    }

    #[inline]
    pub fn current_deg(&self) -> u32 {
        self.monomial[self.var]
    }

    /// The monomial of the current node.
    #[inline]
    pub fn monomial(&self) -> &[u32] {
        &self.monomial
    }

    #[inline]
    pub fn handle(&self) -> JanetHandle {
        self.tree.arm(self.arm)[self.pos]
    }

    #[inline]
    pub fn node(&self) -> &JanetNode {
        self.tree.node(self.handle())
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    #[inline]
    pub fn dis_next_deg(&self) -> u32 {
        self.node().dis_next_deg()
    }

    #[inline]
    pub fn dis_next_var(&self) -> usize {
        self.node().dis_next_var()
    }

    /// Move to the next node in the degree direction and return the distance, or
    /// return 0 and stay if there is none.
    pub fn next_deg(&mut self) -> u32 {
        let dis = self.dis_next_deg();
        if dis != 0 {
            self.pos += 1;
            self.monomial[self.var] += dis;
        }
        dis
    }

    /// Move back to the previous node in the degree direction and return the
    /// distance, or return 0 at the start of an arm.
    pub fn prev_deg(&mut self) -> u32 {
        if self.pos == 0 {
            return 0;
        }

        self.pos -= 1;
        let dis = self.dis_next_deg();
        self.monomial[self.var] -= dis;
        dis
    }

    /// Move to the first node of the next variable and return the distance, or
    /// return 0 and stay at a leaf or an empty node.
    pub fn next_var(&mut self) -> usize {
        let node = *self.node();
        match node {
            JanetNode::Internal {
                next_var: Some((dis, arm)),
                ..
            } => {
                self.arm = arm;
                self.pos = 0;
                self.var += dis;
                dis
            }
            _ => 0,
        }
    }

    /// Follow the last degree of every arm and return the total distance moved.
    pub fn goto_highest_node(&mut self) -> usize {
        let mut moved = 0;
        loop {
            loop {
                let d = self.next_deg();
                if d == 0 {
                    break;
                }
                moved += d as usize;
            }

            let d = self.next_var();
            if d == 0 {
                return moved;
            }
            moved += d;
        }
    }

    /// The triple of the current node, which must be a leaf.
    pub fn triple(&self) -> TripleId {
        match self.node().triple() {
            Some(t) => t,
            None => panic!("Fetching a triple from an internal node"),
        }
    }

    #[inline]
    pub fn try_triple(&self) -> Option<TripleId> {
        self.node().triple()
    }
}

impl<T: DerefMut<Target = JanetTree>> JanetIterator<T> {
    fn node_mut(&mut self) -> &mut JanetNode {
        let h = self.handle();
        self.tree.node_mut(h)
    }

    /// Make sure that the current arm has a node at distance `dis`. A new node is
    /// empty. A distance of 0 does nothing.
    ///
    /// If the current next degree is further away, the new node is spliced in
    /// between. Otherwise the arm is cut after the current node.
    pub fn set_next_deg(&mut self, dis: u32) {
        if dis == 0 {
            return;
        }

        let old = self.dis_next_deg();
        let arm = self.arm;
        let pos = self.pos;

        if old == 0 || old > dis {
            let rest = if old == 0 { 0 } else { old - dis };
            let h = self.tree.new_node(JanetNode::Internal {
                dis_next_deg: rest,
                next_var: None,
            });
            self.tree.arm_mut(arm).insert(pos + 1, h);
        } else {
            let h = self.tree.new_node(JanetNode::EMPTY);
            let a = self.tree.arm_mut(arm);
            a.truncate(pos + 1);
            a.push(h);
        }

        self.node_mut().set_dis_next_deg(dis);
    }

    /// Make sure that the current node continues at the variable at distance `dis`.
    /// A distance of 0 does nothing.
    ///
    /// If the current next variable is further away, an intermediate arm with a
    /// single node at degree 0 is inserted in between. Otherwise the old arm is
    /// dropped and the new one only holds an empty node.
    pub fn set_next_var(&mut self, dis: usize) {
        if dis == 0 {
            return;
        }

        let node = *self.node();
        let (dis_next_deg, old) = match node {
            JanetNode::Internal {
                dis_next_deg,
                next_var,
            } => (dis_next_deg, next_var),
            JanetNode::Leaf { .. } => panic!("Cannot set the next variable of a leaf"),
        };

        let first = match old {
            Some((old_dis, old_arm)) if dis < old_dis => JanetNode::Internal {
                dis_next_deg: 0,
                next_var: Some((old_dis - dis, old_arm)),
            },
            _ => JanetNode::EMPTY,
        };

        let h = self.tree.new_node(first);
        let arm = self.tree.new_arm(vec![h]);
        *self.node_mut() = JanetNode::Internal {
            dis_next_deg,
            next_var: Some((dis, arm)),
        };
    }

    /// Turn the current node into a leaf for `triple`. Everything below the node
    /// is dropped; the next degree is kept.
    pub fn change_to_leaf_node(&mut self, triple: TripleId) {
        let dis_next_deg = self.dis_next_deg();
        *self.node_mut() = JanetNode::Leaf {
            dis_next_deg,
            triple,
        };
    }

    /// Turn the current leaf into an empty internal node and return its triple.
    pub fn change_to_internal_node(&mut self) -> TripleId {
        let triple = self.triple();
        let dis_next_deg = self.dis_next_deg();
        *self.node_mut() = JanetNode::Internal {
            dis_next_deg,
            next_var: None,
        };
        triple
    }

    /// Graft the root arm of `subtree` after the current node.
    ///
    /// `subtree` must start at the current variable and degree with an empty node,
    /// and must end before the current next degree, if there is one.
    pub fn connect_tree_deg(&mut self, subtree: &JanetTree) {
        assert_eq!(
            subtree.begin_var(),
            self.var,
            "Subtree starts at a different variable"
        );
        assert_eq!(
            subtree.begin_deg(),
            self.current_deg(),
            "Subtree starts at a different degree"
        );

        let sub_root = subtree.arm(subtree.root());
        let head = *subtree.node(sub_root[0]);
        assert!(
            head.is_empty() && head.dis_next_deg() > 0 && sub_root.len() > 1,
            "Subtree does not start with an empty node"
        );

        let offset = head.dis_next_deg();
        let mut chain = self.tree.import_arm(subtree, subtree.root());
        chain.remove(0);

        let last = chain[chain.len() - 1];
        let span: u32 = offset
            + chain[..chain.len() - 1]
                .iter()
                .map(|h| self.tree.node(*h).dis_next_deg())
                .sum::<u32>();

        let old = self.dis_next_deg();
        if old != 0 {
            assert!(span < old, "Subtree overlaps the next degree");
            self.tree.node_mut(last).set_dis_next_deg(old - span);
        }
        self.node_mut().set_dis_next_deg(offset);

        let arm = self.arm;
        let pos = self.pos;
        self.tree.arm_mut(arm).splice(pos + 1..pos + 1, chain);
    }
}

#[cfg(test)]
mod tests {
    use crate::janet::tree::{JanetNode, JanetTree};
    use crate::janet::triple::TripleStore;
    use crate::poly::LexOrder;

    use super::JanetIterator;

    fn ids(n: usize) -> Vec<crate::janet::triple::TripleId> {
        use crate::domains::finite_field::Zp;
        use crate::janet::triple::JanetTriple;
        use crate::poly::{polynomial::SparsePolynomial, variables};

        let field = Zp::new(3);
        let x = SparsePolynomial::<_, u16, LexOrder>::new(&field, variables(&["x"])).variable(0);
        let mut store = TripleStore::new();
        (0..n)
            .map(|_| store.insert(JanetTriple::new(x.clone()).unwrap()))
            .collect()
    }

    #[test]
    fn zero_distances_do_nothing() {
        let mut tree = JanetTree::new(3);
        let t = ids(1)[0];
        tree.insert(t, &[1u16, 0, 2]);
        let before = tree.to_string();

        let mut iter = JanetIterator::new(&mut tree);
        iter.set_next_deg(0);
        iter.set_next_var(0);
        assert_eq!(iter.next_var(), 0);
        drop(iter);

        assert_eq!(tree.to_string(), before);
    }

    #[test]
    fn navigation() {
        let mut tree = JanetTree::new(2);
        let t = ids(2);
        tree.insert(t[0], &[2u16, 0]);
        tree.insert(t[1], &[1u16, 3]);

        let mut iter = JanetIterator::new(&tree);
        assert_eq!(iter.current_deg(), 0);
        assert_eq!(iter.prev_deg(), 0);
        assert_eq!(iter.next_deg(), 1);
        assert_eq!(iter.monomial(), &[1, 0]);
        assert_eq!(iter.dis_next_var(), 1);
        assert_eq!(iter.next_var(), 1);
        assert_eq!(iter.current_var(), 1);
        assert_eq!(iter.next_deg(), 3);
        assert!(iter.is_leaf());
        assert_eq!(iter.triple(), t[1]);
        assert_eq!(iter.monomial(), &[1, 3]);
        assert_eq!(iter.prev_deg(), 3);
        assert_eq!(iter.monomial(), &[1, 0]);

        iter.return_to_begin();
        assert_eq!(iter.goto_highest_node(), 2);
        assert_eq!(iter.monomial(), &[2, 0]);
        assert_eq!(iter.try_triple(), Some(t[0]));
    }

    #[test]
    #[should_panic(expected = "Fetching a triple from an internal node")]
    fn triple_of_internal_node() {
        let tree = JanetTree::new(2);
        JanetIterator::new(&tree).triple();
    }

    #[test]
    fn splice_degrees() {
        let mut tree = JanetTree::new(1);
        let mut iter = JanetIterator::new(&mut tree);
        iter.set_next_deg(5);
        iter.set_next_deg(2);
        assert_eq!(iter.dis_next_deg(), 2);
        assert_eq!(iter.next_deg(), 2);
        assert_eq!(iter.next_deg(), 3);
        assert_eq!(iter.current_deg(), 5);
        assert_eq!(iter.next_deg(), 0);

        // a larger distance cuts the arm
        iter.return_to_begin();
        iter.set_next_deg(7);
        assert_eq!(iter.next_deg(), 7);
        assert_eq!(iter.next_deg(), 0);
        drop(iter);

        assert_eq!(tree.arm(tree.root()).len(), 2);
    }

    #[test]
    fn intermediate_variable_arm() {
        // x*z first, then x*y needs an arm for y between x and z
        let mut tree = JanetTree::new(3);
        let t = ids(2);
        tree.insert(t[0], &[1u16, 0, 1]);

        let mut iter = JanetIterator::new(&mut tree);
        iter.next_deg();
        assert_eq!(iter.dis_next_var(), 2);
        iter.set_next_var(1);
        assert_eq!(iter.dis_next_var(), 1);
        iter.next_var();
        assert_eq!(iter.current_var(), 1);
        assert_eq!(iter.dis_next_var(), 1);
        assert_eq!(iter.dis_next_deg(), 0);
        assert!(matches!(iter.node(), JanetNode::Internal { next_var: Some((1, _)), .. }));
        drop(iter);

        tree.insert(t[1], &[1u16, 1, 0]);
        assert_eq!(tree.find(&[1u16, 0, 1]), Some(t[0]));
        assert_eq!(tree.find(&[1u16, 1, 0]), Some(t[1]));
    }

    #[test]
    fn leaf_conversion() {
        let mut tree = JanetTree::new(2);
        let t = ids(2);
        tree.insert(t[0], &[1u16, 0]);

        let mut iter = JanetIterator::new(&mut tree);
        iter.next_deg();
        assert_eq!(iter.change_to_internal_node(), t[0]);
        assert!(iter.node().is_empty());
        iter.change_to_leaf_node(t[1]);
        assert_eq!(iter.triple(), t[1]);
        drop(iter);

        assert_eq!(tree.find(&[1u16, 0]), Some(t[1]));
    }
}
