/// Deletion: unhook a node with at most one child, then repair the black
/// height on the side it was removed from.

use super::node::Color::*;
use super::node::{Entry, NodeId, Side, Tree};

impl<K, V> Tree<K, V> {
    /// Remove `target` from the tree and free its slot, returning its entry.
    pub fn remove_node(&mut self, target: NodeId) -> Entry<K, V> {
        if let (Some(left), Some(_)) = (self.left(target), self.right(target)) {
            // trade places with the in-order predecessor, which has no right
            // child; nodes keep their entries so in-order order is preserved
            let pred = self.rightmost(left);
            self.swap_node_pos(target, pred);
            self.swap_node_color(target, pred);
        }

        let child = match self.left(target) {
            Some(_) => self.unlink_left(target),
            None => self.unlink_right(target),
        };
        let parent = self.parent(target);
        let side = self.side_of(target);
        self.move_parent(target, child);

        if self.color(target) == Black {
            if self.is_red(child) {
                if let Some(c) = child {
                    self.set_color(c, Black);
                }
            } else if let (Some(p), Some(s)) = (parent, side) {
                self.remove_fixup(p, s);
            }
        }

        match self.dealloc(target) {
            Some(entry) => entry,
            None => panic!("removed placeholder {:?}", target),
        }
    }

    /// The subtree on `side` of `parent` is one black short
    fn remove_fixup(&mut self, mut parent: NodeId, mut side: Side) {
        loop {
            let mut sibling = match self.child(parent, side.opposite()) {
                Some(s) => s,
                None => return,
            };

            if self.color(sibling) == Red {
                trace!("remove fixup: red sibling {:?}", sibling);
                self.set_color(sibling, Black);
                self.set_color(parent, Red);
                self.rotate(parent, side);
                sibling = match self.child(parent, side.opposite()) {
                    Some(s) => s,
                    None => return,
                };
            }

            let near = self.child(sibling, side);
            let far = self.child(sibling, side.opposite());

            if !self.is_red(near) && !self.is_red(far) {
                self.set_color(sibling, Red);
                if self.color(parent) == Red {
                    trace!("remove fixup: absorbed by red parent {:?}", parent);
                    self.set_color(parent, Black);
                    return;
                }
                // parent's whole subtree is now short, move up
                match (self.parent(parent), self.side_of(parent)) {
                    (Some(g), Some(s)) => {
                        trace!("remove fixup: deficiency moves up to {:?}", g);
                        parent = g;
                        side = s;
                        continue;
                    }
                    _ => return,
                }
            }

            if !self.is_red(far) {
                if let Some(n) = near {
                    trace!("remove fixup: near nephew rotation at {:?}", sibling);
                    self.set_color(n, Black);
                    self.set_color(sibling, Red);
                    self.rotate(sibling, side.opposite());
                    sibling = n;
                }
            }

            trace!("remove fixup: terminal rotation at {:?}", parent);
            let parent_color = self.color(parent);
            self.set_color(sibling, parent_color);
            self.set_color(parent, Black);
            if let Some(f) = self.child(sibling, side.opposite()) {
                self.set_color(f, Black);
            }
            self.rotate(parent, side);
            return;
        }
    }
}
