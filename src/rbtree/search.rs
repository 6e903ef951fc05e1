/// Comparator driven descent from the root.

use std::cmp::Ordering;
use std::cmp::Ordering::*;

use super::callbacks::Callbacks;
use super::node::{NodeId, Tree};

impl<K, V> Tree<K, V> {
    /// Exact match, or the node a new `tag` would hang from together with how
    /// `tag` compares to it. `None` only for an empty tree.
    pub fn find_closest(&self, cb: &Callbacks<K, V>, tag: &K) -> Option<(NodeId, Ordering)> {
        let mut curr = self.root?;
        loop {
            let ord = cb.compare(tag, self.tag(curr));
            let next = match ord {
                Equal => None,
                Less => self.left(curr),
                Greater => self.right(curr),
            };
            match next {
                Some(n) => curr = n,
                None => return Some((curr, ord)),
            }
        }
    }

    pub fn find_match(&self, cb: &Callbacks<K, V>, tag: &K) -> Option<NodeId> {
        let mut curr = self.root;
        while let Some(n) = curr {
            match cb.compare(tag, self.tag(n)) {
                Equal => return Some(n),
                Less => curr = self.left(n),
                Greater => curr = self.right(n),
            }
        }
        None
    }
}
