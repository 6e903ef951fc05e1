/// Insertion: attach a red leaf, then restore the colour invariants bottom-up.

use std::cmp::Ordering::*;
use std::mem;

use super::callbacks::Callbacks;
use super::node::Color::*;
use super::node::{Entry, NodeId, Tree};

impl<K, V> Tree<K, V> {
    /// Insert or overwrite. Returns the node now holding `tag` and whether it
    /// is new. An overwrite releases the previous tag and value and leaves the
    /// shape and colours alone.
    pub fn insert(&mut self, cb: &mut Callbacks<K, V>, tag: K, value: V) -> (NodeId, bool) {
        let closest = self.find_closest(cb, &tag);
        let id = match closest {
            Some((found, Equal)) => {
                let entry = self.entry_mut(found);
                let old_tag = mem::replace(&mut entry.tag, tag);
                let old_value = mem::replace(&mut entry.value, value);
                cb.release_tag(old_tag);
                cb.release_value(old_value);
                return (found, false);
            }
            Some((parent, Less)) => {
                let id = self.alloc(Some(Entry { tag: tag, value: value }), Red);
                self.link_left(parent, id);
                id
            }
            Some((parent, Greater)) => {
                let id = self.alloc(Some(Entry { tag: tag, value: value }), Red);
                self.link_right(parent, id);
                id
            }
            None => {
                let id = self.alloc(Some(Entry { tag: tag, value: value }), Red);
                self.root = Some(id);
                id
            }
        };
        self.insert_fixup(id);
        (id, true)
    }

    fn insert_fixup(&mut self, mut node: NodeId) {
        loop {
            let parent = match self.parent(node) {
                Some(p) => p,
                None => {
                    // reached the root
                    self.set_color(node, Black);
                    return;
                }
            };
            if self.color(parent) == Black {
                return;
            }
            let (grand, side) = match (self.parent(parent), self.side_of(parent)) {
                (Some(g), Some(s)) => (g, s),
                _ => {
                    // red root, just paint it
                    self.set_color(parent, Black);
                    return;
                }
            };
            let uncle = self.child(grand, side.opposite());
            if let Some(u) = uncle.filter(|&u| self.color(u) == Red) {
                trace!("insert fixup: recolor at {:?}", grand);
                self.set_color(parent, Black);
                self.set_color(u, Black);
                self.set_color(grand, Red);
                node = grand;
                continue;
            }

            // black uncle: straighten a zig-zag, then rotate the grandparent
            let mut top = parent;
            if self.child(parent, side.opposite()) == Some(node) {
                trace!("insert fixup: inner rotation at {:?}", parent);
                self.rotate(parent, side);
                top = node;
            }
            trace!("insert fixup: rotation at {:?}", grand);
            self.rotate(grand, side.opposite());
            self.set_color(top, Black);
            self.set_color(grand, Red);
            return;
        }
    }
}
