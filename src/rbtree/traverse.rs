/// In-order and post-order walks driven by the node links alone.

use super::node::{Entry, NodeId, Tree};

impl<K, V> Tree<K, V> {
    pub fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(l) = self.left(id) {
            id = l;
        }
        id
    }

    pub fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(r) = self.right(id) {
            id = r;
        }
        id
    }

    pub fn first(&self) -> Option<NodeId> {
        self.root.map(|r| self.leftmost(r))
    }

    pub fn last(&self) -> Option<NodeId> {
        self.root.map(|r| self.rightmost(r))
    }

    /// In-order successor: leftmost of the right subtree, otherwise the first
    /// ancestor we reach from its left side
    pub fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(r) = self.right(id) {
            return Some(self.leftmost(r));
        }
        let mut curr = id;
        while let Some(p) = self.parent(curr) {
            if self.left(p) == Some(curr) {
                return Some(p);
            }
            curr = p;
        }
        None
    }

    pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(l) = self.left(id) {
            return Some(self.rightmost(l));
        }
        let mut curr = id;
        while let Some(p) = self.parent(curr) {
            if self.right(p) == Some(curr) {
                return Some(p);
            }
            curr = p;
        }
        None
    }

    /// Deepest node reached by going left when possible, right otherwise
    fn first_leaf(&self, mut id: NodeId) -> NodeId {
        loop {
            match (self.left(id), self.right(id)) {
                (Some(l), _) => id = l,
                (None, Some(r)) => id = r,
                (None, None) => return id,
            }
        }
    }

    pub fn first_post_order(&self) -> Option<NodeId> {
        self.root.map(|r| self.first_leaf(r))
    }

    pub fn next_post_order(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        match self.right(parent) {
            Some(r) if self.left(parent) == Some(id) => Some(self.first_leaf(r)),
            _ => Some(parent),
        }
    }

    /// Tear the whole tree down children first, handing every entry to
    /// `release`. Returns how many entries were released.
    pub fn drain_post_order<F>(&mut self, mut release: F) -> usize
        where F: FnMut(Entry<K, V>)
    {
        let mut released = 0;
        let mut curr = self.root;
        while let Some(id) = curr {
            let (left, right, parent) = {
                let n = self.node(id);
                (n.left, n.right, n.parent)
            };
            // descend until we sit on a leaf
            if let Some(l) = left {
                curr = Some(l);
                continue;
            }
            if let Some(r) = right {
                curr = Some(r);
                continue;
            }
            if let Some(p) = parent {
                if self.left(p) == Some(id) {
                    self.unlink_left(p);
                } else {
                    self.unlink_right(p);
                }
            }
            if let Some(entry) = self.take_entry(id) {
                release(entry);
                released += 1;
            }
            curr = parent;
        }
        self.reset();
        released
    }
}
