/// Structural self check used by the tests and available to callers who
/// want to verify a map built with a custom comparator.

use std::cmp::Ordering::Less;
use std::error;
use std::fmt;

use super::node::Color::*;
use super::node::NodeId;
use super::RBTree;

/// A broken tree invariant. Node numbers are arena slot indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    RedRoot,
    RootHasParent,
    RedChildOfRed { node: usize },
    UnevenBlackHeight { node: usize, left: usize, right: usize },
    BrokenParentLink { node: usize },
    MissingEntry { node: usize },
    OutOfOrder { node: usize },
    CountMismatch { tracked: usize, counted: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Violation::RedRoot => write!(f, "root is red"),
            Violation::RootHasParent => write!(f, "root has a parent"),
            Violation::RedChildOfRed { node } => write!(f, "red node {} has a red child", node),
            Violation::UnevenBlackHeight { node, left, right } => {
                write!(f, "node {} has black heights {} (left) and {} (right)", node, left, right)
            }
            Violation::BrokenParentLink { node } => {
                write!(f, "node {} does not point back at its parent", node)
            }
            Violation::MissingEntry { node } => write!(f, "node {} holds no entry", node),
            Violation::OutOfOrder { node } => {
                write!(f, "node {} is not greater than its predecessor", node)
            }
            Violation::CountMismatch { tracked, counted } => {
                write!(f, "map tracks {} entries but holds {}", tracked, counted)
            }
        }
    }
}

impl error::Error for Violation {}

impl<K, V> RBTree<K, V> {
    /// Verify the red-black invariants, parent links, tag order and entry
    /// count. Returns the black height of the root (0 for an empty map).
    pub fn check(&self) -> Result<usize, Violation> {
        let tree = &self.tree;
        let root = match tree.root {
            None => {
                return if self.len == 0 {
                    Ok(0)
                } else {
                    Err(Violation::CountMismatch { tracked: self.len, counted: 0 })
                };
            }
            Some(r) => r,
        };
        if tree.parent(root).is_some() {
            return Err(Violation::RootHasParent);
        }
        if tree.color(root) == Red {
            return Err(Violation::RedRoot);
        }
        let height = self.black_height(root)?;

        // strictly increasing in order
        let mut prev = match tree.first() {
            Some(f) => f,
            None => return Ok(height),
        };
        while let Some(next) = tree.successor(prev) {
            if self.callbacks.compare(tree.tag(prev), tree.tag(next)) != Less {
                return Err(Violation::OutOfOrder { node: next.index() });
            }
            prev = next;
        }

        let mut counted = 0;
        let mut curr = tree.first_post_order();
        while let Some(id) = curr {
            counted += 1;
            curr = tree.next_post_order(id);
        }
        if counted != self.len {
            return Err(Violation::CountMismatch { tracked: self.len, counted: counted });
        }
        Ok(height)
    }

    fn black_height(&self, id: NodeId) -> Result<usize, Violation> {
        let tree = &self.tree;
        let node = tree.node(id);
        if node.entry.is_none() {
            return Err(Violation::MissingEntry { node: id.index() });
        }
        let mut heights = [1, 1];
        for (i, child) in [node.left, node.right].iter().enumerate() {
            if let Some(c) = *child {
                if tree.parent(c) != Some(id) {
                    return Err(Violation::BrokenParentLink { node: c.index() });
                }
                if node.color == Red && tree.color(c) == Red {
                    return Err(Violation::RedChildOfRed { node: id.index() });
                }
                heights[i] = self.black_height(c)?;
            }
        }
        if heights[0] != heights[1] {
            return Err(Violation::UnevenBlackHeight {
                node: id.index(),
                left: heights[0],
                right: heights[1],
            });
        }
        let own = if node.color == Black { 1 } else { 0 };
        Ok(heights[0] + own)
    }
}
