/// Node arena and the structural primitives the engines are built on.
///
/// Nodes live in a slot vector and refer to each other by `NodeId`. A child is
/// owned by the slot of its parent; the `parent` index is only a back
/// reference used for traversal and rotation. Freed slots go on a free list
/// and are reused by later allocations.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use self::Color::*;

/// Shared by every arena: `move_from` hands arenas between maps, so a stamp
/// must never repeat across them.
static NEXT_STAMP: AtomicU64 = AtomicU64::new(1);

/// Index of a node inside its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Color {
    Black,
    Red,
}

/// Which child slot of a node. Rotations and fix-ups are written once and
/// mirrored through `opposite()`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

pub struct Entry<K, V> {
    pub tag: K,
    pub value: V,
}

pub struct Node<K, V> {
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub color: Color,
    /// Unique per allocation across all arenas, lets a `Position` detect a
    /// reused slot.
    pub stamp: u64,
    /// `None` only for the placeholder used by `swap_node_pos`.
    pub entry: Option<Entry<K, V>>,
}

pub struct Tree<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    pub root: Option<NodeId>,
}

impl<K, V> Tree<K, V> {
    pub fn new() -> Self {
        Tree {
            slots: vec![],
            free: vec![],
            root: None,
        }
    }

    /// Node lookup that tolerates vacant or out of range ids
    pub fn get(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.slots.get(id.0).and_then(|s| s.as_ref())
    }

    pub fn node(&self, id: NodeId) -> &Node<K, V> {
        match self.slots[id.0] {
            Some(ref n) => n,
            None => panic!("dangling node id {:?}", id),
        }
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match self.slots[id.0] {
            Some(ref mut n) => n,
            None => panic!("dangling node id {:?}", id),
        }
    }

    pub fn entry(&self, id: NodeId) -> &Entry<K, V> {
        match self.node(id).entry {
            Some(ref e) => e,
            None => panic!("placeholder {:?} reached from the tree", id),
        }
    }

    pub fn entry_mut(&mut self, id: NodeId) -> &mut Entry<K, V> {
        match self.node_mut(id).entry {
            Some(ref mut e) => e,
            None => panic!("placeholder {:?} reached from the tree", id),
        }
    }

    pub fn tag(&self, id: NodeId) -> &K {
        &self.entry(id).tag
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right
    }

    pub fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left(id),
            Side::Right => self.right(id),
        }
    }

    /// Side of its parent `id` hangs on, `None` for the root or an isolated node
    pub fn side_of(&self, id: NodeId) -> Option<Side> {
        self.parent(id).map(|p| {
            if self.left(p) == Some(id) {
                Side::Left
            } else {
                Side::Right
            }
        })
    }

    pub fn color(&self, id: NodeId) -> Color {
        self.node(id).color
    }

    pub fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    /// Absent nodes count as black
    pub fn is_red(&self, id: Option<NodeId>) -> bool {
        match id {
            Some(id) => self.color(id) == Red,
            None => false,
        }
    }

    pub fn is_isolated(&self, id: NodeId) -> bool {
        let n = self.node(id);
        n.parent.is_none() && n.left.is_none() && n.right.is_none()
    }

    // ----- allocation -----------------------------------------------------

    pub fn alloc(&mut self, entry: Option<Entry<K, V>>, color: Color) -> NodeId {
        let stamp = NEXT_STAMP.fetch_add(1, Ordering::Relaxed);
        let node = Node {
            parent: None,
            left: None,
            right: None,
            color: color,
            stamp: stamp,
            entry: entry,
        };
        match self.free.pop() {
            Some(i) => {
                self.slots[i] = Some(node);
                NodeId(i)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Free an isolated node, handing back its entry
    pub fn dealloc(&mut self, id: NodeId) -> Option<Entry<K, V>> {
        debug_assert!(self.is_isolated(id), "freeing linked node {:?}", id);
        let node = self.slots[id.0].take();
        self.free.push(id.0);
        node.and_then(|n| n.entry)
    }

    /// Drop every slot without walking the tree. Only valid once all
    /// entries have been taken out.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.root = None;
    }

    /// Take the entry out of a slot, leaving its links in place
    pub fn take_entry(&mut self, id: NodeId) -> Option<Entry<K, V>> {
        self.node_mut(id).entry.take()
    }

    // ----- linkage --------------------------------------------------------

    pub fn link_left(&mut self, parent: NodeId, child: NodeId) {
        assert!(self.left(parent).is_none(), "left slot of {:?} is taken", parent);
        assert!(self.parent(child).is_none(), "{:?} already has a parent", child);
        self.node_mut(parent).left = Some(child);
        self.node_mut(child).parent = Some(parent);
    }

    pub fn link_right(&mut self, parent: NodeId, child: NodeId) {
        assert!(self.right(parent).is_none(), "right slot of {:?} is taken", parent);
        assert!(self.parent(child).is_none(), "{:?} already has a parent", child);
        self.node_mut(parent).right = Some(child);
        self.node_mut(child).parent = Some(parent);
    }

    pub fn unlink_left(&mut self, parent: NodeId) -> Option<NodeId> {
        let child = self.node_mut(parent).left.take();
        if let Some(c) = child {
            self.node_mut(c).parent = None;
        }
        child
    }

    pub fn unlink_right(&mut self, parent: NodeId) -> Option<NodeId> {
        let child = self.node_mut(parent).right.take();
        if let Some(c) = child {
            self.node_mut(c).parent = None;
        }
        child
    }

    /// Make whatever pointed at `from` (its parent's slot, or the root) point
    /// at `to` instead. `from` is left without a parent; `to` must not have
    /// one.
    pub fn move_parent(&mut self, from: NodeId, to: Option<NodeId>) {
        let parent = self.parent(from);
        if let Some(t) = to {
            debug_assert!(self.parent(t).is_none(), "{:?} already has a parent", t);
            self.node_mut(t).parent = parent;
        }
        match parent {
            None => self.root = to,
            Some(p) => {
                let pn = self.node_mut(p);
                if pn.left == Some(from) {
                    pn.left = to;
                } else {
                    debug_assert_eq!(pn.right, Some(from));
                    pn.right = to;
                }
            }
        }
        self.node_mut(from).parent = None;
    }

    /// Rotate left around `node`: its right child takes its place
    pub fn rotate_left(&mut self, node: NodeId) {
        let pivot = match self.unlink_right(node) {
            Some(p) => p,
            None => panic!("rotate_left on {:?} without a right child", node),
        };
        let inner = self.unlink_left(pivot);
        self.move_parent(node, Some(pivot));
        if let Some(i) = inner {
            self.link_right(node, i);
        }
        self.link_left(pivot, node);
    }

    /// Rotate right around `node`: its left child takes its place
    pub fn rotate_right(&mut self, node: NodeId) {
        let pivot = match self.unlink_left(node) {
            Some(p) => p,
            None => panic!("rotate_right on {:?} without a left child", node),
        };
        let inner = self.unlink_right(pivot);
        self.move_parent(node, Some(pivot));
        if let Some(i) = inner {
            self.link_left(node, i);
        }
        self.link_right(pivot, node);
    }

    /// Rotate `node` down towards `side`
    pub fn rotate(&mut self, node: NodeId, side: Side) {
        match side {
            Side::Left => self.rotate_left(node),
            Side::Right => self.rotate_right(node),
        }
    }

    /// Put the isolated `new` where `old` is, leaving `old` isolated
    pub fn replace_node(&mut self, old: NodeId, new: NodeId) {
        debug_assert!(self.is_isolated(new), "replacement {:?} is linked", new);
        if let Some(l) = self.unlink_left(old) {
            self.link_left(new, l);
        }
        if let Some(r) = self.unlink_right(old) {
            self.link_right(new, r);
        }
        self.move_parent(old, Some(new));
    }

    /// Exchange the tree positions of two nodes. Works for adjacent nodes
    /// too since every step goes through an isolated placeholder.
    pub fn swap_node_pos(&mut self, a: NodeId, b: NodeId) {
        let tmp = self.alloc(None, Black);
        self.replace_node(a, tmp);
        self.replace_node(b, a);
        self.replace_node(tmp, b);
        self.dealloc(tmp);
    }

    pub fn swap_node_color(&mut self, a: NodeId, b: NodeId) {
        let ca = self.color(a);
        let cb = self.color(b);
        self.set_color(a, cb);
        self.set_color(b, ca);
    }
}

impl<K, V> fmt::Debug for Tree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("slots", &self.slots.len())
            .field("free", &self.free.len())
            .finish()
    }
}
