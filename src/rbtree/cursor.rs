/// Cursors over a map and the detached `Position` handle.
///
/// A cursor rests either on an entry or on nothing ("unavailable", past
/// either end). Stepping off an end makes it unavailable; stepping from
/// unavailable does nothing and reports `false`.

use super::node::NodeId;
use super::{MapId, RBTree};

/// Copyable handle to an entry of a specific map. Stays valid until that
/// entry is erased or moved out with `move_from`, whatever else happens to
/// the map. After that it reports `StalePosition` in its own map and
/// `ForeignPosition` anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) map: MapId,
    pub(crate) node: NodeId,
    pub(crate) stamp: u64,
}

fn position_of<K, V>(map: &RBTree<K, V>, node: Option<NodeId>) -> Option<Position> {
    node.map(|id| Position {
        map: map.id,
        node: id,
        stamp: map.tree.node(id).stamp,
    })
}

/// Read-only cursor
pub struct Cursor<'a, K: 'a, V: 'a> {
    map: &'a RBTree<K, V>,
    node: Option<NodeId>,
}

impl<'a, K, V> Clone for Cursor<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for Cursor<'a, K, V> {}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(map: &'a RBTree<K, V>, node: Option<NodeId>) -> Self {
        Cursor { map: map, node: node }
    }

    pub fn is_available(&self) -> bool {
        self.node.is_some()
    }

    pub fn tag(&self) -> Option<&'a K> {
        let tree = &self.map.tree;
        self.node.map(|id| tree.tag(id))
    }

    pub fn value(&self) -> Option<&'a V> {
        let tree = &self.map.tree;
        self.node.map(|id| &tree.entry(id).value)
    }

    pub fn entry(&self) -> Option<(&'a K, &'a V)> {
        let tree = &self.map.tree;
        self.node.map(|id| {
            let e = tree.entry(id);
            (&e.tag, &e.value)
        })
    }

    pub fn move_next(&mut self) -> bool {
        match self.node {
            Some(id) => {
                self.node = self.map.tree.successor(id);
                self.node.is_some()
            }
            None => false,
        }
    }

    pub fn move_prev(&mut self) -> bool {
        match self.node {
            Some(id) => {
                self.node = self.map.tree.predecessor(id);
                self.node.is_some()
            }
            None => false,
        }
    }

    pub fn position(&self) -> Option<Position> {
        position_of(self.map, self.node)
    }
}

/// Cursor that can overwrite or erase the entry it rests on
pub struct CursorMut<'a, K: 'a, V: 'a> {
    map: &'a mut RBTree<K, V>,
    node: Option<NodeId>,
}

impl<'a, K, V> CursorMut<'a, K, V> {
    pub(crate) fn new(map: &'a mut RBTree<K, V>, node: Option<NodeId>) -> Self {
        CursorMut { map: map, node: node }
    }

    pub fn is_available(&self) -> bool {
        self.node.is_some()
    }

    pub fn tag(&self) -> Option<&K> {
        let tree = &self.map.tree;
        self.node.map(|id| tree.tag(id))
    }

    pub fn value(&self) -> Option<&V> {
        let tree = &self.map.tree;
        self.node.map(|id| &tree.entry(id).value)
    }

    pub fn value_mut(&mut self) -> Option<&mut V> {
        match self.node {
            Some(id) => Some(&mut self.map.tree.entry_mut(id).value),
            None => None,
        }
    }

    /// Replace the value under the cursor, releasing the old one through the
    /// map's callbacks. Panics if the cursor is unavailable.
    pub fn set_value(&mut self, value: V) {
        let id = match self.node {
            Some(id) => id,
            None => panic!("set_value through an unavailable cursor"),
        };
        let old = ::std::mem::replace(&mut self.map.tree.entry_mut(id).value, value);
        self.map.callbacks.release_value(old);
    }

    pub fn move_next(&mut self) -> bool {
        match self.node {
            Some(id) => {
                self.node = self.map.tree.successor(id);
                self.node.is_some()
            }
            None => false,
        }
    }

    pub fn move_prev(&mut self) -> bool {
        match self.node {
            Some(id) => {
                self.node = self.map.tree.predecessor(id);
                self.node.is_some()
            }
            None => false,
        }
    }

    /// Erase the entry under the cursor and move to its successor. Returns
    /// `false` without doing anything if the cursor is unavailable.
    pub fn erase(&mut self) -> bool {
        let id = match self.node {
            Some(id) => id,
            None => return false,
        };
        // the successor keeps its node through the removal
        self.node = self.map.tree.successor(id);
        self.map.erase_node(id);
        true
    }

    pub fn position(&self) -> Option<Position> {
        position_of(&*self.map, self.node)
    }

    /// Read-only view at the same spot
    pub fn as_cursor(&self) -> Cursor<K, V> {
        Cursor::new(&*self.map, self.node)
    }
}
