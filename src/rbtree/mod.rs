/// An ordered map on a classic (not left-leaning) Red-Black Tree.
///
/// Nodes keep a parent link so in-order stepping needs no stack, and they
/// live in an arena indexed by `NodeId` so the parent links are plain
/// indices. Both rebalancing passes are loops.
///
/// Invariants, checked by `RBTree::check`:
///
/// - The root is black and a missing child counts as black
///
/// - A red node never has a red child
///
/// - Every path from a node down to a missing child crosses the same number
///   of black nodes
///
/// - Tags are unique and increase in order under the map's comparator


mod callbacks;
mod check;
mod cursor;
mod error;
mod insert;
mod iter;
mod node;
mod remove;
mod search;
mod traverse;

use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicUsize, Ordering};

pub use self::callbacks::Callbacks;
pub use self::check::Violation;
pub use self::cursor::{Cursor, CursorMut, Position};
pub use self::error::Error;
pub use self::iter::{IntoIter, Iter, Keys, Values};

use self::node::{NodeId, Tree};

static NEXT_MAP_ID: AtomicUsize = AtomicUsize::new(1);

/// Identity of a map instance, carried by every `Position` it hands out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct MapId(usize);

impl MapId {
    fn next() -> MapId {
        MapId(NEXT_MAP_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Red-Black Tree map
pub struct RBTree<K, V> {
    id: MapId,
    len: usize,
    tree: Tree<K, V>,
    callbacks: Callbacks<K, V>,
}

impl<K: Ord, V> RBTree<K, V> {
    pub fn new() -> Self {
        Self::with_callbacks(Callbacks::new())
    }
}

impl<K, V> RBTree<K, V> {
    /// Empty map ordered and released through `callbacks`
    pub fn with_callbacks(callbacks: Callbacks<K, V>) -> Self {
        RBTree {
            id: MapId::next(),
            len: 0,
            tree: Tree::new(),
            callbacks: callbacks,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn callbacks(&self) -> &Callbacks<K, V> {
        &self.callbacks
    }

    /// Insert `value` under `tag`. If the tag is already present the stored
    /// tag and value are released and replaced in place; returns `true` only
    /// when a new entry was created.
    pub fn insert(&mut self, tag: K, value: V) -> bool {
        let (_, inserted) = self.tree.insert(&mut self.callbacks, tag, value);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    pub fn get(&self, tag: &K) -> Option<&V> {
        self.tree
            .find_match(&self.callbacks, tag)
            .map(|id| &self.tree.entry(id).value)
    }

    pub fn get_mut(&mut self, tag: &K) -> Option<&mut V> {
        match self.tree.find_match(&self.callbacks, tag) {
            Some(id) => Some(&mut self.tree.entry_mut(id).value),
            None => None,
        }
    }

    pub fn get_key_value(&self, tag: &K) -> Option<(&K, &V)> {
        self.tree.find_match(&self.callbacks, tag).map(|id| {
            let e = self.tree.entry(id);
            (&e.tag, &e.value)
        })
    }

    pub fn contains_key(&self, tag: &K) -> bool {
        self.tree.find_match(&self.callbacks, tag).is_some()
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.front().entry()
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.back().entry()
    }

    // ----- cursors ----------------------------------------------------------

    /// Cursor on `tag`, unavailable if it is not present
    pub fn find(&self, tag: &K) -> Cursor<K, V> {
        let node = self.tree.find_match(&self.callbacks, tag);
        Cursor::new(self, node)
    }

    pub fn find_mut(&mut self, tag: &K) -> CursorMut<K, V> {
        let node = self.tree.find_match(&self.callbacks, tag);
        CursorMut::new(self, node)
    }

    /// Cursor on the smallest tag
    pub fn front(&self) -> Cursor<K, V> {
        Cursor::new(self, self.tree.first())
    }

    /// Cursor on the greatest tag
    pub fn back(&self) -> Cursor<K, V> {
        Cursor::new(self, self.tree.last())
    }

    pub fn front_mut(&mut self) -> CursorMut<K, V> {
        let node = self.tree.first();
        CursorMut::new(self, node)
    }

    pub fn back_mut(&mut self) -> CursorMut<K, V> {
        let node = self.tree.last();
        CursorMut::new(self, node)
    }

    pub fn cursor_at(&self, pos: Position) -> Result<Cursor<K, V>, Error> {
        let node = self.resolve(pos)?;
        Ok(Cursor::new(self, Some(node)))
    }

    pub fn cursor_mut_at(&mut self, pos: Position) -> Result<CursorMut<K, V>, Error> {
        let node = self.resolve(pos)?;
        Ok(CursorMut::new(self, Some(node)))
    }

    fn resolve(&self, pos: Position) -> Result<NodeId, Error> {
        if pos.map != self.id {
            return Err(Error::ForeignPosition);
        }
        match self.tree.get(pos.node) {
            Some(n) if n.stamp == pos.stamp && n.entry.is_some() => Ok(pos.node),
            _ => Err(Error::StalePosition),
        }
    }

    // ----- removal ----------------------------------------------------------

    /// Erase the entry at `pos`, releasing its tag and value. A position whose
    /// entry is already gone is ignored and yields `false`.
    ///
    /// Panics if `pos` belongs to another map.
    pub fn erase(&mut self, pos: Position) -> bool {
        match self.try_erase(pos) {
            Ok(()) => true,
            Err(Error::StalePosition) => false,
            Err(e) => panic!("erase: {}", e),
        }
    }

    pub fn try_erase(&mut self, pos: Position) -> Result<(), Error> {
        let node = self.resolve(pos)?;
        self.erase_node(node);
        Ok(())
    }

    /// Erase `tag` if present, releasing its tag and value
    pub fn erase_tag(&mut self, tag: &K) -> bool {
        match self.tree.find_match(&self.callbacks, tag) {
            Some(id) => {
                self.erase_node(id);
                true
            }
            None => false,
        }
    }

    /// Take `tag`'s entry out of the map. Ownership goes to the caller, no
    /// release callback runs.
    pub fn remove_entry(&mut self, tag: &K) -> Option<(K, V)> {
        let id = self.tree.find_match(&self.callbacks, tag)?;
        let entry = self.tree.remove_node(id);
        self.len -= 1;
        Some((entry.tag, entry.value))
    }

    /// Take `tag`'s value out of the map. The stored tag is released.
    pub fn remove(&mut self, tag: &K) -> Option<V> {
        let (stored, value) = self.remove_entry(tag)?;
        self.callbacks.release_tag(stored);
        Some(value)
    }

    pub(crate) fn erase_node(&mut self, id: NodeId) {
        let entry = self.tree.remove_node(id);
        self.len -= 1;
        self.callbacks.release(entry);
    }

    /// Release every entry, children before parents. The callbacks stay.
    pub fn clear(&mut self) {
        if self.tree.root.is_none() {
            return;
        }
        let callbacks = &mut self.callbacks;
        let released = self.tree.drain_post_order(|e| callbacks.release(e));
        debug!("cleared map {:?}: released {} entries", self.id, released);
        self.len = 0;
    }

    /// Move all of `src`'s entries and its callbacks into this empty map.
    /// `src` is left empty, holding this map's former callbacks. Positions
    /// taken from `src` do not carry over.
    ///
    /// Panics if this map is not empty.
    pub fn move_from(&mut self, src: &mut RBTree<K, V>) {
        assert!(self.is_empty(), "move_from into a non-empty map");
        mem::swap(&mut self.tree, &mut src.tree);
        mem::swap(&mut self.callbacks, &mut src.callbacks);
        self.len = mem::replace(&mut src.len, 0);
        debug!("moved {} entries from map {:?} to {:?}", self.len, src.id, self.id);
    }

    // ----- iteration --------------------------------------------------------

    pub fn iter(&self) -> Iter<K, V> {
        Iter::new(&self.tree, self.len)
    }

    pub fn keys(&self) -> Keys<K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<K, V> {
        Values { inner: self.iter() }
    }
}

impl<K, V> Drop for RBTree<K, V> {
    fn drop(&mut self) {
        if self.len > 0 {
            debug!("dropping map {:?} with {} entries", self.id, self.len);
        }
        self.clear();
    }
}

impl<K: Ord, V> Default for RBTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RBTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Extend<(K, V)> for RBTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RBTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = RBTree::new();
        map.extend(iter);
        map
    }
}

impl<K, V> IntoIterator for RBTree<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> IntoIter<K, V> {
        let tree = mem::replace(&mut self.tree, Tree::new());
        let len = mem::replace(&mut self.len, 0);
        IntoIter::new(tree, len)
    }
}

impl<'a, K, V> IntoIterator for &'a RBTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
