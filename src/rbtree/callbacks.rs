/// The per-map callback table: how tags are ordered and what happens to tags
/// and values the map lets go of.

use std::cmp::Ordering;
use std::fmt;

use super::node::Entry;

enum Comparator<K> {
    Natural(fn(&K, &K) -> Ordering),
    Custom(Box<dyn Fn(&K, &K) -> Ordering>),
}

/// Comparator plus release hooks for one map.
///
/// Every hook is optional. Without a release hook a tag or value is simply
/// dropped when the map releases it. Hooks run when the map itself disposes
/// of an entry: on erase, on value replacement, on `clear` and on drop.
/// Entries handed back to the caller (`remove`, `into_iter`) skip them.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use rbmap::{Callbacks, RBTree};
///
/// let released = Rc::new(Cell::new(0));
/// let counter = released.clone();
/// let cb = Callbacks::new().on_release_value(move |_: i32| counter.set(counter.get() + 1));
///
/// let mut map = RBTree::with_callbacks(cb);
/// map.insert("a", 1);
/// map.insert("a", 2);
/// assert_eq!(released.get(), 1);
/// ```
pub struct Callbacks<K, V> {
    compare: Comparator<K>,
    release_tag: Option<Box<dyn FnMut(K)>>,
    release_value: Option<Box<dyn FnMut(V)>>,
}

impl<K: Ord, V> Callbacks<K, V> {
    /// Natural `Ord` ordering, no release hooks
    pub fn new() -> Self {
        Callbacks {
            compare: Comparator::Natural(K::cmp),
            release_tag: None,
            release_value: None,
        }
    }
}

impl<K: Ord, V> Default for Callbacks<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Callbacks<K, V> {
    /// Order tags with `compare`, which must be a total order
    pub fn with_comparator<F>(compare: F) -> Self
        where F: Fn(&K, &K) -> Ordering + 'static
    {
        Callbacks {
            compare: Comparator::Custom(Box::new(compare)),
            release_tag: None,
            release_value: None,
        }
    }

    pub fn on_release_tag<F>(mut self, release: F) -> Self
        where F: FnMut(K) + 'static
    {
        self.release_tag = Some(Box::new(release));
        self
    }

    pub fn on_release_value<F>(mut self, release: F) -> Self
        where F: FnMut(V) + 'static
    {
        self.release_value = Some(Box::new(release));
        self
    }

    pub(crate) fn compare(&self, a: &K, b: &K) -> Ordering {
        match self.compare {
            Comparator::Natural(f) => f(a, b),
            Comparator::Custom(ref f) => f(a, b),
        }
    }

    pub(crate) fn release_tag(&mut self, tag: K) {
        match self.release_tag {
            Some(ref mut f) => f(tag),
            None => drop(tag),
        }
    }

    pub(crate) fn release_value(&mut self, value: V) {
        match self.release_value {
            Some(ref mut f) => f(value),
            None => drop(value),
        }
    }

    pub(crate) fn release(&mut self, entry: Entry<K, V>) {
        self.release_tag(entry.tag);
        self.release_value(entry.value);
    }
}

impl<K, V> fmt::Debug for Callbacks<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let compare = match self.compare {
            Comparator::Natural(_) => "natural",
            Comparator::Custom(_) => "custom",
        };
        f.debug_struct("Callbacks")
            .field("compare", &compare)
            .field("release_tag", &self.release_tag.is_some())
            .field("release_value", &self.release_value.is_some())
            .finish()
    }
}
