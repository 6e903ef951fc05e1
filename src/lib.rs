//! Ordered map on a Red-Black Tree with parent links, cursors and per-map
//! comparator and release callbacks.
//!
//! ```
//! use rbmap::RBTree;
//!
//! let mut map = RBTree::new();
//! for &n in [5, 1, 4, 2, 3].iter() {
//!     map.insert(n, n * 10);
//! }
//! assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
//!
//! let mut cursor = map.find(&3);
//! assert!(cursor.move_next());
//! assert_eq!(cursor.entry(), Some((&4, &40)));
//! ```

#[macro_use]
extern crate log;

pub mod rbtree;

pub use rbtree::{Callbacks, Cursor, CursorMut, Error, IntoIter, Iter, Keys, Position, RBTree,
                 Values, Violation};
