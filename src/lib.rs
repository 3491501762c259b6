//! A word-frequency counter implemented with an AVL tree.
//!
//! [`WordTree`] keeps every distinct word once, ordered lexicographically, together with
//! the number of times it was inserted. Insert, remove and lookup run in `O(log n)`;
//! aggregate queries (total count, most frequent word, singletons) walk all words.
//!
//! ```
//! use wordtree::WordTree;
//! let mut tree = WordTree::new();
//! for word in "a rose is a rose is a rose".split_whitespace() {
//!     tree.insert(word);
//! }
//! assert_eq!(tree.most_frequent().unwrap(), ("a", 3));
//! assert!(tree.remove("is"));
//! assert!(!tree.contains("is"));
//!
//! for (word, count) in &tree {
//!     println!("{word} => {count}");
//! }
//! ```

pub mod error;
mod ingest;
pub mod iter;
pub mod stats;
mod tree;

pub use error::{Error, Result};
pub use iter::Iter;
pub use stats::{Listing, Statistics};
pub use tree::WordTree;
