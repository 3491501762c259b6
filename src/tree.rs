use std::cmp::{self, Ordering};
use std::fmt;
use std::mem;
use std::ptr::NonNull;

use tracing::trace;

use crate::error::{Error, Result};
use crate::iter::Iter;

/// A word-frequency counter implemented with an AVL tree.
///
/// Every distinct word is stored once, together with the number of times it has been inserted.
/// Words are ordered lexicographically (byte-wise string comparison).
///
/// ```
/// use wordtree::WordTree;
/// let mut tree = WordTree::new();
/// for word in ["b", "a", "c", "a"] {
///     tree.insert(word);
/// }
/// assert_eq!(tree.distinct_words(), 3);
/// assert_eq!(tree.total_words(), 4);
/// assert_eq!(tree.count("a"), Some(2));
/// ```
pub struct WordTree {
    root: Link,
    num_nodes: usize,
}

pub(crate) struct Node {
    pub(crate) word: String,
    pub(crate) count: usize,
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) parent: Link,
    pub(crate) height: isize,
}

pub(crate) type NodePtr = NonNull<Node>;
pub(crate) type Link = Option<NodePtr>;
type LinkPtr = NonNull<Link>;

enum InsertPos {
    Occupied(NodePtr),
    Vacant(Link, LinkPtr),
}

#[allow(clippy::enum_variant_names)]
enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}

// Nodes are reachable only through the tree and every mutation takes `&mut self`.
unsafe impl Send for WordTree {}
unsafe impl Sync for WordTree {}

impl WordTree {
    /// Creates an empty tree.
    /// No memory is allocated until the first word is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the tree contains no words.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of distinct words.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the number of distinct words.
    pub fn distinct_words(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree: -1 if empty, 0 for a single word.
    pub fn height(&self) -> isize {
        Self::link_height(self.root)
    }

    /// Clears the tree, deallocating all memory.
    pub fn clear(&mut self) {
        self.postorder(|node_ptr| unsafe { Node::destroy(node_ptr) });
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns the number of occurrences of a word, or `None` if it was never inserted.
    pub fn count(&self, word: &str) -> Option<usize> {
        self.find(word)
            .map(|node_ptr| unsafe { node_ptr.as_ref().count })
    }

    /// Returns true if the tree contains the word.
    pub fn contains(&self, word: &str) -> bool {
        self.find(word).is_some()
    }

    /// Records one occurrence of a word.
    /// Returns the number of occurrences after the insert.
    pub fn insert(&mut self, word: &str) -> usize {
        match self.find_insert_pos(word) {
            InsertPos::Occupied(mut node_ptr) => unsafe {
                node_ptr.as_mut().count += 1;
                node_ptr.as_ref().count
            },
            InsertPos::Vacant(parent, mut link_ptr) => {
                unsafe {
                    *link_ptr.as_mut() = Some(Node::create(parent, word.to_owned()));
                }
                self.num_nodes += 1;
                self.rebalance_once(parent);
                1
            }
        }
    }

    /// Removes a word and all its occurrences.
    /// Returns whether the word was present.
    pub fn remove(&mut self, word: &str) -> bool {
        let Some(mut node_ptr) = self.find(word) else {
            return false;
        };
        debug_assert!(self.num_nodes >= 1);
        unsafe {
            // With two children, move the successor's content up and unlink the successor instead
            if node_ptr.as_ref().left.is_some() {
                if let Some(right_ptr) = node_ptr.as_ref().right {
                    let mut successor_ptr = Self::leftmost(right_ptr);
                    mem::swap(&mut node_ptr.as_mut().word, &mut successor_ptr.as_mut().word);
                    mem::swap(&mut node_ptr.as_mut().count, &mut successor_ptr.as_mut().count);
                    node_ptr = successor_ptr;
                }
            }
            let parent = node_ptr.as_ref().parent;
            self.splice_out(node_ptr);
            Node::destroy(node_ptr);
            self.num_nodes -= 1;
            self.rebalance(parent);
        }
        debug_assert!(!self.contains(word));
        true
    }

    /// Returns the sum of all occurrence counts.
    pub fn total_words(&self) -> usize {
        self.iter().map(|(_, count)| count).sum()
    }

    /// Returns the number of words that occur exactly once.
    pub fn singletons(&self) -> usize {
        self.iter().filter(|&(_, count)| count == 1).count()
    }

    /// Returns the word with the highest count, together with that count.
    /// Among words sharing the highest count, the lexicographically smallest one wins.
    pub fn most_frequent(&self) -> Result<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        for (word, count) in self.iter() {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((word, count));
            }
        }
        best.ok_or(Error::EmptyTree)
    }

    /// Returns the lexicographically smallest word and its count.
    pub fn first(&self) -> Option<(&str, usize)> {
        self.root
            .map(|root_ptr| Self::entry(Self::leftmost(root_ptr)))
    }

    /// Returns the lexicographically largest word and its count.
    pub fn last(&self) -> Option<(&str, usize)> {
        self.root
            .map(|root_ptr| Self::entry(Self::rightmost(root_ptr)))
    }

    /// Gets an iterator over the words and their counts, in ascending word order.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.map(Self::leftmost), self.num_nodes)
    }

    /// Asserts all structural invariants and panics on the first violation.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        unsafe {
            // Check root link
            if let Some(root_node_ptr) = self.root {
                assert!(root_node_ptr.as_ref().parent.is_none());
            }

            // Check tree nodes
            let mut num_nodes = 0;
            self.preorder(|node_ptr| {
                let node = node_ptr.as_ref();
                assert!(node.count >= 1);

                // Check link for left child node
                if let Some(left_ptr) = node.left {
                    assert!(left_ptr.as_ref().parent == Some(node_ptr));
                    assert!(Self::rightmost(left_ptr).as_ref().word < node.word);
                }

                // Check link for right child node
                if let Some(right_ptr) = node.right {
                    assert!(right_ptr.as_ref().parent == Some(node_ptr));
                    assert!(Self::leftmost(right_ptr).as_ref().word > node.word);
                }

                // Check height
                let left_height = Self::link_height(node.left);
                let right_height = Self::link_height(node.right);
                assert_eq!(node.height, cmp::max(left_height, right_height) + 1);

                // Check AVL condition (nearly balance)
                assert!((left_height - right_height).abs() <= 1);

                num_nodes += 1;
            });

            // Check number of nodes
            assert_eq!(num_nodes, self.num_nodes);

            // Check ordering (and thus uniqueness) along the in-order sequence
            let mut prev: Option<&str> = None;
            for (word, _) in self.iter() {
                if let Some(prev) = prev {
                    assert!(prev < word);
                }
                prev = Some(word);
            }
        }
    }

    fn entry<'a>(node_ptr: NodePtr) -> (&'a str, usize) {
        let node = unsafe { &*node_ptr.as_ptr() };
        (node.word.as_str(), node.count)
    }

    fn find(&self, word: &str) -> Link {
        let mut current = self.root;
        while let Some(node_ptr) = current {
            current = unsafe {
                match word.cmp(node_ptr.as_ref().word.as_str()) {
                    Ordering::Equal => break,
                    Ordering::Less => node_ptr.as_ref().left,
                    Ordering::Greater => node_ptr.as_ref().right,
                }
            }
        }
        current
    }

    fn find_insert_pos(&mut self, word: &str) -> InsertPos {
        let mut parent: Link = None;
        let mut link_ptr: LinkPtr = NonNull::from(&mut self.root);
        unsafe {
            while let Some(mut node_ptr) = *link_ptr.as_ref() {
                link_ptr = match word.cmp(node_ptr.as_ref().word.as_str()) {
                    Ordering::Equal => return InsertPos::Occupied(node_ptr),
                    Ordering::Less => NonNull::from(&mut node_ptr.as_mut().left),
                    Ordering::Greater => NonNull::from(&mut node_ptr.as_mut().right),
                };
                parent = Some(node_ptr);
            }
        }
        InsertPos::Vacant(parent, link_ptr)
    }

    pub(crate) fn leftmost(mut node_ptr: NodePtr) -> NodePtr {
        while let Some(left_ptr) = unsafe { node_ptr.as_ref().left } {
            node_ptr = left_ptr;
        }
        node_ptr
    }

    fn rightmost(mut node_ptr: NodePtr) -> NodePtr {
        while let Some(right_ptr) = unsafe { node_ptr.as_ref().right } {
            node_ptr = right_ptr;
        }
        node_ptr
    }

    /// Replaces `old` by `new` in the child slot of `parent` (or at the root).
    fn replace_child(&mut self, parent: Link, old: NodePtr, new: Link) {
        match parent {
            None => self.root = new,
            Some(mut parent_ptr) => unsafe {
                if parent_ptr.as_ref().left == Some(old) {
                    parent_ptr.as_mut().left = new;
                } else {
                    parent_ptr.as_mut().right = new;
                }
            },
        }
    }

    /// Unlinks a node that has at most one child, promoting the child into its slot.
    /// The node itself is left allocated.
    unsafe fn splice_out(&mut self, node_ptr: NodePtr) {
        let (left, right, parent) = {
            let node = node_ptr.as_ref();
            (node.left, node.right, node.parent)
        };
        debug_assert!(left.is_none() || right.is_none());
        let child = left.or(right);
        if let Some(mut child_ptr) = child {
            child_ptr.as_mut().parent = parent;
        }
        self.replace_child(parent, node_ptr, child);
    }

    fn link_height(link: Link) -> isize {
        match link {
            None => -1,
            Some(node_ptr) => unsafe { node_ptr.as_ref().height },
        }
    }

    fn balance_factor(link: Link) -> isize {
        match link {
            None => 0,
            Some(node_ptr) => unsafe {
                Self::link_height(node_ptr.as_ref().left) - Self::link_height(node_ptr.as_ref().right)
            },
        }
    }

    fn adjust_height(mut node_ptr: NodePtr) {
        unsafe {
            node_ptr.as_mut().height = cmp::max(
                Self::link_height(node_ptr.as_ref().left),
                Self::link_height(node_ptr.as_ref().right),
            ) + 1;
        }
    }

    /// Promotes the right child of the given node and returns it as the new subtree root.
    fn rotate_left(&mut self, mut node_ptr: NodePtr) -> NodePtr {
        unsafe {
            let Some(mut right_ptr) = node_ptr.as_ref().right else {
                debug_assert!(false, "rotate_left without right child");
                return node_ptr;
            };
            trace!(pivot = %node_ptr.as_ref().word, "rotate left");

            node_ptr.as_mut().right = right_ptr.as_ref().left;
            if let Some(mut right_left_ptr) = right_ptr.as_ref().left {
                right_left_ptr.as_mut().parent = Some(node_ptr);
            }

            let parent = node_ptr.as_ref().parent;
            right_ptr.as_mut().parent = parent;
            self.replace_child(parent, node_ptr, Some(right_ptr));

            right_ptr.as_mut().left = Some(node_ptr);
            node_ptr.as_mut().parent = Some(right_ptr);

            Self::adjust_height(node_ptr);
            Self::adjust_height(right_ptr);
            right_ptr
        }
    }

    /// Promotes the left child of the given node and returns it as the new subtree root.
    fn rotate_right(&mut self, mut node_ptr: NodePtr) -> NodePtr {
        unsafe {
            let Some(mut left_ptr) = node_ptr.as_ref().left else {
                debug_assert!(false, "rotate_right without left child");
                return node_ptr;
            };
            trace!(pivot = %node_ptr.as_ref().word, "rotate right");

            node_ptr.as_mut().left = left_ptr.as_ref().right;
            if let Some(mut left_right_ptr) = left_ptr.as_ref().right {
                left_right_ptr.as_mut().parent = Some(node_ptr);
            }

            let parent = node_ptr.as_ref().parent;
            left_ptr.as_mut().parent = parent;
            self.replace_child(parent, node_ptr, Some(left_ptr));

            left_ptr.as_mut().right = Some(node_ptr);
            node_ptr.as_mut().parent = Some(left_ptr);

            Self::adjust_height(node_ptr);
            Self::adjust_height(left_ptr);
            left_ptr
        }
    }

    /// Rebalances nodes starting from given position up to the root node.
    fn rebalance(&mut self, start_from: Link) {
        let mut current = start_from;
        while let Some(node_ptr) = current {
            let parent = unsafe { node_ptr.as_ref().parent };
            self.rebalance_node(node_ptr);
            current = parent;
        }
    }

    /// Rebalances nodes starting from given position up to the root node.
    /// Stops after first rotation.
    /// This is enough to restore balance after a single insert operation.
    fn rebalance_once(&mut self, start_from: Link) {
        let mut current = start_from;
        while let Some(node_ptr) = current {
            let parent = unsafe { node_ptr.as_ref().parent };
            if self.rebalance_node(node_ptr) != node_ptr {
                break;
            }
            current = parent;
        }
    }

    /// Adjusts the height of the given node and restores the AVL condition there if necessary.
    /// Initial balance must not exceed +2 or -2, which always holds after a single update.
    /// Returns the root of the (possibly rotated) subtree.
    fn rebalance_node(&mut self, node_ptr: NodePtr) -> NodePtr {
        Self::adjust_height(node_ptr);
        let balance = Self::balance_factor(Some(node_ptr));
        debug_assert!(balance.abs() <= 2);
        if balance > 1 {
            // Left-right case
            let left = unsafe { node_ptr.as_ref().left };
            if let Some(left_ptr) = left.filter(|&left_ptr| Self::balance_factor(Some(left_ptr)) < 0) {
                self.rotate_left(left_ptr);
            }
            self.rotate_right(node_ptr)
        } else if balance < -1 {
            // Right-left case
            let right = unsafe { node_ptr.as_ref().right };
            if let Some(right_ptr) = right.filter(|&right_ptr| Self::balance_factor(Some(right_ptr)) > 0) {
                self.rotate_right(right_ptr);
            }
            self.rotate_left(node_ptr)
        } else {
            node_ptr
        }
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn preorder<F: FnMut(NodePtr)>(&self, f: F) {
        self.traverse(f, |_| {});
    }

    fn postorder<F: FnMut(NodePtr)>(&self, f: F) {
        self.traverse(|_| {}, f);
    }

    fn traverse<Pre, Post>(&self, mut preorder: Pre, mut postorder: Post)
    where
        Pre: FnMut(NodePtr),
        Post: FnMut(NodePtr),
    {
        if let Some(mut node_ptr) = self.root {
            let mut dir = Direction::FromParent;
            loop {
                match dir {
                    Direction::FromParent => {
                        preorder(node_ptr);
                        if let Some(left_ptr) = unsafe { node_ptr.as_ref().left } {
                            node_ptr = left_ptr;
                        } else {
                            dir = Direction::FromLeft;
                        }
                    }
                    Direction::FromLeft => {
                        if let Some(right_ptr) = unsafe { node_ptr.as_ref().right } {
                            node_ptr = right_ptr;
                            dir = Direction::FromParent;
                        } else {
                            dir = Direction::FromRight;
                        }
                    }
                    Direction::FromRight => {
                        // Post order traversal is used for node deletion,
                        // so make sure not to use node pointer after postorder call.
                        if let Some(parent_ptr) = unsafe { node_ptr.as_ref().parent } {
                            if Some(node_ptr) == unsafe { parent_ptr.as_ref().left } {
                                dir = Direction::FromLeft;
                            } else {
                                dir = Direction::FromRight;
                            }
                            postorder(node_ptr);
                            node_ptr = parent_ptr;
                        } else {
                            postorder(node_ptr);
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Deep-copies the subtree rooted at `src`, attaching the copy below `parent`.
    fn copy_subtree(src: NodePtr, parent: Link) -> NodePtr {
        unsafe {
            let src = src.as_ref();
            let mut node_ptr = Node::create(parent, src.word.clone());
            let node = node_ptr.as_mut();
            node.count = src.count;
            node.height = src.height;
            node.left = src
                .left
                .map(|left_ptr| Self::copy_subtree(left_ptr, Some(node_ptr)));
            node.right = src
                .right
                .map(|right_ptr| Self::copy_subtree(right_ptr, Some(node_ptr)));
            node_ptr
        }
    }
}

impl Drop for WordTree {
    fn drop(&mut self) {
        self.clear();
    }
}

impl Default for WordTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for WordTree {
    fn clone(&self) -> Self {
        Self {
            root: self
                .root
                .map(|root_ptr| Self::copy_subtree(root_ptr, None)),
            num_nodes: self.num_nodes,
        }
    }
}

impl PartialEq for WordTree {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for WordTree {}

impl fmt::Debug for WordTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a WordTree {
    type Item = (&'a str, usize);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Node {
    fn create(parent: Link, word: String) -> NodePtr {
        let boxed = Box::new(Node {
            word,
            count: 1,
            parent,
            left: None,
            right: None,
            height: 0,
        });
        NonNull::from(Box::leak(boxed))
    }

    unsafe fn destroy(node_ptr: NodePtr) {
        drop(Box::from_raw(node_ptr.as_ptr()));
    }
}
