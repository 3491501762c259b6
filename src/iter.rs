use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::tree::{Link, NodePtr, WordTree};

/// An iterator over the words of a tree and their counts, in ascending word order.
///
/// This `struct` is created by the [`iter`] method on [`WordTree`].
///
/// [`iter`]: crate::WordTree::iter
#[derive(Clone)]
pub struct Iter<'a> {
    next: Link,
    remaining: usize,
    marker: PhantomData<&'a WordTree>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(first: Link, len: usize) -> Self {
        Self {
            next: first,
            remaining: len,
            marker: PhantomData,
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let node_ptr = self.next?;
        let node = unsafe { &*node_ptr.as_ptr() };
        self.next = successor(node_ptr);
        self.remaining -= 1;
        Some((node.word.as_str(), node.count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

/// Returns the in-order successor, walking up parent links when there is no right subtree.
fn successor(node_ptr: NodePtr) -> Link {
    unsafe {
        if let Some(right_ptr) = node_ptr.as_ref().right {
            return Some(WordTree::leftmost(right_ptr));
        }
        let mut child_ptr = node_ptr;
        let mut parent = node_ptr.as_ref().parent;
        while let Some(parent_ptr) = parent {
            if parent_ptr.as_ref().left == Some(child_ptr) {
                break;
            }
            child_ptr = parent_ptr;
            parent = parent_ptr.as_ref().parent;
        }
        parent
    }
}
