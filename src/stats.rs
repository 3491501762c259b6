//! Summary reports over a word tree.

use std::fmt;

use crate::tree::WordTree;

/// Width of the word column in a [`Listing`].
const WORD_COLUMN_WIDTH: usize = 25;

/// A snapshot of the aggregate queries of a [`WordTree`].
///
/// ```
/// use wordtree::WordTree;
/// let tree: WordTree = "to be or not to be".split_whitespace().collect();
/// let stats = tree.statistics();
/// assert_eq!(stats.distinct_words, 4);
/// assert_eq!(stats.total_words, 6);
/// assert_eq!(stats.most_frequent, Some(("be".to_string(), 2)));
/// assert_eq!(stats.singletons, 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statistics {
    pub distinct_words: usize,
    pub total_words: usize,
    /// `None` for an empty tree.
    pub most_frequent: Option<(String, usize)>,
    pub singletons: usize,
}

impl Statistics {
    /// Share of distinct words that occur exactly once, in percent.
    /// Zero when there are no words.
    pub fn singleton_percent(&self) -> f64 {
        if self.distinct_words == 0 {
            return 0.0;
        }
        100.0 * self.singletons as f64 / self.distinct_words as f64
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of different words: {}", self.distinct_words)?;
        writeln!(f, "    Total number of words: {}", self.total_words)?;
        match &self.most_frequent {
            Some((word, count)) => writeln!(f, "       Most frequent word: {} {}", word, count)?,
            None => writeln!(f, "       Most frequent word: -")?,
        }
        writeln!(
            f,
            "     Number of singletons: {} ({:.0}%)",
            self.singletons,
            self.singleton_percent()
        )
    }
}

/// Displays every word of a tree with its count, one per line, numbered from 1.
///
/// This `struct` is created by the [`listing`] method on [`WordTree`].
///
/// [`listing`]: crate::WordTree::listing
pub struct Listing<'a> {
    tree: &'a WordTree,
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tree.is_empty() {
            return writeln!(f, "The word list is empty.");
        }
        for (index, (word, count)) in self.tree.iter().enumerate() {
            writeln!(
                f,
                "{}. {:<width$}{}",
                index + 1,
                word,
                count,
                width = WORD_COLUMN_WIDTH
            )?;
        }
        Ok(())
    }
}

impl WordTree {
    /// Collects distinct count, total count, most frequent word and singleton count.
    pub fn statistics(&self) -> Statistics {
        Statistics {
            distinct_words: self.distinct_words(),
            total_words: self.total_words(),
            most_frequent: self
                .most_frequent()
                .ok()
                .map(|(word, count)| (word.to_owned(), count)),
            singletons: self.singletons(),
        }
    }

    /// Returns a displayable listing of all words in ascending order.
    pub fn listing(&self) -> Listing<'_> {
        Listing { tree: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_display() {
        let tree: WordTree = ["b", "a", "c", "a"].into_iter().collect();
        let expected = "\
Number of different words: 3
    Total number of words: 4
       Most frequent word: a 2
     Number of singletons: 2 (67%)
";
        assert_eq!(tree.statistics().to_string(), expected);
    }

    #[test]
    fn test_statistics_empty() {
        let tree = WordTree::new();
        let stats = tree.statistics();
        assert_eq!(stats.distinct_words, 0);
        assert_eq!(stats.total_words, 0);
        assert_eq!(stats.most_frequent, None);
        assert_eq!(stats.singletons, 0);
        assert_eq!(stats.singleton_percent(), 0.0);
        assert!(stats.to_string().contains("Most frequent word: -"));
    }

    #[test]
    fn test_listing() {
        let tree: WordTree = ["pear", "apple", "pear"].into_iter().collect();
        let expected = format!("1. {:<25}1\n2. {:<25}2\n", "apple", "pear");
        assert_eq!(tree.listing().to_string(), expected);

        assert_eq!(WordTree::new().listing().to_string(), "The word list is empty.\n");
    }
}
