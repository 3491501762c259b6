//! Feeding words into a tree from external sources.
//!
//! Tokens are separated by whitespace and inserted in the order they are read.
//! No further normalization (case folding, punctuation stripping) takes place.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::tree::WordTree;

impl WordTree {
    /// Builds a tree from all whitespace-separated words of a reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut tree = WordTree::new();
        let mut words = 0usize;
        for line in reader.lines() {
            let line = line?;
            for word in line.split_whitespace() {
                tree.insert(word);
                words += 1;
            }
        }
        debug!(words, distinct = tree.len(), "finished reading words");
        Ok(tree)
    }

    /// Builds a tree from all whitespace-separated words of a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading words");
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<S: AsRef<str>> Extend<S> for WordTree {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for word in iter {
            self.insert(word.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for WordTree {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tree = WordTree::new();
        tree.extend(iter);
        tree
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use crate::error::Error;
    use crate::tree::WordTree;

    #[test]
    fn test_from_reader() {
        let text = "the quick  brown fox\n\tjumps over\n\nthe lazy dog the end\n";
        let tree = WordTree::from_reader(Cursor::new(text)).unwrap();
        tree.check_consistency();
        assert_eq!(tree.total_words(), 11);
        assert_eq!(tree.distinct_words(), 9);
        assert_eq!(tree.count("the"), Some(3));
        assert_eq!(tree.most_frequent().unwrap(), ("the", 3));
    }

    #[test]
    fn test_from_reader_empty() {
        let tree = WordTree::from_reader(Cursor::new("  \n\n")).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_from_reader_invalid_utf8() {
        let bytes: &[u8] = &[b'o', b'k', b' ', 0xff, 0xfe, b'\n'];
        let result = WordTree::from_reader(Cursor::new(bytes));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_from_path() {
        let path = std::env::temp_dir().join(format!("wordtree-ingest-{}.txt", std::process::id()));
        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "b a c a").unwrap();
        }
        let tree = WordTree::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(
            tree.iter().collect::<Vec<_>>(),
            vec![("a", 2), ("b", 1), ("c", 1)]
        );
    }

    #[test]
    fn test_from_path_missing() {
        let result = WordTree::from_path("/nonexistent/wordtree/input.txt");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_extend() {
        let mut tree: WordTree = vec!["x".to_string(), "y".to_string()].into_iter().collect();
        tree.extend(["x", "z"]);
        assert_eq!(tree.count("x"), Some(2));
        assert_eq!(tree.distinct_words(), 3);
    }
}
