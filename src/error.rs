//! Error types for wordtree

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Word tree error type
#[derive(Error, Debug)]
pub enum Error {
    /// A query that needs at least one word ran on an empty tree
    #[error("The word list is empty.")]
    EmptyTree,

    /// Reading words from an external source failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
