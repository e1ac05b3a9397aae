//! Error type shared by all encode and decode operations.

use crate::parser::ParsingError;
use thiserror::Error;

/// Errors raised while encoding or decoding trees.
#[derive(Debug, Error)]
pub enum Phylo2VecError {
    /// Vector violates the `0 <= v[i] <= 2i` envelope (or is too short to encode a tree)
    #[error("invalid vector: {0}")]
    InvalidVector(String),

    /// Matrix with non-positive branch lengths or mismatched dimensions
    #[error("invalid matrix: {0}")]
    InvalidMatrix(String),

    /// Newick string could not be parsed; the [ParsingError] is the source
    #[error("malformed Newick string")]
    MalformedNewick(#[from] ParsingError),

    /// Node id outside the tree
    #[error("invalid node: {0}")]
    InvalidNode(String),

    /// Ancestry list does not describe a binary tree
    #[error("inconsistent ancestry: {0}")]
    InconsistentAncestry(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Phylo2VecError>;
