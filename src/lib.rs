//! Phylo2vec is a library to encode rooted binary trees (phylogenies) as
//! integer vectors and decode them again.
//!
//! A tree on `n` leaves is encoded as a vector `v` of length `n - 1` with
//! `0 <= v[i] <= 2i`, where `v[i]` names the branch leaf `i + 1` is attached
//! to when the tree is grown leaf by leaf. Every valid vector is exactly one
//! tree and every tree exactly one vector. Core functionality provided:
//! - Decoding: vector to integer Newick string, with or without parent labels.
//! - Encoding: integer Newick string to vector, with or without parent labels.
//!   Internal labels of the input do not influence the result.
//! - Matrices: vectors together with branch lengths ([Phylo2Mat]).
//! - Utilities: taxon label mapping, leaf counting, stripping of labels and
//!   branch lengths ([newick::utils]), adding and removing leaves
//!   ([model::vector]).
//!
//! Limitations:
//! - Only rooted binary trees
//! - Leaves of Newick strings have to be integers `0..n`
//!   (see [newick::utils::create_label_mapping] for taxon labels)
//!
//! # Usage patterns
//! 1. The functions of this module provide the codec with default settings.
//! 2. [newick::parse_vector], [newick::write_vector] and friends take a
//!    [NewickDialect] or [NewickWriter] for full control over the dialect.
//!
//! ## Example
//! ```
//! use phylo2vec::{newick_to_vector, newick_to_vector_no_parents, vector_to_newick};
//!
//! let newick = vector_to_newick(&[0, 1, 4]).unwrap();
//! assert_eq!(newick, "((0,(1,2)4)5,3)6;");
//! assert_eq!(newick_to_vector(&newick).unwrap(), vec![0, 1, 4]);
//!
//! // Parent labels are optional
//! assert_eq!(newick_to_vector_no_parents("((0,(1,2)),3);").unwrap(), vec![0, 1, 4]);
//! ```
//!
//! ## Example Matrix
//! ```
//! use phylo2vec::{matrix_to_newick, newick_to_matrix, Phylo2Mat};
//!
//! let m = Phylo2Mat::new(vec![0, 0], vec![[0.1, 0.2], [0.3, 0.4]]);
//! let newick = matrix_to_newick(&m).unwrap();
//! assert_eq!(newick, "((0:0.1,2:0.2)3:0.3,1:0.4)4;");
//! assert_eq!(newick_to_matrix(&newick).unwrap(), m);
//! ```

pub mod error;
pub mod model;
pub mod newick;
pub mod parser;

pub use crate::error::{Phylo2VecError, Result};
pub use crate::model::{Ancestry, LeafLabelMap, Phylo2Mat, validate_vector};
pub use crate::newick::{NewickDialect, NewickWriter};

// ============================================================================
// Quick Decoding API
// ============================================================================
/// Converts a vector into a Newick string with parent labels.
///
/// See [`newick::write_vector`] for full documentation.
///
/// # Errors
/// [Phylo2VecError::InvalidVector] if `v` violates `0 <= v[i] <= 2i` or is empty.
pub fn vector_to_newick(v: &[usize]) -> Result<String> {
    newick::write_vector(v, &NewickWriter::new())
}

/// Converts a matrix into a Newick string with parent labels and branch lengths.
///
/// See [`newick::write_matrix`] for full documentation.
///
/// # Errors
/// [Phylo2VecError::InvalidMatrix] if a branch length is not strictly positive.
pub fn matrix_to_newick(matrix: &Phylo2Mat) -> Result<String> {
    newick::write_matrix(matrix, &NewickWriter::new())
}

// ============================================================================
// Quick Encoding API
// ============================================================================
/// Converts a Newick string with parent labels into a vector.
///
/// See [`newick::parse_vector`] for full documentation. Takes `O(n^2)` for
/// `n` leaves, like the label-free variant.
///
/// # Errors
/// [Phylo2VecError::MalformedNewick] if the string is not a tree with
/// parent labels and without branch lengths.
pub fn newick_to_vector(newick: &str) -> Result<Vec<usize>> {
    newick::parse_vector(newick, NewickDialect::new().with_parent_labels())
}

/// Converts a Newick string without parent labels into a vector.
///
/// See [`newick::parse_vector`] for full documentation.
pub fn newick_to_vector_no_parents(newick: &str) -> Result<Vec<usize>> {
    newick::parse_vector(newick, NewickDialect::new())
}

/// Converts a Newick string with parent labels and branch lengths into a matrix.
///
/// See [`newick::parse_matrix`] for full documentation.
pub fn newick_to_matrix(newick: &str) -> Result<Phylo2Mat> {
    newick::parse_matrix(newick, NewickDialect::new().with_parent_labels())
}

/// Converts a Newick string with branch lengths but without parent labels
/// into a matrix.
///
/// See [`newick::parse_matrix`] for full documentation.
pub fn newick_to_matrix_no_parents(newick: &str) -> Result<Phylo2Mat> {
    newick::parse_matrix(newick, NewickDialect::new())
}
