//! Phylo2Vec matrices: a vector plus branch lengths per merge.

use crate::error::{Phylo2VecError, Result};
use crate::model::ancestry::Ancestry;
use crate::model::distance::cophenetic_distances_with_lengths;
use crate::model::vector::validate_vector;

/// Branch lengths leading to the two children of one merge.
pub type BranchLengthPair = [f64; 2];

// =#========================================================================#=
// PHYLO2VEC MATRIX
// =#========================================================================$=
/// A tree topology (Phylo2Vec vector) together with its branch lengths.
///
/// # Layout
/// - `vector[i]` is the usual Phylo2Vec entry
/// - `branch_lengths[i]` holds the lengths of the branches to `child1` and
///   `child2` of the `i`-th merge of the tree's
///   [Ancestry](crate::model::Ancestry), i.e. of internal node `n + i`;
///   `child1` is the child whose subtree holds the smaller leaf
///
/// Branch lengths never influence the topology.
#[derive(Debug, Clone, PartialEq)]
pub struct Phylo2Mat {
    /// Topology
    pub vector: Vec<usize>,
    /// One pair of branch lengths per merge
    pub branch_lengths: Vec<BranchLengthPair>,
}

impl Phylo2Mat {
    /// Creates a matrix from its topology and branch lengths (unchecked).
    pub fn new(vector: Vec<usize>, branch_lengths: Vec<BranchLengthPair>) -> Self {
        Self { vector, branch_lengths }
    }

    /// Returns the number of leaves of the encoded tree.
    pub fn num_leaves(&self) -> usize {
        self.vector.len() + 1
    }

    /// Returns an iterator over rows `(v[i], [length1, length2])`.
    pub fn rows(&self) -> impl Iterator<Item = (usize, BranchLengthPair)> + '_ {
        self.vector.iter().copied().zip(self.branch_lengths.iter().copied())
    }

    /// Checks that the topology is valid and that all branch lengths are positive.
    ///
    /// See [validate_matrix].
    pub fn validate(&self) -> Result<()> {
        validate_matrix(&self.vector, &self.branch_lengths)
    }

    /// Returns the cophenetic distances between all leaves under the
    /// branch lengths of this matrix.
    ///
    /// # Errors
    /// See [validate_matrix].
    pub fn cophenetic_distances(&self) -> Result<Vec<Vec<f64>>> {
        self.validate()?;
        let ancestry = Ancestry::from_vector(&self.vector)?;
        cophenetic_distances_with_lengths(&ancestry, &self.branch_lengths)
    }
}

/// Checks a matrix given as vector and branch lengths.
///
/// # Errors
/// * [Phylo2VecError::InvalidVector] - If the vector violates `v[i] <= 2i`
/// * [Phylo2VecError::InvalidMatrix] - If the number of branch length pairs
///   differs from the vector length or a branch length is not a finite,
///   strictly positive number
pub fn validate_matrix(vector: &[usize], branch_lengths: &[BranchLengthPair]) -> Result<()> {
    validate_vector(vector)?;

    if vector.len() != branch_lengths.len() {
        return Err(Phylo2VecError::InvalidMatrix(format!(
            "expected {} branch length pairs but found {}",
            vector.len(),
            branch_lengths.len()
        )));
    }

    for (row, pair) in branch_lengths.iter().enumerate() {
        for length in pair {
            if !(length.is_finite() && *length > 0.0) {
                return Err(Phylo2VecError::InvalidMatrix(format!(
                    "branch length {length} in row {row} must be strictly positive"
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_matrix() {
        let m = Phylo2Mat::new(vec![0, 1], vec![[0.1, 0.2], [1.0, 3.5]]);
        assert!(m.validate().is_ok());
        assert_eq!(m.num_leaves(), 3);
        assert_eq!(m.rows().nth(1), Some((1, [1.0, 3.5])));
    }

    #[test]
    fn test_validate_matrix_rejects_non_positive_lengths() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let m = Phylo2Mat::new(vec![0, 1], vec![[0.1, 0.2], [bad, 3.5]]);
            assert!(matches!(m.validate(), Err(Phylo2VecError::InvalidMatrix(_))));
        }
    }

    #[test]
    fn test_validate_matrix_rejects_mismatched_rows() {
        let m = Phylo2Mat::new(vec![0, 1], vec![[0.1, 0.2]]);
        assert!(matches!(m.validate(), Err(Phylo2VecError::InvalidMatrix(_))));
    }

    #[test]
    fn test_cophenetic_distances_of_matrix() {
        // ((0:1,2:2)3:3,1:4)4;
        let m = Phylo2Mat::new(vec![0, 0], vec![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(
            m.cophenetic_distances().unwrap(),
            vec![vec![0.0, 8.0, 3.0], vec![8.0, 0.0, 9.0], vec![3.0, 9.0, 0.0]]
        );

        let bad = Phylo2Mat::new(vec![0, 0], vec![[1.0, -2.0], [3.0, 4.0]]);
        assert!(matches!(bad.cophenetic_distances(), Err(Phylo2VecError::InvalidMatrix(_))));
    }

    #[test]
    fn test_validate_matrix_checks_topology() {
        let m = Phylo2Mat::new(vec![0, 3], vec![[0.1, 0.2], [0.1, 0.2]]);
        assert!(matches!(m.validate(), Err(Phylo2VecError::InvalidVector(_))));
    }
}
