//! Pairwise distances between the leaves of a tree.
//!
//! The cophenetic distance of two leaves is the length of the path between
//! them: the number of edges for a plain topology ([cophenetic_distances]),
//! or the sum of branch lengths for a matrix
//! ([cophenetic_distances_with_lengths]).

use crate::error::{Phylo2VecError, Result};
use crate::model::ancestry::{Ancestry, NodeId};
use crate::model::matrix::BranchLengthPair;
use std::ops::Add;

/// Returns the topological cophenetic distance matrix of the leaves.
///
/// Entry `[a][b]` is the number of edges on the path from leaf `a` to leaf `b`.
///
/// # Example
/// ```
/// use phylo2vec::model::{Ancestry, distance::cophenetic_distances};
///
/// // ((0,2)3,1)4;
/// let ancestry = Ancestry::from_vector(&[0, 0]).unwrap();
/// assert_eq!(
///     cophenetic_distances(&ancestry),
///     vec![vec![0, 3, 2], vec![3, 0, 3], vec![2, 3, 0]]
/// );
/// ```
pub fn cophenetic_distances(ancestry: &Ancestry) -> Vec<Vec<usize>> {
    cophenetic(ancestry, |_| [1, 1])
}

/// Returns the cophenetic distance matrix of the leaves under branch lengths.
///
/// `branch_lengths[i]` holds the lengths to the children of the `i`-th
/// triplet of `ancestry`, as in [Phylo2Mat](crate::model::Phylo2Mat).
///
/// # Errors
/// [Phylo2VecError::InvalidMatrix] if there is not exactly one pair of
/// lengths per triplet.
pub fn cophenetic_distances_with_lengths(
    ancestry: &Ancestry,
    branch_lengths: &[BranchLengthPair],
) -> Result<Vec<Vec<f64>>> {
    if branch_lengths.len() != ancestry.len() {
        return Err(Phylo2VecError::InvalidMatrix(format!(
            "expected {} branch length pairs but found {}",
            ancestry.len(),
            branch_lengths.len()
        )));
    }
    Ok(cophenetic(ancestry, |row| branch_lengths[row]))
}

/// Merges the leaf sets of the two children of each triplet in creation
/// order. Every leaf pair is first separated by exactly one merge, where its
/// distance is the sum of both distances to the new parent.
fn cophenetic<T>(ancestry: &Ancestry, lengths: impl Fn(usize) -> [T; 2]) -> Vec<Vec<T>>
where
    T: Copy + Default + Add<Output = T>,
{
    let num_leaves = ancestry.num_leaves();
    let mut distances = vec![vec![T::default(); num_leaves]; num_leaves];

    // Leaves below each node with their distance to it
    let mut below: Vec<Vec<(NodeId, T)>> = (0..2 * num_leaves - 1)
        .map(|node| {
            if node < num_leaves {
                vec![(node, T::default())]
            } else {
                Vec::new()
            }
        })
        .collect();

    for (row, triplet) in ancestry.iter().enumerate() {
        let [length1, length2] = lengths(row);
        let mut side1 = std::mem::take(&mut below[triplet.child1]);
        let side2 = std::mem::take(&mut below[triplet.child2]);

        for entry in side1.iter_mut() {
            entry.1 = entry.1 + length1;
        }
        for &(leaf2, to_child2) in &side2 {
            let to_parent2 = to_child2 + length2;
            for &(leaf1, to_parent1) in &side1 {
                distances[leaf1][leaf2] = to_parent1 + to_parent2;
                distances[leaf2][leaf1] = to_parent1 + to_parent2;
            }
        }

        side1.extend(side2.into_iter().map(|(leaf, d)| (leaf, d + length2)));
        below[triplet.parent] = side1;
    }

    distances
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topological_distances() {
        // ((0,(1,2)4)5,3)6;
        let ancestry = Ancestry::from_vector(&[0, 1, 4]).unwrap();
        assert_eq!(
            cophenetic_distances(&ancestry),
            vec![
                vec![0, 3, 3, 3],
                vec![3, 0, 2, 4],
                vec![3, 2, 0, 4],
                vec![3, 4, 4, 0]
            ]
        );
    }

    #[test]
    fn test_distances_with_lengths() {
        // ((0:0.25,(1:0.5,2:1)4:2)5:3,3:0.125)6;
        let ancestry = Ancestry::from_vector(&[0, 1, 4]).unwrap();
        let lengths = [[0.5, 1.0], [0.25, 2.0], [3.0, 0.125]];
        let d = cophenetic_distances_with_lengths(&ancestry, &lengths).unwrap();
        assert_eq!(d[1][2], 1.5);
        assert_eq!(d[0][1], 2.75);
        assert_eq!(d[0][2], 3.25);
        assert_eq!(d[0][3], 3.375);
        assert_eq!(d[1][3], 5.625);
        assert_eq!(d[3][2], 6.125);
        assert_eq!(d[2][2], 0.0);
    }

    #[test]
    fn test_lengths_must_match_triplets() {
        let ancestry = Ancestry::from_vector(&[0, 0]).unwrap();
        assert!(matches!(
            cophenetic_distances_with_lengths(&ancestry, &[[1.0, 1.0]]),
            Err(Phylo2VecError::InvalidMatrix(_))
        ));
    }
}
