//! Phylo2Vec vectors: validation and leaf-level operations.
//!
//! A vector `v` of length `n - 1` encodes a rooted binary tree on `n` leaves;
//! `v[i]` names the branch that leaf `i + 1` attaches to. Valid vectors satisfy
//! `0 <= v[i] <= 2i`, ordered vectors the stricter `v[i] <= i`.
//!
//! Besides validation, this module edits trees through their vectors
//! ([add_leaf], [remove_leaf]) and answers ancestry queries
//! ([ancestry_paths], [common_ancestor]).

use crate::error::{Phylo2VecError, Result};
use crate::model::ancestry::{Ancestry, NodeId, Triplet};
use crate::newick::Cherry;
use crate::newick::canonical::canonical_order;
use crate::newick::vector_builder::build_vector;

/// Checks that every element satisfies `v[i] <= 2i`.
///
/// # Errors
/// [Phylo2VecError::InvalidVector] naming the first element out of range.
///
/// # Example
/// ```
/// use phylo2vec::model::vector::validate_vector;
///
/// assert!(validate_vector(&[0, 1, 4]).is_ok());
/// assert!(validate_vector(&[0, 3]).is_err());
/// ```
pub fn validate_vector(v: &[usize]) -> Result<()> {
    match v.iter().enumerate().find(|&(i, &v_i)| v_i > 2 * i) {
        Some((i, &v_i)) => Err(Phylo2VecError::InvalidVector(format!(
            "v[{i}] = {v_i} must be in [0, {}]",
            2 * i
        ))),
        None => Ok(()),
    }
}

/// Returns whether `v` is an ordered vector (`v[i] <= i` for all `i`).
pub fn is_ordered(v: &[usize]) -> bool {
    v.iter().enumerate().all(|(i, &v_i)| v_i <= i)
}

/// Attaches a new leaf to a tree.
///
/// The leaf branches out from `branch` (as `v.push(branch)` would do) and is
/// then given the label `leaf`; existing leaves `>= leaf` are shifted up by one.
///
/// # Arguments
/// * `v` - Valid vector of a tree on `n = v.len() + 1` leaves
/// * `leaf` - Label of the new leaf, in `0..=n`
/// * `branch` - Branch to attach to, in `0..=2n - 2`
///
/// # Returns
/// The vector of the tree on `n + 1` leaves
///
/// # Example
/// ```
/// use phylo2vec::model::vector::add_leaf;
///
/// // Appending the highest label is plain extension of the vector
/// assert_eq!(add_leaf(&[0, 1], 3, 4).unwrap(), vec![0, 1, 4]);
/// ```
pub fn add_leaf(v: &[usize], leaf: NodeId, branch: usize) -> Result<Vec<usize>> {
    let num_leaves = v.len() + 1;
    if leaf > num_leaves {
        return Err(Phylo2VecError::InvalidVector(format!(
            "new leaf {leaf} must be in [0, {num_leaves}]"
        )));
    }

    let mut extended = v.to_vec();
    extended.push(branch);
    let ancestry = Ancestry::from_vector(&extended)?;

    // The new leaf was created with the largest leaf label
    let new_num_leaves = num_leaves + 1;
    let added = num_leaves;
    let relabel = |node: NodeId| {
        if node == added {
            leaf
        } else if node < new_num_leaves && node >= leaf {
            node + 1
        } else {
            node
        }
    };

    let cherries: Vec<Cherry> = ancestry
        .iter()
        .map(|t| Cherry::new(relabel(t.child1), relabel(t.child2), t.parent))
        .collect();

    reencode(&cherries)
}

/// Removes a leaf from a tree.
///
/// The parent of `leaf` is collapsed onto the sister of `leaf`,
/// and leaves `> leaf` are shifted down by one.
///
/// # Arguments
/// * `v` - Valid vector of a tree on `n = v.len() + 1 >= 3` leaves
/// * `leaf` - Leaf to remove, in `0..n`
///
/// # Returns
/// The vector of the tree on `n - 1` leaves together with the sister node
/// of the removed leaf (id in the original tree)
///
/// # Example
/// ```
/// use phylo2vec::model::vector::remove_leaf;
///
/// // ((0,(1,2)4)5,3)6; without leaf 2 is ((0,1),2)
/// assert_eq!(remove_leaf(&[0, 1, 4], 2).unwrap(), (vec![0, 2], 1));
/// ```
pub fn remove_leaf(v: &[usize], leaf: NodeId) -> Result<(Vec<usize>, NodeId)> {
    let num_leaves = v.len() + 1;
    if leaf >= num_leaves {
        return Err(Phylo2VecError::InvalidVector(format!(
            "leaf {leaf} is not part of a tree with {num_leaves} leaves"
        )));
    }
    if num_leaves < 3 {
        return Err(Phylo2VecError::InvalidVector(
            "cannot remove a leaf from a tree with fewer than three leaves".to_string(),
        ));
    }

    let ancestry = Ancestry::from_vector(v)?;
    let removed = ancestry
        .iter()
        .find(|t| t.child1 == leaf || t.child2 == leaf)
        .copied()
        .ok_or_else(|| {
            Phylo2VecError::InconsistentAncestry(format!("leaf {leaf} has no parent"))
        })?;
    let parent = removed.parent;
    let sister = if removed.child1 == leaf {
        removed.child2
    } else {
        removed.child1
    };

    // Leaves above `leaf` move down by one, internal ids lose one slot for the
    // removed leaf and one more if they come after the removed parent
    let relabel = |node: NodeId| {
        let node = if node == parent { sister } else { node };
        if node < num_leaves {
            if node > leaf { node - 1 } else { node }
        } else if node < parent {
            node - 1
        } else {
            node - 2
        }
    };

    let cherries: Vec<Cherry> = ancestry
        .iter()
        .filter(|t| t.parent != parent)
        .map(|t: &Triplet| Cherry::new(relabel(t.child1), relabel(t.child2), relabel(t.parent)))
        .collect();

    Ok((reencode(&cherries)?, sister))
}

/// Returns for every node the path from the root down to it.
///
/// The paths are indexed by node id (`0..2n - 1`); each starts with the root
/// and ends with the node itself.
///
/// # Errors
/// [Phylo2VecError::InvalidVector] if `v` is empty or out of range.
///
/// # Example
/// ```
/// use phylo2vec::model::vector::ancestry_paths;
///
/// // ((0,(1,2)4)5,3)6;
/// let paths = ancestry_paths(&[0, 1, 4]).unwrap();
/// assert_eq!(paths[1], vec![6, 5, 4, 1]);
/// assert_eq!(paths[3], vec![6, 3]);
/// assert_eq!(paths[6], vec![6]);
/// ```
pub fn ancestry_paths(v: &[usize]) -> Result<Vec<Vec<NodeId>>> {
    let parents = Ancestry::from_vector(v)?.parent_ids();
    Ok((0..parents.len())
        .map(|node| path_from_root(&parents, node))
        .collect())
}

/// Returns the most recent common ancestor of two nodes.
///
/// Nodes count as their own ancestors: if `node2` lies below `node1`, the
/// result is `node1`.
///
/// # Errors
/// * [Phylo2VecError::InvalidVector] - If `v` is empty or out of range
/// * [Phylo2VecError::InvalidNode] - If a node is not in `0..2n - 1`
///
/// # Example
/// ```
/// use phylo2vec::model::vector::common_ancestor;
///
/// // ((0,(1,2)4)5,3)6;
/// assert_eq!(common_ancestor(&[0, 1, 4], 1, 2).unwrap(), 4);
/// assert_eq!(common_ancestor(&[0, 1, 4], 0, 2).unwrap(), 5);
/// assert_eq!(common_ancestor(&[0, 1, 4], 4, 1).unwrap(), 4);
/// ```
pub fn common_ancestor(v: &[usize], node1: NodeId, node2: NodeId) -> Result<NodeId> {
    let parents = Ancestry::from_vector(v)?.parent_ids();
    if let Some(node) = [node1, node2].into_iter().find(|&n| n >= parents.len()) {
        return Err(Phylo2VecError::InvalidNode(format!(
            "node {node} is not part of a tree with {} nodes",
            parents.len()
        )));
    }

    let path1 = path_from_root(&parents, node1);
    let path2 = path_from_root(&parents, node2);
    path1
        .iter()
        .zip(&path2)
        .take_while(|(a, b)| a == b)
        .last()
        .map(|(&ancestor, _)| ancestor)
        .ok_or_else(|| {
            Phylo2VecError::InconsistentAncestry(format!(
                "nodes {node1} and {node2} have no common root"
            ))
        })
}

/// Walks from `node` up to the root and returns the path root first.
fn path_from_root(parents: &[NodeId], node: NodeId) -> Vec<NodeId> {
    let mut path = vec![node];
    let mut current = node;
    while parents[current] != current {
        current = parents[current];
        path.push(current);
    }
    path.reverse();
    path
}

/// Encodes relabelled cherries (with parent labels in creation order).
///
/// Leaf relabelling changes the order in which leaves are attached, so the
/// creation order is inferred again from the topology.
fn reencode(cherries: &[Cherry]) -> Result<Vec<usize>> {
    let (ordered, _) = canonical_order(cherries, true)?;
    Ok(build_vector(&ordered))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_vector() {
        assert!(validate_vector(&[]).is_ok());
        assert!(validate_vector(&[0]).is_ok());
        assert!(validate_vector(&[0, 2, 4, 6]).is_ok());
        assert!(matches!(
            validate_vector(&[1]),
            Err(Phylo2VecError::InvalidVector(_))
        ));
        assert!(matches!(
            validate_vector(&[0, 1, 5]),
            Err(Phylo2VecError::InvalidVector(_))
        ));
    }

    #[test]
    fn test_is_ordered() {
        assert!(is_ordered(&[0, 1, 2]));
        assert!(is_ordered(&[0, 0, 0]));
        assert!(!is_ordered(&[0, 2]));
    }

    #[test]
    fn test_add_leaf_with_relabelling() {
        // ((0,2)3,1)4; with a new leaf on branch 1 is ((0,2),(1,3)),
        // relabelled with the new leaf as 0: ((1,3),(2,0))
        assert_eq!(add_leaf(&[0, 0], 0, 1).unwrap(), vec![0, 0, 1]);
    }

    #[test]
    fn test_add_leaf_rejects_out_of_range() {
        assert!(add_leaf(&[0, 0], 4, 0).is_err());
        assert!(add_leaf(&[0, 0], 1, 5).is_err());
    }

    #[test]
    fn test_ancestry_paths_of_nested_tree() {
        // ((0,2)3,1)4;
        let paths = ancestry_paths(&[0, 0]).unwrap();
        assert_eq!(
            paths,
            vec![vec![4, 3, 0], vec![4, 1], vec![4, 3, 2], vec![4, 3], vec![4]]
        );
    }

    #[test]
    fn test_common_ancestor() {
        // ((0,1)5,(2,3)4)6;
        let v = [0, 2, 2];
        assert_eq!(common_ancestor(&v, 0, 1).unwrap(), 5);
        assert_eq!(common_ancestor(&v, 3, 2).unwrap(), 4);
        assert_eq!(common_ancestor(&v, 1, 2).unwrap(), 6);
        assert_eq!(common_ancestor(&v, 2, 2).unwrap(), 2);
        assert_eq!(common_ancestor(&v, 6, 0).unwrap(), 6);
        assert!(matches!(
            common_ancestor(&v, 0, 7),
            Err(Phylo2VecError::InvalidNode(_))
        ));
    }

    #[test]
    fn test_remove_leaf() {
        // ((0,2)3,1)4; without leaf 1 is (0,1)
        assert_eq!(remove_leaf(&[0, 0], 1).unwrap(), (vec![0], 3));
        assert!(remove_leaf(&[0], 0).is_err());
        assert!(remove_leaf(&[0, 0], 3).is_err());
    }
}
