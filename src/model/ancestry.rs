//! Ancestry module: the list of merge triplets describing a binary tree.
//!
//! - [Triplet]: one merge `(child1, child2, parent)`.
//! - [Ancestry]: the `n - 1` triplets of a tree on `n` leaves, with parent ids
//!   `n, n + 1, ..., 2n - 2` in creation order. The last triplet is the root.
//!
//! [Ancestry::from_vector] is the decoding direction of the codec: it expands
//! a Phylo2Vec vector into its ancestry list by positional insertion.

use crate::error::{Phylo2VecError, Result};
use crate::model::vector::validate_vector;
use std::fmt;
use std::ops::Index;

/// Id of a node: leaves are `0..n`, internal nodes `n..2n-1`.
pub type NodeId = usize;

// =#========================================================================#=
// TRIPLET
// =#========================================================================$=
/// A merge event uniting two child nodes under a parent node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triplet {
    /// First (left) child
    pub child1: NodeId,
    /// Second (right) child
    pub child2: NodeId,
    /// Parent created by this merge
    pub parent: NodeId,
}

impl Triplet {
    /// Creates a new triplet.
    pub fn new(child1: NodeId, child2: NodeId, parent: NodeId) -> Self {
        Self { child1, child2, parent }
    }

    /// Returns the children as a tuple.
    pub fn children(&self) -> (NodeId, NodeId) {
        (self.child1, self.child2)
    }
}

impl fmt::Display for Triplet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}) -> {}", self.child1, self.child2, self.parent)
    }
}

// =#========================================================================#=
// ANCESTRY
// =#========================================================================$=
/// Ordered list of merge triplets of a rooted binary tree.
///
/// # Invariants
/// - Holds `n - 1` triplets for a tree on `n >= 2` leaves
/// - Triplet `i` has parent `n + i`
/// - Every id in `[0, 2n - 2)` appears as a child exactly once,
///   the root `2n - 2` never does
/// - A child id `>= n` is the parent of an earlier triplet
///
/// # Example
/// ```
/// use phylo2vec::model::Ancestry;
///
/// let ancestry = Ancestry::from_vector(&[0, 0]).unwrap();
/// assert_eq!(ancestry.num_leaves(), 3);
/// assert_eq!(ancestry.root().children(), (3, 1));
/// assert_eq!(ancestry[3].children(), (0, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ancestry {
    triplets: Vec<Triplet>,
}

// ============================================================================
// Construction (pub)
// ============================================================================
impl Ancestry {
    /// Expands a Phylo2Vec vector into its ancestry list.
    ///
    /// # Arguments
    /// * `v` - Vector with `0 <= v[i] <= 2i` and at least one element
    ///
    /// # Returns
    /// * `Ok(Ancestry)` - Triplets with parents `n, ..., 2n - 2`, `n = v.len() + 1`
    /// * [Phylo2VecError::InvalidVector] - If `v` is empty or out of range
    pub fn from_vector(v: &[usize]) -> Result<Self> {
        validate_vector(v)?;
        if v.is_empty() {
            return Err(Phylo2VecError::InvalidVector(
                "vector must encode at least two leaves".to_string(),
            ));
        }

        let pairs = get_pairs(v);
        Ok(Self {
            triplets: assign_parents(&pairs),
        })
    }

    /// Creates an ancestry list from raw triplets, checking all invariants.
    ///
    /// # Errors
    /// [Phylo2VecError::InconsistentAncestry] if the triplets do not
    /// describe a rooted binary tree in creation order.
    pub fn from_triplets(triplets: Vec<Triplet>) -> Result<Self> {
        if triplets.is_empty() {
            return Err(Phylo2VecError::InconsistentAncestry(
                "ancestry must contain at least one triplet".to_string(),
            ));
        }

        let num_leaves = triplets.len() + 1;
        let root = 2 * num_leaves - 2;
        let mut seen = vec![false; root];

        for (i, triplet) in triplets.iter().enumerate() {
            let expected_parent = num_leaves + i;
            if triplet.parent != expected_parent {
                return Err(Phylo2VecError::InconsistentAncestry(format!(
                    "triplet {i} has parent {} but expected {expected_parent}",
                    triplet.parent
                )));
            }

            for child in [triplet.child1, triplet.child2] {
                // Internal children must have been created before their parent
                if child >= triplet.parent {
                    return Err(Phylo2VecError::InconsistentAncestry(format!(
                        "node {child} is used as child of {} before it is created",
                        triplet.parent
                    )));
                }
                if seen[child] {
                    return Err(Phylo2VecError::InconsistentAncestry(format!(
                        "node {child} appears as a child more than once"
                    )));
                }
                seen[child] = true;
            }
        }

        // n - 1 triplets with 2(n - 1) distinct children below the root cover [0, 2n - 2)
        Ok(Self { triplets })
    }
}

// ============================================================================
// Getters / Accessors (pub)
// ============================================================================
impl Ancestry {
    /// Returns the number of leaves of the tree.
    pub fn num_leaves(&self) -> usize {
        self.triplets.len() + 1
    }

    /// Returns the number of merge triplets (`num_leaves - 1`).
    pub fn len(&self) -> usize {
        self.triplets.len()
    }

    /// Always `false`; an ancestry list describes at least two leaves.
    pub fn is_empty(&self) -> bool {
        self.triplets.is_empty()
    }

    /// Returns the root triplet (the last merge).
    pub fn root(&self) -> &Triplet {
        &self.triplets[self.triplets.len() - 1]
    }

    /// Returns the triplet that created `parent`, if `parent` is an internal node.
    pub fn get(&self, parent: NodeId) -> Option<&Triplet> {
        parent
            .checked_sub(self.num_leaves())
            .and_then(|row| self.triplets.get(row))
    }

    /// Returns whether `node` is an internal node of this tree.
    pub fn is_internal(&self, node: NodeId) -> bool {
        node >= self.num_leaves()
    }

    /// Returns the parent of every node, indexed by node id (`0..2n - 1`).
    ///
    /// The root is its own parent.
    pub fn parent_ids(&self) -> Vec<NodeId> {
        let mut parents: Vec<NodeId> = (0..2 * self.num_leaves() - 1).collect();
        for triplet in &self.triplets {
            parents[triplet.child1] = triplet.parent;
            parents[triplet.child2] = triplet.parent;
        }
        parents
    }

    /// Returns the triplets in creation order.
    pub fn triplets(&self) -> &[Triplet] {
        &self.triplets
    }

    /// Returns an iterator over the triplets in creation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Triplet> {
        self.triplets.iter()
    }

    /// Consumes the ancestry and returns its triplets.
    pub fn into_triplets(self) -> Vec<Triplet> {
        self.triplets
    }
}

impl Index<NodeId> for Ancestry {
    type Output = Triplet;

    /// Triplet that created the internal node `parent`.
    ///
    /// # Panics
    /// Panics if `parent` is not an internal node of this tree.
    fn index(&self, parent: NodeId) -> &Self::Output {
        &self.triplets[parent - self.num_leaves()]
    }
}

impl<'a> IntoIterator for &'a Ancestry {
    type Item = &'a Triplet;
    type IntoIter = std::slice::Iter<'a, Triplet>;

    fn into_iter(self) -> Self::IntoIter {
        self.triplets.iter()
    }
}

// ============================================================================
// Decoding helpers
// ============================================================================
/// Turns a vector into its list of leaf pairs, deepest pair first.
///
/// Starting with `(0, 1)`, leaf `i + 1` is paired as follows:
/// - `v[i] <= i`: it attaches to the branch above `v[i]`, the new pair
///   `(v[i], i + 1)` becomes the deepest one
/// - `v[i] > i`: it attaches to an internal branch, the pair is inserted
///   `v[i] - i` positions deep, pairing with the first node of the pair above
fn get_pairs(v: &[usize]) -> Vec<(NodeId, NodeId)> {
    let mut pairs: Vec<(NodeId, NodeId)> = Vec::with_capacity(v.len());
    pairs.push((0, 1));

    for (i, &v_i) in v.iter().enumerate().skip(1) {
        let next_leaf = i + 1;
        if v_i <= i {
            pairs.insert(0, (v_i, next_leaf));
        } else {
            // pairs.len() == i here, so 1 <= depth <= i
            let depth = v_i - pairs.len();
            let sibling = pairs[depth - 1].0;
            pairs.insert(depth, (sibling, next_leaf));
        }
    }

    pairs
}

/// Assigns parent ids `n, n + 1, ...` to the pairs in order.
///
/// Tracks for every node its current topmost ancestor (`parents`) and for every
/// leaf the sibling of its latest merge (`siblings`), so that a pair of leaves
/// resolves to the subtrees they currently belong to.
fn assign_parents(pairs: &[(NodeId, NodeId)]) -> Vec<Triplet> {
    let num_leaves = pairs.len() + 1;
    let mut parents: Vec<NodeId> = (0..2 * num_leaves - 1).collect();
    let mut siblings: Vec<NodeId> = (0..num_leaves).collect();
    let mut triplets = Vec::with_capacity(pairs.len());

    for (i, &(child1, child2)) in pairs.iter().enumerate() {
        let next_parent = num_leaves + i;
        let parent_child1 = parents[child1];
        let parent_child2 = parents[child2];

        triplets.push(Triplet::new(parent_child1, parent_child2, next_parent));

        for node in [
            child1,
            child2,
            siblings[child1],
            siblings[child2],
            parent_child1,
            parent_child2,
        ] {
            parents[node] = next_parent;
        }

        siblings[child1] = child2;
        siblings[child2] = child1;
    }

    triplets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_of_nested_tree() {
        assert_eq!(get_pairs(&[0, 0]), vec![(0, 2), (0, 1)]);
        assert_eq!(get_pairs(&[0, 1, 4]), vec![(1, 2), (0, 1), (0, 3)]);
    }

    #[test]
    fn test_ancestry_from_vector() {
        let ancestry = Ancestry::from_vector(&[0, 1, 4]).unwrap();
        assert_eq!(
            ancestry.triplets(),
            &[
                Triplet::new(1, 2, 4),
                Triplet::new(0, 4, 5),
                Triplet::new(5, 3, 6)
            ]
        );
        assert_eq!(ancestry.num_leaves(), 4);
        assert_eq!(ancestry.root().parent, 6);
        assert_eq!(ancestry.get(5), Some(&Triplet::new(0, 4, 5)));
        assert_eq!(ancestry.get(3), None);
        assert_eq!(ancestry.get(7), None);
        assert_eq!(ancestry.parent_ids(), vec![5, 4, 4, 6, 5, 6, 6]);
    }

    #[test]
    fn test_ancestry_of_two_leaves() {
        let ancestry = Ancestry::from_vector(&[0]).unwrap();
        assert_eq!(ancestry.triplets(), &[Triplet::new(0, 1, 2)]);
    }

    #[test]
    fn test_empty_vector_is_rejected() {
        assert!(matches!(
            Ancestry::from_vector(&[]),
            Err(Phylo2VecError::InvalidVector(_))
        ));
    }

    #[test]
    fn test_from_triplets_accepts_decoded_ancestry() {
        let decoded = Ancestry::from_vector(&[0, 2, 2, 5]).unwrap();
        let rebuilt = Ancestry::from_triplets(decoded.triplets().to_vec()).unwrap();
        assert_eq!(decoded, rebuilt);
    }

    #[test]
    fn test_from_triplets_rejects_inconsistencies() {
        // Wrong parent numbering
        let result = Ancestry::from_triplets(vec![Triplet::new(0, 1, 3)]);
        assert!(matches!(result, Err(Phylo2VecError::InconsistentAncestry(_))));

        // Child used twice
        let result =
            Ancestry::from_triplets(vec![Triplet::new(0, 1, 3), Triplet::new(0, 2, 4)]);
        assert!(matches!(result, Err(Phylo2VecError::InconsistentAncestry(_))));

        // Internal child used before it is created
        let result =
            Ancestry::from_triplets(vec![Triplet::new(4, 1, 3), Triplet::new(0, 2, 4)]);
        assert!(matches!(result, Err(Phylo2VecError::InconsistentAncestry(_))));
    }
}
