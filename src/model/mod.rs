//! Data model of the codec.
//!
//! - [Ancestry] + [Triplet]: the merge list of a tree, the intermediate form
//!   both directions of the codec converge on. Decoding a vector happens in
//!   [Ancestry::from_vector].
//! - [vector]: validation of Phylo2Vec vectors and leaf add/remove operations.
//! - [Phylo2Mat]: a vector plus branch lengths.
//! - [LeafLabelMap]: taxon labels of trees renamed to integer leaves.
//! - [distance]: cophenetic distances between leaves.

/// Merge triplets and vector decoding
pub mod ancestry;
/// Pairwise leaf distances
pub mod distance;
/// Leaf label mapping to integer leaf ids
pub mod leaf_label_map;
/// Vectors with branch lengths
pub mod matrix;
/// Vector validation and operations
pub mod vector;

pub use ancestry::{Ancestry, NodeId, Triplet};
pub use distance::{cophenetic_distances, cophenetic_distances_with_lengths};
pub use leaf_label_map::LeafLabelMap;
pub use matrix::{BranchLengthPair, Phylo2Mat, validate_matrix};
pub use vector::validate_vector;
