//! Vector building: canonical cherries to Phylo2Vec vector.

use crate::newick::cherries::Cherry;
use crate::newick::fenwick::Fenwick;

/// Builds the Phylo2Vec vector from cherries in creation order.
///
/// For the cherry at position `i` with larger child `m`, let `rank` be the
/// number of earlier cherries whose larger child is `<= m`:
/// - `rank == 0`: `v[m - 1] = min(child1, child2)`
/// - otherwise: `v[m - 1] = m - 1 + rank`
///
/// Ranks are counted with a [Fenwick] tree over leaf ids.
///
/// # Arguments
/// * `cherries` - Output of
///   [order_cherries_no_parents](crate::newick::canonical::order_cherries_no_parents)
///   or [order_cherries](crate::newick::canonical::order_cherries): leaf
///   children, every leaf `1..n` the larger child of exactly one cherry
///
/// # Example
/// ```
/// use phylo2vec::newick::{Cherry, vector_builder::build_vector};
///
/// let cherries = [Cherry::new(1, 2, 2), Cherry::new(0, 1, 1), Cherry::new(0, 3, 3)];
/// assert_eq!(build_vector(&cherries), vec![0, 1, 4]);
/// ```
pub fn build_vector(cherries: &[Cherry]) -> Vec<usize> {
    let num_leaves = cherries.len() + 1;
    let mut v = vec![0; cherries.len()];
    let mut merged = Fenwick::new(num_leaves);

    for cherry in cherries {
        let c_max = cherry.max_child();
        let rank = merged.prefix_sum(c_max);

        v[c_max - 1] = if rank == 0 {
            cherry.min_child()
        } else {
            c_max - 1 + rank
        };

        merged.update(c_max, 1);
    }

    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_vector_small_trees() {
        assert_eq!(build_vector(&[Cherry::new(0, 1, 1)]), vec![0]);
        // ((0,2),1)
        assert_eq!(
            build_vector(&[Cherry::new(0, 2, 2), Cherry::new(0, 1, 1)]),
            vec![0, 0]
        );
    }

    #[test]
    fn test_build_vector_balanced_tree() {
        // ((0,1),(2,3)) in creation order
        let cherries = [Cherry::new(2, 3, 3), Cherry::new(0, 1, 1), Cherry::new(0, 2, 2)];
        assert_eq!(build_vector(&cherries), vec![0, 2, 2]);
    }
}
