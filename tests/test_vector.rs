use phylo2vec::model::vector::{add_leaf, ancestry_paths, common_ancestor, is_ordered, remove_leaf};
use phylo2vec::model::{Ancestry, cophenetic_distances};
use phylo2vec::newick::utils::remove_parent_labels;
use phylo2vec::{
    Phylo2VecError, newick_to_vector, newick_to_vector_no_parents, validate_vector,
    vector_to_newick,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random valid vectors of trees with 2 to `max_leaves` leaves
fn vectors(max_leaves: usize) -> impl Strategy<Value = Vec<usize>> {
    (2..=max_leaves).prop_flat_map(|n| (0..n - 1).map(|i| 0..=2 * i).collect::<Vec<_>>())
}

/// Random parent labels (by triplet row), each larger than its children's
fn random_labels(ancestry: &Ancestry, rng: &mut StdRng) -> Vec<usize> {
    let num_leaves = ancestry.num_leaves();
    let parents = ancestry.parent_ids();

    let mut unlabelled_children: Vec<usize> = ancestry
        .iter()
        .map(|t| [t.child1, t.child2].iter().filter(|&&c| c >= num_leaves).count())
        .collect();
    let mut ready: Vec<usize> = (0..ancestry.len())
        .filter(|&row| unlabelled_children[row] == 0)
        .collect();

    let mut labels = vec![0; ancestry.len()];
    let mut next = num_leaves + rng.gen_range(0..3);
    while !ready.is_empty() {
        let row = ready.swap_remove(rng.gen_range(0..ready.len()));
        labels[row] = next;
        next += 1 + rng.gen_range(0..3);

        let node = num_leaves + row;
        if parents[node] != node {
            let parent_row = parents[node] - num_leaves;
            unlabelled_children[parent_row] -= 1;
            if unlabelled_children[parent_row] == 0 {
                ready.push(parent_row);
            }
        }
    }
    labels
}

/// Writes the subtree of `node` with the given parent labels and child swaps
fn render(ancestry: &Ancestry, node: usize, labels: &[usize], swaps: &[bool], out: &mut String) {
    let Some(triplet) = ancestry.get(node) else {
        out.push_str(&node.to_string());
        return;
    };
    let row = node - ancestry.num_leaves();
    let (first, second) = if swaps[row] {
        (triplet.child2, triplet.child1)
    } else {
        (triplet.child1, triplet.child2)
    };

    out.push('(');
    render(ancestry, first, labels, swaps, out);
    out.push(',');
    render(ancestry, second, labels, swaps, out);
    out.push(')');
    out.push_str(&labels[row].to_string());
}

// --- TESTS CONCRETE TREES ---
#[test]
fn test_nested_cherry_of_cherry() {
    let newick = vector_to_newick(&[0, 0]).unwrap();
    assert_eq!(newick, "((0,2)3,1)4;");
    assert_eq!(newick_to_vector(&newick).unwrap(), vec![0, 0]);
}

#[test]
fn test_four_leaves_idempotent() {
    let v = vec![0, 1, 4];
    let newick = vector_to_newick(&v).unwrap();
    assert_eq!(newick, "((0,(1,2)4)5,3)6;");

    let decoded = newick_to_vector(&newick).unwrap();
    assert_eq!(decoded, v);
    assert_eq!(vector_to_newick(&decoded).unwrap(), newick);
}

#[test]
fn test_two_leaves() {
    assert_eq!(vector_to_newick(&[0]).unwrap(), "(0,1)2;");
    assert_eq!(newick_to_vector("(1,0)2;").unwrap(), vec![0]);
}

#[test]
fn test_balanced_tree() {
    assert_eq!(vector_to_newick(&[0, 2, 2]).unwrap(), "((0,1)5,(2,3)4)6;");
    // Child order and internal labels of the input don't matter
    assert_eq!(newick_to_vector("((3,2)7,(1,0)9)11;").unwrap(), vec![0, 2, 2]);
    assert_eq!(newick_to_vector("((3,2)9,(1,0)7)11;").unwrap(), vec![0, 2, 2]);
    assert_eq!(newick_to_vector_no_parents("((2,3),(0,1));").unwrap(), vec![0, 2, 2]);
}

// --- TESTS VALIDATION ---
#[test]
fn test_validator_rejects_out_of_range() {
    assert!(matches!(
        validate_vector(&[0, 3]),
        Err(Phylo2VecError::InvalidVector(_))
    ));
    assert!(matches!(
        vector_to_newick(&[0, 3]),
        Err(Phylo2VecError::InvalidVector(_))
    ));
    assert!(validate_vector(&[0, 2]).is_ok());
}

#[test]
fn test_empty_vector_cannot_be_decoded() {
    assert!(validate_vector(&[]).is_ok());
    assert!(matches!(
        vector_to_newick(&[]),
        Err(Phylo2VecError::InvalidVector(_))
    ));
}

#[test]
fn test_ordered_vectors() {
    assert!(is_ordered(&[0, 1, 2, 0]));
    assert!(!is_ordered(&[0, 1, 4]));
}

// --- TESTS LEAF OPERATIONS ---
#[test]
fn test_add_leaf_extends_with_largest_label() {
    assert_eq!(add_leaf(&[0, 1], 3, 4).unwrap(), vec![0, 1, 4]);
}

#[test]
fn test_remove_leaf_returns_sister() {
    assert_eq!(remove_leaf(&[0, 1, 4], 2).unwrap(), (vec![0, 2], 1));
}

proptest! {
    #[test]
    fn vector_round_trip(v in vectors(60)) {
        let newick = vector_to_newick(&v).unwrap();
        prop_assert_eq!(newick_to_vector(&newick).unwrap(), v);
    }

    #[test]
    fn dialects_agree(v in vectors(60)) {
        let newick = vector_to_newick(&v).unwrap();
        let with_parents = newick_to_vector(&newick).unwrap();
        let without_parents = newick_to_vector_no_parents(&remove_parent_labels(&newick)).unwrap();
        prop_assert_eq!(with_parents, without_parents);
    }

    #[test]
    fn encoding_ignores_labels_and_child_order(v in vectors(40), seed in any::<u64>()) {
        let ancestry = Ancestry::from_vector(&v).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let labels = random_labels(&ancestry, &mut rng);
        let swaps: Vec<bool> = (0..ancestry.len()).map(|_| rng.gen_bool(0.5)).collect();

        let mut newick = String::new();
        render(&ancestry, ancestry.root().parent, &labels, &swaps, &mut newick);
        newick.push(';');

        prop_assert_eq!(newick_to_vector(&newick).unwrap(), v.clone());
        prop_assert_eq!(newick_to_vector_no_parents(&remove_parent_labels(&newick)).unwrap(), v);
    }

    #[test]
    fn distances_follow_common_ancestors(v in vectors(25)) {
        let ancestry = Ancestry::from_vector(&v).unwrap();
        let distances = cophenetic_distances(&ancestry);
        let paths = ancestry_paths(&v).unwrap();
        let depth = |node: usize| paths[node].len() - 1;

        for a in 0..ancestry.num_leaves() {
            for b in 0..ancestry.num_leaves() {
                let mrca = common_ancestor(&v, a, b).unwrap();
                prop_assert!(paths[a].starts_with(&paths[mrca]));
                prop_assert!(paths[b].starts_with(&paths[mrca]));
                prop_assert_eq!(distances[a][b], depth(a) + depth(b) - 2 * depth(mrca));
            }
        }
    }

    #[test]
    fn add_then_remove_leaf(
        v in vectors(40),
        leaf_seed in any::<usize>(),
        branch_seed in any::<usize>(),
    ) {
        let num_leaves = v.len() + 1;
        let leaf = leaf_seed % (num_leaves + 1);
        let branch = branch_seed % (2 * num_leaves - 1);

        let extended = add_leaf(&v, leaf, branch).unwrap();
        prop_assert!(validate_vector(&extended).is_ok());
        prop_assert_eq!(extended.len(), v.len() + 1);

        let (reduced, _) = remove_leaf(&extended, leaf).unwrap();
        prop_assert_eq!(reduced, v);
    }

    #[test]
    fn add_largest_leaf_appends(v in vectors(40), branch_seed in any::<usize>()) {
        let num_leaves = v.len() + 1;
        let branch = branch_seed % (2 * num_leaves - 1);

        let mut expected = v.clone();
        expected.push(branch);
        prop_assert_eq!(add_leaf(&v, num_leaves, branch).unwrap(), expected);
    }
}
