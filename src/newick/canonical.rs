//! Canonical ordering of cherries.
//!
//! Different strings for the same topology may label internal nodes
//! differently (or not at all). The orderings here rewrite cherries into
//! creation order with leaf-only children, so that the encoded vector only
//! depends on the topology:
//! - [order_cherries] resolves parent labels into leaf-only cherries
//! - [order_cherries_no_parents] infers the creation order of leaf-only cherries
//! - [canonical_order] combines them for either kind of string
//!
//! All return the permutation applied, i.e. the index of the input cherry
//! each output cherry stems from, used to carry branch lengths along.

use crate::model::ancestry::NodeId;
use crate::newick::cherries::Cherry;
use crate::parser::parsing_error::ParsingError;
use log::trace;
use std::collections::HashMap;

/// Orders labelled cherries by parent label and resolves internal children.
///
/// Each internal child is replaced by the smallest leaf below it, and the
/// label of each output cherry becomes `max(child1, child2)`. Children keep
/// their orientation, so branch length pairs stay valid.
///
/// The result is in creation order only if the labels are; pass it through
/// [order_cherries_no_parents] (as [canonical_order] does) for arbitrary labels.
///
/// # Returns
/// * `Ok((ordered, order))` - Canonical cherries and for each of them the
///   index of the input cherry it was built from
/// * [ParsingError] - If a parent label is a leaf id or repeated, or if an
///   internal child is not the label of a cherry with a smaller label
///
/// # Example
/// ```
/// use phylo2vec::newick::{Cherry, canonical::order_cherries};
///
/// // ((0,2)3,1)4; with its cherries listed root first
/// let cherries = [Cherry::new(3, 1, 4), Cherry::new(0, 2, 3)];
/// let (ordered, order) = order_cherries(&cherries).unwrap();
/// assert_eq!(ordered, vec![Cherry::new(0, 2, 2), Cherry::new(0, 1, 1)]);
/// assert_eq!(order, vec![1, 0]);
/// ```
pub fn order_cherries(cherries: &[Cherry]) -> Result<(Vec<Cherry>, Vec<usize>), ParsingError> {
    let num_leaves = cherries.len() + 1;

    let mut order: Vec<usize> = (0..cherries.len()).collect();
    order.sort_by_key(|&i| cherries[i].label);

    let mut small_children: HashMap<NodeId, NodeId> = HashMap::with_capacity(cherries.len());
    let mut ordered = Vec::with_capacity(cherries.len());

    for &i in &order {
        let cherry = &cherries[i];
        if cherry.label < num_leaves {
            return Err(ParsingError::invalid_tree_structure(format!(
                "parent label {} collides with leaf ids 0..{num_leaves}",
                cherry.label
            )));
        }

        let child1 = resolve_child(cherry.child1, num_leaves, &small_children)?;
        let child2 = resolve_child(cherry.child2, num_leaves, &small_children)?;

        if small_children.insert(cherry.label, child1.min(child2)).is_some() {
            return Err(ParsingError::invalid_tree_structure(format!(
                "parent label {} appears more than once",
                cherry.label
            )));
        }

        let resolved = Cherry::new(child1, child2, child1.max(child2));
        trace!("cherry {cherry} resolved to {resolved}");
        ordered.push(resolved);
    }

    Ok((ordered, order))
}

/// Brings cherries into canonical creation order.
///
/// With `parent_labels`, labels are first resolved by [order_cherries];
/// any labelling consistent with the tree (children labelled before their
/// parent) then yields the same order. Without, the cherries are expected
/// as read from a label-free string.
///
/// # Cost
/// `O(n^2)` for `n` leaves with or without labels: labels only fix which
/// subtrees merge, while the creation order still comes from
/// [order_cherries_no_parents]. Labels are not trusted to be in creation
/// order, as that depends on the topology (`((3,2)9,(1,0)7)11;` is a valid
/// labelling whose label order is not the creation order).
///
/// # Returns
/// * `Ok((ordered, order))` - Leaf-only cherries in creation order and for
///   each of them the index of the input cherry
/// * [ParsingError] - See [order_cherries] and [order_cherries_no_parents]
///
/// # Example
/// ```
/// use phylo2vec::newick::{Cherry, canonical::canonical_order};
///
/// // ((3,2)9,(1,0)7)11; labels the cherries in an unusual order
/// let cherries = [Cherry::new(3, 2, 9), Cherry::new(1, 0, 7), Cherry::new(9, 7, 11)];
/// let (ordered, order) = canonical_order(&cherries, true).unwrap();
/// assert_eq!(
///     ordered,
///     vec![Cherry::new(3, 2, 3), Cherry::new(1, 0, 1), Cherry::new(2, 0, 2)]
/// );
/// assert_eq!(order, vec![0, 1, 2]);
/// ```
pub fn canonical_order(
    cherries: &[Cherry],
    parent_labels: bool,
) -> Result<(Vec<Cherry>, Vec<usize>), ParsingError> {
    if !parent_labels {
        return order_cherries_no_parents(cherries);
    }

    let (resolved, label_order) = order_cherries(cherries)?;
    let (ordered, order) = order_cherries_no_parents(&resolved)?;
    Ok((ordered, order.into_iter().map(|k| label_order[k]).collect()))
}

/// Returns the smallest leaf below `child`.
fn resolve_child(
    child: NodeId,
    num_leaves: usize,
    small_children: &HashMap<NodeId, NodeId>,
) -> Result<NodeId, ParsingError> {
    if child < num_leaves {
        return Ok(child);
    }
    small_children.get(&child).copied().ok_or_else(|| {
        ParsingError::invalid_tree_structure(format!(
            "internal node {child} is used before a cherry with that label"
        ))
    })
}

/// Infers the creation order of label-free cherries.
///
/// Expects cherries whose children are leaves standing for their subtrees
/// (the smallest leaf below them) and whose label is `max(child1, child2)`.
///
/// In each round, the remaining cherries are scanned in input order while
/// marking their children as visited. A cherry whose children are both still
/// unvisited when it is reached is a candidate; the candidate with the
/// largest label is the next merge. Each round starts with all leaves
/// unvisited again.
///
/// Runs in `O(n^2)`.
///
/// # Returns
/// * `Ok((ordered, order))` - Cherries in creation order and for each of them
///   the index of the input cherry
/// * [ParsingError] - If a child is not a leaf id or no candidate is left,
///   meaning the cherries do not describe a rooted binary tree
///
/// # Example
/// ```
/// use phylo2vec::newick::{Cherry, canonical::order_cherries_no_parents};
///
/// // ((0,(1,2)),3);
/// let cherries = [Cherry::new(1, 2, 2), Cherry::new(0, 1, 1), Cherry::new(0, 3, 3)];
/// let (ordered, order) = order_cherries_no_parents(&cherries).unwrap();
/// assert_eq!(order, vec![0, 1, 2]);
/// assert_eq!(ordered, cherries.to_vec());
/// ```
pub fn order_cherries_no_parents(
    cherries: &[Cherry],
) -> Result<(Vec<Cherry>, Vec<usize>), ParsingError> {
    let num_leaves = cherries.len() + 1;

    if let Some(cherry) = cherries.iter().find(|c| c.max_child() >= num_leaves) {
        return Err(ParsingError::invalid_tree_structure(format!(
            "cherry {cherry} refers to a node outside leaf ids 0..{num_leaves}"
        )));
    }

    let mut selected = vec![false; cherries.len()];
    let mut unvisited = vec![true; num_leaves];
    let mut ordered = Vec::with_capacity(cherries.len());
    let mut order = Vec::with_capacity(cherries.len());

    for round in 0..cherries.len() {
        unvisited.fill(true);
        let mut best: Option<usize> = None;

        for (i, cherry) in cherries.iter().enumerate() {
            if selected[i] {
                continue;
            }

            let is_candidate = unvisited[cherry.child1] && unvisited[cherry.child2];
            let beats_best = best.is_none_or(|b| cherry.label > cherries[b].label);
            if is_candidate && beats_best {
                best = Some(i);
            }

            unvisited[cherry.child1] = false;
            unvisited[cherry.child2] = false;
        }

        let Some(best) = best else {
            return Err(ParsingError::invalid_tree_structure(format!(
                "no cherry can be merged in round {round}"
            )));
        };

        trace!("round {round}: merging {}", cherries[best]);
        selected[best] = true;
        ordered.push(cherries[best]);
        order.push(best);
    }

    Ok((ordered, order))
}
