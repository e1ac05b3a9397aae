//! Newick serialization of ancestry lists.

use crate::error::{Phylo2VecError, Result};
use crate::model::ancestry::{Ancestry, NodeId, Triplet};
use crate::model::matrix::BranchLengthPair;
use crate::newick::defs::{BUFFER_CHARS, DEFAULT_BRANCH_LENGTH_PRECISION};

// =#========================================================================#=
// NEWICK WRITER
// =#========================================================================$=
/// Writer (configuration) turning an [Ancestry] into an integer Newick string.
///
/// # Configuration
/// * `without_parent_labels()` - Omit the label after each `)`;
///   parent labels are written by default
/// * `with_precision(precision)` - Maximal number of decimals of branch
///   lengths (default [DEFAULT_BRANCH_LENGTH_PRECISION]); trailing zeros
///   are trimmed
///
/// # Algorithm
/// The string starts out as the root merge `"(c1,c2)p;"`. Internal children
/// are expanded from a stack: the token of an internal node `p` is replaced
/// in place by `"(c1,c2)p"`, at an offset recorded when the token was
/// written. Since the stack always expands the rightmost pending node, no
/// recorded offset of a pending node is invalidated by a replacement.
///
/// # Example
/// ```
/// use phylo2vec::model::Ancestry;
/// use phylo2vec::newick::NewickWriter;
///
/// let ancestry = Ancestry::from_vector(&[0, 1, 4]).unwrap();
/// assert_eq!(NewickWriter::new().write(&ancestry).unwrap(), "((0,(1,2)4)5,3)6;");
/// assert_eq!(
///     NewickWriter::new().without_parent_labels().write(&ancestry).unwrap(),
///     "((0,(1,2)),3);"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewickWriter {
    parent_labels: bool,
    precision: usize,
}

impl Default for NewickWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl NewickWriter {
    /// Creates a writer with parent labels and default precision.
    pub fn new() -> Self {
        Self {
            parent_labels: true,
            precision: DEFAULT_BRANCH_LENGTH_PRECISION,
        }
    }

    /// Omits parent labels.
    pub fn without_parent_labels(mut self) -> Self {
        self.parent_labels = false;
        self
    }

    /// Sets the maximal number of decimals written for branch lengths.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Returns the topology of the ancestry list as Newick string.
    ///
    /// # Errors
    /// [Phylo2VecError::InconsistentAncestry] if an internal child has no
    /// triplet in the list (impossible for lists built by [Ancestry]).
    pub fn write(&self, ancestry: &Ancestry) -> Result<String> {
        self.write_newick(ancestry, None)
    }

    /// Returns the ancestry list with branch lengths as Newick string.
    ///
    /// # Arguments
    /// * `ancestry` - Topology
    /// * `branch_lengths` - One pair per triplet, `(length to child1, length to child2)`
    ///
    /// # Errors
    /// * [Phylo2VecError::InvalidMatrix] - If the number of pairs differs from
    ///   the number of triplets
    /// * [Phylo2VecError::InconsistentAncestry] - See [NewickWriter::write]
    pub fn write_with_branch_lengths(
        &self,
        ancestry: &Ancestry,
        branch_lengths: &[BranchLengthPair],
    ) -> Result<String> {
        if branch_lengths.len() != ancestry.len() {
            return Err(Phylo2VecError::InvalidMatrix(format!(
                "expected {} branch length pairs but found {}",
                ancestry.len(),
                branch_lengths.len()
            )));
        }
        self.write_newick(ancestry, Some(branch_lengths))
    }

    fn write_newick(
        &self,
        ancestry: &Ancestry,
        branch_lengths: Option<&[BranchLengthPair]>,
    ) -> Result<String> {
        let num_leaves = ancestry.num_leaves();
        let mut offsets = vec![0usize; 2 * num_leaves - 1];
        let mut pending: Vec<NodeId> = Vec::new();

        let capacity = self.estimate_newick_len(ancestry, branch_lengths.is_some());
        let mut newick = String::with_capacity(capacity);
        let root = ancestry.root();
        self.push_subtree(&mut newick, root, branch_lengths, num_leaves, &mut offsets, 0);
        newick.push(';');
        push_internal_children(root, num_leaves, &mut pending);

        while let Some(parent) = pending.pop() {
            let triplet = ancestry.get(parent).ok_or_else(|| {
                Phylo2VecError::InconsistentAncestry(format!(
                    "internal node {parent} has no triplet in the ancestry list"
                ))
            })?;

            let start = offsets[parent];
            let mut subtree = String::new();
            self.push_subtree(
                &mut subtree,
                triplet,
                branch_lengths,
                num_leaves,
                &mut offsets,
                start,
            );
            newick.replace_range(start..start + count_digits(parent), &subtree);

            push_internal_children(triplet, num_leaves, &mut pending);
        }

        Ok(newick)
    }

    /// Appends `"(c1[:l1],c2[:l2])[p]"` and records the offsets of both children,
    /// given that `out` will be placed at offset `start` of the full string.
    fn push_subtree(
        &self,
        out: &mut String,
        triplet: &Triplet,
        branch_lengths: Option<&[BranchLengthPair]>,
        num_leaves: usize,
        offsets: &mut [usize],
        start: usize,
    ) {
        let lengths = branch_lengths.and_then(|bls| bls.get(triplet.parent - num_leaves));

        out.push('(');
        offsets[triplet.child1] = start + out.len();
        out.push_str(&triplet.child1.to_string());
        if let Some([length1, _]) = lengths {
            out.push(':');
            out.push_str(&format_branch_length(*length1, self.precision));
        }

        out.push(',');
        offsets[triplet.child2] = start + out.len();
        out.push_str(&triplet.child2.to_string());
        if let Some([_, length2]) = lengths {
            out.push(':');
            out.push_str(&format_branch_length(*length2, self.precision));
        }

        out.push(')');
        if self.parent_labels {
            out.push_str(&triplet.parent.to_string());
        }
    }

    /// Estimates the length of the Newick string for pre-allocation.
    fn estimate_newick_len(&self, ancestry: &Ancestry, with_lengths: bool) -> usize {
        // Each merge: "(,)" ~= 3 chars
        const INTERNAL_NODE_CHARS: usize = 3;
        // Branch lengths: ':' plus integer part plus decimals
        let branch_length_chars = self.precision + 4;

        let num_nodes = 2 * ancestry.num_leaves() - 1;
        let id_chars = num_nodes * count_digits(num_nodes);
        let length_chars = if with_lengths { (num_nodes - 1) * branch_length_chars } else { 0 };

        ancestry.len() * INTERNAL_NODE_CHARS + id_chars + length_chars + BUFFER_CHARS
    }
}

/// Pushes the internal children of a triplet, first child first.
fn push_internal_children(triplet: &Triplet, num_leaves: usize, pending: &mut Vec<NodeId>) {
    for child in [triplet.child1, triplet.child2] {
        if child >= num_leaves {
            pending.push(child);
        }
    }
}

/// Number of decimal digits of `id`.
fn count_digits(id: usize) -> usize {
    id.checked_ilog10().map_or(1, |log| log as usize + 1)
}

/// Formats a branch length with at most `precision` decimals.
///
/// Trailing zeros (and a trailing decimal point) are trimmed, so `2.5` is
/// written as `2.5` and `3.0` as `3`.
///
/// # Example
/// ```
/// use phylo2vec::newick::writer::format_branch_length;
///
/// assert_eq!(format_branch_length(0.1234567, 6), "0.123457");
/// assert_eq!(format_branch_length(3.0, 6), "3");
/// ```
pub fn format_branch_length(length: f64, precision: usize) -> String {
    let formatted = format!("{length:.precision$}");
    if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        formatted
    }
}
