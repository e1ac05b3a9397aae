//! Leaf label module: mapping between taxon labels and integer leaf ids.
//!
//! - `LeafLabelMap`: Joined storage and lookup for the taxa of a tree whose
//!   leaves have been renamed to `0..n` for encoding.

use crate::model::ancestry::NodeId;
use std::collections::HashMap;
use std::fmt;

// =#========================================================================#=
// LEAF LABEL MAP
// =#========================================================================$=
/// Maps taxon labels (strings) to the integer leaf ids used by the codec.
///
/// Ids are handed out in insertion order, so the `i`-th distinct label gets
/// leaf id `i`. Inserting the same label twice returns the same id.
///
/// # Example
/// ```
/// use phylo2vec::model::LeafLabelMap;
///
/// let mut labels = LeafLabelMap::new(3);
///
/// let kea = labels.get_or_insert("Kea");     // 0
/// let kaka = labels.get_or_insert("Kaka");   // 1
/// let kea2 = labels.get_or_insert("Kea");    // 0 (deduplicated)
///
/// assert_eq!(kea, kea2);
/// assert_eq!(labels.get_label(kaka), Some("Kaka"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeafLabelMap {
    /// List of unique labels, indexed by leaf id
    labels: Vec<String>,
    /// Map from label to its leaf id
    map: HashMap<String, NodeId>,
}

impl LeafLabelMap {
    /// Creates a new LeafLabelMap with pre-allocated capacity.
    ///
    /// # Arguments
    /// * `num_leaves` - Expected number of unique leaf labels
    pub fn new(num_leaves: usize) -> Self {
        LeafLabelMap {
            labels: Vec::with_capacity(num_leaves),
            map: HashMap::with_capacity(num_leaves),
        }
    }

    /// Gets the leaf id for a label, inserting it if it doesn't exist.
    ///
    /// # Returns
    /// The leaf id associated with this label
    pub fn get_or_insert(&mut self, label: &str) -> NodeId {
        if let Some(&id) = self.map.get(label) {
            return id;
        }

        let id = self.labels.len();
        self.labels.push(label.to_string());
        self.map.insert(label.to_string(), id);
        id
    }

    /// Retrieves the leaf id for a given label.
    pub fn get_id(&self, label: &str) -> Option<NodeId> {
        self.map.get(label).copied()
    }

    /// Retrieves the label for a given leaf id.
    pub fn get_label(&self, id: NodeId) -> Option<&str> {
        self.labels.get(id).map(|s| s.as_str())
    }

    /// Checks if a label exists in the map.
    pub fn contains_label(&self, label: &str) -> bool {
        self.map.contains_key(label)
    }

    /// Returns the number of labels currently stored.
    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// Returns the labels, indexed by leaf id.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl fmt::Display for LeafLabelMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "LeafLabelMap ({} labels):", self.labels.len())?;
        for (id, label) in self.labels.iter().enumerate() {
            writeln!(f, "  [{}] {}", id, label)?;
        }
        Ok(())
    }
}

impl std::ops::Index<NodeId> for LeafLabelMap {
    type Output = str;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.labels[id]
    }
}
