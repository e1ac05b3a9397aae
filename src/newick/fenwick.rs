//! Counting Fenwick tree (binary indexed tree) over node ids.
//!
//! Supports point increments and inclusive prefix counts in O(log n) time.

/// A Fenwick tree counting how often each position in `0..n` was marked.
///
/// Uses 1-based indexing internally.
#[derive(Debug, Clone)]
pub struct Fenwick {
    tree: Vec<usize>,
    n: usize,
}

impl Fenwick {
    /// Create a Fenwick tree of size `n` with all counts zero.
    pub fn new(n: usize) -> Self {
        Self {
            tree: vec![0; n + 1],
            n,
        }
    }

    /// Add `delta` to the count at position `i` (0-based).
    ///
    /// Positions outside `0..n` are ignored.
    pub fn update(&mut self, i: usize, delta: usize) {
        let mut idx = i + 1;
        while idx <= self.n {
            self.tree[idx] += delta;
            idx += lowbit(idx);
        }
    }

    /// Sum of counts in `[0, i]` (inclusive, 0-based).
    ///
    /// Positions past the end are clamped to the last one.
    pub fn prefix_sum(&self, i: usize) -> usize {
        let mut idx = (i + 1).min(self.n);
        let mut sum = 0;
        while idx > 0 {
            sum += self.tree[idx];
            idx -= lowbit(idx);
        }
        sum
    }

    /// Number of positions in the tree.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the tree has no positions.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}

/// Lowest set bit of `i` (i.e., `i & -i`).
#[inline]
fn lowbit(i: usize) -> usize {
    i & i.wrapping_neg()
}
