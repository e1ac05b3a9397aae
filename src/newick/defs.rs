//! Constants and definitions for the Newick scanner and writer.

/// Newick label delimiters: parentheses, comma, colon, semicolon, whitespace
pub(crate) const NEWICK_LABEL_DELIMITERS: &[u8] = b"(,:; \n\t\r)";

/// Delimiters ending an unquoted parent label
pub(crate) const PARENT_LABEL_DELIMITERS: &[u8] = b",:;() \n\t\r";

/// Delimiters ending a branch length
pub(crate) const BRANCH_LENGTH_DELIMITERS: &[u8] = b",;() \n\t\r";

/// Default number of decimals written for branch lengths
pub const DEFAULT_BRANCH_LENGTH_PRECISION: usize = 6;

/// Extra buffer in Newick string length/capacity estimate
pub(crate) const BUFFER_CHARS: usize = 10;
