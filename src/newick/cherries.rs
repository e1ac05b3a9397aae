//! Cherry extraction: single-pass stack scan of integer-labelled Newick strings.
//!
//! - [Cherry]: one merge `(child1, child2, label)` as read from a string.
//! - [NewickDialect]: which of the four dialects to read.
//! - [extract_cherries]: scans a string into unordered cherries (plus branch
//!   length pairs for the branch length dialects).

use crate::model::ancestry::NodeId;
use crate::model::matrix::BranchLengthPair;
use crate::parser::byte_parser::ByteParser;
use crate::parser::parsing_error::{ParsingError, ParsingErrorType};
use std::fmt;

// =#========================================================================#=
// CHERRY
// =#========================================================================$=
/// A merge event as read from a Newick string.
///
/// `label` is the parent label found after `)` or, for label-free strings,
/// `max(child1, child2)`, which is only used to recover the merge order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cherry {
    /// Child pushed first
    pub child1: NodeId,
    /// Child pushed second
    pub child2: NodeId,
    /// Parent label (or synthetic ordering key)
    pub label: NodeId,
}

impl Cherry {
    /// Creates a new cherry.
    pub fn new(child1: NodeId, child2: NodeId, label: NodeId) -> Self {
        Self { child1, child2, label }
    }

    /// Returns the smaller child.
    pub fn min_child(&self) -> NodeId {
        self.child1.min(self.child2)
    }

    /// Returns the larger child.
    pub fn max_child(&self) -> NodeId {
        self.child1.max(self.child2)
    }
}

impl fmt::Display for Cherry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.child1, self.child2, self.label)
    }
}

// =#========================================================================#=
// NEWICK DIALECT
// =#========================================================================$=
/// One of the four supported integer Newick dialects.
///
/// # Configuration
/// * `new()` - Topology only: `((0,2),1);`
/// * `with_parent_labels()` - Label after every `)`: `((0,2)3,1)4;`
/// * `with_branch_lengths()` - `:length` after every non-root node:
///   `((0:0.1,2:0.2):0.5,1:0.3);` (a root length is accepted and ignored)
///
/// # Example
/// ```
/// use phylo2vec::newick::NewickDialect;
///
/// let dialect = NewickDialect::new().with_parent_labels().with_branch_lengths();
/// assert!(dialect.parent_labels() && dialect.branch_lengths());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NewickDialect {
    parent_labels: bool,
    branch_lengths: bool,
}

impl NewickDialect {
    /// Creates the topology-only dialect (no parent labels, no branch lengths).
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects an integer parent label after every closing bracket.
    pub fn with_parent_labels(mut self) -> Self {
        self.parent_labels = true;
        self
    }

    /// Expects a `:length` annotation after every non-root node.
    pub fn with_branch_lengths(mut self) -> Self {
        self.branch_lengths = true;
        self
    }

    /// Whether parent labels are expected.
    pub fn parent_labels(&self) -> bool {
        self.parent_labels
    }

    /// Whether branch lengths are expected.
    pub fn branch_lengths(&self) -> bool {
        self.branch_lengths
    }
}

impl fmt::Display for NewickDialect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let labels = if self.parent_labels {
            "parent labels"
        } else {
            "no parent labels"
        };
        let lengths = if self.branch_lengths {
            "branch lengths"
        } else {
            "no branch lengths"
        };
        write!(f, "{labels}, {lengths}")
    }
}

// =#========================================================================#=
// EXTRACTION
// =#========================================================================$=
/// Cherries read from one Newick string.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedCherries {
    /// Merges in order of their closing brackets
    pub cherries: Vec<Cherry>,
    /// Lengths of `(child1, child2)` per cherry (empty without branch lengths)
    pub branch_lengths: Vec<BranchLengthPair>,
    /// Number of leaves of the tree
    pub num_leaves: usize,
}

/// Open bracket being scanned: how many children and commas it holds so far.
#[derive(Debug, Default)]
struct Frame {
    children: usize,
    commas: usize,
}

/// Scans a Newick string of the given dialect into its cherries.
///
/// Node tokens are pushed onto a stack; every `)` pops the two most recently
/// pushed tokens as `(child1, child2)` and pushes the token that now stands
/// for the merged subtree: the parent label, or the smaller child for
/// label-free strings. Whitespace between tokens is skipped.
///
/// # Arguments
/// * `parser` - Byte parser positioned at the start of the tree
/// * `dialect` - Dialect the string is written in
///
/// # Returns
/// * `Ok(ExtractedCherries)` - Cherries in bracket order, leaves checked to be
///   exactly `0..n`
/// * [ParsingError] - If the string is malformed or not of the given dialect
///
/// # Example
/// ```
/// use phylo2vec::newick::{extract_cherries, Cherry, NewickDialect};
/// use phylo2vec::parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("((0,2)3,1)4;");
/// let dialect = NewickDialect::new().with_parent_labels();
/// let extracted = extract_cherries(&mut parser, dialect).unwrap();
/// assert_eq!(extracted.cherries, vec![Cherry::new(0, 2, 3), Cherry::new(3, 1, 4)]);
/// assert_eq!(extracted.num_leaves, 3);
/// ```
pub fn extract_cherries(
    parser: &mut ByteParser,
    dialect: NewickDialect,
) -> Result<ExtractedCherries, ParsingError> {
    let mut stack: Vec<NodeId> = Vec::new();
    let mut length_stack: Vec<f64> = Vec::new();
    let mut frames: Vec<Frame> = vec![Frame::default()];
    let mut leaves: Vec<NodeId> = Vec::new();
    let mut cherries: Vec<Cherry> = Vec::new();
    let mut branch_lengths: Vec<BranchLengthPair> = Vec::new();

    loop {
        parser.skip_whitespace();
        let Some(byte) = parser.peek() else {
            return Err(ParsingError::from_parser(
                ParsingErrorType::MissingTerminator,
                parser,
            ));
        };

        match byte {
            b';' => break,
            b'(' => {
                expect_node(&frames, parser, byte)?;
                parser.next_byte();
                frames.push(Frame::default());
            }
            b',' => {
                // A comma has to follow a node and separate it from the next one
                let depth = frames.len();
                match frames.last_mut() {
                    Some(frame) if depth > 1 && frame.children == frame.commas + 1 => {
                        frame.commas += 1;
                    }
                    _ => return Err(ParsingError::unexpected_character(parser, byte)),
                }
                parser.next_byte();
            }
            b')' => {
                let frame = match frames.pop() {
                    Some(frame) if !frames.is_empty() => frame,
                    _ => {
                        return Err(ParsingError::from_parser(
                            ParsingErrorType::StackUnderflow,
                            parser,
                        ));
                    }
                };
                if frame.children != 2 || frame.commas != 1 {
                    return Err(ParsingError::from_parser(
                        ParsingErrorType::InvalidTreeStructure(format!(
                            "expected two comma-separated children but found {} children",
                            frame.children
                        )),
                        parser,
                    ));
                }
                parser.next_byte();

                let (child2, child1) = match (stack.pop(), stack.pop()) {
                    (Some(c2), Some(c1)) => (c2, c1),
                    _ => {
                        return Err(ParsingError::from_parser(
                            ParsingErrorType::StackUnderflow,
                            parser,
                        ));
                    }
                };

                let (label, merged) = if dialect.parent_labels {
                    if !parser.peek().is_some_and(|b| b.is_ascii_digit()) {
                        return Err(ParsingError::from_parser(
                            ParsingErrorType::MissingParentLabel,
                            parser,
                        ));
                    }
                    let label = parser.parse_node_id()?;
                    (label, label)
                } else {
                    if let Some(b) = parser.peek().filter(|b| b.is_ascii_digit()) {
                        return Err(ParsingError::unexpected_character(parser, b));
                    }
                    (child1.max(child2), child1.min(child2))
                };
                cherries.push(Cherry::new(child1, child2, label));

                if dialect.branch_lengths {
                    match (length_stack.pop(), length_stack.pop()) {
                        (Some(length2), Some(length1)) => branch_lengths.push([length1, length2]),
                        _ => {
                            return Err(ParsingError::from_parser(
                                ParsingErrorType::StackUnderflow,
                                parser,
                            ));
                        }
                    }

                    let is_root = frames.len() == 1;
                    if is_root {
                        // Root length carries no information
                        if parser.consume_if(b':') {
                            parser.parse_branch_length()?;
                        }
                    } else {
                        length_stack.push(parse_required_length(parser)?);
                    }
                }

                stack.push(merged);
                if let Some(frame) = frames.last_mut() {
                    frame.children += 1;
                }
            }
            b if b.is_ascii_digit() => {
                expect_node(&frames, parser, b)?;
                let leaf = parser.parse_node_id()?;
                leaves.push(leaf);
                stack.push(leaf);
                if dialect.branch_lengths {
                    length_stack.push(parse_required_length(parser)?);
                }
                if let Some(frame) = frames.last_mut() {
                    frame.children += 1;
                }
            }
            b => return Err(ParsingError::unexpected_character(parser, b)),
        }
    }

    // Consume ';' and make sure nothing but whitespace follows
    parser.next_byte();
    parser.skip_whitespace();
    if !parser.is_eof() {
        return Err(ParsingError::from_parser(
            ParsingErrorType::TrailingCharacters,
            parser,
        ));
    }

    if frames.len() != 1 {
        return Err(ParsingError::from_parser(
            ParsingErrorType::InvalidTreeStructure(format!(
                "{} unclosed bracket(s)",
                frames.len() - 1
            )),
            parser,
        ));
    }

    let num_leaves = leaves.len();
    if cherries.is_empty() || stack.len() != 1 {
        return Err(ParsingError::invalid_tree_structure(format!(
            "expected a single rooted tree with at least two leaves \
             but found {} top-level node(s) and {num_leaves} leaves",
            stack.len()
        )));
    }
    check_leaves(&leaves)?;

    Ok(ExtractedCherries {
        cherries,
        branch_lengths,
        num_leaves,
    })
}

/// Checks that a node may start here: first in its bracket or right after a comma.
fn expect_node(frames: &[Frame], parser: &ByteParser, byte: u8) -> Result<(), ParsingError> {
    match frames.last() {
        Some(frame) if frame.children == frame.commas => Ok(()),
        _ => Err(ParsingError::unexpected_character(parser, byte)),
    }
}

/// Parses a mandatory `:length` annotation.
fn parse_required_length(parser: &mut ByteParser) -> Result<f64, ParsingError> {
    if !parser.consume_if(b':') {
        return Err(ParsingError::from_parser(
            ParsingErrorType::MissingBranchLength,
            parser,
        ));
    }
    parser.parse_branch_length()
}

/// Checks that the leaves are exactly `0..leaves.len()`, each appearing once.
fn check_leaves(leaves: &[NodeId]) -> Result<(), ParsingError> {
    let num_leaves = leaves.len();
    let mut seen = vec![false; num_leaves];
    for &leaf in leaves {
        if leaf >= num_leaves {
            return Err(ParsingError::invalid_tree_structure(format!(
                "leaf {leaf} out of range for a tree with {num_leaves} leaves"
            )));
        }
        if seen[leaf] {
            return Err(ParsingError::invalid_tree_structure(format!(
                "leaf {leaf} appears more than once"
            )));
        }
        seen[leaf] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(newick: &str, dialect: NewickDialect) -> Result<ExtractedCherries, ParsingError> {
        extract_cherries(&mut ByteParser::for_str(newick), dialect)
    }

    fn kind_of(newick: &str, dialect: NewickDialect) -> ParsingErrorType {
        extract(newick, dialect).unwrap_err().kind().clone()
    }

    #[test]
    fn test_extract_with_parent_labels() {
        let dialect = NewickDialect::new().with_parent_labels();
        let extracted = extract("((0,(1,2)4)5,3)6;", dialect).unwrap();
        assert_eq!(
            extracted.cherries,
            vec![Cherry::new(1, 2, 4), Cherry::new(0, 4, 5), Cherry::new(5, 3, 6)]
        );
        assert!(extracted.branch_lengths.is_empty());
        assert_eq!(extracted.num_leaves, 4);
    }

    #[test]
    fn test_extract_without_parent_labels() {
        let extracted = extract("((0,(1,2)),3);", NewickDialect::new()).unwrap();
        assert_eq!(
            extracted.cherries,
            vec![Cherry::new(1, 2, 2), Cherry::new(0, 1, 1), Cherry::new(0, 3, 3)]
        );
    }

    #[test]
    fn test_extract_branch_lengths() {
        let dialect = NewickDialect::new().with_branch_lengths();
        let extracted = extract("((2:0.5, 0:1e-2):0.25 ,1:3):7;", dialect).unwrap();
        assert_eq!(
            extracted.cherries,
            vec![Cherry::new(2, 0, 2), Cherry::new(0, 1, 1)]
        );
        assert_eq!(extracted.branch_lengths, vec![[0.5, 0.01], [0.25, 3.0]]);
    }

    #[test]
    fn test_extract_labels_and_lengths() {
        let dialect = NewickDialect::new().with_parent_labels().with_branch_lengths();
        let extracted = extract("((0:1,2:2)3:4,1:5)4;", dialect).unwrap();
        assert_eq!(
            extracted.cherries,
            vec![Cherry::new(0, 2, 3), Cherry::new(3, 1, 4)]
        );
        assert_eq!(extracted.branch_lengths, vec![[1.0, 2.0], [4.0, 5.0]]);
    }

    #[test]
    fn test_missing_terminator() {
        assert_eq!(kind_of("(0,1", NewickDialect::new()), ParsingErrorType::MissingTerminator);
        assert_eq!(kind_of("(0,1)", NewickDialect::new()), ParsingErrorType::MissingTerminator);
    }

    #[test]
    fn test_stack_underflow() {
        let dialect = NewickDialect::new();
        assert_eq!(kind_of("0,1);", dialect), ParsingErrorType::UnexpectedCharacter(','));
        assert_eq!(kind_of("(0,1));", dialect), ParsingErrorType::StackUnderflow);
    }

    #[test]
    fn test_trailing_characters() {
        assert_eq!(
            kind_of("(0,1); (0,1);", NewickDialect::new()),
            ParsingErrorType::TrailingCharacters
        );
        assert!(extract("(0,1);\n", NewickDialect::new()).is_ok());
    }

    #[test]
    fn test_dialect_mismatch() {
        let labels = NewickDialect::new().with_parent_labels();
        assert_eq!(kind_of("((0,2),1)4;", labels), ParsingErrorType::MissingParentLabel);
        let topology = NewickDialect::new();
        assert_eq!(kind_of("((0,2)3,1)4;", topology), ParsingErrorType::UnexpectedCharacter('3'));
        assert_eq!(kind_of("((0:1,2),1);", topology), ParsingErrorType::UnexpectedCharacter(':'));
        assert_eq!(
            kind_of("((0:1,2),1);", NewickDialect::new().with_branch_lengths()),
            ParsingErrorType::MissingBranchLength
        );
    }

    #[test]
    fn test_invalid_structures() {
        let dialect = NewickDialect::new();
        for newick in ["(0,1,2);", "((0,1);", "0;", "((0,3),1);", "((0,1),1);", "(0,);"] {
            assert!(
                matches!(kind_of(newick, dialect), ParsingErrorType::InvalidTreeStructure(_)),
                "{newick}"
            );
        }
    }

    #[test]
    fn test_misplaced_separators() {
        let dialect = NewickDialect::new();
        assert_eq!(kind_of("(0 1);", dialect), ParsingErrorType::UnexpectedCharacter('1'));
        assert_eq!(kind_of("(,0 1);", dialect), ParsingErrorType::UnexpectedCharacter(','));
        assert_eq!(kind_of("(0 1,);", dialect), ParsingErrorType::UnexpectedCharacter('1'));
        assert_eq!(kind_of("(0,,1);", dialect), ParsingErrorType::UnexpectedCharacter(','));
        assert_eq!(kind_of("((0,1)(2,3));", dialect), ParsingErrorType::UnexpectedCharacter('('));
        assert_eq!(kind_of("(0,1)2;", dialect), ParsingErrorType::UnexpectedCharacter('2'));

        let labels = NewickDialect::new().with_parent_labels();
        assert_eq!(kind_of("((,0 2)3,1)4;", labels), ParsingErrorType::UnexpectedCharacter(','));
        assert_eq!(kind_of("((0,2)3 1)4;", labels), ParsingErrorType::UnexpectedCharacter('1'));

        let lengths = NewickDialect::new().with_branch_lengths();
        assert_eq!(kind_of("(0:1 1:1);", lengths), ParsingErrorType::UnexpectedCharacter('1'));
        assert!(extract("( 0:1 , 1:1 ) ;", lengths).is_ok());
    }
}
