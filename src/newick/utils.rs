//! Newick string utilities: counting leaves, stripping annotations and
//! mapping taxon labels to integer leaves (and back).

use crate::model::leaf_label_map::LeafLabelMap;
use crate::newick::defs::{
    BRANCH_LENGTH_DELIMITERS, NEWICK_LABEL_DELIMITERS, PARENT_LABEL_DELIMITERS,
};
use crate::parser::byte_parser::ByteParser;
use crate::parser::parsing_error::{ParsingError, ParsingErrorType};
use crate::parser::utils::escape_label;

/// Returns whether a byte is Newick whitespace.
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Counts the leaves of a tree: the nodes following `(` or `,` that do not
/// open a subtree themselves.
///
/// # Example
/// ```
/// use phylo2vec::newick::utils::find_num_leaves;
///
/// assert_eq!(find_num_leaves("((0,2)3,1)4;"), 3);
/// assert_eq!(find_num_leaves("((A:0.1,B:0.2),(C,D));"), 4);
/// ```
pub fn find_num_leaves(newick: &str) -> usize {
    let mut num_leaves = 0;
    let mut at_node_start = false;

    for &b in newick.as_bytes() {
        match b {
            b'(' | b',' => at_node_start = true,
            b if is_whitespace(b) => {}
            _ => {
                if at_node_start && !matches!(b, b')' | b';') {
                    num_leaves += 1;
                }
                at_node_start = false;
            }
        }
    }

    num_leaves
}

/// Removes the label after every closing bracket, keeping branch lengths.
///
/// # Example
/// ```
/// use phylo2vec::newick::utils::remove_parent_labels;
///
/// assert_eq!(remove_parent_labels("(((2,1)4,0)5,3)6;"), "(((2,1),0),3);");
/// assert_eq!(remove_parent_labels("((0:1,2:2)3:4,1:5)4;"), "((0:1,2:2):4,1:5);");
/// ```
pub fn remove_parent_labels(newick: &str) -> String {
    let mut parser = ByteParser::for_str(newick);
    let mut stripped: Vec<u8> = Vec::with_capacity(newick.len());

    while let Some(b) = parser.next_byte() {
        stripped.push(b);
        if b == b')' {
            parser.skip_until(PARENT_LABEL_DELIMITERS);
        }
    }

    String::from_utf8_lossy(&stripped).into_owned()
}

/// Removes every `:length` annotation.
///
/// # Example
/// ```
/// use phylo2vec::newick::utils::remove_branch_lengths;
///
/// assert_eq!(remove_branch_lengths("(((2:0.02,1:0.01),0:0.041),3:1.42);"), "(((2,1),0),3);");
/// ```
pub fn remove_branch_lengths(newick: &str) -> String {
    let mut parser = ByteParser::for_str(newick);
    let mut stripped: Vec<u8> = Vec::with_capacity(newick.len());

    while let Some(b) = parser.next_byte() {
        if b == b':' {
            parser.skip_until(BRANCH_LENGTH_DELIMITERS);
        } else {
            stripped.push(b);
        }
    }

    String::from_utf8_lossy(&stripped).into_owned()
}

/// Replaces the taxon labels of the leaves by integers `0..n` in order of
/// appearance.
///
/// Leaf labels may be quoted (`'Kaka bird'`). Labels of internal nodes and
/// whitespace are dropped, branch lengths are kept.
///
/// # Returns
/// * `Ok((String, LeafLabelMap))` - Integer Newick string and the mapping
///   from leaf id to taxon label
/// * [ParsingError] - If a leaf has no label, a label appears twice
///   or a quoted label is not closed
///
/// # Example
/// ```
/// use phylo2vec::newick::utils::create_label_mapping;
///
/// let (newick, labels) = create_label_mapping("((Kea,Kaka)Nestor,Kakapo);").unwrap();
/// assert_eq!(newick, "((0,1),2);");
/// assert_eq!(labels.get_label(2), Some("Kakapo"));
/// ```
pub fn create_label_mapping(newick: &str) -> Result<(String, LeafLabelMap), ParsingError> {
    let mut parser = ByteParser::for_str(newick);
    let mut labels = LeafLabelMap::new(find_num_leaves(newick));
    let mut mapped: Vec<u8> = Vec::with_capacity(newick.len());
    let mut at_node_start = false;

    while let Some(b) = parser.peek() {
        match b {
            b'(' | b',' => {
                parser.next_byte();
                mapped.push(b);
                at_node_start = true;
            }
            b')' => {
                parser.next_byte();
                mapped.push(b);
                parser.parse_label(PARENT_LABEL_DELIMITERS)?;
                at_node_start = false;
            }
            b if is_whitespace(b) => {
                parser.next_byte();
            }
            _ if at_node_start => {
                let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
                if label.is_empty() {
                    return Err(ParsingError::from_parser(
                        ParsingErrorType::InvalidNodeLabel("leaf without label".to_string()),
                        &parser,
                    ));
                }
                if labels.contains_label(&label) {
                    let message = format!("duplicate leaf label {label:?}");
                    return Err(ParsingError::from_parser(
                        ParsingErrorType::InvalidNodeLabel(message),
                        &parser,
                    ));
                }
                let id = labels.get_or_insert(&label);
                mapped.extend_from_slice(id.to_string().as_bytes());
                at_node_start = false;
            }
            _ => {
                parser.next_byte();
                mapped.push(b);
            }
        }
    }

    Ok((String::from_utf8_lossy(&mapped).into_owned(), labels))
}

/// Replaces the integer leaves of a Newick string by their taxon labels.
///
/// Labels are quoted where Newick requires it. Everything except leaf ids
/// is copied verbatim.
///
/// # Errors
/// [ParsingError] if a leaf is not an integer or has no label in `labels`.
///
/// # Example
/// ```
/// use phylo2vec::newick::utils::{apply_label_mapping, create_label_mapping};
///
/// let taxa = "(('Kea bird':0.1,Kaka:0.2):0.5,Kakapo:0.3);";
/// let (newick, labels) = create_label_mapping(taxa).unwrap();
/// assert_eq!(newick, "((0:0.1,1:0.2):0.5,2:0.3);");
/// assert_eq!(
///     apply_label_mapping(&newick, &labels).unwrap(),
///     "(('Kea bird':0.1,Kaka:0.2):0.5,Kakapo:0.3);"
/// );
/// ```
pub fn apply_label_mapping(newick: &str, labels: &LeafLabelMap) -> Result<String, ParsingError> {
    let mut parser = ByteParser::for_str(newick);
    let mut labelled: Vec<u8> = Vec::with_capacity(newick.len() * 2);
    let mut at_node_start = false;

    while let Some(b) = parser.peek() {
        match b {
            b'(' | b',' => {
                parser.next_byte();
                labelled.push(b);
                at_node_start = true;
            }
            b if is_whitespace(b) => {
                parser.next_byte();
                labelled.push(b);
            }
            b')' | b';' => {
                parser.next_byte();
                labelled.push(b);
                at_node_start = false;
            }
            _ if at_node_start => {
                let id = parser.parse_node_id()?;
                let label = labels.get_label(id).ok_or_else(|| {
                    ParsingError::from_parser(
                        ParsingErrorType::InvalidNodeLabel(format!("no taxon label for leaf {id}")),
                        &parser,
                    )
                })?;
                labelled.extend_from_slice(escape_label(label).as_bytes());
                at_node_start = false;
            }
            _ => {
                parser.next_byte();
                labelled.push(b);
            }
        }
    }

    Ok(String::from_utf8_lossy(&labelled).into_owned())
}
