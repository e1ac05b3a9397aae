//! Utility functions for label escaping in Newick strings.
//!
//! Taxon labels read by [ByteParser::parse_label](crate::parser::ByteParser::parse_label)
//! are stored unquoted; these helpers quote them again when they are written
//! back into a Newick string.

/// Characters that cannot appear in an unquoted Newick label.
const SPECIAL_CHARS: &[char] = &[' ', ',', ';', '\t', '\n', '\r', '(', ')', ':', '[', ']', '\''];

/// Checks whether a raw label has to be wrapped in single quotes
/// to be written into a Newick string.
///
/// # Examples
/// ```
/// # use phylo2vec::parser::utils::needs_quoting;
/// assert!(!needs_quoting("Pukeko"));
/// assert!(!needs_quoting("Australasian_Swamphen"));
/// assert!(needs_quoting("Australasian Swamphen"));
/// assert!(needs_quoting("Baillon's_Crake"));
/// assert!(needs_quoting(""));
/// ```
pub fn needs_quoting(label: &str) -> bool {
    label.is_empty() || label.contains(SPECIAL_CHARS)
}

/// Escapes a raw label for use in a Newick string.
///
/// Labels containing special characters (punctuation, delimiters, whitespace)
/// are wrapped in single quotes and internal single quotes are doubled.
/// Other labels are returned unchanged, so that parsing the escaped label
/// yields the raw label again.
///
/// # Examples
/// ```
/// # use phylo2vec::parser::utils::escape_label;
/// assert_eq!(escape_label("Pukeko"), "Pukeko");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Australasian Swamphen"), "'Australasian Swamphen'");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// ```
pub fn escape_label(label: &str) -> String {
    if needs_quoting(label) {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}
