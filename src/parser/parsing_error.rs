//! Error types for the Newick scanner.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors that occur while reading integer-labelled Newick strings.

use crate::parser::byte_parser::ByteParser;
use thiserror::Error;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================$=
/// Error types that can occur while scanning a Newick string.
#[derive(PartialEq, Debug, Clone, Error)]
pub enum ParsingErrorType {
    #[error("Unexpected end of input")]
    UnexpectedEof,
    #[error("Unexpected character {0:?}")]
    UnexpectedCharacter(char),
    #[error("Invalid node label - {0}")]
    InvalidNodeLabel(String),
    #[error("Missing parent label after ')'")]
    MissingParentLabel,
    #[error("Invalid branch length - {0}")]
    InvalidBranchLength(String),
    #[error("Missing branch length")]
    MissingBranchLength,
    #[error("Found ')' without two pending nodes")]
    StackUnderflow,
    #[error("Missing ';' at end of tree")]
    MissingTerminator,
    #[error("Unexpected characters after ';'")]
    TrailingCharacters,
    #[error("Invalid tree structure - {0}")]
    InvalidTreeStructure(String),
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================$=
/// Parsing error with contextual information (position and following bytes).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at position {position}{}", format_context(.context))]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: usize,
    context: String,
}

impl ParsingError {
    /// Create a ParsingError from an error type and parser state
    pub fn from_parser(kind: ParsingErrorType, parser: &ByteParser) -> Self {
        Self {
            kind,
            position: parser.position(),
            context: parser.get_context_as_string(DEFAULT_CONTEXT_LENGTH),
        }
    }

    /// Convenience constructor for UnexpectedEof
    pub fn unexpected_eof(parser: &ByteParser) -> Self {
        Self::from_parser(ParsingErrorType::UnexpectedEof, parser)
    }

    /// Convenience constructor for UnexpectedCharacter
    pub fn unexpected_character(parser: &ByteParser, ch: u8) -> Self {
        Self::from_parser(ParsingErrorType::UnexpectedCharacter(char::from(ch)), parser)
    }

    /// Convenience constructor for InvalidBranchLength
    pub fn invalid_branch_length(parser: &ByteParser, msg: String) -> Self {
        Self::from_parser(ParsingErrorType::InvalidBranchLength(msg), parser)
    }

    /// Create a ParsingError without parser context
    /// (for checks after the scan has finished)
    pub fn without_context(kind: ParsingErrorType) -> Self {
        Self {
            kind,
            position: 0,
            context: String::new(),
        }
    }

    /// Convenience constructor for InvalidTreeStructure without context
    pub fn invalid_tree_structure(msg: String) -> Self {
        Self::without_context(ParsingErrorType::InvalidTreeStructure(msg))
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the position where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }
}

fn format_context(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!("\n  Context (next {} bytes): {}", context.len(), context)
    }
}
