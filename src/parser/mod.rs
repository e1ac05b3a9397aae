//! Basic low-level byte parser functionality.
//!
//! Provides the [ByteParser] cursor used to scan Newick strings, the
//! [ParsingError] reported when a string is malformed, and label escaping
//! helpers.

pub mod byte_parser;
pub mod parsing_error;
pub mod utils;

pub use byte_parser::ByteParser;
pub use parsing_error::{ParsingError, ParsingErrorType};
