//! Low-level byte-by-byte parser for ASCII text.
//!
//! This module provides [ByteParser] for scanning Newick strings with support
//! for peeking, consuming and token parsing (integer node ids, branch lengths
//! and quote-aware taxon labels). Used as the foundation of the cherry
//! extraction and of the label mapping utilities.

use crate::parser::parsing_error::{ParsingError, ParsingErrorType};

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================$=
/// A byte-by-byte parser over an in-memory ASCII string.
///
/// [ByteParser] keeps a cursor into the borrowed input and offers peek,
/// consume and token operations. Every token operation leaves the cursor on
/// the first byte after the token, so callers can inspect the delimiter.
///
/// # Example
/// ```
/// use phylo2vec::parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("12:0.5,");
/// assert_eq!(parser.parse_node_id().unwrap(), 12);
/// assert!(parser.consume_if(b':'));
/// assert_eq!(parser.parse_branch_length().unwrap(), 0.5);
/// assert_eq!(parser.peek(), Some(b','));
/// ```
pub struct ByteParser<'a> {
    /// The borrowed byte data being parsed
    input: &'a [u8],
    /// Current position in the byte slice
    pos: usize,
}

impl<'a> ByteParser<'a> {
    /// Creates a new `ByteParser` over the bytes of a string.
    ///
    /// # Arguments
    /// * `input` - The string to parse
    pub fn for_str(input: &'a str) -> Self {
        Self::for_bytes(input.as_bytes())
    }

    /// Creates a new `ByteParser` over a byte slice.
    ///
    /// # Arguments
    /// * `input` - The bytes to parse
    pub fn for_bytes(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Peeks at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Gets the current byte and advances the position (consumes it).
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Skips (consumes) all consecutive whitespace characters.
    ///
    /// Whitespace includes: space (' '), tab ('\t'), newline ('\n'), and carriage return ('\r').
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Skips (consumes) bytes until one of the delimiters (or EOF) is reached.
    ///
    /// The delimiter itself is not consumed.
    ///
    /// # Returns
    /// The skipped bytes
    pub fn skip_until(&mut self, delimiters: &[u8]) -> &'a [u8] {
        let start = self.pos;
        while self.peek().is_some_and(|b| !delimiters.contains(&b)) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    /// Checks if the current byte equals the target byte.
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek() == Some(ch)
    }

    /// Consumes the current byte if it matches the target byte.
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the current parser position in the input.
    ///
    /// Useful for error messages and tracking parser state.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns a string from up to `k` bytes from the current position for error context.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement character.
    pub fn get_context_as_string(&self, k: usize) -> String {
        let start = self.pos.min(self.input.len());
        let end = (self.pos + k).min(self.input.len());
        String::from_utf8_lossy(&self.input[start..end]).into_owned()
    }

    /// Parses a node id: a run of ASCII digits.
    ///
    /// # Returns
    /// * `Ok(usize)` - The parsed id
    /// * [ParsingError] - If no digit is at the current position
    ///   or the number does not fit into `usize`
    pub fn parse_node_id(&mut self) -> Result<usize, ParsingError> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }

        if start == self.pos {
            return match self.peek() {
                None => Err(ParsingError::unexpected_eof(self)),
                Some(b) => Err(ParsingError::unexpected_character(self, b)),
            };
        }

        // Only ASCII digits were consumed, so the slice is valid UTF-8
        let digits = String::from_utf8_lossy(&self.input[start..self.pos]);
        digits.parse::<usize>().map_err(|e| {
            ParsingError::from_parser(
                ParsingErrorType::InvalidNodeLabel(format!("{digits}: {e}")),
                self,
            )
        })
    }

    /// Parses a branch length value (the part after `:`).
    ///
    /// Supports signs and scientific notation (e.g., `-1.5e-10`).
    ///
    /// # Returns
    /// * `Ok(f64)` - The parsed value
    /// * [ParsingError] - If the characters do not form a number
    pub fn parse_branch_length(&mut self) -> Result<f64, ParsingError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            // Valid characters for a float: digits, '.', '-', '+', 'e', 'E'
            if b.is_ascii_digit() || b == b'.' || b == b'-' || b == b'+' || b == b'e' || b == b'E' {
                self.pos += 1;
            } else {
                break;
            }
        }

        let branch_length_str = String::from_utf8_lossy(&self.input[start..self.pos]);
        if branch_length_str.is_empty() {
            return Err(ParsingError::from_parser(
                ParsingErrorType::MissingBranchLength,
                self,
            ));
        }

        branch_length_str.parse::<f64>().map_err(|_| {
            ParsingError::invalid_branch_length(self, branch_length_str.to_string())
        })
    }

    /// Parses a label (quoted or unquoted) with the given delimiter set.
    ///
    /// Quoted labels are enclosed in single quotes; a doubled single quote
    /// inside stands for one quote (e.g., `'Wilson''s'` becomes `Wilson's`).
    ///
    /// # Arguments
    /// * `delimiters` - Byte array of characters that end an unquoted label
    ///
    /// # Errors
    /// Returns an error if a quoted label is not closed.
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        if !self.peek_is(b'\'') {
            let label = self.skip_until(delimiters);
            return Ok(String::from_utf8_lossy(label).into_owned());
        }

        self.pos += 1; // consume opening '
        let mut label = Vec::new();
        loop {
            match self.next_byte() {
                Some(b'\'') => {
                    if self.consume_if(b'\'') {
                        label.push(b'\'');
                    } else {
                        break;
                    }
                }
                Some(b) => label.push(b),
                None => return Err(ParsingError::unexpected_eof(self)),
            }
        }

        Ok(String::from_utf8_lossy(&label).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_node_id_stops_at_delimiter() {
        let mut parser = ByteParser::for_str("123)4");
        assert_eq!(parser.parse_node_id().unwrap(), 123);
        assert_eq!(parser.peek(), Some(b')'));
        assert_eq!(parser.position(), 3);
    }

    #[test]
    fn test_parse_node_id_requires_digit() {
        let mut parser = ByteParser::for_str(",1");
        let err = parser.parse_node_id().unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::UnexpectedCharacter(','));

        let mut parser = ByteParser::for_str("");
        let err = parser.parse_node_id().unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::UnexpectedEof);
    }

    #[test]
    fn test_parse_branch_length_scientific() {
        let mut parser = ByteParser::for_str("2.5E-3)");
        assert_eq!(parser.parse_branch_length().unwrap(), 2.5e-3);
        assert!(parser.consume_if(b')'));
        assert!(parser.is_eof());
    }

    #[test]
    fn test_parse_branch_length_invalid() {
        let mut parser = ByteParser::for_str("1.2.3,");
        let err = parser.parse_branch_length().unwrap_err();
        assert_eq!(
            err.kind(),
            &ParsingErrorType::InvalidBranchLength("1.2.3".to_string())
        );
    }

    #[test]
    fn test_parse_quoted_label() {
        let mut parser = ByteParser::for_str("'Baillon''s Crake',B");
        assert_eq!(parser.parse_label(b",)").unwrap(), "Baillon's Crake");
        assert_eq!(parser.peek(), Some(b','));

        let mut parser = ByteParser::for_str("'unclosed");
        assert!(parser.parse_label(b",)").is_err());
    }

    #[test]
    fn test_skip_until_delimiter() {
        let mut parser = ByteParser::for_str("Node_7:0.5");
        assert_eq!(parser.skip_until(b":,"), b"Node_7");
        assert_eq!(parser.peek(), Some(b':'));
        assert_eq!(parser.skip_until(b";"), b":0.5");
        assert!(parser.is_eof());
    }

    #[test]
    fn test_skip_whitespace() {
        let mut parser = ByteParser::for_str(" \r  \t\n \t x");
        parser.skip_whitespace();
        assert_eq!(parser.next_byte(), Some(b'x'));
        assert_eq!(parser.next_byte(), None);
    }
}
