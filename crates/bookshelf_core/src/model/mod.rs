//! Catalog domain records and their flat-file line codec.
//!
//! # Responsibility
//! - Define the canonical `Book` and `Member` records.
//! - Encode each record as one delimited text line and decode it back.
//!
//! # Invariants
//! - Record identity is the integer id; every other field is payload.
//! - Decoding a malformed line yields `LineParseError`, never a panic.

pub mod book;
pub mod member;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Token substituted for literal commas inside free-text fields.
///
/// The token itself is not escaped, so source text that already contains it
/// decodes back to a comma. Known lossy edge of the format.
const COMMA_ESCAPE: &str = "&#44;";

/// Reason a stored line could not be decoded into a record.
///
/// Loaders treat every variant the same way (skip the line and keep going);
/// the variant only feeds diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineParseError {
    /// The line has fewer delimited fields than the record needs.
    FieldCount { expected: usize, found: usize },
    /// The id field is not an unsigned integer.
    InvalidId(String),
    /// The issued flag is not literal `true` or `false`.
    InvalidFlag(String),
    /// An entry in a member's issued-book list is not an unsigned integer.
    InvalidBookRef(String),
}

impl Display for LineParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldCount { expected, found } => {
                write!(f, "expected at least {expected} fields, found {found}")
            }
            Self::InvalidId(value) => write!(f, "invalid record id `{value}`"),
            Self::InvalidFlag(value) => write!(f, "invalid issued flag `{value}`"),
            Self::InvalidBookRef(value) => write!(f, "invalid issued-book id `{value}`"),
        }
    }
}

impl Error for LineParseError {}

/// Escapes literal field delimiters in free text before writing.
pub(crate) fn escape_field(value: &str) -> String {
    value.replace(',', COMMA_ESCAPE)
}

/// Reverses [`escape_field`] after reading.
pub(crate) fn unescape_field(value: &str) -> String {
    value.replace(COMMA_ESCAPE, ",")
}
