//! Book record.
//!
//! # Responsibility
//! - Hold one catalog item and its issue state.
//! - Encode/decode the book storage line format.
//!
//! # Invariants
//! - `id` is immutable once assigned and unique across the catalog.
//! - Two books with the same `id` are the same book regardless of payload.

use super::{escape_field, unescape_field, LineParseError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Stable identifier for a catalog book.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type BookId = u32;

const BOOK_LINE_FIELDS: usize = 5;

/// One catalog item and its issue state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// Unique catalog id, allocated by the manager and never reused.
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
    /// Whether the book is currently issued to a member.
    pub issued: bool,
}

impl Book {
    /// Creates a new, not-yet-issued book.
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            category: category.into(),
            issued: false,
        }
    }

    /// Flags this book as issued to a member.
    pub fn mark_issued(&mut self) {
        self.issued = true;
    }

    /// Clears the issued flag.
    pub fn mark_returned(&mut self) {
        self.issued = false;
    }

    /// Default catalog ordering: case-insensitive comparison of titles.
    ///
    /// Exposed as a named comparator instead of `Ord` because identity
    /// (`Eq`) is keyed on `id`, not on title.
    pub fn title_cmp(&self, other: &Book) -> Ordering {
        self.title.to_lowercase().cmp(&other.title.to_lowercase())
    }

    /// Encodes this book as one storage line.
    ///
    /// Format: `<id>,<title>,<author>,<category>,<true|false>` with literal
    /// commas in text fields escaped.
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.id,
            escape_field(&self.title),
            escape_field(&self.author),
            escape_field(&self.category),
            self.issued
        )
    }

    /// Decodes one storage line produced by [`Book::to_line`].
    ///
    /// # Errors
    /// - Fewer than 5 comma-separated fields.
    /// - Non-integer id field.
    /// - Issued flag other than literal `true`/`false`.
    pub fn from_line(line: &str) -> Result<Book, LineParseError> {
        let parts: Vec<&str> = line.splitn(BOOK_LINE_FIELDS, ',').collect();
        if parts.len() < BOOK_LINE_FIELDS {
            return Err(LineParseError::FieldCount {
                expected: BOOK_LINE_FIELDS,
                found: parts.len(),
            });
        }

        let id: BookId = parts[0]
            .parse()
            .map_err(|_| LineParseError::InvalidId(parts[0].to_string()))?;
        let issued = match parts[4] {
            "true" => true,
            "false" => false,
            other => return Err(LineParseError::InvalidFlag(other.to_string())),
        };

        Ok(Book {
            id,
            title: unescape_field(parts[1]),
            author: unescape_field(parts[2]),
            category: unescape_field(parts[3]),
            issued,
        })
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Book {}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {} | Title: {} | Author: {} | Category: {} | Issued: {}",
            self.id,
            self.title,
            self.author,
            self.category,
            if self.issued { "Yes" } else { "No" }
        )
    }
}
