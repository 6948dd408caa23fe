//! Member record.
//!
//! # Responsibility
//! - Hold one patron and the ordered set of books issued to them.
//! - Encode/decode the member storage line format.
//!
//! # Invariants
//! - `id` is immutable once assigned and unique across members.
//! - `issued_books` holds no duplicate id and preserves first-issue order.

use super::{escape_field, unescape_field, LineParseError};
use crate::model::book::BookId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Stable identifier for a library member.
pub type MemberId = u32;

const MEMBER_LINE_FIELDS: usize = 4;
const MEMBER_LINE_REQUIRED_FIELDS: usize = 3;
const ISSUED_LIST_SEPARATOR: char = '|';

/// One patron and the books currently issued to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Unique member id, allocated by the manager and never reused.
    pub id: MemberId,
    pub name: String,
    pub email: String,
    /// Ids of currently issued books, deduplicated, in first-issue order.
    pub issued_books: Vec<BookId>,
}

impl Member {
    /// Creates a new member with an empty issued-book list.
    pub fn new(id: MemberId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            issued_books: Vec::new(),
        }
    }

    /// Records a book as issued to this member.
    ///
    /// Idempotent: an id already present is not appended again, so the
    /// position of its first occurrence is preserved.
    pub fn add_issued_book(&mut self, book_id: BookId) {
        if !self.issued_books.contains(&book_id) {
            self.issued_books.push(book_id);
        }
    }

    /// Removes a book from this member's issued list.
    ///
    /// No-op when the id is not present.
    pub fn return_issued_book(&mut self, book_id: BookId) {
        self.issued_books.retain(|id| *id != book_id);
    }

    /// Encodes this member as one storage line.
    ///
    /// Format: `<id>,<name>,<email>,<id1>|<id2>|...` with literal commas in
    /// text fields escaped. The trailing field is empty when no books are
    /// issued.
    pub fn to_line(&self) -> String {
        let issued = self
            .issued_books
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(&ISSUED_LIST_SEPARATOR.to_string());
        format!(
            "{},{},{},{}",
            self.id,
            escape_field(&self.name),
            escape_field(&self.email),
            issued
        )
    }

    /// Decodes one storage line produced by [`Member::to_line`].
    ///
    /// The issued-book field is optional; blank segments inside it are
    /// skipped. Any non-integer segment rejects the whole line.
    ///
    /// # Errors
    /// - Fewer than 3 comma-separated fields.
    /// - Non-integer member id or issued-book id.
    pub fn from_line(line: &str) -> Result<Member, LineParseError> {
        let parts: Vec<&str> = line.splitn(MEMBER_LINE_FIELDS, ',').collect();
        if parts.len() < MEMBER_LINE_REQUIRED_FIELDS {
            return Err(LineParseError::FieldCount {
                expected: MEMBER_LINE_REQUIRED_FIELDS,
                found: parts.len(),
            });
        }

        let id: MemberId = parts[0]
            .parse()
            .map_err(|_| LineParseError::InvalidId(parts[0].to_string()))?;

        let mut issued_books = Vec::new();
        if let Some(list) = parts.get(MEMBER_LINE_REQUIRED_FIELDS) {
            for segment in list.split(ISSUED_LIST_SEPARATOR) {
                let segment = segment.trim();
                if segment.is_empty() {
                    continue;
                }
                let book_id: BookId = segment
                    .parse()
                    .map_err(|_| LineParseError::InvalidBookRef(segment.to_string()))?;
                issued_books.push(book_id);
            }
        }

        Ok(Member {
            id,
            name: unescape_field(parts[1]),
            email: unescape_field(parts[2]),
            issued_books,
        })
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for Member {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let issued = self
            .issued_books
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "ID: {} | Name: {} | Email: {} | IssuedBooks: [{}]",
            self.id, self.name, self.email, issued
        )
    }
}
