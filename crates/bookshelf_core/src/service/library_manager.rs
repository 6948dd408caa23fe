//! Library catalog manager.
//!
//! # Responsibility
//! - Own the book/member collections and the known-category set.
//! - Apply every mutation (add, issue, return) and persist it immediately.
//! - Answer search, sort, and lookup queries over the catalog.
//!
//! # Invariants
//! - A book's issued flag and its holder's issued list are changed together
//!   within one issue/return call, after all rejection checks have passed.
//! - Identifiers are allocated as max existing id + 1 over the 100 (books)
//!   and 200 (members) floors, so they never collide in-process.
//! - Domain rejections are reported as `LoanOutcome` values; only storage
//!   and validation failures are errors.

use crate::model::book::{Book, BookId};
use crate::model::member::{Member, MemberId};
use crate::store::catalog_store::{CatalogStore, StoreError};
use log::{error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_ID_FLOOR: BookId = 100;
const MEMBER_ID_FLOOR: MemberId = 200;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.-]+@[\w.-]+\.[A-Za-z]{2,}$").expect("valid email regex"));

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-level error for validation and persistence failures.
#[derive(Debug)]
pub enum CatalogError {
    /// Member email does not match the required pattern; nothing mutated.
    InvalidEmail(String),
    /// A persistence file could not be written. In-memory state has already
    /// been mutated when a save fails mid-operation.
    Store(StoreError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(email) => write!(f, "invalid email format: `{email}`"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEmail(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Tagged outcome of an issue/return transaction.
///
/// Rejections are values, not errors, so callers branch on the kind instead
/// of matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanOutcome {
    Issued { book_id: BookId, member_id: MemberId },
    Returned { book_id: BookId, member_id: MemberId },
    BookNotFound { book_id: BookId },
    MemberNotFound { member_id: MemberId },
    AlreadyIssued { book_id: BookId },
    NotIssued { book_id: BookId },
}

impl LoanOutcome {
    /// Whether the transaction mutated the catalog.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Issued { .. } | Self::Returned { .. })
    }
}

impl Display for LoanOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Issued { .. } => write!(f, "Book issued successfully."),
            Self::Returned { .. } => write!(f, "Book returned successfully."),
            Self::BookNotFound { .. } => write!(f, "Book not found."),
            Self::MemberNotFound { .. } => write!(f, "Member not found."),
            Self::AlreadyIssued { .. } => write!(f, "Book is already issued."),
            Self::NotIssued { .. } => write!(f, "Book is not marked as issued."),
        }
    }
}

/// Summary of a startup load.
///
/// Read failures are recorded here (and logged) instead of aborting: the
/// affected collection falls back to empty and the manager keeps running.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub books_loaded: usize,
    pub members_loaded: usize,
    /// Malformed lines skipped across both files.
    pub skipped_lines: usize,
    pub errors: Vec<StoreError>,
}

/// Owner of the catalog collections and sole entry point for mutations.
///
/// Construct one instance per pair of storage locations and pass it by
/// handle; concurrent access is not supported.
pub struct LibraryManager<S: CatalogStore> {
    store: S,
    books: HashMap<BookId, Book>,
    members: HashMap<MemberId, Member>,
    categories: HashSet<String>,
}

impl<S: CatalogStore> LibraryManager<S> {
    /// Creates an empty manager over the given store.
    ///
    /// Call [`LibraryManager::load_all`] to populate it from storage.
    pub fn new(store: S) -> Self {
        Self {
            store,
            books: HashMap::new(),
            members: HashMap::new(),
            categories: HashSet::new(),
        }
    }

    /// Rebuilds both collections from storage.
    ///
    /// Existing in-memory state is replaced. A collection whose file cannot
    /// be read is left empty and the failure is recorded in the report.
    pub fn load_all(&mut self) -> LoadReport {
        let mut report = LoadReport::default();

        self.books.clear();
        self.categories.clear();
        match self.store.load_books() {
            Ok(loaded) => {
                report.books_loaded = loaded.records.len();
                report.skipped_lines += loaded.skipped;
                for book in loaded.records {
                    self.categories.insert(book.category.clone());
                    self.books.insert(book.id, book);
                }
            }
            Err(err) => {
                error!("event=load_all module=service status=error kind=book error={err}");
                report.errors.push(err);
            }
        }

        self.members.clear();
        match self.store.load_members() {
            Ok(loaded) => {
                report.members_loaded = loaded.records.len();
                report.skipped_lines += loaded.skipped;
                for member in loaded.records {
                    self.members.insert(member.id, member);
                }
            }
            Err(err) => {
                error!("event=load_all module=service status=error kind=member error={err}");
                report.errors.push(err);
            }
        }

        info!(
            "event=load_all module=service status=ok books={} members={} skipped={}",
            report.books_loaded, report.members_loaded, report.skipped_lines
        );
        report
    }

    fn next_book_id(&self) -> BookId {
        self.books.keys().copied().max().unwrap_or(BOOK_ID_FLOOR) + 1
    }

    fn next_member_id(&self) -> MemberId {
        self.members.keys().copied().max().unwrap_or(MEMBER_ID_FLOOR) + 1
    }

    /// Adds a book to the catalog and persists the book collection.
    ///
    /// Field content is not validated; empty strings are accepted.
    pub fn add_book(
        &mut self,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> CatalogResult<Book> {
        let id = self.next_book_id();
        let book = Book::new(id, title, author, category);
        self.categories.insert(book.category.clone());
        self.books.insert(id, book.clone());
        self.save_books()?;
        info!("event=add_book module=service status=ok book_id={id}");
        Ok(book)
    }

    /// Adds a member and persists the member collection.
    ///
    /// # Errors
    /// Returns [`CatalogError::InvalidEmail`] (nothing mutated) when the
    /// email does not match `local@domain.tld`.
    pub fn add_member(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> CatalogResult<Member> {
        let email = email.into();
        if !EMAIL_RE.is_match(&email) {
            warn!("event=add_member module=service status=rejected reason=invalid_email");
            return Err(CatalogError::InvalidEmail(email));
        }
        let id = self.next_member_id();
        let member = Member::new(id, name, email);
        self.members.insert(id, member.clone());
        self.save_members()?;
        info!("event=add_member module=service status=ok member_id={id}");
        Ok(member)
    }

    /// Issues a book to a member and persists both collections.
    ///
    /// All rejection checks run before any mutation, so a rejected call
    /// leaves the catalog untouched.
    pub fn issue_book(
        &mut self,
        book_id: BookId,
        member_id: MemberId,
    ) -> CatalogResult<LoanOutcome> {
        let already_issued = match self.books.get(&book_id) {
            Some(book) => book.issued,
            None => return Ok(LoanOutcome::BookNotFound { book_id }),
        };
        if !self.members.contains_key(&member_id) {
            return Ok(LoanOutcome::MemberNotFound { member_id });
        }
        if already_issued {
            return Ok(LoanOutcome::AlreadyIssued { book_id });
        }

        if let Some(book) = self.books.get_mut(&book_id) {
            book.mark_issued();
        }
        if let Some(member) = self.members.get_mut(&member_id) {
            member.add_issued_book(book_id);
        }
        self.save_books()?;
        self.save_members()?;
        info!("event=issue_book module=service status=ok book_id={book_id} member_id={member_id}");
        Ok(LoanOutcome::Issued { book_id, member_id })
    }

    /// Returns a book on behalf of a member and persists both collections.
    ///
    /// The member is not required to be the actual holder: the issued flag
    /// is cleared regardless and removal from that member's list is a no-op
    /// when the id is absent. Deliberately kept from the original design.
    pub fn return_book(
        &mut self,
        book_id: BookId,
        member_id: MemberId,
    ) -> CatalogResult<LoanOutcome> {
        let issued = match self.books.get(&book_id) {
            Some(book) => book.issued,
            None => return Ok(LoanOutcome::BookNotFound { book_id }),
        };
        if !self.members.contains_key(&member_id) {
            return Ok(LoanOutcome::MemberNotFound { member_id });
        }
        if !issued {
            return Ok(LoanOutcome::NotIssued { book_id });
        }

        if let Some(book) = self.books.get_mut(&book_id) {
            book.mark_returned();
        }
        if let Some(member) = self.members.get_mut(&member_id) {
            member.return_issued_book(book_id);
        }
        self.save_books()?;
        self.save_members()?;
        info!("event=return_book module=service status=ok book_id={book_id} member_id={member_id}");
        Ok(LoanOutcome::Returned { book_id, member_id })
    }

    /// Books whose title contains `query`, case-insensitively.
    ///
    /// An empty query matches every book. Result order follows collection
    /// iteration and is unspecified.
    pub fn search_books_by_title(&self, query: &str) -> Vec<&Book> {
        let needle = query.to_lowercase();
        self.books
            .values()
            .filter(|book| book.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Books whose author contains `query`, case-insensitively.
    pub fn search_books_by_author(&self, query: &str) -> Vec<&Book> {
        let needle = query.to_lowercase();
        self.books
            .values()
            .filter(|book| book.author.to_lowercase().contains(&needle))
            .collect()
    }

    /// Books whose category contains `query`, case-insensitively.
    pub fn search_books_by_category(&self, query: &str) -> Vec<&Book> {
        let needle = query.to_lowercase();
        self.books
            .values()
            .filter(|book| book.category.to_lowercase().contains(&needle))
            .collect()
    }

    /// All books ordered by case-insensitive title.
    ///
    /// Ties keep the pre-sort iteration order, which is itself unspecified.
    pub fn sort_books_by_title(&self) -> Vec<&Book> {
        let mut list: Vec<&Book> = self.books.values().collect();
        list.sort_by(|a, b| a.title_cmp(b));
        list
    }

    /// All books ordered by case-insensitive author.
    pub fn sort_books_by_author(&self) -> Vec<&Book> {
        let mut list: Vec<&Book> = self.books.values().collect();
        list.sort_by(|a, b| a.author.to_lowercase().cmp(&b.author.to_lowercase()));
        list
    }

    /// All books ordered by case-insensitive category.
    pub fn sort_books_by_category(&self) -> Vec<&Book> {
        let mut list: Vec<&Book> = self.books.values().collect();
        list.sort_by(|a, b| a.category.to_lowercase().cmp(&b.category.to_lowercase()));
        list
    }

    /// Looks up one book by id.
    pub fn get_book(&self, book_id: BookId) -> Option<&Book> {
        self.books.get(&book_id)
    }

    /// Looks up one member by id.
    pub fn get_member(&self, member_id: MemberId) -> Option<&Member> {
        self.members.get(&member_id)
    }

    /// All books in collection-iteration order.
    pub fn list_books(&self) -> Vec<&Book> {
        self.books.values().collect()
    }

    /// All members in collection-iteration order.
    pub fn list_members(&self) -> Vec<&Member> {
        self.members.values().collect()
    }

    /// Every category ever seen, sorted for stable output.
    pub fn list_categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.categories.iter().map(String::as_str).collect();
        categories.sort_unstable();
        categories
    }

    /// Rewrites the books storage location from in-memory state.
    pub fn save_books(&self) -> CatalogResult<()> {
        let books: Vec<&Book> = self.books.values().collect();
        self.store.save_books(&books)?;
        Ok(())
    }

    /// Rewrites the members storage location from in-memory state.
    pub fn save_members(&self) -> CatalogResult<()> {
        let members: Vec<&Member> = self.members.values().collect();
        self.store.save_members(&members)?;
        Ok(())
    }

    /// Saves both collections.
    pub fn save_all(&self) -> CatalogResult<()> {
        self.save_books()?;
        self.save_members()?;
        Ok(())
    }
}
