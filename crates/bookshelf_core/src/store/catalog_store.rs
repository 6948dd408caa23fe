//! Catalog storage contract and flat-file implementation.
//!
//! # Responsibility
//! - Provide load/save APIs over the two catalog storage locations.
//! - Keep line-format and filesystem details inside this boundary.
//!
//! # Invariants
//! - Missing storage files are created empty on load, never on save.
//! - A malformed line is skipped and counted; it never aborts a load.
//! - Saves rewrite the whole file; a crash mid-write can truncate it
//!   (accepted durability gap at this scale, no atomic-rename recovery).

use crate::model::book::Book;
use crate::model::member::Member;
use crate::model::LineParseError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// Result type for storage APIs.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer error for reading or writing a persistence file.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "storage failure at `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Outcome of loading one storage location.
#[derive(Debug, Clone)]
pub struct LoadedLines<T> {
    /// Records decoded from well-formed lines, in file order.
    pub records: Vec<T>,
    /// Count of malformed lines that were skipped.
    pub skipped: usize,
}

/// Storage contract for the two catalog collections.
///
/// The service layer persists exclusively through this trait so tests and
/// future back ends can swap the file implementation out.
pub trait CatalogStore {
    fn load_books(&self) -> StoreResult<LoadedLines<Book>>;
    fn load_members(&self) -> StoreResult<LoadedLines<Member>>;
    fn save_books(&self, books: &[&Book]) -> StoreResult<()>;
    fn save_members(&self, members: &[&Member]) -> StoreResult<()>;
}

/// Flat-text-file catalog store: one record per line, one file per
/// collection.
pub struct FlatFileStore {
    books_path: PathBuf,
    members_path: PathBuf,
}

impl FlatFileStore {
    /// Creates a store over explicit storage locations.
    pub fn new(books_path: impl Into<PathBuf>, members_path: impl Into<PathBuf>) -> Self {
        Self {
            books_path: books_path.into(),
            members_path: members_path.into(),
        }
    }

    /// Creates a store using the conventional file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join("books.txt"), dir.join("members.txt"))
    }

    /// Path of the books storage location.
    pub fn books_path(&self) -> &Path {
        &self.books_path
    }

    /// Path of the members storage location.
    pub fn members_path(&self) -> &Path {
        &self.members_path
    }
}

impl CatalogStore for FlatFileStore {
    fn load_books(&self) -> StoreResult<LoadedLines<Book>> {
        load_records(&self.books_path, "book", Book::from_line)
    }

    fn load_members(&self) -> StoreResult<LoadedLines<Member>> {
        load_records(&self.members_path, "member", Member::from_line)
    }

    fn save_books(&self, books: &[&Book]) -> StoreResult<()> {
        write_lines(&self.books_path, books.iter().map(|book| book.to_line()))
    }

    fn save_members(&self, members: &[&Member]) -> StoreResult<()> {
        write_lines(
            &self.members_path,
            members.iter().map(|member| member.to_line()),
        )
    }
}

fn load_records<T>(
    path: &Path,
    kind: &str,
    parse: impl Fn(&str) -> Result<T, LineParseError>,
) -> StoreResult<LoadedLines<T>> {
    if !path.exists() {
        fs::write(path, "").map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "event=store_create module=store status=ok kind={kind} path={}",
            path.display()
        );
    }

    let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    let mut skipped = 0;
    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse(line) {
            Ok(record) => records.push(record),
            Err(err) => {
                skipped += 1;
                warn!(
                    "event=store_load module=store status=skip kind={kind} line={} error={err}",
                    index + 1
                );
            }
        }
    }

    info!(
        "event=store_load module=store status=ok kind={kind} loaded={} skipped={skipped}",
        records.len()
    );
    Ok(LoadedLines { records, skipped })
}

fn write_lines(path: &Path, lines: impl Iterator<Item = String>) -> StoreResult<()> {
    let mut contents = String::new();
    for line in lines {
        contents.push_str(&line);
        contents.push('\n');
    }
    fs::write(path, contents).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
