//! Core domain logic for Bookshelf, a small library-catalog manager.
//! This crate is the single source of truth for catalog invariants.

pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{Book, BookId};
pub use model::member::{Member, MemberId};
pub use model::LineParseError;
pub use service::library_manager::{
    CatalogError, CatalogResult, LibraryManager, LoadReport, LoanOutcome,
};
pub use store::catalog_store::{
    CatalogStore, FlatFileStore, LoadedLines, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
