//! Flat-file storage layer.
//!
//! # Responsibility
//! - Define the storage contract the catalog service persists through.
//! - Keep file-format details out of service orchestration.
//!
//! # Invariants
//! - Loads skip malformed lines instead of failing the whole file.
//! - Saves are whole-file rewrites of the current in-memory state.

pub mod catalog_store;
