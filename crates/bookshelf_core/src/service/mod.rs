//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate model mutations and store persistence into catalog
//!   operations.
//! - Keep front-end layers decoupled from storage details.

pub mod library_manager;
