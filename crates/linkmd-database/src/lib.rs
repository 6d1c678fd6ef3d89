//! # linkmd-database
//!
//! SQLite connection management and the tree store: concrete repository
//! implementations for projects, folders, documents, and tags.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
