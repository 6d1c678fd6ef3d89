//! # linkmd-core
//!
//! Core crate for LinkMD. Contains configuration schemas, typed
//! identifiers, the physical mirror trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other LinkMD crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
