//! # linkmd-entity
//!
//! Domain entity models for LinkMD. Every struct in this crate represents
//! a tree store row or a domain value object. Row types additionally
//! derive `sqlx::FromRow`.

pub mod document;
pub mod folder;
pub mod project;
pub mod tag;
