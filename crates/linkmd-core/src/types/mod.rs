//! Core type definitions used across the LinkMD workspace.

pub mod id;

pub use id::*;
