//! Core traits defined in `linkmd-core` and implemented by other crates.

pub mod mirror;

pub use mirror::MirrorProvider;
