//! # linkmd-storage
//!
//! Physical mirror providers. The local provider keeps the on-disk copy of
//! every project's folder tree under a configured root directory.

pub mod local;

pub use local::LocalMirror;
