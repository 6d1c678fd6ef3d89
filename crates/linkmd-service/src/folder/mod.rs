//! Folder lifecycle and project tree views.

pub mod service;
pub mod tree;

pub use service::{FolderDeletion, FolderService, MAX_FOLDER_DEPTH};
pub use tree::TreeService;
